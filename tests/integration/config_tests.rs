use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use similar_files::config::{Config, ConfigError, ENV_PREFIX};
use similar_files::scanner::HashAlgorithm;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Md5);
    assert_eq!(config.chunk_size, 1024);
    assert_eq!(config.io_threads, 4);
    assert!(!config.follow_symlinks);
    assert!(!config.skip_hidden);
    assert!(!config.strict);
}

#[test]
fn test_config_load_from_env() {
    // Figment's Jail isolates the environment from other tests.
    figment::Jail::expect_with(|jail| {
        jail.set_env("SIMILAR_FILES_ALGORITHM", "sha256");
        jail.set_env("SIMILAR_FILES_IO_THREADS", "16");
        jail.set_env("SIMILAR_FILES_STRICT", "true");

        let figment =
            Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX));
        let config: Config = figment.extract()?;

        assert_eq!(config.algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.io_threads, 16);
        assert!(config.strict);
        Ok(())
    });
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
algorithm = "blake3"
chunk_size = 65536
io_threads = 8
follow_symlinks = true
skip_hidden = true
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from_path(&config_path).unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.chunk_size, 65536);
    assert_eq!(config.io_threads, 8);
    assert!(config.follow_symlinks);
    assert!(config.skip_hidden);
    assert!(!config.strict);
}

#[test]
fn test_env_overrides_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "chunk_size = 2048\nio_threads = 2\n")?;
        jail.set_env("SIMILAR_FILES_IO_THREADS", "6");

        let path = jail.directory().join("config.toml");
        let config = Config::load(Some(&path)).map_err(|e| e.to_string())?;

        assert_eq!(config.chunk_size, 2048);
        assert_eq!(config.io_threads, 6);
        Ok(())
    });
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = [not toml").unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let result: Result<Config, _> = figment.extract();
    assert!(result.is_err());

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_config_unknown_algorithm() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"crc32\"\n").unwrap();

    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn test_config_zero_io_threads() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 0\n").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Zero { key: "io_threads" }));
    assert!(err.to_string().contains("io_threads"));
}
