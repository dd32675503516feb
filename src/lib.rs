//! similar-files - find files with identical content.
//!
//! A scan walks a directory tree, groups regular files by byte size, then
//! fingerprints only the files that share a size and groups them by content
//! hash. Groups with a single member are dropped after each step.
//!
//! # Example
//!
//! ```no_run
//! use similar_files::{check_for_duplicates, get_hash};
//!
//! let groups = check_for_duplicates("/some/dir").unwrap();
//! for (hash, paths) in &groups {
//!     println!("{hash}: {} copies", paths.len());
//! }
//!
//! let fp = get_hash("/some/dir/file.txt").unwrap();
//! println!("{fp}");
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use anyhow::Context;

pub use duplicates::{check_for_duplicates, DuplicateGroups, FinderError};
pub use scanner::{get_hash, get_hash_with, Fingerprint, HashAlgorithm, HashError};

use cli::{Cli, Commands, HashArgs, OutputFormat, ScanArgs};
use config::Config;
use duplicates::DuplicateFinder;
use error::ExitCode;
use output::{JsonOutput, TextOutput};
use progress::Progress;
use scanner::Hasher;

/// Run the command described by `cli` and return the process exit code.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unusable scan root, an
/// interrupted scan, or a failure writing the report. `FinderError` values
/// stay downcastable so the caller can pick the exit code.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let Cli {
        verbose,
        quiet,
        no_color,
        config: config_path,
        command,
        ..
    } = cli;

    logging::init_logging(verbose, quiet);

    let config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    log::debug!("Loaded configuration: {:?}", config);

    match command {
        Commands::Scan(args) => run_scan(&args, config, quiet, no_color),
        Commands::Hash(args) => run_hash(&args, config),
    }
}

fn run_scan(args: &ScanArgs, mut config: Config, quiet: bool, no_color: bool) -> anyhow::Result<ExitCode> {
    args.apply(&mut config);
    config.validate()?;

    let handler = signal::install_handler()?;
    let mut finder_config = config.finder_config().with_shutdown_flag(handler.get_flag());

    let show_progress = !args.no_progress && !quiet && std::io::stderr().is_terminal();
    if show_progress {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(finder_config);
    let (groups, summary) = finder.find_duplicates(&args.path)?;

    for err in &summary.scan_errors {
        log::debug!("Skipped: {}", err);
    }
    log::info!(
        "Scanned {} files ({}), {} duplicate groups, {} reclaimable, {} skipped, in {:.2?}",
        summary.total_files,
        summary.total_size_display(),
        summary.duplicate_groups,
        summary.reclaimable_display(),
        summary.scan_errors.len(),
        summary.scan_duration
    );

    let exit_code = if summary.has_errors() {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.output {
        OutputFormat::Text => {
            let color = !no_color && stdout.is_terminal();
            TextOutput::new(color)
                .write_to(&mut out, &groups)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&groups, &summary, exit_code).write_to(&mut out, true)?;
        }
    }
    out.flush().context("Failed to write report")?;

    Ok(exit_code)
}

fn run_hash(args: &HashArgs, mut config: Config) -> anyhow::Result<ExitCode> {
    args.hashing.apply(&mut config);
    config.validate()?;

    let hasher = Hasher::new()
        .with_algorithm(config.algorithm)
        .with_chunk_size(config.chunk_size);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failures = Vec::new();

    for path in &args.files {
        match hasher.hash_file(path) {
            Ok(fp) => writeln!(out, "{}  {}", fp, path.display())?,
            Err(e) => {
                log::error!("{}", e);
                failures.push(e);
            }
        }
    }
    out.flush()?;

    let partial = !failures.is_empty();
    if partial && failures.len() == args.files.len() {
        return Err(failures.swap_remove(0)).context("No file could be hashed");
    }

    Ok(if !partial {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    })
}
