//! Output formatters for duplicate scan results.
//!
//! - [`text`]: the human-readable report
//! - [`json`]: machine-readable output for scripting
//!
//! # Example
//!
//! ```no_run
//! use similar_files::duplicates::DuplicateFinder;
//! use similar_files::output::TextOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! TextOutput::new(false).write_to(&mut std::io::stdout(), &groups).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
