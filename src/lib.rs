//! download-cleaner - tidy a Downloads folder
//!
//! This library scans a single directory, classifies each file by extension
//! and age, and moves recognized files into category subdirectories (old
//! files into `Archive`), resolving name collisions and writing a plain-text
//! report of what happened.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod report;
pub mod scanner;

pub use config::{CleanerConfig, CompiledFilters, ConfigError};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{MoveOutcome, Mover, OrganizeError, resolve_conflict};
pub use report::{Report, RunMode};
pub use scanner::{FileEntry, ScanError, Scanner, scan};

pub use cli::{CleanArgs, CliError, RunOutcome, run};
