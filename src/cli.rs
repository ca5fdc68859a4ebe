//! Command-line interface module for download-cleaner.
//!
//! This module handles all CLI-related functionality including:
//! - Argument definitions
//! - Target directory discovery and validation
//! - Scan, preview and confirmation
//! - Moving files and writing the report

use crate::config::{CleanerConfig, ConfigError};
use crate::file_category::{ARCHIVE_DIR, CategoryTable};
use crate::file_organizer::Mover;
use crate::output::{OutputFormatter, plural};
use crate::report::{Report, RunMode};
use crate::scanner::{FileEntry, ScanError, Scanner};
use chrono::Local;
use clap::{ArgAction, Parser};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sort a Downloads folder into category subfolders, archiving old files.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "download-cleaner", version, about, long_about = None)]
pub struct CleanArgs {
    /// Path to the Downloads folder (default: the platform Downloads folder)
    #[arg(long, short = 'p', value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Age threshold in days for 'old' files (default: 365, or the config value)
    #[arg(long, short = 'a', value_name = "DAYS")]
    pub age: Option<u32>,

    /// Preview changes and write the report without moving any files
    #[arg(long)]
    pub dry_run: bool,

    /// Move without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Configuration file to use instead of the default lookup
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("{} is not a valid directory", .0.display())]
    InvalidDirectory(PathBuf),
    #[error("cannot determine the Downloads folder; pass --path")]
    NoDownloadsDir,
    #[error("cannot read confirmation: {0}")]
    Prompt(#[source] io::Error),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No file needed moving.
    NothingToMove { skipped: usize },
    /// Dry run; nothing was moved.
    DryRun { planned: usize },
    /// The user declined.
    Aborted,
    /// Files were moved, possibly with failures.
    Moved {
        moved: usize,
        attempted: usize,
        failed: usize,
    },
}

impl RunOutcome {
    /// Process exit code: 1 when any move failed.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Moved { failed, .. } if *failed > 0 => 1,
            _ => 0,
        }
    }
}

/// Returns the directory to clean: `explicit`, else the platform Downloads
/// folder, else `<home>/Downloads`.
pub fn resolve_downloads_dir(explicit: Option<&Path>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .ok_or(CliError::NoDownloadsDir)
}

/// Asks `Proceed? [y/N]` until it gets an answer.
///
/// `y`/`yes` confirms; `n`/`no`/empty and end of input decline. Anything
/// else asks again.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<bool> {
    loop {
        write!(out, "\nProceed? [y/N] ")?;
        out.flush()?;

        let mut line = Vec::new();
        if input.read_until(b'\n', &mut line)? == 0 {
            writeln!(out, "\nNo input received. Aborting.")?;
            return Ok(false);
        }

        // Undecodable bytes just make an unrecognised answer.
        let answer = String::from_utf8_lossy(&line);
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                writeln!(out, "Great! Starting to organise your Downloads folder...")?;
                return Ok(true);
            }
            "n" | "no" | "" => {
                writeln!(out, "No problem! Your files have been left untouched.")?;
                return Ok(false);
            }
            other => writeln!(
                out,
                "Please enter 'y' to proceed or 'n' to abort (got: {:?}).",
                other
            )?,
        }
    }
}

fn write_report(report: &Report<'_>, path: &Path, label: &str) {
    match report.write_to(path) {
        Ok(()) => OutputFormatter::success(&format!("{} written to: {}", label, path.display())),
        Err(e) => OutputFormatter::warning(&format!("could not write report: {}", e)),
    }
}

/// Runs one cleaning pass, reading the confirmation answer from `input`.
///
/// # Examples
///
/// ```no_run
/// use download_cleaner::cli::{CleanArgs, run};
///
/// let args = CleanArgs { dry_run: true, ..Default::default() };
/// let outcome = run(&args, &mut std::io::stdin().lock())?;
/// std::process::exit(outcome.exit_code().into());
/// # Ok::<(), download_cleaner::cli::CliError>(())
/// ```
pub fn run<R: BufRead>(args: &CleanArgs, input: &mut R) -> Result<RunOutcome, CliError> {
    let config = CleanerConfig::load(args.config.as_deref())?;
    let age_days = args.age.unwrap_or(config.cleaner.age_days);

    let dir = resolve_downloads_dir(args.path.as_deref())?;
    if !dir.is_dir() {
        return Err(CliError::InvalidDirectory(dir));
    }
    let dir = std::path::absolute(&dir).unwrap_or(dir);

    OutputFormatter::plain(&format!("Scanning: {}", dir.display()));

    let scanner =
        Scanner::new(CategoryTable::default(), age_days).with_filters(config.compile_filters()?);
    let entries = scanner.scan(&dir)?;

    let (mut actionable, skipped): (Vec<FileEntry>, Vec<FileEntry>) =
        entries.into_iter().partition(|e| !e.is_skipped);

    OutputFormatter::header("=== Download Cleaner - Preview ===");

    if actionable.is_empty() {
        OutputFormatter::success("Nothing to move. Downloads folder is already organised.");
        if !skipped.is_empty() {
            OutputFormatter::plain(&format!(
                "{} {} with unrecognised type were left in place.",
                skipped.len(),
                plural(skipped.len())
            ));
        }
        return Ok(RunOutcome::NothingToMove {
            skipped: skipped.len(),
        });
    }

    OutputFormatter::preview_table(&actionable);

    let mut summary = format!(
        "\n{} {} to move",
        actionable.len(),
        plural(actionable.len())
    );
    if !skipped.is_empty() {
        summary.push_str(&format!(
            ", {} {} skipped (unrecognised type)",
            skipped.len(),
            plural(skipped.len())
        ));
    }
    summary.push('.');
    OutputFormatter::plain(&summary);

    let old_count = actionable.iter().filter(|e| e.is_old).count();
    if old_count > 0 {
        OutputFormatter::warning(&format!(
            "{} {} older than {} days will be moved to {}/",
            old_count,
            plural(old_count),
            age_days,
            ARCHIVE_DIR
        ));
    }

    let report_path = dir.join(&config.cleaner.report_name);

    if args.dry_run {
        OutputFormatter::dry_run_notice("No files were moved.");
        let report = Report {
            moved: &actionable,
            skipped: &skipped,
            mode: RunMode::DryRun,
            age_days,
            generated: Local::now(),
        };
        write_report(&report, &report_path, "Dry-run report");
        return Ok(RunOutcome::DryRun {
            planned: actionable.len(),
        });
    }

    if !args.yes && !confirm(input, &mut io::stdout()).map_err(CliError::Prompt)? {
        return Ok(RunOutcome::Aborted);
    }

    OutputFormatter::info("\nMoving files...");
    let progress = OutputFormatter::create_progress_bar(actionable.len() as u64);
    let outcome = Mover::move_entries_with_progress(&mut actionable, &progress);
    progress.finish_and_clear();

    for (path, error) in &outcome.failures {
        OutputFormatter::error(&format!("{}: {}", path.display(), error));
    }

    let line = format!(
        "All done! {}/{} {} successfully moved.",
        outcome.moved.len(),
        actionable.len(),
        plural(actionable.len())
    );
    if outcome.is_complete_success() {
        OutputFormatter::success(&line);
    } else {
        OutputFormatter::warning(&line);
    }

    let report = Report {
        moved: &outcome.moved,
        skipped: &skipped,
        mode: RunMode::Live,
        age_days,
        generated: Local::now(),
    };
    write_report(&report, &report_path, "Report");

    Ok(RunOutcome::Moved {
        moved: outcome.moved.len(),
        attempted: actionable.len(),
        failed: outcome.failures.len(),
    })
}
