//! Moving classified files into their destination directories.
//!
//! The mover takes the entries produced by the scanner, creates destination
//! directories as needed, picks a free name for each file and renames it
//! into place. A failure on one entry never stops the others.

use crate::file_category::split_os_name;
use crate::scanner::FileEntry;
use indicatif::ProgressBar;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Highest numeric suffix tried before giving up on a destination name.
pub const MAX_CONFLICT_PROBES: u32 = 10_000;

/// Errors that can occur while moving a single entry.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create a destination directory.
    #[error("cannot create {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Every numbered candidate for this destination is taken.
    #[error("no free name for {} after {attempts} attempts", path.display())]
    ConflictProbeExhausted { path: PathBuf, attempts: u32 },
    /// The rename itself failed.
    #[error("cannot move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The entry has no destination (it was skipped by the scanner).
    #[error("{} has no destination", .0.display())]
    MissingDestination(PathBuf),
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What a batch move achieved.
#[derive(Debug, Default)]
pub struct MoveOutcome {
    /// Entries moved, with `dest_path` set to where they actually landed.
    pub moved: Vec<FileEntry>,
    /// Per-entry failures, in processing order.
    pub failures: Vec<(PathBuf, OrganizeError)>,
}

impl MoveOutcome {
    /// The first failure encountered, if any.
    pub fn first_error(&self) -> Option<&OrganizeError> {
        self.failures.first().map(|(_, e)| e)
    }

    /// Returns true if no entry failed.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Creates `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

/// Only a definite "not found" counts as free; any other stat error is
/// treated as occupied.
fn is_free(path: &Path) -> bool {
    matches!(
        fs::symlink_metadata(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound
    )
}

fn numbered_candidate(path: &Path, n: u32) -> PathBuf {
    let (stem, ext) = split_os_name(path.file_name().unwrap_or_default());
    let mut candidate = stem.to_os_string();
    candidate.push(format!("_{}", n));
    candidate.push(ext);
    path.with_file_name(candidate)
}

/// Returns `dest_path` if nothing occupies it, otherwise the first free
/// `stem_N.ext` sibling, counting from 1.
///
/// The check is not atomic with the later rename; another process may take
/// the name in between.
///
/// # Examples
///
/// ```no_run
/// use download_cleaner::file_organizer::resolve_conflict;
/// use std::path::Path;
///
/// // with backup.tar.gz already present
/// let free = resolve_conflict(Path::new("/dl/Archives/backup.tar.gz"))?;
/// assert_eq!(free, Path::new("/dl/Archives/backup_1.tar.gz"));
/// # Ok::<(), download_cleaner::file_organizer::OrganizeError>(())
/// ```
pub fn resolve_conflict(dest_path: &Path) -> OrganizeResult<PathBuf> {
    resolve_conflict_within(dest_path, MAX_CONFLICT_PROBES)
}

fn resolve_conflict_within(dest_path: &Path, max_probes: u32) -> OrganizeResult<PathBuf> {
    if is_free(dest_path) {
        return Ok(dest_path.to_path_buf());
    }

    (1..=max_probes)
        .map(|n| numbered_candidate(dest_path, n))
        .find(|candidate| is_free(candidate))
        .inspect(|candidate| {
            log::debug!(
                "{} exists, using {}",
                dest_path.display(),
                candidate.display()
            )
        })
        .ok_or_else(|| OrganizeError::ConflictProbeExhausted {
            path: dest_path.to_path_buf(),
            attempts: max_probes,
        })
}

/// Moves entries into their destinations.
pub struct Mover;

impl Mover {
    /// Moves one entry, creating its destination directory and resolving
    /// name conflicts first.
    ///
    /// # Arguments
    ///
    /// * `entry` - A non-skipped entry from the scanner
    ///
    /// # Returns
    ///
    /// Returns the path the file landed at, which differs from
    /// `entry.dest_path` when that name was already taken, or an
    /// `OrganizeError` if any step fails. Nothing is overwritten.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use download_cleaner::file_organizer::Mover;
    /// use download_cleaner::scanner::scan;
    /// use std::path::Path;
    ///
    /// let entries = scan(Path::new("/home/user/Downloads"), 365)?;
    /// if let Some(entry) = entries.iter().find(|e| !e.is_skipped) {
    ///     let landed = Mover::move_entry(entry)?;
    ///     println!("{} -> {}", entry.name, landed.display());
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn move_entry(entry: &FileEntry) -> OrganizeResult<PathBuf> {
        Self::move_entry_within(entry, MAX_CONFLICT_PROBES)
    }

    fn move_entry_within(entry: &FileEntry, max_probes: u32) -> OrganizeResult<PathBuf> {
        let (dest_dir, dest_path) = match (&entry.dest_dir, &entry.dest_path) {
            (Some(dir), Some(path)) => (dir, path),
            _ => return Err(OrganizeError::MissingDestination(entry.source_path.clone())),
        };

        ensure_dir(dest_dir).map_err(|source| OrganizeError::DirectoryCreationFailed {
            path: dest_dir.clone(),
            source,
        })?;

        let resolved = resolve_conflict_within(dest_path, max_probes)?;

        fs::rename(&entry.source_path, &resolved).map_err(|source| {
            OrganizeError::FileMoveFailure {
                from: entry.source_path.clone(),
                to: resolved.clone(),
                source,
            }
        })?;

        Ok(resolved)
    }

    /// Moves every non-skipped entry, continuing past failures.
    ///
    /// Each successfully moved entry has its `dest_path` updated in place and
    /// is also copied into [`MoveOutcome::moved`].
    pub fn move_entries(entries: &mut [FileEntry]) -> MoveOutcome {
        Self::move_entries_with_progress(entries, &ProgressBar::hidden())
    }

    /// Same as [`Mover::move_entries`], ticking `progress` once per
    /// attempted entry.
    pub fn move_entries_with_progress(
        entries: &mut [FileEntry],
        progress: &ProgressBar,
    ) -> MoveOutcome {
        Self::move_batch(entries, progress, MAX_CONFLICT_PROBES)
    }

    fn move_batch(
        entries: &mut [FileEntry],
        progress: &ProgressBar,
        max_probes: u32,
    ) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();

        for entry in entries.iter_mut().filter(|e| !e.is_skipped) {
            progress.set_message(entry.name.clone());

            match Self::move_entry_within(entry, max_probes) {
                Ok(resolved) => {
                    log::info!(
                        "moved {} -> {}",
                        entry.source_path.display(),
                        resolved.display()
                    );
                    entry.dest_path = Some(resolved);
                    outcome.moved.push(entry.clone());
                }
                Err(e) => {
                    log::warn!("{}: {}", entry.name, e);
                    outcome.failures.push((entry.source_path.clone(), e));
                }
            }

            progress.inc(1);
        }

        outcome
    }
}
