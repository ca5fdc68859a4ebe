//! Directory scanning and classification.
//!
//! Reads the direct children of a single directory, classifies every regular
//! file by extension and age, and computes where it should go. Nothing is
//! moved here; see [`crate::file_organizer`] for that.

use crate::config::CompiledFilters;
use crate::file_category::{ARCHIVE_DIR, Category, CategoryTable};
use chrono::{DateTime, Local, TimeDelta};
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The directory could not be listed (missing, not a directory, no permission).
    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// A top-level file found in the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name exactly as listed.
    pub name: String,
    /// Path of the file before any move.
    pub source_path: PathBuf,
    /// Target directory; `None` for skipped entries.
    pub dest_dir: Option<PathBuf>,
    /// Target path. Provisional until the mover resolves conflicts.
    pub dest_path: Option<PathBuf>,
    /// Recognized category, kept for display even when the file is old.
    pub category: Option<Category>,
    /// Modification time at scan time.
    pub mod_time: DateTime<Local>,
    /// Older than the age threshold; routed to the archive directory.
    pub is_old: bool,
    /// Unrecognized and not old; left in place.
    pub is_skipped: bool,
}

/// Ordering bucket. Variant order is the listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Archived,
    Category(&'static str),
    Skipped,
}

impl FileEntry {
    /// Label shown in previews and reports.
    pub fn display_category(&self) -> &'static str {
        if self.is_old {
            return ARCHIVE_DIR;
        }
        self.category.map_or("(unknown)", |c| c.dir_name())
    }

    fn sort_key(&self) -> SortKey {
        if self.is_skipped {
            return SortKey::Skipped;
        }
        if self.is_old {
            return SortKey::Archived;
        }
        match self.category {
            Some(category) => SortKey::Category(category.dir_name()),
            None => SortKey::Skipped,
        }
    }
}

/// Sorts entries: archived first, then categories alphabetically, skipped
/// last; ties broken by file name.
pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| {
        a.sort_key()
            .cmp(&b.sort_key())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Classifies the files of one directory.
#[derive(Debug, Clone)]
pub struct Scanner {
    table: CategoryTable,
    filters: CompiledFilters,
    age_days: u32,
}

impl Scanner {
    /// Creates a scanner using `table` and an age threshold in whole days.
    pub fn new(table: CategoryTable, age_days: u32) -> Self {
        Self {
            table,
            filters: CompiledFilters::default(),
            age_days,
        }
    }

    /// Files matching these filters are left out of the scan entirely.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    fn age_threshold(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.age_days))
    }

    /// Scans `dir` using the current time as the age reference.
    pub fn scan(&self, dir: &Path) -> ScanResult<Vec<FileEntry>> {
        self.scan_at(dir, Local::now())
    }

    /// Scans `dir`, measuring file age against `now`.
    ///
    /// Listing errors are fatal and return no entries. Entries whose
    /// metadata cannot be read are dropped.
    pub fn scan_at(&self, dir: &Path, now: DateTime<Local>) -> ScanResult<Vec<FileEntry>> {
        let read_dir_error = |source: std::io::Error| ScanError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let dir_entries = fs::read_dir(dir)
            .map_err(read_dir_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_dir_error)?;

        let mut entries: Vec<FileEntry> = dir_entries
            .iter()
            .filter_map(|dir_entry| self.read_entry(dir, dir_entry, now))
            .collect();

        sort_entries(&mut entries);
        Ok(entries)
    }

    fn read_entry(
        &self,
        dir: &Path,
        dir_entry: &DirEntry,
        now: DateTime<Local>,
    ) -> Option<FileEntry> {
        let path = dir_entry.path();

        let file_type = match dir_entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                log::debug!("dropping {}: {}", path.display(), e);
                return None;
            }
        };
        if !file_type.is_file() {
            return None;
        }

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if !self.filters.should_include(&name) {
            log::debug!("excluded by filter: {}", name);
            return None;
        }

        let modified = match dir_entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                log::debug!("dropping {}: {}", path.display(), e);
                return None;
            }
        };

        let mut entry = self.classify(dir, &name, path, modified.into(), now);
        // Keep the raw OS name in the destination, not the lossy display name.
        if let Some(dest_dir) = &entry.dest_dir {
            entry.dest_path = Some(dest_dir.join(dir_entry.file_name()));
        }
        Some(entry)
    }

    /// Builds the entry for one file without touching the filesystem.
    ///
    /// # Arguments
    ///
    /// * `dir` - The scanned directory; destinations are created under it
    /// * `name` - The file's base name, used for the extension lookup
    /// * `source_path` - Where the file currently lives
    /// * `mod_time` - The file's last modification time
    /// * `now` - Reference time for the age check
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{Local, TimeDelta};
    /// use download_cleaner::{CategoryTable, Scanner};
    /// use std::path::Path;
    ///
    /// let scanner = Scanner::new(CategoryTable::default(), 30);
    /// let dir = Path::new("/dl");
    /// let now = Local::now();
    ///
    /// let mod_time = now - TimeDelta::days(90);
    /// let entry = scanner.classify(dir, "a.pdf", dir.join("a.pdf"), mod_time, now);
    /// assert!(entry.is_old);
    /// assert_eq!(entry.dest_path.as_deref(), Some(Path::new("/dl/Archive/a.pdf")));
    /// ```
    pub fn classify(
        &self,
        dir: &Path,
        name: &str,
        source_path: PathBuf,
        mod_time: DateTime<Local>,
        now: DateTime<Local>,
    ) -> FileEntry {
        let category = self.table.categorize(name);
        let is_old = now.signed_duration_since(mod_time) > self.age_threshold();

        let dest_dir = if is_old {
            Some(dir.join(ARCHIVE_DIR))
        } else {
            category.map(|c| dir.join(c.dir_name()))
        };
        let is_skipped = dest_dir.is_none();
        let dest_path = dest_dir.as_ref().map(|d| d.join(name));

        log::debug!(
            "classified {}: category={:?} old={} skipped={}",
            name,
            category,
            is_old,
            is_skipped
        );

        FileEntry {
            name: name.to_string(),
            source_path,
            dest_dir,
            dest_path,
            category,
            mod_time,
            is_old,
            is_skipped,
        }
    }
}

/// Scans `dir` with the standard category table.
///
/// # Examples
///
/// ```no_run
/// use download_cleaner::scanner::scan;
/// use std::path::Path;
///
/// let entries = scan(Path::new("/home/user/Downloads"), 365)?;
/// for entry in entries.iter().filter(|e| !e.is_skipped) {
///     println!("{} -> {}", entry.name, entry.display_category());
/// }
/// # Ok::<(), download_cleaner::scanner::ScanError>(())
/// ```
pub fn scan(dir: &Path, age_days: u32) -> ScanResult<Vec<FileEntry>> {
    Scanner::new(CategoryTable::default(), age_days).scan(dir)
}
