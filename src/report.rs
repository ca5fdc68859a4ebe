//! Plain-text run report.
//!
//! Rendering is kept separate from writing so the text can be checked
//! without touching the filesystem.

use crate::scanner::FileEntry;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column padding between table cells.
const COLUMN_GAP: usize = 2;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Whether files were actually moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Live,
    DryRun,
}

impl RunMode {
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::Live => "LIVE RUN",
            RunMode::DryRun => "DRY RUN (no files were moved)",
        }
    }
}

/// Everything a report describes.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// Entries moved (or, in a dry run, that would be moved).
    pub moved: &'a [FileEntry],
    /// Entries left in place.
    pub skipped: &'a [FileEntry],
    pub mode: RunMode,
    pub age_days: u32,
    pub generated: DateTime<Local>,
}

fn pad_row(cells: &[&str], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    let mut row = String::new();
    for (i, cell) in cells.iter().enumerate() {
        row.push_str(cell);
        if i < last {
            let pad = widths[i] - cell.chars().count() + COLUMN_GAP;
            row.extend(std::iter::repeat_n(' ', pad));
        }
    }
    row.trim_end().to_string()
}

/// Formats entries as an aligned FILE / CATEGORY / FLAGS / DESTINATION
/// table, one line per row including the header lines.
///
/// `old_flag` is printed in the FLAGS column of old entries.
pub fn format_table(entries: &[FileEntry], old_flag: &str) -> Vec<String> {
    let header = ["FILE", "CATEGORY", "FLAGS", "DESTINATION"];
    let underline: Vec<String> = header
        .iter()
        .map(|h| "─".repeat(h.chars().count()))
        .collect();

    let rows: Vec<[String; 4]> = entries
        .iter()
        .map(|entry| {
            [
                entry.name.clone(),
                entry.display_category().to_string(),
                if entry.is_old {
                    old_flag.to_string()
                } else {
                    String::new()
                },
                entry
                    .dest_path
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |p| p.display().to_string()),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pad_row(&header, &widths));
    let underline_refs: Vec<&str> = underline.iter().map(String::as_str).collect();
    lines.push(pad_row(&underline_refs, &widths));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(pad_row(&cells, &widths));
    }
    lines
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = "─".repeat(70);

        writeln!(f, "Download Cleaner Report")?;
        writeln!(
            f,
            "Generated : {}",
            self.generated.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "Mode      : {}", self.mode.label())?;
        writeln!(f, "{}\n", sep)?;

        writeln!(f, "MOVED FILES ({} total)\n", self.moved.len())?;
        if self.moved.is_empty() {
            writeln!(f, "  (none)")?;
        } else {
            let old_flag = format!("[OLD >{}d]", self.age_days);
            for line in format_table(self.moved, &old_flag) {
                writeln!(f, "{}", line)?;
            }
        }

        let old: Vec<&FileEntry> = self.moved.iter().filter(|e| e.is_old).collect();
        writeln!(f, "\n{}", sep)?;
        writeln!(
            f,
            "OLD FILES FLAGGED ({} files older than {} days, moved to Archive/)\n",
            old.len(),
            self.age_days
        )?;
        if old.is_empty() {
            writeln!(f, "  (none)")?;
        } else {
            for entry in old {
                writeln!(
                    f,
                    "  - {:<50}  (last modified: {})",
                    entry.name,
                    entry.mod_time.format("%Y-%m-%d")
                )?;
            }
        }

        writeln!(f, "\n{}", sep)?;
        writeln!(
            f,
            "SKIPPED FILES ({} files with unrecognised type, left in place)\n",
            self.skipped.len()
        )?;
        if self.skipped.is_empty() {
            writeln!(f, "  (none)")?;
        } else {
            for entry in self.skipped {
                writeln!(f, "  - {}", entry.name)?;
            }
        }

        writeln!(f, "\n{}", sep)?;
        writeln!(f, "End of report.")
    }
}

impl Report<'_> {
    /// Renders the full report text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Writes the rendered report to `path`, replacing any previous one.
    pub fn write_to(&self, path: &Path) -> ReportResult<()> {
        fs::write(path, self.render()).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::{Category, CategoryTable};
    use crate::scanner::Scanner;
    use chrono::TimeDelta;
    use tempfile::TempDir;

    fn classify(name: &str, age_days: i64) -> FileEntry {
        let scanner = Scanner::new(CategoryTable::default(), 30);
        let dir = Path::new("/dl");
        let now = Local::now();
        scanner.classify(
            dir,
            name,
            dir.join(name),
            now - TimeDelta::days(age_days),
            now,
        )
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let entries = vec![classify("a.pdf", 0), classify("longer-name.png", 0)];
        let lines = format_table(&entries, "[OLD]");

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("FILE             CATEGORY"));
        assert!(lines[2].starts_with("a.pdf            Documents"));
        assert!(lines[3].starts_with("longer-name.png  Images"));
        assert!(lines[3].ends_with("/dl/Images/longer-name.png"));
    }

    #[test]
    fn test_format_table_marks_old_entries() {
        let entries = vec![classify("ancient.pdf", 90)];
        let lines = format_table(&entries, "[OLD]");

        assert!(lines[2].contains("Archive"));
        assert!(lines[2].contains("[OLD]"));
        assert!(lines[2].ends_with("/dl/Archive/ancient.pdf"));
    }

    #[test]
    fn test_render_live_report_sections() {
        let moved = vec![classify("ancient.zip", 90), classify("photo.png", 0)];
        let skipped = vec![classify("notes.xyz", 0)];
        let report = Report {
            moved: &moved,
            skipped: &skipped,
            mode: RunMode::Live,
            age_days: 30,
            generated: Local::now(),
        };
        let text = report.render();

        assert!(text.starts_with("Download Cleaner Report\n"));
        assert!(text.contains("Mode      : LIVE RUN"));
        assert!(text.contains("MOVED FILES (2 total)"));
        assert!(text.contains("[OLD >30d]"));
        assert!(text.contains("OLD FILES FLAGGED (1 files older than 30 days"));
        assert!(text.contains("  - ancient.zip"));
        assert!(text.contains("SKIPPED FILES (1 files with unrecognised type"));
        assert!(text.contains("  - notes.xyz"));
        assert!(text.trim_end().ends_with("End of report."));
    }

    #[test]
    fn test_render_empty_sections() {
        let report = Report {
            moved: &[],
            skipped: &[],
            mode: RunMode::DryRun,
            age_days: 365,
            generated: Local::now(),
        };
        let text = report.render();

        assert!(text.contains("DRY RUN (no files were moved)"));
        assert_eq!(text.matches("  (none)").count(), 3);
    }

    #[test]
    fn test_report_displays_as_rendered_text() {
        let moved = vec![classify("photo.png", 0)];
        let report = Report {
            moved: &moved,
            skipped: &[],
            mode: RunMode::Live,
            age_days: 365,
            generated: Local::now(),
        };
        let shown = format!("{}", report);

        assert_eq!(shown, report.render());
        assert!(shown.ends_with("End of report.\n"));
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("cleaner-report.log");
        let moved = vec![classify("photo.png", 0)];
        assert_eq!(moved[0].category, Some(Category::Images));

        Report {
            moved: &moved,
            skipped: &[],
            mode: RunMode::Live,
            age_days: 365,
            generated: Local::now(),
        }
        .write_to(&path)
        .expect("write failed");

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("photo.png"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("missing").join("report.log");
        let report = Report {
            moved: &[],
            skipped: &[],
            mode: RunMode::Live,
            age_days: 365,
            generated: Local::now(),
        };
        assert!(matches!(
            report.write_to(&path),
            Err(ReportError::Write { .. })
        ));
    }
}
