//! Output formatting and styling module.
//!
//! Centralizes all user-facing terminal output: colored status lines, the
//! preview table and the move progress bar.

use crate::report::format_table;
use crate::scanner::FileEntry;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use download_cleaner::output::OutputFormatter;
    /// OutputFormatter::success("Report written");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints the preview table of entries that will be moved.
    ///
    /// Old entries are flagged `[OLD]` and shown under `Archive`.
    ///
    /// # Arguments
    ///
    /// * `entries` - The actionable entries, in scan order
    ///
    /// # Example
    ///
    /// ```no_run
    /// use download_cleaner::output::OutputFormatter;
    /// use download_cleaner::scanner::scan;
    /// use std::path::Path;
    ///
    /// let entries = scan(Path::new("/home/user/Downloads"), 365)?;
    /// let actionable: Vec<_> = entries.into_iter().filter(|e| !e.is_skipped).collect();
    /// OutputFormatter::preview_table(&actionable);
    /// # Ok::<(), download_cleaner::scanner::ScanError>(())
    /// ```
    pub fn preview_table(entries: &[FileEntry]) {
        let lines = format_table(entries, "[OLD]");
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
    }

    /// Creates a progress bar for moving `total` files.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of entries that will be attempted
    ///
    /// # Returns
    ///
    /// A styled `ProgressBar`; the caller ticks it and clears it when done.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use download_cleaner::output::OutputFormatter;
    ///
    /// let pb = OutputFormatter::create_progress_bar(3);
    /// for name in ["a.pdf", "b.png", "c.zip"] {
    ///     pb.set_message(name);
    ///     pb.inc(1);
    /// }
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }
}

/// Returns "file" or "files".
pub fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(0), "files");
        assert_eq!(plural(1), "file");
        assert_eq!(plural(2), "files");
    }

    #[test]
    fn test_progress_bar_length() {
        let pb = OutputFormatter::create_progress_bar(7);
        assert_eq!(pb.length(), Some(7));
    }
}
