//! Extension-based file categorization.
//!
//! Maps effective file extensions to the fixed set of destination categories.
//! The mapping is plain data: each [`Category`] lists its own extensions and
//! [`CategoryTable`] flattens them into a lookup map once, at construction.
//!
//! # Examples
//!
//! ```
//! use download_cleaner::file_category::{Category, CategoryTable};
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.resolve("pdf"), Some(Category::Documents));
//! assert_eq!(table.resolve("tar.gz"), Some(Category::Archives));
//! assert_eq!(table.resolve("xyz"), None);
//! ```

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;

/// Name of the directory old files are routed to, whatever their type.
pub const ARCHIVE_DIR: &str = "Archive";

/// Compound suffix treated as a single extension.
const TAR_GZ_SUFFIX: &str = ".tar.gz";

/// A destination category for recognized files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Installers and scripts (EXE, MSI, BAT)
    Executables,
    /// Document files (PDF, DOCX, XLSX, TXT)
    Documents,
    /// Compressed archives (ZIP, RAR, 7Z, TAR.GZ)
    Archives,
    /// Image files (JPG, PNG, GIF, SVG, WEBP)
    Images,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 4] = [
        Category::Executables,
        Category::Documents,
        Category::Archives,
        Category::Images,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use download_cleaner::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Archives.dir_name(), "Archives");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Executables => "Executables",
            Category::Documents => "Documents",
            Category::Archives => "Archives",
            Category::Images => "Images",
        }
    }

    /// Returns the lowercase extensions recognized for this category.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Executables => &["exe", "msi", "bat"],
            Category::Documents => &["pdf", "docx", "xlsx", "txt"],
            Category::Archives => &["zip", "rar", "7z", "tar.gz"],
            Category::Images => &["jpg", "jpeg", "png", "gif", "svg", "webp"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Immutable extension to category lookup.
///
/// Built once and handed to the scanner; nothing here is global.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    extension_map: HashMap<String, Category>,
}

impl CategoryTable {
    /// Creates a table holding the standard extension mappings.
    pub fn new() -> Self {
        let mut table = Self {
            extension_map: HashMap::new(),
        };
        for category in Category::ALL {
            for ext in category.extensions() {
                table.add_extension_mapping(ext, category);
            }
        }
        table
    }

    /// Adds (or replaces) a file extension to category mapping.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(ext.to_lowercase(), category);
    }

    /// Maps an effective extension to its category.
    ///
    /// An empty extension is never recognized.
    pub fn resolve(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Resolves the category of a bare file name.
    ///
    /// ```
    /// use download_cleaner::file_category::{Category, CategoryTable};
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.categorize("Backup.TAR.GZ"), Some(Category::Archives));
    /// assert_eq!(table.categorize("README"), None);
    /// ```
    pub fn categorize(&self, file_name: &str) -> Option<Category> {
        self.resolve(&resolve_extension(file_name))
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte offset where a trailing `.tar.gz` (any case) starts, if present.
fn tar_gz_start(name: &[u8]) -> Option<usize> {
    let start = name.len().checked_sub(TAR_GZ_SUFFIX.len())?;
    name[start..]
        .eq_ignore_ascii_case(TAR_GZ_SUFFIX.as_bytes())
        .then_some(start)
}

/// Byte offset separating stem from extension. Always an ASCII `.` or the
/// end of the name, so both halves stay valid in any encoding.
fn split_point(name: &[u8]) -> usize {
    tar_gz_start(name)
        .or_else(|| name.iter().rposition(|&b| b == b'.'))
        .unwrap_or(name.len())
}

/// Returns the effective lowercase extension of a file name.
///
/// `.tar.gz` counts as one extension; otherwise it is whatever follows the
/// last `.`, or empty when the name has none.
///
/// ```
/// use download_cleaner::file_category::resolve_extension;
///
/// assert_eq!(resolve_extension("document.PDF"), "pdf");
/// assert_eq!(resolve_extension("archive.TAR.GZ"), "tar.gz");
/// assert_eq!(resolve_extension("README"), "");
/// ```
pub fn resolve_extension(name: &str) -> String {
    if tar_gz_start(name.as_bytes()).is_some() {
        return TAR_GZ_SUFFIX[1..].to_string();
    }
    match name.rfind('.') {
        Some(dot) => name[dot + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Splits a file name into stem and extension, the extension keeping its dot
/// and original casing.
///
/// ```
/// use download_cleaner::file_category::split_name;
///
/// assert_eq!(split_name("backup.Tar.Gz"), ("backup", ".Tar.Gz"));
/// assert_eq!(split_name("report.pdf"), ("report", ".pdf"));
/// assert_eq!(split_name("README"), ("README", ""));
/// ```
pub fn split_name(name: &str) -> (&str, &str) {
    name.split_at(split_point(name.as_bytes()))
}

/// [`split_name`] for raw OS file names, which need not be UTF-8.
#[cfg(unix)]
pub fn split_os_name(name: &OsStr) -> (&OsStr, &OsStr) {
    use std::os::unix::ffi::OsStrExt;

    let bytes = name.as_bytes();
    let (stem, ext) = bytes.split_at(split_point(bytes));
    (OsStr::from_bytes(stem), OsStr::from_bytes(ext))
}

/// [`split_name`] for raw OS file names. Names that are not Unicode keep
/// the whole name as stem.
#[cfg(not(unix))]
pub fn split_os_name(name: &OsStr) -> (&OsStr, &OsStr) {
    match name.to_str() {
        Some(name) => {
            let (stem, ext) = split_name(name);
            (OsStr::new(stem), OsStr::new(ext))
        }
        None => (name, OsStr::new("")),
    }
}
