/// File categorization by extension.
///
/// Categories live in an ordered table. Classification walks the table in
/// declaration order and the first category listing the file's extension wins;
/// anything left over lands in the catch-all category.
///
/// # Examples
///
/// ```
/// use declutter::file_category::CategoryTable;
///
/// let table = CategoryTable::standard();
/// assert_eq!(table.classify("report.PDF").name(), "Documents");
/// assert_eq!(table.classify("holiday.jpeg").name(), "Images");
/// assert_eq!(table.classify("notes.unknownext").name(), "Others");
/// ```
use std::collections::HashSet;
use std::path::Path;

/// A named bucket of file extensions sharing one destination folder.
///
/// Extensions are stored lowercase and without the leading dot. A category
/// with no extensions is a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    name: &'static str,
    extensions: &'static [&'static str],
}

impl Category {
    /// Creates a category. `extensions` must be lowercase, without dots.
    pub const fn new(name: &'static str, extensions: &'static [&'static str]) -> Self {
        Self { name, extensions }
    }

    /// Returns the category name, which is also its folder name.
    ///
    /// # Examples
    ///
    /// ```
    /// use declutter::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::standard();
    /// assert_eq!(table.classify("song.mp3").name(), "Audio");
    /// ```
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the folder name for this category.
    pub fn dir_name(&self) -> &'static str {
        self.name
    }

    /// Returns the recognized extensions.
    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    /// Whether this category receives files no other category claims.
    pub fn is_catch_all(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Case-insensitive membership test for an extension (without the dot).
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

/// Name of the catch-all category in the standard table.
pub const CATCH_ALL: &str = "Others";

const STANDARD_CATEGORIES: &[Category] = &[
    Category::new("Documents", &["pdf", "docx", "txt"]),
    Category::new("Images", &["jpg", "jpeg", "png", "gif"]),
    Category::new("Videos", &["mp4", "mkv", "avi"]),
    Category::new("Audio", &["mp3", "wav"]),
    Category::new("Archives", &["zip", "rar", "7z"]),
    Category::new("Executables", &["exe", "msi"]),
    Category::new("Python Scripts", &["py"]),
    Category::new("Applications", &["app"]),
    Category::new("Web Pages", &["html", "xml"]),
    Category::new("Spreadsheets", &["xls", "xlsx"]),
    Category::new("Presentations", &["ppt", "pptx"]),
    Category::new("Code", &["cpp", "java", "c"]),
    Category::new(CATCH_ALL, &[]),
];

/// Ordered category table.
///
/// Order is significant: if two categories ever share an extension, the one
/// declared first wins.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTable {
    categories: &'static [Category],
    catch_all: usize,
}

impl CategoryTable {
    /// The built-in table used by the organizer.
    pub fn standard() -> Self {
        Self {
            categories: STANDARD_CATEGORIES,
            catch_all: STANDARD_CATEGORIES.len() - 1,
        }
    }

    /// Builds a table from an ordered slice.
    ///
    /// Returns `None` when category names are not unique or when no category
    /// is a catch-all. The first catch-all in declaration order is used.
    pub fn new(categories: &'static [Category]) -> Option<Self> {
        let mut names = HashSet::new();
        if !categories.iter().all(|c| names.insert(c.name)) {
            return None;
        }

        let catch_all = categories.iter().position(Category::is_catch_all)?;
        Some(Self {
            categories,
            catch_all,
        })
    }

    /// Iterates categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static Category> + '_ {
        self.categories.iter()
    }

    /// Number of categories, catch-all included.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false for a valid table; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The category receiving unmatched files.
    pub fn catch_all(&self) -> &'static Category {
        &self.categories[self.catch_all]
    }

    /// Looks up a category by name.
    pub fn get(&self, name: &str) -> Option<&'static Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Returns the category for a file name.
    ///
    /// Only the text after the final `.` counts as the extension, compared
    /// case-insensitively. Names without an extension, including dot files
    /// such as `.profile`, go to the catch-all.
    pub fn classify(&self, file_name: &str) -> &'static Category {
        extension_of(file_name)
            .and_then(|ext| {
                self.categories
                    .iter()
                    .filter(|c| !c.is_catch_all())
                    .find(|c| c.matches_extension(ext))
            })
            .unwrap_or_else(|| self.catch_all())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn extension_of(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_order() {
        let table = CategoryTable::standard();
        let names: Vec<_> = table.iter().map(|c| c.name()).collect();
        assert_eq!(names.first(), Some(&"Documents"));
        assert_eq!(names.last(), Some(&CATCH_ALL));
        assert_eq!(table.len(), 13);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_classify_known_extensions() {
        let table = CategoryTable::standard();
        assert_eq!(table.classify("a.pdf").name(), "Documents");
        assert_eq!(table.classify("b.jpg").name(), "Images");
        assert_eq!(table.classify("clip.mkv").name(), "Videos");
        assert_eq!(table.classify("setup.msi").name(), "Executables");
        assert_eq!(table.classify("script.py").name(), "Python Scripts");
        assert_eq!(table.classify("index.html").name(), "Web Pages");
        assert_eq!(table.classify("main.c").name(), "Code");
    }

    #[test]
    fn test_classify_case_insensitive() {
        let table = CategoryTable::standard();
        assert_eq!(table.classify("REPORT.PDF").name(), "Documents");
        assert_eq!(table.classify("Photo.JpEg").name(), "Images");
    }

    #[test]
    fn test_classify_uses_last_extension() {
        let table = CategoryTable::standard();
        assert_eq!(table.classify("backup.pdf.zip").name(), "Archives");
        assert_eq!(table.classify("notes.txt.bak").name(), CATCH_ALL);
    }

    #[test]
    fn test_classify_falls_back_to_catch_all() {
        let table = CategoryTable::standard();
        assert_eq!(table.classify("c.unknownext").name(), CATCH_ALL);
        assert_eq!(table.classify("README").name(), CATCH_ALL);
        assert_eq!(table.classify("trailing.").name(), CATCH_ALL);
        assert_eq!(table.classify(".profile").name(), CATCH_ALL);
    }

    #[test]
    fn test_first_declared_category_wins() {
        static OVERLAPPING: &[Category] = &[
            Category::new("First", &["dat"]),
            Category::new("Second", &["dat", "bin"]),
            Category::new("Rest", &[]),
        ];
        let table = CategoryTable::new(OVERLAPPING).expect("valid table");
        assert_eq!(table.classify("x.dat").name(), "First");
        assert_eq!(table.classify("x.bin").name(), "Second");
        assert_eq!(table.classify("x.iso").name(), "Rest");
    }

    #[test]
    fn test_table_rejects_duplicate_names() {
        static DUPLICATED: &[Category] = &[
            Category::new("Same", &["a"]),
            Category::new("Same", &[]),
        ];
        assert!(CategoryTable::new(DUPLICATED).is_none());
    }

    #[test]
    fn test_table_requires_catch_all() {
        static NO_CATCH_ALL: &[Category] = &[Category::new("Only", &["a"])];
        assert!(CategoryTable::new(NO_CATCH_ALL).is_none());
    }

    #[test]
    fn test_get_by_name() {
        let table = CategoryTable::standard();
        assert_eq!(table.get("Audio").map(|c| c.extensions()), Some(&["mp3", "wav"][..]));
        assert!(table.get("Fonts").is_none());
        assert!(table.catch_all().is_catch_all());
    }
}
