/// Moving files into category directories.
///
/// This module owns the filesystem side of organizing: creating category
/// directories on demand, picking a free destination name when a file of the
/// same name is already there, and performing the move itself.
use chrono::{Local, NaiveDateTime};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const COLLISION_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A file that was (or, in a dry run, would be) moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Where the file was found.
    pub source: PathBuf,
    /// Where the file ended up.
    pub destination: PathBuf,
    /// Category folder the file went to.
    pub category: &'static str,
    /// True when the destination name differs from the original name.
    pub renamed: bool,
}

impl Relocation {
    /// File name at the destination.
    pub fn destination_name(&self) -> String {
        self.destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Errors that can occur during file organization operations.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target directory is missing.
    #[error("The directory '{}' does not exist.", path.display())]
    DirectoryNotFound { path: PathBuf },
    /// The target path exists but is not a directory.
    #[error("'{}' is not a directory.", path.display())]
    NotADirectory { path: PathBuf },
    /// Listing the target directory failed.
    #[error("Error reading directory {}: {source}", path.display())]
    DirectoryReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to create a category or cleanup directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to move a file into its category directory.
    #[error("Failed to move {}: {source}", from.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to move an empty category folder under the cleanup folder.
    #[error("Failed to move empty folder {} to {}: {source}", from.display(), to.display())]
    FolderSweepFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Organizes files by moving them into category subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Creates `path` as a directory unless it already is one.
    ///
    /// Returns `true` when this call created it.
    pub fn ensure_dir(path: &Path) -> OrganizeResult<bool> {
        match fs::create_dir(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(false),
            Err(e) => Err(OrganizeError::DirectoryCreationFailed {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Moves a file into `base_path/category` and reports where it went.
    ///
    /// The category directory is created if needed. An existing file at the
    /// destination is never replaced: the incoming file gets a timestamp
    /// suffix instead (see [`collision_name`]). On failure the source file is
    /// left where it was.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use declutter::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/report.pdf"),
    ///     "Documents",
    /// );
    ///
    /// match result {
    ///     Ok(moved) => println!("Moved to {}", moved.destination.display()),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: &'static str,
    ) -> OrganizeResult<Relocation> {
        Self::move_to_category_at(base_path, file_path, category, Local::now().naive_local())
    }

    /// Same as [`FileOrganizer::move_to_category`] with an explicit clock.
    pub fn move_to_category_at(
        base_path: &Path,
        file_path: &Path,
        category: &'static str,
        now: NaiveDateTime,
    ) -> OrganizeResult<Relocation> {
        let category_path = base_path.join(category);
        Self::ensure_dir(&category_path)?;

        let relocation = Self::plan_move(base_path, file_path, category, now)?;

        fs::rename(&relocation.source, &relocation.destination).map_err(|e| {
            OrganizeError::FileMoveFailure {
                from: relocation.source.clone(),
                to: relocation.destination.clone(),
                source: e,
            }
        })?;

        Ok(relocation)
    }

    /// Computes the destination a move would use without touching the disk.
    pub fn plan_move(
        base_path: &Path,
        file_path: &Path,
        category: &'static str,
        now: NaiveDateTime,
    ) -> OrganizeResult<Relocation> {
        let category_path = base_path.join(category);
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                from: file_path.to_path_buf(),
                to: category_path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            })?;

        let destination = free_destination(&category_path, file_name, now);
        let renamed = destination.file_name() != Some(file_name);

        Ok(Relocation {
            source: file_path.to_path_buf(),
            destination,
            category,
            renamed,
        })
    }
}

/// Inserts a collision suffix before the extension.
///
/// Works on raw OS names, so names that are not valid UTF-8 keep their bytes.
///
/// # Examples
///
/// ```
/// use declutter::file_organizer::collision_name;
///
/// assert_eq!(collision_name("report.pdf", "20240309070501"), "report_20240309070501.pdf");
/// assert_eq!(collision_name("README", "20240309070501"), "README_20240309070501");
/// ```
pub fn collision_name(file_name: impl AsRef<OsStr>, suffix: &str) -> OsString {
    let file_name = file_name.as_ref();
    let path = Path::new(file_name);

    let mut name = path.file_stem().unwrap_or(file_name).to_os_string();
    name.push("_");
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Second-resolution timestamp used in collision names.
pub fn collision_stamp(at: NaiveDateTime) -> String {
    at.format(COLLISION_STAMP_FORMAT).to_string()
}

/// First name under `dir` that nothing occupies: the original name, then the
/// timestamped name, then the timestamped name with a counter.
fn free_destination(dir: &Path, file_name: &OsStr, now: NaiveDateTime) -> PathBuf {
    let original = dir.join(file_name);
    if !occupied(&original) {
        return original;
    }

    let stamp = collision_stamp(now);
    let stamped = dir.join(collision_name(file_name, &stamp));
    if !occupied(&stamped) {
        return stamped;
    }

    (1u32..)
        .map(|n| dir.join(collision_name(file_name, &format!("{}_{}", stamp, n))))
        .find(|candidate| !occupied(candidate))
        .unwrap_or(stamped)
}

// Broken symlinks count as occupied; `Path::exists` would say they are free.
pub(crate) fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
