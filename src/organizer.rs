//! The organize run.
//!
//! A run validates the target directory, prepares the category folders, seeds
//! the duplicate registry with files already organized, moves every eligible
//! file through hash → duplicate check → classify → relocate,
//! and finally sweeps empty category folders into the cleanup folder. Each
//! file ends in an explicit [`FileOutcome`]; a failure on one file never stops
//! the others.

use crate::activity_log::ActivityLog;
use crate::config::{EntryFilter, LOCAL_CONFIG_NAME};
use crate::content_hash::hash_file;
use crate::duplicates::{DuplicateCheck, DuplicateRegistry};
use crate::file_category::CategoryTable;
use crate::file_organizer::{FileOrganizer, OrganizeError, OrganizeResult, Relocation, occupied};
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Folder receiving category folders that stayed empty.
pub const CLEANUP_FOLDER: &str = "Clean_Up";

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Moved into its category folder. `hashed` is false when the content
    /// could not be read, in which case duplicate detection was skipped.
    Moved { relocation: Relocation, hashed: bool },
    /// Left in place because an earlier file has the same content.
    DuplicateSkipped { file_name: String, original: String },
    /// The move failed; the file is still at its source.
    MoveFailed {
        file_name: String,
        category: &'static str,
        reason: String,
    },
}

impl FileOutcome {
    pub fn file_name(&self) -> String {
        match self {
            FileOutcome::Moved { relocation, .. } => relocation
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            FileOutcome::DuplicateSkipped { file_name, .. }
            | FileOutcome::MoveFailed { file_name, .. } => file_name.clone(),
        }
    }
}

/// Progress notifications emitted while a run is underway.
#[derive(Debug)]
pub enum Progress<'a> {
    /// The scan finished and found this many files to process.
    Scanned { total: usize },
    /// One file went through the pipeline.
    Processed(&'a FileOutcome),
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Per-file outcomes in processing order.
    pub outcomes: Vec<FileOutcome>,
    /// Category folders moved (or removed) into the cleanup folder.
    pub swept_folders: Vec<&'static str>,
    /// Files whose content could not be hashed.
    pub hash_failures: usize,
    /// Entries skipped because they could not be read from the listing.
    pub unreadable_entries: usize,
    /// Empty category folders that could not be checked or swept.
    pub sweep_failures: usize,
    /// Nothing was changed on disk.
    pub dry_run: bool,
}

impl RunReport {
    pub fn moved(&self) -> impl Iterator<Item = &Relocation> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Moved { relocation, .. } => Some(relocation),
            _ => None,
        })
    }

    pub fn moved_count(&self) -> usize {
        self.moved().count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::DuplicateSkipped { .. }))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::MoveFailed { .. }))
            .count()
    }

    /// Whether any error was logged during the run.
    pub fn had_errors(&self) -> bool {
        self.failure_count() > 0
            || self.hash_failures > 0
            || self.unreadable_entries > 0
            || self.sweep_failures > 0
    }

    /// Number of files moved into each category, in table order, omitting
    /// categories that received nothing.
    pub fn moves_by_category(&self, table: &CategoryTable) -> Vec<(&'static str, usize)> {
        table
            .iter()
            .map(|c| {
                let count = self.moved().filter(|r| r.category == c.name()).count();
                (c.name(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// One organize run over one directory.
///
/// The duplicate registry belongs to the organizer and [`Organizer::run`]
/// consumes it, so no state carries over between runs.
///
/// # Examples
///
/// ```no_run
/// use declutter::Organizer;
///
/// match Organizer::new("/home/me/Downloads").run() {
///     Ok(report) => println!("moved {} files", report.moved_count()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub struct Organizer {
    root: PathBuf,
    table: CategoryTable,
    filter: EntryFilter,
    registry: DuplicateRegistry,
    log: ActivityLog,
    dry_run: bool,
}

impl Organizer {
    /// An organizer for `root` with the standard table and default filter.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            log: ActivityLog::new(&root),
            root,
            table: CategoryTable::standard(),
            filter: EntryFilter::default(),
            registry: DuplicateRegistry::new(),
            dry_run: false,
        }
    }

    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_table(mut self, table: CategoryTable) -> Self {
        self.table = table;
        self
    }

    /// In a dry run nothing is created, moved or written to the log files.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self.log = if dry_run {
            ActivityLog::disabled(&self.root)
        } else {
            ActivityLog::new(&self.root)
        };
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Runs to completion.
    pub fn run(self) -> OrganizeResult<RunReport> {
        self.run_with_progress(|_| {})
    }

    /// Runs to completion, reporting progress to `on_progress`.
    ///
    /// Returns an error only when the target directory is missing or when the
    /// run could not continue at all (category folders could not be created,
    /// the directory could not be listed). Such errors are written to the
    /// error log when the directory exists. Per-file problems are logged and
    /// surface in the report instead.
    pub fn run_with_progress<F>(mut self, mut on_progress: F) -> OrganizeResult<RunReport>
    where
        F: FnMut(Progress<'_>),
    {
        self.validate()?;

        info!(root = %self.root.display(), dry_run = self.dry_run, "organizing directory");
        let result = self.execute(&mut on_progress);
        match &result {
            Ok(report) => info!(
                moved = report.moved_count(),
                duplicates = report.duplicate_count(),
                failures = report.failure_count(),
                "File organization completed."
            ),
            Err(e) => self.log.error(&format!("General error: {}", e)),
        }
        result
    }

    fn validate(&self) -> OrganizeResult<()> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => {
                let e = OrganizeError::NotADirectory {
                    path: self.root.clone(),
                };
                error!("{}", e);
                Err(e)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let e = OrganizeError::DirectoryNotFound {
                    path: self.root.clone(),
                };
                error!("{}", e);
                Err(e)
            }
            Err(e) => {
                let e = OrganizeError::DirectoryReadFailed {
                    path: self.root.clone(),
                    source: e,
                };
                error!("{}", e);
                Err(e)
            }
        }
    }

    fn execute(&mut self, on_progress: &mut dyn FnMut(Progress<'_>)) -> OrganizeResult<RunReport> {
        let mut report = RunReport {
            dry_run: self.dry_run,
            ..RunReport::default()
        };

        self.prepare()?;
        self.seed_registry();

        let files = self.scan(&mut report)?;
        on_progress(Progress::Scanned { total: files.len() });

        for (path, name) in files {
            let outcome = self.process_file(&path, &name, &mut report);
            on_progress(Progress::Processed(&outcome));
            report.outcomes.push(outcome);
        }

        self.sweep_empty_folders(&mut report);
        Ok(report)
    }

    fn prepare(&self) -> OrganizeResult<()> {
        if self.dry_run {
            return Ok(());
        }

        for category in self.table.iter() {
            if FileOrganizer::ensure_dir(&self.root.join(category.dir_name()))? {
                debug!(category = category.name(), "created category folder");
            }
        }
        FileOrganizer::ensure_dir(&self.cleanup_dir())?;
        Ok(())
    }

    /// Registers the content of files already sitting in category folders, so
    /// a copy of an organized file is still recognized on a later run.
    fn seed_registry(&mut self) {
        for category in self.table.iter() {
            let folder = self.root.join(category.dir_name());
            let Ok(entries) = fs::read_dir(&folder) else {
                continue;
            };

            let mut files: Vec<_> = entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .collect();
            files.sort();

            for path in files {
                match hash_file(&path) {
                    Ok(hash) => {
                        let name = path.file_name().unwrap_or_default().to_string_lossy();
                        self.registry
                            .check_and_register(hash, &format!("{}/{}", category.dir_name(), name));
                    }
                    Err(e) => debug!("{}", e),
                }
            }
        }
        debug!(known = self.registry.len(), "seeded duplicate registry");
    }

    /// Files to process, sorted by name.
    fn scan(&self, report: &mut RunReport) -> OrganizeResult<Vec<(PathBuf, String)>> {
        let entries = fs::read_dir(&self.root).map_err(|e| OrganizeError::DirectoryReadFailed {
            path: self.root.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.unreadable_entries += 1;
                    self.log.error(&format!(
                        "Error reading an entry of {}: {}",
                        self.root.display(),
                        e
                    ));
                    continue;
                }
            };

            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if path.is_dir() {
                continue;
            }
            if ActivityLog::is_log_file(&name) || name == LOCAL_CONFIG_NAME {
                continue;
            }
            if !self.filter.should_include(&name) {
                debug!(file = %name, "excluded from run");
                continue;
            }

            files.push((path, name));
        }

        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }

    fn process_file(&mut self, path: &Path, name: &str, report: &mut RunReport) -> FileOutcome {
        let hashed = match hash_file(path) {
            Ok(hash) => match self.registry.check_and_register(hash, name) {
                DuplicateCheck::DuplicateOf(original) => {
                    self.log.action(&format!(
                        "Duplicate file skipped: {} (same content as {})",
                        name, original
                    ));
                    return FileOutcome::DuplicateSkipped {
                        file_name: name.to_string(),
                        original,
                    };
                }
                DuplicateCheck::Unique => true,
            },
            Err(e) => {
                report.hash_failures += 1;
                self.log.error(&e.to_string());
                false
            }
        };

        let category = self.table.classify(name);
        debug!(file = %name, category = category.name(), "classified");

        let now = Local::now().naive_local();
        let result = if self.dry_run {
            FileOrganizer::plan_move(&self.root, path, category.dir_name(), now)
        } else {
            FileOrganizer::move_to_category_at(&self.root, path, category.dir_name(), now)
        };

        match result {
            Ok(relocation) => {
                if relocation.renamed {
                    self.log.action(&format!(
                        "File already exists. Renamed {} to {} in {}",
                        name,
                        relocation.destination_name(),
                        category.name()
                    ));
                }
                self.log.action(&format!(
                    "Moved {} to {}",
                    relocation.source.display(),
                    relocation.destination.display()
                ));
                FileOutcome::Moved { relocation, hashed }
            }
            Err(e) => {
                self.log.error(&e.to_string());
                FileOutcome::MoveFailed {
                    file_name: name.to_string(),
                    category: category.name(),
                    reason: e.to_string(),
                }
            }
        }
    }

    fn sweep_empty_folders(&self, report: &mut RunReport) {
        let cleanup = self.cleanup_dir();

        for category in self.table.iter() {
            let folder = self.root.join(category.dir_name());

            if self.dry_run {
                let receives_files = report.moved().any(|r| r.category == category.name());
                let empty_now = !folder.is_dir() || is_empty_dir(&folder).unwrap_or(false);
                if !receives_files && empty_now {
                    report.swept_folders.push(category.name());
                }
                continue;
            }

            if !folder.is_dir() {
                continue;
            }
            match is_empty_dir(&folder) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    report.sweep_failures += 1;
                    self.log.error(&format!(
                        "Error reading folder {}: {}",
                        folder.display(),
                        e
                    ));
                    continue;
                }
            }

            let target = cleanup.join(category.dir_name());
            let result = if occupied(&target) {
                // An earlier run already parked this folder.
                fs::remove_dir(&folder).map(|()| {
                    debug!(category = category.name(), "removed empty folder already in cleanup");
                })
            } else {
                fs::rename(&folder, &target).map(|()| {
                    self.log.action(&format!(
                        "Moved empty folder '{}' to '{}'",
                        category.name(),
                        CLEANUP_FOLDER
                    ));
                })
            };

            match result {
                Ok(()) => report.swept_folders.push(category.name()),
                Err(e) => {
                    report.sweep_failures += 1;
                    let e = OrganizeError::FolderSweepFailure {
                        from: folder,
                        to: target,
                        source: e,
                    };
                    self.log.error(&e.to_string());
                }
            }
        }
    }

    fn cleanup_dir(&self) -> PathBuf {
        self.root.join(CLEANUP_FOLDER)
    }
}

fn is_empty_dir(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("Failed to write test file");
    }

    #[test]
    fn test_missing_directory_is_not_created() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("absent");

        let result = Organizer::new(&missing).run();

        assert!(matches!(result, Err(OrganizeError::DirectoryNotFound { .. })));
        assert!(!missing.exists());
    }

    #[test]
    fn test_file_target_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        write(temp_dir.path(), "plain.txt", "x");

        let result = Organizer::new(temp_dir.path().join("plain.txt")).run();
        assert!(matches!(result, Err(OrganizeError::NotADirectory { .. })));
    }

    #[test]
    fn test_pipeline_outcomes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, "a.pdf", "same");
        write(root, "a_copy.pdf", "same");
        write(root, "b.jpg", "pixels");

        let report = Organizer::new(root).run().unwrap();

        assert_eq!(report.moved_count(), 2);
        assert_eq!(report.duplicate_count(), 1);
        assert!(!report.had_errors());
        assert!(report.outcomes.contains(&FileOutcome::DuplicateSkipped {
            file_name: "a_copy.pdf".to_string(),
            original: "a.pdf".to_string(),
        }));
        assert!(root.join("a_copy.pdf").exists());
    }

    #[test]
    fn test_organized_files_seed_the_registry() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("Images")).unwrap();
        write(&root.join("Images"), "kept.png", "pixels");
        write(root, "again.gif", "pixels");

        let report = Organizer::new(root).run().unwrap();

        assert_eq!(
            report.outcomes,
            vec![FileOutcome::DuplicateSkipped {
                file_name: "again.gif".to_string(),
                original: "Images/kept.png".to_string(),
            }]
        );
    }

    #[test]
    fn test_moves_by_category_follows_table_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, "z.png", "1");
        write(root, "y.txt", "2");
        write(root, "x.txt", "3");

        let organizer = Organizer::new(root);
        let table = *organizer.table();
        let report = organizer.run().unwrap();

        assert_eq!(
            report.moves_by_category(&table),
            vec![("Documents", 2), ("Images", 1)]
        );
    }

    #[test]
    fn test_progress_reports_every_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, "one.mp3", "1");
        write(root, "two.wav", "2");

        let mut total = None;
        let mut processed = 0;
        Organizer::new(root)
            .run_with_progress(|p| match p {
                Progress::Scanned { total: n } => total = Some(n),
                Progress::Processed(_) => processed += 1,
            })
            .unwrap();

        assert_eq!(total, Some(2));
        assert_eq!(processed, 2);
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, "a.pdf", "same");
        write(root, "b.pdf", "same");

        let report = Organizer::new(root).dry_run(true).run().unwrap();

        assert!(report.dry_run);
        assert_eq!(report.moved_count(), 1);
        assert_eq!(report.duplicate_count(), 1);
        assert!(!report.swept_folders.contains(&"Documents"));
        assert!(report.swept_folders.contains(&"Images"));

        let names: Vec<_> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_fatal_prepare_error_is_logged() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        // A regular file where a category folder should go.
        write(root, "Audio", "in the way");

        let result = Organizer::new(root).run();

        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
        let errors = fs::read_to_string(root.join("errors.txt")).unwrap();
        assert!(errors.contains("General error: Failed to create directory"));
    }

    #[test]
    fn test_unreachable_target_is_not_reported_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        write(temp_dir.path(), "plain.txt", "x");

        let result = Organizer::new(temp_dir.path().join("plain.txt").join("inner")).run();

        assert!(matches!(result, Err(OrganizeError::DirectoryReadFailed { .. })));
        assert!(!temp_dir.path().join("errors.txt").exists());
    }

    #[test]
    fn test_report_counts_sweep_failures_as_errors() {
        let report = RunReport {
            sweep_failures: 1,
            ..RunReport::default()
        };
        assert!(report.had_errors());
        assert!(!RunReport::default().had_errors());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_sweep_is_counted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let elsewhere = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        // `remove_dir` refuses a symlink, even for root.
        fs::create_dir_all(root.join(CLEANUP_FOLDER).join("Images")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), root.join("Images")).unwrap();
        write(root, "notes.txt", "text");

        let report = Organizer::new(root).run().unwrap();

        assert_eq!(report.sweep_failures, 1);
        assert!(report.had_errors());
        assert!(!report.swept_folders.contains(&"Images"));
        assert!(root.join("Documents").join("notes.txt").exists());
        let errors = fs::read_to_string(root.join("errors.txt")).unwrap();
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.contains("Failed to move empty folder"));
    }
}
