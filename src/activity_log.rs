//! Append-only action and error logs.
//!
//! Both logs live in the organized directory and are only ever appended to.
//! Each record is one line of the form `[YYYY-MM-DD HH:MM:SS] <message>`.

use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the action log.
pub const ACTION_LOG_NAME: &str = "logs.txt";
/// File name of the error log.
pub const ERROR_LOG_NAME: &str = "errors.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which log a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Action,
    Error,
}

/// Writer for the two log files of one target directory.
///
/// A disabled log (dry runs) accepts records and drops them.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    action_path: PathBuf,
    error_path: PathBuf,
    enabled: bool,
}

impl ActivityLog {
    /// Logs placed in `directory`.
    pub fn new(directory: &Path) -> Self {
        Self {
            action_path: directory.join(ACTION_LOG_NAME),
            error_path: directory.join(ERROR_LOG_NAME),
            enabled: true,
        }
    }

    /// A log that never touches the filesystem.
    pub fn disabled(directory: &Path) -> Self {
        Self {
            enabled: false,
            ..Self::new(directory)
        }
    }

    pub fn action_path(&self) -> &Path {
        &self.action_path
    }

    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    /// Whether `file_name` is one of the log files.
    pub fn is_log_file(file_name: &str) -> bool {
        file_name == ACTION_LOG_NAME || file_name == ERROR_LOG_NAME
    }

    /// Records a successful operation.
    pub fn action(&self, message: &str) {
        self.record(Severity::Action, message);
    }

    /// Records a failure.
    pub fn error(&self, message: &str) {
        self.record(Severity::Error, message);
    }

    /// Appends a record stamped with the current local time.
    ///
    /// A failed append is traced and otherwise ignored; logging never stops a
    /// run.
    pub fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Action => tracing::info!(target: "declutter::action", "{}", message),
            Severity::Error => tracing::error!(target: "declutter::error", "{}", message),
        }

        if !self.enabled {
            return;
        }

        if let Err(e) = self.append(severity, &format_record(Local::now().naive_local(), message)) {
            tracing::warn!(
                "Could not write to {}: {}",
                self.path_for(severity).display(),
                e
            );
        }
    }

    fn path_for(&self, severity: Severity) -> &Path {
        match severity {
            Severity::Action => &self.action_path,
            Severity::Error => &self.error_path,
        }
    }

    fn append(&self, severity: Severity, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(severity))?;
        writeln!(file, "{}", line)
    }
}

/// Formats one log line.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use declutter::activity_log::format_record;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 9)
///     .unwrap()
///     .and_hms_opt(7, 5, 1)
///     .unwrap();
/// assert_eq!(format_record(at, "Moved a.pdf"), "[2024-03-09 07:05:01] Moved a.pdf");
/// ```
pub fn format_record(at: NaiveDateTime, message: &str) -> String {
    format!("[{}] {}", at.format(TIMESTAMP_FORMAT), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_actions_and_errors_go_to_separate_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = ActivityLog::new(temp_dir.path());

        log.action("Moved a.pdf");
        log.error("Failed to move b.pdf");

        let actions = lines(log.action_path());
        let errors = lines(log.error_path());
        assert_eq!(actions.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(actions[0].ends_with("] Moved a.pdf"));
        assert!(errors[0].ends_with("] Failed to move b.pdf"));
    }

    #[test]
    fn test_records_are_appended() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(ACTION_LOG_NAME);
        fs::write(&path, "[2020-01-01 00:00:00] earlier run\n").unwrap();

        let log = ActivityLog::new(temp_dir.path());
        log.action("first");
        log.action("second");

        let actions = lines(&path);
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0], "[2020-01-01 00:00:00] earlier run");
        assert!(actions[2].ends_with("second"));
    }

    #[test]
    fn test_line_format() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = ActivityLog::new(temp_dir.path());
        log.action("hello");

        let line = &lines(log.action_path())[0];
        // "[YYYY-MM-DD HH:MM:SS] "
        assert_eq!(line.len(), 22 + "hello".len());
        assert!(line.starts_with('['));
        assert_eq!(&line[20..22], "] ");
        assert!(NaiveDateTime::parse_from_str(&line[1..20], TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = ActivityLog::disabled(temp_dir.path());
        log.action("ignored");
        log.error("ignored");

        assert!(!log.action_path().exists());
        assert!(!log.error_path().exists());
    }

    #[test]
    fn test_unwritable_log_does_not_panic() {
        let log = ActivityLog::new(Path::new("/non/existent/path"));
        log.action("nowhere to go");
    }

    #[test]
    fn test_is_log_file() {
        assert!(ActivityLog::is_log_file("logs.txt"));
        assert!(ActivityLog::is_log_file("errors.txt"));
        assert!(!ActivityLog::is_log_file("notes.txt"));
    }
}
