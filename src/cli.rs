//! Command-line interface module for declutter.
//!
//! This module handles:
//! - Argument parsing
//! - Tracing setup
//! - Loading configuration and running the organizer
//! - Reporting the outcome on the console

use crate::config::{ConfigError, OrganizerConfig};
use crate::file_organizer::OrganizeError;
use crate::organizer::{Organizer, Progress, RunReport};
use crate::output::OutputFormatter;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Sort the files of a directory into category folders.
#[derive(Debug, Parser)]
#[command(name = "declutter", version, about)]
pub struct Cli {
    /// Directory to organize (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Configuration file to use instead of the default lookup
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Process hidden files too
    #[arg(long)]
    pub include_hidden: bool,

    /// Show what would happen without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Options for one invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// If true, simulate the run without making changes.
    pub dry_run: bool,
    /// Process hidden files regardless of the configured policy.
    pub include_hidden: bool,
    /// Suppress progress and summary output.
    pub quiet: bool,
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl From<&Cli> for RunOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            dry_run: cli.dry_run,
            include_hidden: cli.include_hidden,
            quiet: cli.quiet,
            config_path: cli.config.clone(),
        }
    }
}

/// Errors surfaced to the user by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
    #[error("Could not determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` picks the level.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs the CLI for parsed arguments and prints the result.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use declutter::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["declutter", "/path/to/directory", "--dry-run"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunReport, CliError> {
    let directory = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(CliError::CurrentDir)?,
    };

    run_organizer(&directory, &RunOptions::from(cli))
}

/// Loads configuration for `directory`, runs the organizer and prints the
/// outcome.
pub fn run_organizer(directory: &Path, options: &RunOptions) -> Result<RunReport, CliError> {
    let config = OrganizerConfig::load(options.config_path.as_deref(), directory)?;
    let include_hidden = options.include_hidden || config.organizer.include_hidden;
    let filter = config.compile()?.with_hidden(include_hidden);

    if !options.quiet {
        if options.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing contents of: {}",
                directory.display()
            ));
        } else {
            OutputFormatter::info(&format!("Organizing contents of: {}", directory.display()));
        }
    }

    let organizer = Organizer::new(directory)
        .with_filter(filter)
        .dry_run(options.dry_run);
    let table = *organizer.table();

    let mut progress = None;
    let result = organizer.run_with_progress(|event| {
        if options.quiet {
            return;
        }
        match event {
            Progress::Scanned { total } => {
                progress = Some(OutputFormatter::create_progress_bar(total as u64));
            }
            Progress::Processed(outcome) => {
                if let Some(pb) = &progress {
                    pb.set_message(outcome.file_name());
                    pb.inc(1);
                }
            }
        }
    });
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let report = result?;

    if !options.quiet {
        if report.outcomes.is_empty() {
            OutputFormatter::plain("No files found to organize.");
        } else {
            OutputFormatter::outcomes(&report);
        }
        OutputFormatter::summary_table(&report, &table);
    }

    match closing_line(&report, options.quiet) {
        Some(ClosingLine::Success(message)) => OutputFormatter::success(message),
        Some(ClosingLine::Warning(message)) => OutputFormatter::warning(&message),
        None => {}
    }

    Ok(report)
}

/// Last line printed after a run.
#[derive(Debug, PartialEq, Eq)]
enum ClosingLine {
    Success(&'static str),
    Warning(String),
}

// Quiet runs only get the line that points at the error log.
fn closing_line(report: &RunReport, quiet: bool) -> Option<ClosingLine> {
    if report.dry_run {
        (!quiet).then_some(ClosingLine::Success("Dry run complete. No files were modified."))
    } else if report.had_errors() {
        Some(ClosingLine::Warning(format!(
            "File organization completed with errors. See {}.",
            crate::activity_log::ERROR_LOG_NAME
        )))
    } else {
        (!quiet).then_some(ClosingLine::Success("File organization completed."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["declutter", "/tmp/x", "--dry-run", "--include-hidden", "-vv"]);
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp/x")));
        assert!(cli.dry_run);
        assert!(cli.include_hidden);
        assert_eq!(cli.verbose, 2);

        let options = RunOptions::from(&cli);
        assert!(options.dry_run);
        assert!(!options.quiet);
    }

    #[test]
    fn test_directory_is_optional() {
        let cli = Cli::parse_from(["declutter"]);
        assert!(cli.directory.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["declutter", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_quiet_run_prints_only_the_error_line() {
        let clean = RunReport::default();
        let failed = RunReport {
            hash_failures: 1,
            ..RunReport::default()
        };
        let dry = RunReport {
            dry_run: true,
            ..RunReport::default()
        };

        assert_eq!(closing_line(&clean, true), None);
        assert_eq!(closing_line(&dry, true), None);
        assert!(matches!(
            closing_line(&failed, true),
            Some(ClosingLine::Warning(line)) if line.contains("errors.txt")
        ));
        assert_eq!(
            closing_line(&clean, false),
            Some(ClosingLine::Success("File organization completed."))
        );
    }
}
