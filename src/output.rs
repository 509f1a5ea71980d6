//! Output formatting and styling module.
//!
//! All console output of the binary goes through [`OutputFormatter`]: colored
//! status lines, the per-file progress bar and the end-of-run summary.

use crate::file_category::CategoryTable;
use crate::organizer::{FileOutcome, RunReport};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use declutter::output::OutputFormatter;
    /// OutputFormatter::success("File organization completed.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
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

    /// Creates a progress bar for `total` files.
    ///
    /// ```no_run
    /// use declutter::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// One line describing what happened to a file.
    pub fn outcome_line(outcome: &FileOutcome, dry_run: bool) -> String {
        match outcome {
            FileOutcome::Moved { relocation, hashed } => {
                let verb = if dry_run { "Would move" } else { "Moved" };
                let mut line = format!(
                    "{} {} → {}/{}",
                    verb,
                    outcome.file_name(),
                    relocation.category,
                    relocation.destination_name()
                );
                if relocation.renamed {
                    line.push_str(" (renamed)");
                }
                if !hashed {
                    line.push_str(" (not checked for duplicates)");
                }
                line
            }
            FileOutcome::DuplicateSkipped {
                file_name,
                original,
            } => format!("Duplicate file skipped: {} (same as {})", file_name, original),
            FileOutcome::MoveFailed {
                file_name,
                category,
                reason,
            } => format!("Could not move {} to {}: {}", file_name, category, reason),
        }
    }

    /// Prints every outcome with the matching style.
    pub fn outcomes(report: &RunReport) {
        for outcome in &report.outcomes {
            let line = Self::outcome_line(outcome, report.dry_run);
            match outcome {
                FileOutcome::Moved { .. } if report.dry_run => Self::dry_run_notice(&line),
                FileOutcome::Moved { .. } => Self::success(&line),
                FileOutcome::DuplicateSkipped { .. } => Self::warning(&line),
                FileOutcome::MoveFailed { .. } => Self::error(&line),
            }
        }
    }

    /// Prints a table of moved files per category, in table order, followed by
    /// duplicate, failure and cleanup totals.
    pub fn summary_table(report: &RunReport, table: &CategoryTable) {
        Self::header(if report.dry_run {
            "DRY RUN SUMMARY"
        } else {
            "SUMMARY"
        });

        let rows = report.moves_by_category(table);
        let width = rows
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &rows {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word(*count),
                width = width
            );
        }

        let total = report.moved_count();
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            file_word(total),
            width = width
        );

        let duplicates = report.duplicate_count();
        if duplicates > 0 {
            Self::warning(&format!("{} duplicate {} skipped", duplicates, file_word(duplicates)));
        }
        let failures = report.failure_count();
        if failures > 0 {
            Self::error(&format!("{} {} could not be moved", failures, file_word(failures)));
        }
        if report.hash_failures > 0 {
            Self::warning(&format!(
                "{} {} could not be checked for duplicates",
                report.hash_failures,
                file_word(report.hash_failures)
            ));
        }
        if report.sweep_failures > 0 {
            Self::error(&format!(
                "{} empty folders could not be moved to '{}'",
                report.sweep_failures,
                crate::organizer::CLEANUP_FOLDER
            ));
        }
        if !report.swept_folders.is_empty() {
            let verb = if report.dry_run { "Would move" } else { "Moved" };
            Self::info(&format!(
                "{} empty folders to '{}': {}",
                verb,
                crate::organizer::CLEANUP_FOLDER,
                report.swept_folders.join(", ")
            ));
        }
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
