//! CLI command implementations.

pub mod clean;
pub mod jumble;
pub mod run;

use colored::Colorize;
use vitals::CleaningReport;

/// Print the per-rule counts of a cleaning report.
pub(crate) fn print_cleaning_report(report: &CleaningReport) {
    println!(
        "Rows: {} -> {}",
        report.rows_before.to_string().white().bold(),
        report.rows_after.to_string().white().bold()
    );
    for action in &report.actions {
        println!("  {} {}", "•".cyan(), action.description());
    }
}
