//! Pure formatting functions for UI output.

use crate::manager::{PropertyReport, SourceFailure};
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a warning message in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Format a single published property as `key=value`, key in bold.
pub fn format_property(key: &str, value: &str) -> String {
    format!("{}={}", style(key).bold(), style(value).green())
}

/// Print all published properties, sorted by key.
pub fn display_properties(report: &PropertyReport) {
    for (key, value) in &report.properties {
        println!("{}", format_property(key, value));
    }
}

/// Warn about every source that failed to produce properties.
pub fn display_failures(failures: &[SourceFailure]) {
    for failure in failures {
        display_warning(&format!(
            "Source '{}' failed: {}",
            failure.source, failure.error
        ));
    }
}
