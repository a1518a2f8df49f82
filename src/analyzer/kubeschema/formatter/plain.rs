//! Plain text formatter.

use crate::analyzer::kubeschema::lint::LintResult;
use crate::analyzer::kubeschema::types::Severity;

/// Format a lint result as plain text.
pub fn format(result: &LintResult) -> String {
    let mut output = String::new();

    for failure in &result.failures {
        let resource = failure
            .resource
            .as_deref()
            .map(|r| format!(" ({})", r))
            .unwrap_or_default();

        output.push_str(&format!(
            "{}: [{}] {}{} - {}\n",
            failure.location(),
            failure.severity,
            failure.code,
            resource,
            failure.message,
        ));

        if let Some(fix) = &failure.fix {
            output.push_str(&format!("  Fix: {}\n", fix.title()));
        }
    }

    for error in &result.parse_errors {
        output.push_str(&format!("error: {}\n", error));
    }

    if !result.has_failures() {
        output.push_str("No unknown properties found.\n");
    } else {
        output.push_str(&format!("\nFound {} issue(s).\n", result.failures.len()));
    }

    output
}

/// Format for GitHub Actions annotations.
pub fn format_github(result: &LintResult) -> String {
    let mut output = String::new();

    for failure in &result.failures {
        let level = match failure.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "notice",
        };

        output.push_str(&format!(
            "::{} file={},line={},col={}::[{}] {}\n",
            level,
            failure.file_path.display(),
            failure.line.unwrap_or(1),
            failure.column.unwrap_or(1),
            failure.code,
            failure.message,
        ));
    }

    for error in &result.parse_errors {
        output.push_str(&format!("::error::{}\n", error));
    }

    output
}
