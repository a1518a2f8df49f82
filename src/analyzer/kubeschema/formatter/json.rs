//! JSON formatter.

use crate::analyzer::kubeschema::lint::LintResult;
use crate::analyzer::kubeschema::types::{CheckFailure, Fix};
use serde::Serialize;

/// Format a lint result as JSON.
pub fn format(result: &LintResult) -> String {
    let output = JsonOutput::from(result);
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    failures: Vec<JsonFailure<'a>>,
    parse_errors: &'a [String],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFailure<'a> {
    check: &'a str,
    severity: String,
    message: &'a str,
    file_path: String,
    resource: Option<&'a str>,
    line: Option<u32>,
    column: Option<u32>,
    fix: Option<&'a Fix>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    files_checked: usize,
    files_skipped: usize,
    documents_checked: usize,
    total_failures: usize,
    passed: bool,
}

impl<'a> From<&'a LintResult> for JsonOutput<'a> {
    fn from(result: &'a LintResult) -> Self {
        Self {
            failures: result.failures.iter().map(JsonFailure::from).collect(),
            parse_errors: &result.parse_errors,
            summary: JsonSummary {
                files_checked: result.summary.files_checked,
                files_skipped: result.summary.files_skipped,
                documents_checked: result.summary.documents_checked,
                total_failures: result.failures.len(),
                passed: result.summary.passed,
            },
        }
    }
}

impl<'a> From<&'a CheckFailure> for JsonFailure<'a> {
    fn from(f: &'a CheckFailure) -> Self {
        Self {
            check: f.code.as_str(),
            severity: f.severity.to_string(),
            message: &f.message,
            file_path: f.file_path.display().to_string(),
            resource: f.resource.as_deref(),
            line: f.line,
            column: f.column,
            fix: f.fix.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::kubeschema::parser::Position;
    use crate::analyzer::kubeschema::types::{Severity, UNKNOWN_PROPERTY};

    #[test]
    fn test_json_shape() {
        let mut result = LintResult::new();
        let mut failure = CheckFailure::new(
            UNKNOWN_PROPERTY,
            Severity::Warning,
            "Property 'bogus' is not expected here.",
            "pod.yaml",
        )
        .with_position(5, 3);
        failure.fix = Some(Fix::DeleteProperty {
            target: None,
            name: "bogus".to_string(),
            start: Position::new(5, 3, 44),
            end: Position::new(6, 1, 56),
        });
        result.failures.push(failure);
        result.summary.files_checked = 1;
        result.summary.passed = false;

        let value: serde_json::Value = serde_json::from_str(&format(&result)).unwrap();
        assert_eq!(value["failures"][0]["check"], "unknown-property");
        assert_eq!(value["failures"][0]["line"], 5);
        assert_eq!(value["failures"][0]["fix"]["kind"], "deleteProperty");
        assert_eq!(value["failures"][0]["fix"]["start"]["line"], 5);
        assert_eq!(value["summary"]["filesChecked"], 1);
        assert_eq!(value["summary"]["totalFailures"], 1);
        assert_eq!(value["summary"]["passed"], false);
    }
}
