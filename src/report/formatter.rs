//! Violation line formatters.

use crate::config::{Level, OutputFormat};
use serde::Serialize;

/// A failed check for a specific pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub level: Level,
    pub check: &'a str,
    pub reason: &'a str,
    pub detail: &'a str,
}

/// Format a violation as a single line, without the trailing newline.
pub fn format_line(violation: &Violation<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "Pod {}/{} is not allowed to run in {}: {}",
            violation.namespace, violation.name, violation.level, violation.detail
        ),
        OutputFormat::Json => {
            serde_json::to_string(violation).unwrap_or_else(|_| "{}".to_string())
        }
    }
}
