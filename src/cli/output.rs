//! Output formatting for the exit summary

use crate::aggregate::Summary;

/// Format the summary as JSON or plain text based on the --json flag
pub fn format_summary(summary: &Summary, json: bool) -> String {
    if json {
        serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
    } else {
        summary.to_string()
    }
}
