//! Log domain types

use serde::{Deserialize, Serialize};

/// A log event captured from a task's container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub message: String,
}

/// Formats events as plain text, one line per event
pub fn format_log_text(events: &[LogEvent]) -> String {
    events
        .iter()
        .map(|event| format!("{}\n", event.message))
        .collect()
}
