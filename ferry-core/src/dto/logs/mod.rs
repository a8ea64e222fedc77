//! Log service DTOs

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::log::LogEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLogEventsRequest {
    pub log_group_name: String,
    pub log_stream_name: String,
    pub start_from_head: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLogEventsResponse {
    #[serde(default)]
    pub events: Vec<OutputLogEvent>,
    pub next_forward_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLogEvent {
    /// Milliseconds since the epoch
    pub timestamp: i64,
    pub message: String,
}

impl From<OutputLogEvent> for LogEvent {
    fn from(event: OutputLogEvent) -> Self {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_millis_opt(event.timestamp)
            .single()
            .unwrap_or_default();
        LogEvent {
            timestamp,
            message: event.message,
        }
    }
}
