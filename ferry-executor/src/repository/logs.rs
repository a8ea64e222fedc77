//! Logs repository
//!
//! Reads a whole log stream, following forward tokens until the service
//! stops returning new events.

use async_trait::async_trait;
use ferry_client::{AwsClient, Result};
use ferry_core::domain::log::LogEvent;
use ferry_core::dto::logs::GetLogEventsRequest;
use std::sync::Arc;
use tracing::debug;

/// Repository trait for reading task output
#[async_trait]
pub trait LogService: Send + Sync {
    /// Returns every event of `stream` in `group`, oldest first
    async fn get_events(&self, group: &str, stream: &str) -> Result<Vec<LogEvent>>;
}

/// SDK-backed implementation of LogService
pub struct HttpLogService {
    client: Arc<AwsClient>,
}

impl HttpLogService {
    pub fn new(client: Arc<AwsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogService for HttpLogService {
    async fn get_events(&self, group: &str, stream: &str) -> Result<Vec<LogEvent>> {
        let mut events = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let req = GetLogEventsRequest {
                log_group_name: group.to_string(),
                log_stream_name: stream.to_string(),
                start_from_head: true,
                next_token: next_token.clone(),
            };
            let page = self.client.get_log_events(&req).await?;
            debug!("Read {} log event(s) from {}", page.events.len(), stream);

            let empty = page.events.is_empty();
            events.extend(page.events.into_iter().map(LogEvent::from));

            // The forward token repeats once the end of the stream is reached
            if empty || page.next_forward_token.is_none() || page.next_forward_token == next_token {
                break;
            }
            next_token = page.next_forward_token;
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SIGNED, signed_client};
    use ferry_core::domain::log::format_log_text;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_reads_until_token_repeats() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/")
            .match_header("authorization", Matcher::Regex(SIGNED.to_string()))
            .match_body(Matcher::JsonString(
                r#"{"logGroupName": "ferry-task-logs",
                    "logStreamName": "ferry/ferry-task-d-1/abc",
                    "startFromHead": true}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/x-amz-json-1.1")
            .with_body(
                r#"{"events": [{"timestamp": 1, "message": "hello"}], "nextForwardToken": "f/1"}"#,
            )
            .create_async()
            .await;
        let second = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJsonString(r#"{"nextToken": "f/1"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/x-amz-json-1.1")
            .with_body(
                r#"{"events": [{"timestamp": 2, "message": "world"}], "nextForwardToken": "f/2"}"#,
            )
            .create_async()
            .await;
        let last = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJsonString(r#"{"nextToken": "f/2"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/x-amz-json-1.1")
            .with_body(r#"{"events": [], "nextForwardToken": "f/2"}"#)
            .create_async()
            .await;

        let service = HttpLogService::new(signed_client(&server.url()).await);
        let events = service
            .get_events("ferry-task-logs", "ferry/ferry-task-d-1/abc")
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        last.assert_async().await;
        assert_eq!(format_log_text(&events), "hello\nworld\n");
    }
}
