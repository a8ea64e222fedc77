//! Log service operations

use crate::AwsClient;
use crate::error::{ClientError, Result};
use ferry_core::dto::logs::{GetLogEventsRequest, GetLogEventsResponse, OutputLogEvent};

impl AwsClient {
    /// Get one page of events from a log stream
    ///
    /// # Arguments
    /// * `req` - Group, stream and optional continuation token
    ///
    /// # Returns
    /// The events and the token for the next page
    pub async fn get_log_events(&self, req: &GetLogEventsRequest) -> Result<GetLogEventsResponse> {
        let resp = self
            .logs
            .get_log_events()
            .log_group_name(&req.log_group_name)
            .log_stream_name(&req.log_stream_name)
            .start_from_head(req.start_from_head)
            .set_next_token(req.next_token.clone())
            .send()
            .await
            .map_err(ClientError::from_sdk)?;

        Ok(GetLogEventsResponse {
            events: resp
                .events()
                .iter()
                .map(|event| OutputLogEvent {
                    timestamp: event.timestamp().unwrap_or_default(),
                    message: event.message().unwrap_or_default().to_string(),
                })
                .collect(),
            next_forward_token: resp.next_forward_token().map(str::to_string),
        })
    }
}
