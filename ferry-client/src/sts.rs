//! Identity service operations

use crate::AwsClient;
use crate::error::{ClientError, Result};
use ferry_core::dto::sts::CallerIdentity;

impl AwsClient {
    /// Resolve the identity the client's requests are made under
    pub async fn get_caller_identity(&self) -> Result<CallerIdentity> {
        let resp = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(ClientError::from_sdk)?;

        Ok(CallerIdentity {
            account: resp.account().map(str::to_string),
            arn: resp.arn().map(str::to_string),
            user_id: resp.user_id().map(str::to_string),
        })
    }
}
