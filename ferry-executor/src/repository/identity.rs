//! Identity repository

use async_trait::async_trait;
use ferry_client::{AwsClient, ClientError, Result};
use ferry_core::domain::task::AccountContext;
use std::sync::Arc;

/// Repository trait for resolving who the executor acts as
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolves the account the executor's requests are made under
    async fn caller_identity(&self) -> Result<AccountContext>;
}

/// SDK-backed implementation of IdentityService
pub struct HttpIdentityService {
    client: Arc<AwsClient>,
}

impl HttpIdentityService {
    pub fn new(client: Arc<AwsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn caller_identity(&self) -> Result<AccountContext> {
        self.client
            .get_caller_identity()
            .await?
            .into_account()
            .ok_or_else(|| ClientError::ParseError("identity response has no account".to_string()))
    }
}
