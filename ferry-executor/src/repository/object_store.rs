//! Object store repository
//!
//! Stores and fetches whole artifacts by bucket and key.

use async_trait::async_trait;
use ferry_client::{AwsClient, Result};
use std::sync::Arc;

/// Repository trait for artifact storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `body` under `key`, replacing any existing object
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;

    /// Fetches the object under `key`
    ///
    /// Returns [`ferry_client::ClientError::NotFound`] when no object exists.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// SDK-backed implementation of ObjectStore
pub struct HttpObjectStore {
    client: Arc<AwsClient>,
}

impl HttpObjectStore {
    pub fn new(client: Arc<AwsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.client.put_object(bucket, key, body).await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.client.get_object(bucket, key).await
    }
}
