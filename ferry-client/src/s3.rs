//! Object storage operations

use crate::AwsClient;
use crate::error::{ClientError, Result};
use aws_sdk_s3::primitives::ByteStream;
use ferry_core::domain::definition::object_uri;
use tracing::debug;

impl AwsClient {
    /// Store an object, replacing any existing object under the same key
    ///
    /// # Arguments
    /// * `bucket` - Bucket name
    /// * `key` - Object key
    /// * `body` - Object contents
    pub async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        debug!("PUT {} ({} bytes)", object_uri(bucket, key), body.len());

        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(ClientError::from_sdk)?;
        Ok(())
    }

    /// Fetch an object's contents
    ///
    /// # Returns
    /// The object bytes, or [`ClientError::NotFound`] if no object exists under `key`
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        debug!("GET {}", object_uri(bucket, key));

        let resp = self
            .s3
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    ClientError::NotFound(object_uri(bucket, key))
                } else {
                    ClientError::from_sdk(err)
                }
            })?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| ClientError::RequestFailed(format!("reading {}: {}", object_uri(bucket, key), e)))?;
        Ok(body.into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, SIGNED};
    use mockito::Matcher;

    const NO_SUCH_KEY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message></Error>"#;

    #[tokio::test]
    async fn test_put_object_is_signed_and_path_style() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/bucket/func-d-1.json")
            .match_header("authorization", Matcher::Regex(SIGNED.to_string()))
            .with_status(200)
            .create_async()
            .await;

        let client = testing::client(&server.url()).await;
        client
            .put_object("bucket", "func-d-1.json", br#"{"function":"main"}"#.to_vec())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_object() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bucket/result-d-1.json")
            .match_header("authorization", Matcher::Regex(SIGNED.to_string()))
            .with_status(200)
            .with_body("42")
            .create_async()
            .await;

        let client = testing::client(&server.url()).await;
        let body = client.get_object("bucket", "result-d-1.json").await.unwrap();
        assert_eq!(body, b"42".to_vec());
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bucket/result-d-1.json")
            .with_status(404)
            .with_header("content-type", "application/xml")
            .with_body(NO_SUCH_KEY)
            .create_async()
            .await;

        let client = testing::client(&server.url()).await;
        let err = client.get_object("bucket", "result-d-1.json").await.unwrap_err();
        match err {
            ClientError::NotFound(uri) => assert_eq!(uri, "s3://bucket/result-d-1.json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_put_forbidden() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/bucket/key")
            .with_status(403)
            .with_header("content-type", "application/xml")
            .with_body("<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>")
            .create_async()
            .await;

        let client = testing::client(&server.url()).await;
        let err = client.put_object("bucket", "key", vec![1]).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(!err.is_transient());
    }
}
