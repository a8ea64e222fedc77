//! Artifact transfer
//!
//! Moves call and result artifacts between the local staging directory and
//! the object store. Every transfer goes through a staging file in
//! `cache_dir`, which is removed whether or not the transfer succeeds.

use ferry_client::ClientError;
use ferry_core::domain::call::TaskCall;
use ferry_core::domain::task::TaskIdentity;
use serde::de::DeserializeOwned;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{ExecutorError, Result};
use crate::repository::ObjectStore;

/// Stores and loads the artifacts of a task
pub struct ArtifactStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    cache_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Uploads the call of a task, overwriting any earlier upload for the same identity
    pub async fn upload_call(&self, identity: &TaskIdentity, call: &TaskCall) -> Result<()> {
        let key = identity.call_artifact_key();
        let cache_dir = self.cache_dir.clone();
        let staged_key = key.clone();
        let call = call.clone();
        let body = blocking(&key, move || encode_staged(&cache_dir, &staged_key, &call)).await?;

        debug!("Uploading {} ({} bytes) to {}", key, body.len(), self.bucket);
        self.store
            .put(&self.bucket, &key, body)
            .await
            .map_err(|e| store_error(&key, e))
    }

    /// Downloads the call of a task
    pub async fn download_call(&self, identity: &TaskIdentity) -> Result<TaskCall> {
        self.download(&identity.call_artifact_key()).await
    }

    /// Downloads the result of a task
    pub async fn download_result<T>(&self, identity: &TaskIdentity) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.download(&identity.result_artifact_key()).await
    }

    async fn download<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        debug!("Downloading {} from {}", key, self.bucket);
        let body = self
            .store
            .get(&self.bucket, key)
            .await
            .map_err(|e| store_error(key, e))?;

        let cache_dir = self.cache_dir.clone();
        let owned_key = key.to_string();
        blocking(key, move || decode_staged(&cache_dir, &owned_key, &body)).await
    }
}

/// Runs staging-file work on the blocking pool
async fn blocking<T, F>(key: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| transfer_error(key, e))?
}

/// Serializes `call` through a staging file and returns the staged bytes
fn encode_staged(cache_dir: &Path, key: &str, call: &TaskCall) -> Result<Vec<u8>> {
    let staged = stage(cache_dir, key, |file| {
        serde_json::to_writer(file, call).map_err(std::io::Error::from)
    })?;

    let body = std::fs::read(staged.path());
    discard(staged);
    body.map_err(|e| transfer_error(key, e))
}

/// Stages `body` and decodes it from the staging file
fn decode_staged<T: DeserializeOwned>(cache_dir: &Path, key: &str, body: &[u8]) -> Result<T> {
    let mut staged = stage(cache_dir, key, |file| file.write_all(body))?;
    let decoded = staged
        .as_file_mut()
        .seek(SeekFrom::Start(0))
        .map_err(|e| transfer_error(key, e))
        .and_then(|_| {
            serde_json::from_reader(std::io::BufReader::new(staged.as_file())).map_err(|e| {
                ExecutorError::Deserialization {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            })
        });
    discard(staged);

    decoded
}

/// Writes a staging file in the cache directory
fn stage<F>(cache_dir: &Path, key: &str, write: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut std::fs::File) -> std::io::Result<()>,
{
    std::fs::create_dir_all(cache_dir).map_err(|e| transfer_error(key, e))?;

    let mut staged = NamedTempFile::new_in(cache_dir).map_err(|e| transfer_error(key, e))?;
    let written = write(staged.as_file_mut()).and_then(|_| staged.as_file_mut().flush());
    if let Err(e) = written {
        discard(staged);
        return Err(transfer_error(key, e));
    }

    Ok(staged)
}

/// Removes a staging file; failures are logged, never raised
fn discard(staged: NamedTempFile) {
    let path = staged.path().to_path_buf();
    if let Err(e) = staged.close() {
        warn!("Failed to remove staging file {}: {}", path.display(), e);
    }
}

fn transfer_error(key: &str, err: impl std::fmt::Display) -> ExecutorError {
    ExecutorError::Transfer {
        key: key.to_string(),
        message: err.to_string(),
    }
}

fn store_error(key: &str, err: ClientError) -> ExecutorError {
    if err.is_not_found() {
        ExecutorError::NotFound { key: key.to_string() }
    } else {
        transfer_error(key, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryObjectStore;
    use serde_json::json;

    fn store_in(dir: &std::path::Path) -> (Arc<MemoryObjectStore>, ArtifactStore) {
        let objects = Arc::new(MemoryObjectStore::new());
        let artifacts = ArtifactStore::new(objects.clone(), "bucket", dir);
        (objects, artifacts)
    }

    fn staged_files(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_call_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (objects, artifacts) = store_in(dir.path());
        let identity = TaskIdentity::new("d", 1);
        let call = TaskCall::new("train")
            .arg(3)
            .arg("x")
            .kwarg("epochs", 10)
            .kwarg("lr", json!(0.01));

        artifacts.upload_call(&identity, &call).await.unwrap();
        assert!(objects.contains("bucket", "func-d-1.json"));

        let loaded = artifacts.download_call(&identity).await.unwrap();
        assert_eq!(loaded, call);
        assert_eq!(staged_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_upload_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let (_, artifacts) = store_in(dir.path());
        let identity = TaskIdentity::new("d", 1);

        artifacts.upload_call(&identity, &TaskCall::new("first")).await.unwrap();
        artifacts.upload_call(&identity, &TaskCall::new("second")).await.unwrap();

        let loaded = artifacts.download_call(&identity).await.unwrap();
        assert_eq!(loaded.function, "second");
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (_, artifacts) = store_in(dir.path());

        let err = artifacts
            .download_result::<i64>(&TaskIdentity::new("d", 7))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::NotFound { key } if key == "result-d-7.json"));
    }

    #[tokio::test]
    async fn test_corrupt_result_cleans_staging() {
        let dir = tempfile::tempdir().unwrap();
        let (objects, artifacts) = store_in(dir.path());
        objects.insert("bucket", "result-d-1.json", b"not json".to_vec());

        let err = artifacts
            .download_result::<i64>(&TaskIdentity::new("d", 1))
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutorError::Deserialization { .. }));
        assert_eq!(staged_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_staging_creates_missing_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("staging").join("ferry");
        let (objects, artifacts) = store_in(&nested);
        objects.insert("bucket", "result-d-1.json", b"[1, 2]".to_vec());

        let identity = TaskIdentity::new("d", 1);
        artifacts.upload_call(&identity, &TaskCall::new("f")).await.unwrap();
        let result: Vec<i64> = artifacts.download_result(&identity).await.unwrap();

        assert_eq!(result, vec![1, 2]);
        assert!(nested.is_dir());
        assert_eq!(staged_files(&nested), 0);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transfer_error() {
        let dir = tempfile::tempdir().unwrap();
        let objects = Arc::new(MemoryObjectStore::new());
        objects.fail_with(503, "ServiceUnavailable");
        let artifacts = ArtifactStore::new(objects, "bucket", dir.path());

        let err = artifacts
            .upload_call(&TaskIdentity::new("d", 1), &TaskCall::new("f"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::Transfer { .. }));
        assert_eq!(staged_files(dir.path()), 0);
    }
}
