//! In-memory doubles of the repository ports

use async_trait::async_trait;
use ferry_client::{AwsClient, ClientError, Credentials, Result};
use ferry_core::domain::log::LogEvent;
use ferry_core::domain::status::LastStatus;
use ferry_core::domain::task::{AccountContext, TaskHandle};
use ferry_core::dto::ecs::{RegisterTaskDefinitionRequest, RunTaskRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::repository::{
    ExecutionService, IdentityService, LogService, ObjectStore, TaskDescription, TaskPage,
};

/// `Authorization` header of a request signed by [`signed_client`]
pub const SIGNED: &str = "^AWS4-HMAC-SHA256 Credential=AKIDFERRYTEST/";

/// Client signing with fixed credentials, routed to `url`
pub async fn signed_client(url: &str) -> Arc<AwsClient> {
    let config = AwsClient::loader("us-east-1", Some(url))
        .credentials_provider(Credentials::new(
            "AKIDFERRYTEST",
            "ferry-test-secret",
            None,
            None,
            "ferry-tests",
        ))
        .load()
        .await;
    Arc::new(AwsClient::from_conf(&config))
}

pub const TASK_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task/ferry-cluster/abc123";
const OTHER_TASK_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task/ferry-cluster/zzz999";

/// Object store backed by a map
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    failure: Mutex<Option<(u16, String)>>,
    gets: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{}/{}", bucket, key), body);
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&format!("{}/{}", bucket, key))
    }

    /// Makes every later request fail with the given API error
    pub fn fail_with(&self, status: u16, code: &str) {
        *self.failure.lock().unwrap() = Some((status, code.to_string()));
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<()> {
        match &*self.failure.lock().unwrap() {
            Some((status, code)) => Err(ClientError::api_error(*status, code.clone(), "injected")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.check_failure()?;
        self.insert(bucket, key, body);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{}/{}", bucket, key))
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("s3://{}/{}", bucket, key)))
    }
}

/// What one status query of [`ScriptedExecution`] sees
#[derive(Debug, Clone)]
pub enum Observation {
    /// The tracked task is not listed
    Missing,
    /// The tracked task is listed with this status and first-container exit code
    Reported(&'static str, Option<i32>),
    /// Listing fails with this API error
    Failing(u16, &'static str),
}

/// Container service that replays a script of observations
///
/// Each listing consumes one observation; the last one repeats forever.
/// Stop requests are recorded and otherwise ignored.
pub struct ScriptedExecution {
    script: Mutex<VecDeque<Observation>>,
    current: Mutex<Option<Observation>>,
    reject_launch: bool,
    registrations: AtomicUsize,
    launched: Mutex<Vec<RunTaskRequest>>,
    queries: AtomicUsize,
    stops: Mutex<Vec<(TaskHandle, String)>>,
}

impl ScriptedExecution {
    pub fn new(script: Vec<Observation>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            current: Mutex::new(None),
            reject_launch: false,
            registrations: AtomicUsize::new(0),
            launched: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
            stops: Mutex::new(Vec::new()),
        }
    }

    /// A task that is stopped with exit code 0 from the first query on
    pub fn succeeding() -> Self {
        Self::new(vec![Observation::Reported("STOPPED", Some(0))])
    }

    pub fn rejecting_launch(mut self) -> Self {
        self.reject_launch = true;
        self
    }

    pub fn handle(&self) -> TaskHandle {
        TaskHandle::new(TASK_ARN)
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn launched(&self) -> Vec<RunTaskRequest> {
        self.launched.lock().unwrap().clone()
    }

    /// Number of status queries (first-page listings) served
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> Vec<(TaskHandle, String)> {
        self.stops.lock().unwrap().clone()
    }

    fn next_observation(&self) -> Observation {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap_or(Observation::Missing)
        } else {
            script.front().cloned().unwrap_or(Observation::Missing)
        }
    }
}

#[async_trait]
impl ExecutionService for ScriptedExecution {
    async fn register_definition(&self, req: &RegisterTaskDefinitionRequest) -> Result<String> {
        let revision = self.registrations.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{}:{}", req.family, revision))
    }

    async fn launch(&self, req: &RunTaskRequest) -> Result<TaskHandle> {
        self.launched.lock().unwrap().push(req.clone());
        if self.reject_launch {
            return Err(ClientError::api_error(
                400,
                "InvalidParameterException",
                "subnet does not exist",
            ));
        }
        Ok(self.handle())
    }

    async fn list_stopped(
        &self,
        _cluster: &str,
        _family: &str,
        _next_token: Option<String>,
    ) -> Result<TaskPage> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let observation = self.next_observation();
        *self.current.lock().unwrap() = Some(observation.clone());

        let handles = match observation {
            Observation::Failing(status, code) => {
                return Err(ClientError::api_error(status, code, "injected"));
            }
            Observation::Missing => vec![TaskHandle::new(OTHER_TASK_ARN)],
            Observation::Reported(..) => vec![TaskHandle::new(OTHER_TASK_ARN), self.handle()],
        };

        Ok(TaskPage {
            handles,
            next_token: None,
        })
    }

    async fn describe(&self, _cluster: &str, handles: &[TaskHandle]) -> Result<Vec<TaskDescription>> {
        let current = self.current.lock().unwrap().clone();

        Ok(handles
            .iter()
            .map(|handle| match &current {
                Some(Observation::Reported(status, exit_code)) if *handle == self.handle() => {
                    TaskDescription {
                        handle: handle.clone(),
                        last_status: Some(LastStatus::parse(status)),
                        exit_code: *exit_code,
                    }
                }
                _ => TaskDescription {
                    handle: handle.clone(),
                    last_status: Some(LastStatus::Stopped),
                    exit_code: Some(0),
                },
            })
            .collect())
    }

    async fn stop(&self, _cluster: &str, handle: &TaskHandle, reason: &str) -> Result<()> {
        self.stops
            .lock()
            .unwrap()
            .push((handle.clone(), reason.to_string()));
        Ok(())
    }
}

/// Log service returning fixed events
pub struct StubLogs {
    messages: Vec<String>,
    fail: bool,
    requested: Mutex<Vec<(String, String)>>,
}

impl StubLogs {
    pub fn with_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            fail: false,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_messages(Vec::<String>::new())
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    /// `(group, stream)` pairs that were read
    pub fn requested(&self) -> Vec<(String, String)> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogService for StubLogs {
    async fn get_events(&self, group: &str, stream: &str) -> Result<Vec<LogEvent>> {
        self.requested
            .lock()
            .unwrap()
            .push((group.to_string(), stream.to_string()));

        if self.fail {
            return Err(ClientError::api_error(
                400,
                "ResourceNotFoundException",
                "The specified log stream does not exist.",
            ));
        }

        Ok(self
            .messages
            .iter()
            .map(|message| LogEvent {
                timestamp: chrono::Utc::now(),
                message: message.clone(),
            })
            .collect())
    }
}

/// Identity service with a fixed answer
pub struct StubIdentity {
    account: Option<AccountContext>,
}

impl StubIdentity {
    pub fn new(account_id: &str) -> Self {
        Self {
            account: Some(AccountContext::new(account_id)),
        }
    }

    pub fn denied() -> Self {
        Self { account: None }
    }
}

#[async_trait]
impl IdentityService for StubIdentity {
    async fn caller_identity(&self) -> Result<AccountContext> {
        self.account.clone().ok_or_else(|| {
            ClientError::api_error(403, "InvalidClientTokenId", "The security token is invalid.")
        })
    }
}
