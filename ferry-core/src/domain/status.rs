//! Task lifecycle types
//!
//! The container service reports eight lifecycle values. Callers only ever
//! see the three [`TaskState`] buckets derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exit code reported when a stopped task has no container exit code
pub const EXIT_CODE_UNAVAILABLE: i32 = -1;

/// Lifecycle status as reported by the container service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastStatus {
    Provisioning,
    Pending,
    Activating,
    Running,
    Deactivating,
    Stopping,
    Deprovisioning,
    Stopped,
    /// A value this build does not know about
    Unknown(String),
}

impl LastStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PROVISIONING" => Self::Provisioning,
            "PENDING" => Self::Pending,
            "ACTIVATING" => Self::Activating,
            "RUNNING" => Self::Running,
            "DEACTIVATING" => Self::Deactivating,
            "STOPPING" => Self::Stopping,
            "DEPROVISIONING" => Self::Deprovisioning,
            "STOPPED" => Self::Stopped,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Provisioning => "PROVISIONING",
            Self::Pending => "PENDING",
            Self::Activating => "ACTIVATING",
            Self::Running => "RUNNING",
            Self::Deactivating => "DEACTIVATING",
            Self::Stopping => "STOPPING",
            Self::Deprovisioning => "DEPROVISIONING",
            Self::Stopped => "STOPPED",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Collapses the status into a [`TaskState`]
    ///
    /// `exit_code` is only consulted for the terminal status; a missing code
    /// becomes [`EXIT_CODE_UNAVAILABLE`].
    pub fn classify(&self, exit_code: Option<i32>) -> TaskState {
        if self.is_terminal() {
            TaskState::Terminal {
                exit_code: exit_code.unwrap_or(EXIT_CODE_UNAVAILABLE),
            }
        } else {
            TaskState::InProgress
        }
    }
}

impl fmt::Display for LastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapsed lifecycle state of a tracked task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    NotFound,
    InProgress,
    Terminal { exit_code: i32 },
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Terminal { exit_code } => Some(*exit_code),
            _ => None,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("NOT_FOUND"),
            Self::InProgress => f.write_str("IN_PROGRESS"),
            Self::Terminal { exit_code } => write!(f, "TERMINAL (exit code {})", exit_code),
        }
    }
}
