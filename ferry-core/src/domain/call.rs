//! Serialized function call shipped to the remote worker

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A function call: entrypoint plus positional and keyword arguments
///
/// `function` names the entrypoint the task image knows how to resolve;
/// the executor never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCall {
    pub function: String,
    #[serde(default)]
    pub args: Vec<JsonValue>,
    #[serde(default)]
    pub kwargs: Map<String, JsonValue>,
}

impl TaskCall {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args: Vec::new(),
            kwargs: Map::new(),
        }
    }

    /// Appends a positional argument
    pub fn arg(mut self, value: impl Into<JsonValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Sets a keyword argument
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}
