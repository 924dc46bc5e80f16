//! In-memory transport for unit tests.

use crate::client::{ApiClient, Command, Transport};
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::sync::Mutex;

/// Everything the client handed to the transport for one call.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub base_url: String,
    pub headers: HeaderMap,
    pub command: Command,
}

/// Records every command and answers with a canned result.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    seen: Mutex<Vec<Recorded>>,
    fail_with: Option<String>,
}

impl RecordingTransport {
    pub fn failing(message: &str) -> Self {
        Self {
            seen: Mutex::default(),
            fail_with: Some(message.to_owned()),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.requests().into_iter().map(|r| r.command).collect()
    }

    pub fn single(&self) -> Command {
        let mut cmds = self.commands();
        assert_eq!(cmds.len(), 1, "expected exactly one command, got {cmds:?}");
        cmds.remove(0)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(
        &self,
        base_url: &str,
        headers: &HeaderMap,
        command: &Command,
    ) -> Result<Value> {
        self.seen.lock().unwrap().push(Recorded {
            base_url: base_url.to_owned(),
            headers: headers.clone(),
            command: command.clone(),
        });
        match &self.fail_with {
            Some(msg) => Err(ApiError::Other(msg.clone())),
            None => Ok(Value::Null),
        }
    }
}

pub fn client() -> ApiClient<RecordingTransport> {
    ApiClient::with_transport("test-token", RecordingTransport::default()).unwrap()
}

/// Query params of a command as borrowed pairs, for compact assertions.
pub fn params(cmd: &Command) -> Vec<(&str, &str)> {
    cmd.params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}
