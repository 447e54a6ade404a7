use crate::actions::{DaemonClient, DaemonResponse, Notifier};
use crate::error::{OllamactlError, Result};
use crate::network::PortBinding;
use crate::package::PackageController;
use crate::registry::ModelLister;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;

/// Shared mock package controller that records every call.
#[derive(Debug, Default)]
pub struct MockPackageController {
    pub ensure_present_calls: StdMutex<u32>,
    pub config_keys: StdMutex<Vec<(String, String)>>,
    pub fail_ensure_present: bool,
    pub fail_set_config_key: bool,
}

impl MockPackageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_install() -> Self {
        Self {
            fail_ensure_present: true,
            ..Self::default()
        }
    }

    pub fn failing_config() -> Self {
        Self {
            fail_set_config_key: true,
            ..Self::default()
        }
    }

    pub fn ensure_present_count(&self) -> u32 {
        *self.ensure_present_calls.lock().unwrap()
    }

    pub fn config_key_calls(&self) -> Vec<(String, String)> {
        self.config_keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageController for MockPackageController {
    async fn ensure_present(&self) -> Result<()> {
        *self.ensure_present_calls.lock().unwrap() += 1;
        if self.fail_ensure_present {
            return Err(OllamactlError::InstallError(
                "snap install failed".to_string(),
            ));
        }
        Ok(())
    }

    async fn set_config_key(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_set_config_key {
            return Err(OllamactlError::ConfigError("snap set failed".to_string()));
        }
        self.config_keys
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Shared mock port binding that records bind/unbind calls.
#[derive(Debug, Default)]
pub struct MockPortBinding {
    pub binds: StdMutex<Vec<u16>>,
    pub unbinds: StdMutex<Vec<u16>>,
    pub fail_bind: bool,
    pub fail_unbind: bool,
}

impl MockPortBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_bind() -> Self {
        Self {
            fail_bind: true,
            ..Self::default()
        }
    }

    pub fn failing_unbind() -> Self {
        Self {
            fail_unbind: true,
            ..Self::default()
        }
    }

    pub fn bind_calls(&self) -> Vec<u16> {
        self.binds.lock().unwrap().clone()
    }

    pub fn unbind_calls(&self) -> Vec<u16> {
        self.unbinds.lock().unwrap().clone()
    }
}

#[async_trait]
impl PortBinding for MockPortBinding {
    async fn bind(&self, port: u16) -> Result<()> {
        if self.fail_bind {
            return Err(OllamactlError::NetworkError(format!(
                "cannot open port {port}"
            )));
        }
        self.binds.lock().unwrap().push(port);
        Ok(())
    }

    async fn unbind(&self, port: u16) -> Result<()> {
        if self.fail_unbind {
            return Err(OllamactlError::NetworkError(format!(
                "cannot close port {port}"
            )));
        }
        self.unbinds.lock().unwrap().push(port);
        Ok(())
    }
}

/// Mock daemon client with canned responses and request recording.
pub struct MockDaemonClient {
    pub requests: StdMutex<Vec<(String, Value)>>,
    pub responses: StdMutex<VecDeque<DaemonResponse>>,
    pub transport_failure: Option<String>,
}

impl MockDaemonClient {
    /// Client that answers every request with HTTP 200 and an empty body.
    pub fn new() -> Self {
        Self {
            requests: StdMutex::new(Vec::new()),
            responses: StdMutex::new(VecDeque::new()),
            transport_failure: None,
        }
    }

    /// Client whose next response carries the given body with HTTP 200.
    pub fn with_body(body: Value) -> Self {
        Self::with_response(200, body)
    }

    pub fn with_response(status: u16, body: Value) -> Self {
        let client = Self::new();
        client.push_response(DaemonResponse { status, body });
        client
    }

    /// Client whose requests all fail at the transport level.
    pub fn failing(message: &str) -> Self {
        Self {
            requests: StdMutex::new(Vec::new()),
            responses: StdMutex::new(VecDeque::new()),
            transport_failure: Some(message.to_string()),
        }
    }

    pub fn push_response(&self, response: DaemonResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockDaemonClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DaemonClient for MockDaemonClient {
    async fn post_json(&self, path: &str, body: &Value) -> Result<DaemonResponse> {
        if let Some(message) = &self.transport_failure {
            return Err(OllamactlError::UpstreamError(message.clone()));
        }
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DaemonResponse {
                status: 200,
                body: Value::Object(serde_json::Map::new()),
            }))
    }
}

/// Model lister that returns a canned listing.
pub struct StaticModelLister {
    raw: String,
}

impl StaticModelLister {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }
}

#[async_trait]
impl ModelLister for StaticModelLister {
    async fn list_raw(&self) -> Result<String> {
        Ok(self.raw.clone())
    }
}

/// Notifier that records every message for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub entries: StdMutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.entries.lock().unwrap().push(message.to_string());
    }
}
