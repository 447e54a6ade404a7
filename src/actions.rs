
use crate::error::{OllamactlError, Result};
use crate::registry::{self, ModelLister, PulledModel};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Minimal HTTP surface the gateway needs from the daemon.
#[async_trait]
pub trait DaemonClient: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<DaemonResponse>;
}

#[derive(Debug, Clone)]
pub struct DaemonResponse {
    pub status: u16,
    pub body: Value,
}

impl DaemonResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `DaemonClient` talking to the daemon's local HTTP API.
pub struct HttpDaemonClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDaemonClient {
    pub fn new(port: u16) -> Self {
        Self {
            base_url: format!("http://localhost:{port}"),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DaemonClient for HttpDaemonClient {
    async fn post_json(&self, path: &str, body: &Value) -> Result<DaemonResponse> {
        let url = format!("{}{path}", self.base_url);
        debug!("POST {url}");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status().as_u16();
        // Error responses are not always JSON
        let body = response.json().await.unwrap_or(Value::Null);

        Ok(DaemonResponse { status, body })
    }
}

/// Receives progress and informational messages during an action, the way
/// the invoking operator sees them.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that forwards messages to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Generate,
    Pull,
    List,
}

impl ActionKind {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "generate" => Ok(ActionKind::Generate),
            "pull" => Ok(ActionKind::Pull),
            "list" => Ok(ActionKind::List),
            other => Err(OllamactlError::ValidationError(format!(
                "unknown action \"{other}\""
            ))),
        }
    }
}

/// A single remote operation invocation. Transient; nothing is persisted.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateResult {
    pub model: String,
    pub timestamp: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Generated(GenerateResult),
    Pulled,
    Models(Vec<PulledModel>),
}

/// Validates and executes the remote operations by proxying to the daemon.
///
/// Action failures never touch lifecycle status or persisted state; they are
/// local to the invocation.
pub struct ActionGateway {
    client: Arc<dyn DaemonClient>,
    lister: Arc<dyn ModelLister>,
    notifier: Arc<dyn Notifier>,
}

impl ActionGateway {
    pub fn new(
        client: Arc<dyn DaemonClient>,
        lister: Arc<dyn ModelLister>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            lister,
            notifier,
        }
    }

    pub async fn handle(&self, request: &ActionRequest) -> Result<ActionOutcome> {
        match request.kind {
            ActionKind::Generate => {
                let result = self.generate(&request.params).await?;
                Ok(ActionOutcome::Generated(result))
            }
            ActionKind::Pull => {
                self.pull(&request.params).await?;
                Ok(ActionOutcome::Pulled)
            }
            ActionKind::List => Ok(ActionOutcome::Models(self.list().await?)),
        }
    }

    /// Run a completion against the daemon.
    pub async fn generate(&self, params: &HashMap<String, String>) -> Result<GenerateResult> {
        let prompt = params.get("prompt").ok_or_else(|| {
            OllamactlError::ValidationError(
                "parameter \"prompt\" was not provided, it is required".to_string(),
            )
        })?;

        let model = self.resolve_model(params.get("model").map(String::as_str)).await?;

        self.notifier.notify("Executing prompt…");
        let response = self
            .client
            .post_json(
                "/api/generate",
                &json!({ "model": model, "prompt": prompt, "stream": false }),
            )
            .await?;
        let body = check_upstream(response)?;

        Ok(GenerateResult {
            model: field_or(&body, "model", &model),
            timestamp: field_or(&body, "created_at", &chrono::Utc::now().to_rfc3339()),
            response: field_or(&body, "response", ""),
        })
    }

    /// Download a model into the daemon's local store.
    pub async fn pull(&self, params: &HashMap<String, String>) -> Result<()> {
        let model = params.get("model").ok_or_else(|| {
            OllamactlError::ValidationError(
                "parameter \"model\" was not provided, it is required".to_string(),
            )
        })?;

        self.notifier.notify(&format!("Downloading model {model}…"));
        let response = self
            .client
            .post_json("/api/pull", &json!({ "name": model, "stream": false }))
            .await?;
        check_upstream(response)?;
        self.notifier.notify("Done.");
        Ok(())
    }

    /// Enumerate models currently present in the daemon's local store.
    pub async fn list(&self) -> Result<Vec<PulledModel>> {
        let raw = self.lister.list_raw().await?;
        Ok(registry::parse(&raw))
    }

    /// Resolve the requested model name against the pulled models.
    ///
    /// An explicit name must match a pulled model exactly, or after stripping
    /// the channel suffix from each candidate; the full pulled name is what
    /// goes out on the wire. With no name given, the first pulled model is
    /// used and noted to the caller.
    async fn resolve_model(&self, requested: Option<&str>) -> Result<String> {
        let pulled = self.list().await?;

        match requested {
            Some(name) => {
                if let Some(model) = pulled.iter().find(|model| model.name == name) {
                    return Ok(model.name.clone());
                }
                if let Some(model) = pulled
                    .iter()
                    .find(|model| registry::strip_channel(&model.name) == name)
                {
                    debug!("Resolved \"{name}\" to pulled model \"{}\"", model.name);
                    return Ok(model.name.clone());
                }
                Err(OllamactlError::NotFoundError(format!(
                    "model \"{name}\" is not pulled; pull it first"
                )))
            }
            None => match pulled.first() {
                Some(model) => {
                    self.notifier
                        .notify(&format!("No model specified, using \"{}\"", model.name));
                    Ok(model.name.clone())
                }
                None => Err(OllamactlError::PreconditionError(
                    "no model has been pulled yet; pull a model first".to_string(),
                )),
            },
        }
    }
}

fn check_upstream(response: DaemonResponse) -> Result<Value> {
    if let Some(message) = response.body.get("error").and_then(Value::as_str) {
        return Err(OllamactlError::UpstreamError(message.to_string()));
    }
    if !response.is_success() {
        return Err(OllamactlError::UpstreamError(format!(
            "daemon returned HTTP {}",
            response.status
        )));
    }
    Ok(response.body)
}

fn field_or(body: &Value, field: &str, fallback: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}
