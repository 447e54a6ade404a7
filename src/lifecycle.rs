
use crate::error::Result;
use crate::network::PortBinding;
use crate::package::PackageController;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Durable controller state, stored as a small TOML file.
///
/// `port` always records the last value that was successfully applied to the
/// daemon's configuration; a failed reconfiguration keeps the prior value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentState {
    #[serde(default)]
    pub installed: bool,
    pub port: u16,
}

impl PersistentState {
    pub fn new(port: u16) -> Self {
        Self {
            installed: false,
            port,
        }
    }

    pub async fn load_or_default(path: &Path, default_port: u16) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(default_port));
        }
        let content = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&content)?)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string(self)
            .map_err(|e| crate::error::OllamactlError::ConfigError(e.to_string()))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// Operator-facing status of the managed daemon.
///
/// `Blocked` is not terminal: re-delivering the failed lifecycle event
/// retries the transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleStatus {
    Maintenance(String),
    Active(String),
    Blocked(String),
}

impl LifecycleStatus {
    pub fn is_blocked(&self) -> bool {
        matches!(self, LifecycleStatus::Blocked(_))
    }

    pub fn message(&self) -> &str {
        match self {
            LifecycleStatus::Maintenance(msg)
            | LifecycleStatus::Active(msg)
            | LifecycleStatus::Blocked(msg) => msg,
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStatus::Maintenance(msg) => write!(f, "maintenance: {msg}"),
            LifecycleStatus::Active(msg) => write!(f, "active: {msg}"),
            LifecycleStatus::Blocked(msg) => write!(f, "blocked: {msg}"),
        }
    }
}

/// Drives install/start/reconfigure transitions for the managed daemon.
///
/// Each handler runs to completion before the next event is processed; the
/// persisted state is only touched from within a single handler at a time.
pub struct LifecycleController {
    state: PersistentState,
    state_path: PathBuf,
    status: LifecycleStatus,
    package: Arc<dyn PackageController>,
    network: Arc<dyn PortBinding>,
}

impl LifecycleController {
    pub async fn load(
        package: Arc<dyn PackageController>,
        network: Arc<dyn PortBinding>,
        state_path: PathBuf,
        default_port: u16,
    ) -> Result<Self> {
        let state = PersistentState::load_or_default(&state_path, default_port).await?;
        Ok(Self {
            state,
            state_path,
            status: LifecycleStatus::Maintenance("waiting for events".to_string()),
            package,
            network,
        })
    }

    pub fn state(&self) -> &PersistentState {
        &self.state
    }

    pub fn status(&self) -> &LifecycleStatus {
        &self.status
    }

    fn set_status(&mut self, status: LifecycleStatus) {
        debug!("Status: {status}");
        self.status = status;
    }

    /// Install the daemon package and point it at the persisted port.
    pub async fn on_install(&mut self) -> LifecycleStatus {
        self.set_status(LifecycleStatus::Maintenance("installing ollama".to_string()));

        match self.try_install().await {
            Ok(()) => {
                info!("Daemon installed, serving on port {}", self.state.port);
                self.set_status(LifecycleStatus::Maintenance("ollama installed".to_string()));
            }
            Err(e) => {
                error!("Failed to install ollama: {e}");
                self.set_status(LifecycleStatus::Blocked("failed to install ollama".to_string()));
            }
        }
        self.status.clone()
    }

    async fn try_install(&mut self) -> Result<()> {
        self.package.ensure_present().await?;
        self.package
            .set_config_key("host", &host_value(self.state.port))
            .await?;

        self.state.installed = true;
        if let Err(e) = self.state.save(&self.state_path).await {
            self.state.installed = false;
            return Err(e);
        }
        Ok(())
    }

    /// Expose the daemon's port. Requires a prior successful install.
    pub async fn on_start(&mut self) -> LifecycleStatus {
        if !self.state.installed {
            self.set_status(LifecycleStatus::Blocked(
                "cannot start, ollama is not installed".to_string(),
            ));
            return self.status.clone();
        }

        self.set_status(LifecycleStatus::Maintenance(
            "starting ollama service".to_string(),
        ));
        match self.network.bind(self.state.port).await {
            Ok(()) => {
                self.set_status(LifecycleStatus::Active("ollama is running".to_string()));
            }
            Err(e) => {
                error!("Failed to start ollama service: {e}");
                self.set_status(LifecycleStatus::Blocked(
                    "failed to start ollama service".to_string(),
                ));
            }
        }
        self.status.clone()
    }

    /// Move the daemon to a newly configured port. No-op when the port is
    /// unchanged.
    pub async fn on_config_changed(&mut self, new_port: u16) -> LifecycleStatus {
        if new_port == self.state.port {
            debug!("Port unchanged ({new_port}), nothing to do");
            return self.status.clone();
        }

        self.set_status(LifecycleStatus::Maintenance("updating ollama port".to_string()));
        match self.try_update_port(new_port).await {
            Ok(()) => {
                info!("Daemon port updated to {new_port}");
                self.set_status(LifecycleStatus::Active("ollama port updated".to_string()));
            }
            Err(e) => {
                error!("Failed to update ollama port: {e}");
                self.set_status(LifecycleStatus::Blocked(
                    "failed to update ollama port".to_string(),
                ));
            }
        }
        self.status.clone()
    }

    // The persisted port moves only after unbind, reconfigure, and bind all
    // succeeded. A failure part-way keeps the old value, so the record stays
    // consistent with the last known-good binding even if the host is
    // already part-way reconfigured; re-delivery retries the full sequence.
    async fn try_update_port(&mut self, new_port: u16) -> Result<()> {
        let old_port = self.state.port;

        self.network.unbind(old_port).await?;
        self.package
            .set_config_key("host", &host_value(new_port))
            .await?;
        self.network.bind(new_port).await?;

        self.state.port = new_port;
        if let Err(e) = self.state.save(&self.state_path).await {
            self.state.port = old_port;
            return Err(e);
        }
        Ok(())
    }
}

fn host_value(port: u16) -> String {
    format!("0.0.0.0:{port}")
}
