use crate::error::{OllamactlError, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// Snap package the daemon ships as.
pub const SNAP_NAME: &str = "ollama";

/// Package-manager operations the lifecycle controller depends on.
///
/// Abstracted so transitions can be exercised in tests without touching
/// the host's snap store.
#[async_trait]
pub trait PackageController: Send + Sync {
    /// Install the daemon package and hold it at the installed revision.
    /// Idempotent: a package that is already present is left alone.
    async fn ensure_present(&self) -> Result<()>;

    /// Set a package-scoped configuration key. Fails with a configuration
    /// error if the package is not present.
    async fn set_config_key(&self, key: &str, value: &str) -> Result<()>;
}

/// `PackageController` backed by the host's snap command.
pub struct SnapPackageController {
    snap_name: String,
}

impl SnapPackageController {
    pub fn new() -> Self {
        Self {
            snap_name: SNAP_NAME.to_string(),
        }
    }

    async fn run_snap(&self, args: &[&str]) -> Result<String> {
        debug!("Running: snap {}", args.join(" "));
        let output = Command::new("snap").args(args).output().await?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(OllamactlError::InstallError(format!(
                "snap {} failed: {stderr}",
                args.first().copied().unwrap_or("")
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn is_installed(&self) -> bool {
        Command::new("snap")
            .args(["list", &self.snap_name])
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

impl Default for SnapPackageController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageController for SnapPackageController {
    async fn ensure_present(&self) -> Result<()> {
        if self.is_installed().await {
            debug!("Snap '{}' already installed", self.snap_name);
        } else {
            info!("Installing snap '{}'", self.snap_name);
            self.run_snap(&["install", &self.snap_name]).await?;
        }

        // Hold the snap at the installed revision so unattended refreshes
        // cannot move the daemon under us.
        self.run_snap(&["refresh", "--hold", &self.snap_name])
            .await?;
        Ok(())
    }

    async fn set_config_key(&self, key: &str, value: &str) -> Result<()> {
        if !self.is_installed().await {
            return Err(OllamactlError::ConfigError(format!(
                "cannot set '{key}': snap '{}' is not installed",
                self.snap_name
            )));
        }

        let setting = format!("{key}={value}");
        self.run_snap(&["set", &self.snap_name, &setting])
            .await
            .map_err(|e| OllamactlError::ConfigError(e.to_string()))?;
        Ok(())
    }
}
