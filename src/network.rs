use crate::error::{OllamactlError, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// Host network exposure for the daemon's TCP port.
///
/// `bind`/`unbind` declare and revoke a firewall rule; both are idempotent
/// per port.
#[async_trait]
pub trait PortBinding: Send + Sync {
    async fn bind(&self, port: u16) -> Result<()>;
    async fn unbind(&self, port: u16) -> Result<()>;
}

/// `PortBinding` backed by ufw rules on the host.
pub struct UfwPortBinding;

impl UfwPortBinding {
    async fn run_ufw(args: &[&str]) -> Result<()> {
        debug!("Running: ufw {}", args.join(" "));
        let output = Command::new("ufw").args(args).output().await?;

        if !output.status.success() {
            return Err(OllamactlError::NetworkError(format!(
                "ufw {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PortBinding for UfwPortBinding {
    async fn bind(&self, port: u16) -> Result<()> {
        info!("Opening TCP port {port}");
        Self::run_ufw(&["allow", &format!("{port}/tcp")]).await
    }

    async fn unbind(&self, port: u16) -> Result<()> {
        info!("Closing TCP port {port}");
        Self::run_ufw(&["delete", "allow", &format!("{port}/tcp")]).await
    }
}
