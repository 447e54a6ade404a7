
use crate::error::{OllamactlError, Result};
use crate::lifecycle::{LifecycleController, LifecycleStatus};
use tracing::info;

/// Lifecycle occurrences delivered by the surrounding machinery, distinct
/// from on-demand actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Install,
    Start,
    ConfigChanged,
}

impl LifecycleEvent {
    /// Explicit name-to-event mapping, built fresh at process start rather
    /// than registered in global state.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "install" => Ok(LifecycleEvent::Install),
            "start" => Ok(LifecycleEvent::Start),
            "config-changed" => Ok(LifecycleEvent::ConfigChanged),
            other => Err(OllamactlError::ValidationError(format!(
                "unknown lifecycle event \"{other}\""
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Install => "install",
            LifecycleEvent::Start => "start",
            LifecycleEvent::ConfigChanged => "config-changed",
        }
    }
}

/// Deliver one lifecycle event to the controller and return the resulting
/// status. `desired_port` carries the currently configured port, which only
/// `ConfigChanged` consults.
pub async fn deliver(
    controller: &mut LifecycleController,
    event: LifecycleEvent,
    desired_port: u16,
) -> LifecycleStatus {
    info!("Delivering lifecycle event '{}'", event.name());
    match event {
        LifecycleEvent::Install => controller.on_install().await,
        LifecycleEvent::Start => controller.on_start().await,
        LifecycleEvent::ConfigChanged => controller.on_config_changed(desired_port).await,
    }
}
