#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from(["ollamactl", "install"]).unwrap();
        assert!(matches!(args.command, Commands::Install));

        let args = CliArgs::try_parse_from(["ollamactl", "start"]).unwrap();
        assert!(matches!(args.command, Commands::Start));

        let args = CliArgs::try_parse_from(["ollamactl", "config-changed"]).unwrap();
        assert!(matches!(args.command, Commands::ConfigChanged));

        let args = CliArgs::try_parse_from(["ollamactl", "status"]).unwrap();
        assert!(matches!(args.command, Commands::Status));
    }

    #[test]
    fn test_generate_command_parsing() {
        let args = CliArgs::try_parse_from([
            "ollamactl",
            "generate",
            "--prompt",
            "why is the sky blue?",
            "--model",
            "llama3",
        ])
        .unwrap();
        match args.command {
            Commands::Generate { model, prompt } => {
                assert_eq!(model, Some("llama3".to_string()));
                assert_eq!(prompt, "why is the sky blue?");
            }
            _ => panic!("Expected Generate command"),
        }

        // Model is optional
        let args =
            CliArgs::try_parse_from(["ollamactl", "generate", "--prompt", "hello"]).unwrap();
        match args.command {
            Commands::Generate { model, .. } => assert!(model.is_none()),
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_pull_command_parsing() {
        let args = CliArgs::try_parse_from(["ollamactl", "pull", "--model", "llama3:8b"]).unwrap();
        match args.command {
            Commands::Pull { model } => assert_eq!(model, "llama3:8b"),
            _ => panic!("Expected Pull command"),
        }

        // Model is required
        assert!(CliArgs::try_parse_from(["ollamactl", "pull"]).is_err());
    }

    #[test]
    fn test_models_command_parsing() {
        let args = CliArgs::try_parse_from(["ollamactl", "models"]).unwrap();
        assert!(matches!(args.command, Commands::Models));
    }
}

use crate::actions::{ActionGateway, HttpDaemonClient, Notifier};
use crate::config::{get_config_dir, GlobalConfig};
use crate::error::Result;
use crate::events::{self, LifecycleEvent};
use crate::lifecycle::LifecycleController;
use crate::network::UfwPortBinding;
use crate::package::SnapPackageController;
use crate::registry::OllamaCliLister;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Lifecycle manager for a local Ollama daemon
#[derive(Parser, Debug)]
#[command(name = "ollamactl")]
#[command(about = "Installs, configures and drives a local Ollama daemon")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the daemon package and configure its listening port
    Install,
    /// Expose the daemon's port (requires a prior install)
    Start,
    /// Apply a changed port from the configuration file
    ConfigChanged,
    /// Show persisted lifecycle state
    Status,
    /// Run a completion against the daemon
    Generate {
        /// Model to use; defaults to the first pulled model
        #[arg(long)]
        model: Option<String>,
        /// Prompt to complete
        #[arg(long)]
        prompt: String,
    },
    /// Download a model into the daemon's local store
    Pull {
        /// Model to download, e.g. "llama3:8b"
        #[arg(long)]
        model: String,
    },
    /// List models present in the daemon's local store
    Models,
}

#[derive(Debug)]
pub enum CliResult {
    Success(String),
    Error(String),
}

/// Notifier that prints progress messages for an interactive invocation.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{message}");
    }
}

pub struct CliHandler {
    config: GlobalConfig,
    state_path: PathBuf,
}

impl CliHandler {
    pub fn new(config: GlobalConfig) -> Result<Self> {
        let state_path = get_config_dir()?.join("state.toml");
        Ok(Self { config, state_path })
    }

    pub fn with_state_path(mut self, state_path: PathBuf) -> Self {
        self.state_path = state_path;
        self
    }

    pub async fn handle_command(&self, command: Commands) -> Result<CliResult> {
        match command {
            Commands::Install => self.deliver_event(LifecycleEvent::Install).await,
            Commands::Start => self.deliver_event(LifecycleEvent::Start).await,
            Commands::ConfigChanged => self.deliver_event(LifecycleEvent::ConfigChanged).await,
            Commands::Status => self.show_status().await,
            Commands::Generate { model, prompt } => self.run_generate(model, prompt).await,
            Commands::Pull { model } => self.run_pull(model).await,
            Commands::Models => self.run_models().await,
        }
    }

    async fn controller(&self) -> Result<LifecycleController> {
        LifecycleController::load(
            Arc::new(SnapPackageController::new()),
            Arc::new(UfwPortBinding),
            self.state_path.clone(),
            self.config.daemon.port,
        )
        .await
    }

    async fn gateway(&self) -> Result<ActionGateway> {
        // Actions target the port the daemon actually serves on, which is
        // the persisted one, not necessarily the configured one.
        let controller = self.controller().await?;
        let port = controller.state().port;
        Ok(ActionGateway::new(
            Arc::new(HttpDaemonClient::new(port)),
            Arc::new(OllamaCliLister),
            Arc::new(ConsoleNotifier),
        ))
    }

    async fn deliver_event(&self, event: LifecycleEvent) -> Result<CliResult> {
        let mut controller = self.controller().await?;
        let status = events::deliver(&mut controller, event, self.config.daemon.port).await;

        if status.is_blocked() {
            Ok(CliResult::Error(format!("{status}")))
        } else {
            Ok(CliResult::Success(format!("{status}")))
        }
    }

    async fn show_status(&self) -> Result<CliResult> {
        let controller = self.controller().await?;
        let state = controller.state();
        Ok(CliResult::Success(format!(
            "installed: {}\nport: {}",
            state.installed, state.port
        )))
    }

    async fn run_generate(&self, model: Option<String>, prompt: String) -> Result<CliResult> {
        let gateway = self.gateway().await?;

        let mut params = HashMap::new();
        params.insert("prompt".to_string(), prompt);
        if let Some(model) = model {
            params.insert("model".to_string(), model);
        }

        match gateway.generate(&params).await {
            Ok(result) => Ok(CliResult::Success(format!(
                "model: {}\ntimestamp: {}\n\n{}",
                result.model, result.timestamp, result.response
            ))),
            Err(e) => Ok(CliResult::Error(e.to_string())),
        }
    }

    async fn run_pull(&self, model: String) -> Result<CliResult> {
        let gateway = self.gateway().await?;

        let mut params = HashMap::new();
        params.insert("model".to_string(), model.clone());

        match gateway.pull(&params).await {
            Ok(()) => Ok(CliResult::Success(format!("Model '{model}' pulled"))),
            Err(e) => Ok(CliResult::Error(e.to_string())),
        }
    }

    async fn run_models(&self) -> Result<CliResult> {
        let gateway = self.gateway().await?;

        match gateway.list().await {
            Ok(models) if models.is_empty() => {
                Ok(CliResult::Success("No models pulled yet".to_string()))
            }
            Ok(models) => {
                let mut lines = vec!["NAME\tID\tSIZE\tMODIFIED".to_string()];
                for model in models {
                    lines.push(format!(
                        "{}\t{}\t{}\t{}",
                        model.name, model.id, model.size, model.modified
                    ));
                }
                Ok(CliResult::Success(lines.join("\n")))
            }
            Err(e) => Ok(CliResult::Error(e.to_string())),
        }
    }
}
