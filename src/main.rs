use clap::Parser;
use ollamactl::cli::{CliArgs, CliHandler, CliResult};
use ollamactl::config::GlobalConfig;
use ollamactl::logging;
use std::process;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let mut config = match GlobalConfig::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load configuration, using defaults: {e}");
            GlobalConfig::default()
        }
    };

    if args.verbose {
        config.logging.level = "debug".to_string();
    }

    if let Err(e) = logging::init_cli_logging(&config) {
        eprintln!("Warning: Failed to initialize logging: {e}");
    }

    let handler = match CliHandler::new(config) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let result = match handler.handle_command(args.command).await {
        Ok(result) => result,
        Err(e) => CliResult::Error(format!("Failed to execute command: {e}")),
    };

    match result {
        CliResult::Success(msg) => {
            println!("{msg}");
            process::exit(0);
        }
        CliResult::Error(msg) => {
            eprintln!("{msg}");
            process::exit(1);
        }
    }
}
