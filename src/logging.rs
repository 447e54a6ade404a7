use crate::config::GlobalConfig;
use crate::error::{OllamactlError, Result};
use std::path::PathBuf;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*, registry::Registry};

static LOGGER_INIT: Once = Once::new();

/// Initialize tracing for the CLI process. Logs go to stdout, and to a file
/// under the ollamactl home directory when file logging is enabled.
pub fn init_cli_logging(config: &GlobalConfig) -> Result<()> {
    let mut init_result = Ok(());

    LOGGER_INIT.call_once(|| {
        init_result = init_logging_internal(config);
    });

    init_result
}

fn init_logging_internal(config: &GlobalConfig) -> Result<()> {
    let log_level = config.logging.level.to_lowercase();

    let log_dir = if config.logging.file_enabled {
        let dir = match &config.logging.file_path {
            Some(path) => PathBuf::from(path),
            None => crate::config::get_config_dir()?.join("logs"),
        };
        std::fs::create_dir_all(&dir).map_err(|e| {
            OllamactlError::ConfigError(format!("Failed to create log directory: {e}"))
        })?;
        Some(dir)
    } else {
        None
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .map_err(|e| OllamactlError::ConfigError(format!("Invalid log level '{log_level}': {e}")))?;

    let registry = Registry::default().with(filter);

    // Results go to stdout, so logs stay on stderr
    if let Some(ref dir) = log_dir {
        let file_appender = tracing_appender::rolling::never(dir, "ollamactl.log");
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true);

        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        registry.with(file_layer).with(stderr_layer).init();
    } else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        registry.with(stderr_layer).init();
    }

    debug!("Logging initialized with level: {log_level}");
    if let Some(dir) = log_dir {
        info!("Log file: {}", dir.join("ollamactl.log").display());
    }

    Ok(())
}
