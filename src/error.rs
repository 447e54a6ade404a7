#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_error_creation() {
        let error = OllamactlError::InstallError("snap install failed".to_string());
        assert_eq!(error.to_string(), "Install error: snap install failed");
    }

    #[test]
    fn test_validation_error_creation() {
        let error = OllamactlError::ValidationError("prompt required".to_string());
        assert_eq!(error.to_string(), "Validation error: prompt required");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: OllamactlError = io_error.into();
        assert!(matches!(error, OllamactlError::IoError(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let invalid_toml = "invalid = [toml";
        let toml_error = toml::from_str::<toml::Value>(invalid_toml).unwrap_err();
        let error: OllamactlError = toml_error.into();
        assert!(matches!(error, OllamactlError::ConfigError(_)));
    }

    #[test]
    fn test_error_blocks_lifecycle() {
        let install = OllamactlError::InstallError("test".to_string());
        assert!(install.blocks_lifecycle());

        let validation = OllamactlError::ValidationError("test".to_string());
        assert!(!validation.blocks_lifecycle());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            OllamactlError::UpstreamError("x".to_string()).error_code(),
            "UPSTREAM_ERROR"
        );
        assert_eq!(
            OllamactlError::NotFoundError("x".to_string()).error_code(),
            "NOT_FOUND"
        );
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OllamactlError {
    #[error("Install error: {0}")]
    InstallError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Precondition error: {0}")]
    PreconditionError(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<toml::de::Error> for OllamactlError {
    fn from(error: toml::de::Error) -> Self {
        OllamactlError::ConfigError(error.to_string())
    }
}

impl From<reqwest::Error> for OllamactlError {
    fn from(error: reqwest::Error) -> Self {
        OllamactlError::UpstreamError(error.to_string())
    }
}

impl OllamactlError {
    /// Whether this error leaves the lifecycle in a blocked status.
    ///
    /// Action-level failures (validation, model resolution, daemon errors) are
    /// local to a single invocation and never change the lifecycle status.
    pub fn blocks_lifecycle(&self) -> bool {
        matches!(
            self,
            OllamactlError::InstallError(_)
                | OllamactlError::ConfigError(_)
                | OllamactlError::NetworkError(_)
                | OllamactlError::IoError(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OllamactlError::InstallError(_) => "INSTALL_ERROR",
            OllamactlError::ConfigError(_) => "CONFIG_ERROR",
            OllamactlError::NetworkError(_) => "NETWORK_ERROR",
            OllamactlError::ValidationError(_) => "VALIDATION_ERROR",
            OllamactlError::NotFoundError(_) => "NOT_FOUND",
            OllamactlError::PreconditionError(_) => "PRECONDITION_ERROR",
            OllamactlError::UpstreamError(_) => "UPSTREAM_ERROR",
            OllamactlError::IoError(_) => "IO_ERROR",
            OllamactlError::JsonError(_) => "JSON_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, OllamactlError>;
