#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LISTING: &str =
        "NAME\tID\tSIZE\tMODIFIED\nllama3:8b\ta6990ed6be41\t4.7 GB\t2 days ago\nmistral:latest\t61e88e884507\t4.1 GB\t3 weeks ago\n";

    #[test]
    fn test_parse_returns_rows_in_order() {
        let models = parse(SAMPLE_LISTING);

        assert_eq!(models.len(), 2);
        assert_eq!(
            models[0],
            PulledModel {
                name: "llama3:8b".to_string(),
                id: "a6990ed6be41".to_string(),
                size: "4.7 GB".to_string(),
                modified: "2 days ago".to_string(),
            }
        );
        assert_eq!(models[1].name, "mistral:latest");
    }

    #[test]
    fn test_parse_trims_padded_fields() {
        let raw = "NAME \tID \tSIZE \tMODIFIED \nllama3:8b  \ta6990ed6be41\t  4.7 GB\t2 days ago\n";
        let models = parse(raw);

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "llama3:8b");
        assert_eq!(models[0].size, "4.7 GB");
    }

    #[test]
    fn test_parse_drops_malformed_rows_without_shifting() {
        let raw = "NAME\tID\tSIZE\tMODIFIED\n\
                   llama3:8b\ta6990ed6be41\t4.7 GB\t2 days ago\n\
                   truncated-row\tdeadbeef\n\
                   mistral:latest\t61e88e884507\t4.1 GB\t3 weeks ago\n";
        let models = parse(raw);

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "llama3:8b");
        assert_eq!(models[1].name, "mistral:latest");
    }

    #[test]
    fn test_parse_ignores_trailing_delimiters() {
        let raw = "NAME\tID\tSIZE\tMODIFIED\t\nllama3:8b\ta6990ed6be41\t4.7 GB\t2 days ago\t\n";
        let models = parse(raw);

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].modified, "2 days ago");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_header_only() {
        assert!(parse("NAME\tID\tSIZE\tMODIFIED\n").is_empty());
    }

    #[test]
    fn test_strip_channel() {
        assert_eq!(strip_channel("llama3:8b"), "llama3");
        assert_eq!(strip_channel("llama3"), "llama3");
        assert_eq!(strip_channel("mistral:latest"), "mistral");
    }
}

use crate::error::{OllamactlError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

/// A model present in the daemon's local store, as reported by its
/// tabular listing. Reconstructed on every query; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulledModel {
    pub name: String,
    pub id: String,
    pub size: String,
    pub modified: String,
}

/// Number of columns in the daemon's listing output.
const LISTING_COLUMNS: usize = 4;

/// Parse the daemon's tab-delimited model listing into structured records.
///
/// The first line is a header; each remaining line maps positionally to
/// (name, id, size, modified). Rows whose column count does not match the
/// header are dropped, so a truncated row never shifts later rows.
pub fn parse(raw: &str) -> Vec<PulledModel> {
    let mut lines = raw.lines().map(split_fields);

    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let expected = header.len();
    if expected < LISTING_COLUMNS {
        debug!("Model listing header has {} columns, expected {}", expected, LISTING_COLUMNS);
        return Vec::new();
    }

    lines
        .filter(|fields| fields.len() == expected)
        .map(|mut fields| {
            let modified = fields.remove(3);
            let size = fields.remove(2);
            let id = fields.remove(1);
            let name = fields.remove(0);
            PulledModel {
                name,
                id,
                size,
                modified,
            }
        })
        .collect()
}

fn split_fields(line: &str) -> Vec<String> {
    line.split('\t')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip the channel suffix (the `:tag` release variant) from a model name.
pub fn strip_channel(name: &str) -> &str {
    name.split(':').next().unwrap_or(name)
}

/// Obtains the daemon's raw model listing text.
///
/// Abstracted so the action gateway can be tested against canned listings
/// without a daemon present.
#[async_trait]
pub trait ModelLister: Send + Sync {
    async fn list_raw(&self) -> Result<String>;
}

/// Lists models by invoking the daemon's CLI.
pub struct OllamaCliLister;

#[async_trait]
impl ModelLister for OllamaCliLister {
    async fn list_raw(&self) -> Result<String> {
        let output = Command::new("ollama").arg("list").output().await?;

        if !output.status.success() {
            return Err(OllamactlError::UpstreamError(format!(
                "ollama list failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
