//! Configuration for the Tempero client

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use tempero_core::pagination::DEFAULT_PAGE_SIZE;

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub view: ViewSection,
}

/// Backend connection
#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    /// Base URL of the REST backend, e.g. http://localhost:8080
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// List display settings
#[derive(Debug, Default, Deserialize)]
pub struct ViewSection {
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Category labels offered by the shop
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| {
            "Failed to parse config.toml. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Incorrect data types (api.timeout_secs and view.page_size are numbers)\n\n\
             See config.toml.example for the expected format."
        })
    }

    /// Load the file if it exists, otherwise start from defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Resolved settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL without a trailing slash
    pub api_url: String,
    pub timeout: Duration,
    pub page_size: usize,
    pub categories: Vec<String>,
}

impl Config {
    /// Resolve file settings, with `api_url` from the command line taking precedence
    pub fn from_file(file_config: &FileConfig, api_url: Option<String>) -> Result<Self> {
        let api_url = api_url
            .or_else(|| file_config.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().trim_end_matches('/').to_string();

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            anyhow::bail!("Invalid backend URL '{}': expected http:// or https://", api_url);
        }

        let page_size = file_config.view.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            anyhow::bail!("view.page_size must be at least 1");
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(file_config.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            page_size,
            categories: file_config.view.categories.clone().unwrap_or_else(default_categories),
        })
    }

    /// Whether `category` is one of the configured labels (case-insensitive)
    pub fn knows_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(category.trim()))
    }
}

fn default_categories() -> Vec<String> {
    ["Carnes", "Temperos", "Bebidas", "Frios", "Doces"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::from_file(&FileConfig::default(), None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, 15);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.knows_category("temperos"));
    }

    #[test]
    fn test_command_line_url_wins() {
        let file: FileConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://shop.local:8080/"
            "#,
        )
        .unwrap();

        let from_file = Config::from_file(&file, None).unwrap();
        assert_eq!(from_file.api_url, "http://shop.local:8080");

        let overridden = Config::from_file(&file, Some("https://api.example.com".to_string())).unwrap();
        assert_eq!(overridden.api_url, "https://api.example.com");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_file(&FileConfig::default(), Some("localhost:8080".to_string())).is_err());

        let file: FileConfig = toml::from_str("[view]\npage_size = 0\n").unwrap();
        assert!(Config::from_file(&file, None).is_err());
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "http://10.0.0.5:8080"
timeout_secs = 5

[view]
page_size = 20
categories = ["Temperos", "Grãos"]
"#
        )
        .unwrap();

        let file_config = FileConfig::load(file.path()).unwrap();
        let config = Config::from_file(&file_config, None).unwrap();
        assert_eq!(config.api_url, "http://10.0.0.5:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.page_size, 20);
        assert!(config.knows_category("GRÃOS") || config.knows_category("Grãos"));
        assert!(!config.knows_category("Carnes"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file_config = FileConfig::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert!(file_config.api.base_url.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[view]\npage_size = \"many\"").unwrap();
        assert!(FileConfig::load(file.path()).is_err());
    }
}
