//! Client configuration loading.
//!
//! Settings are read from `config.toml` in the platform config directory
//! (e.g. `~/.config/form-upload/config.toml` on Linux). A missing file yields
//! the defaults; `FORM_UPLOAD_SERVER` overrides the server URL.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use reqwest::Url;
use serde::Deserialize;

use crate::{FormError, Result};

/// File service the form talks to when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Environment variable overriding `server_url`.
pub const SERVER_URL_ENV: &str = "FORM_UPLOAD_SERVER";

const CONFIG_FILE: &str = "config.toml";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the file service (upload/search/download live beneath it)
    pub server_url: String,
    /// Data directory for logs
    pub data_dir: PathBuf,
    /// Optional per-request timeout. Requests never time out when unset.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("form-upload"));

        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            data_dir,
            request_timeout_secs: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "form-upload")
}

impl ClientConfig {
    /// Load configuration from the platform config file, then apply the
    /// environment override.
    pub fn load() -> Self {
        let mut config = match project_dirs() {
            Some(dirs) => Self::load_from(&dirs.config_dir().join(CONFIG_FILE)),
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                config.server_url = url.to_string();
            }
        }

        config
    }

    /// Load configuration from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text).unwrap_or_else(|e| {
                tracing::warn!("Ignoring {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FormError::Config(format!("Invalid config: {}", e)))
    }

    /// The server URL as a base for joining endpoint paths.
    ///
    /// The path always ends with `/` so that `http://host/api` keeps its
    /// `api` prefix. Query and fragment are dropped.
    ///
    /// # Errors
    /// Returns `FormError::Config` if the URL does not parse or is not http(s).
    pub fn server_url(&self) -> Result<Url> {
        let raw = self.server_url.trim();
        let mut url = Url::parse(raw)
            .map_err(|e| FormError::Config(format!("Invalid server URL '{}': {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FormError::Config(format!(
                "Unsupported scheme '{}' in server URL '{}'",
                url.scheme(),
                raw
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(url)
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.request_timeout_secs, None);
        assert!(config.log_dir().ends_with("logs"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str("server_url = \"http://files.local:9000\"\n").unwrap();
        assert_eq!(config.server_url, "http://files.local:9000");
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.data_dir, ClientConfig::default().data_dir);
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
            server_url = "https://forms.example.com/api"
            data_dir = "/var/lib/form-upload"
            request_timeout_secs = 30
        "#;
        let config = ClientConfig::from_toml_str(text).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/form-upload"));
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_invalid_toml() {
        let err = ClientConfig::from_toml_str("server_url = ").unwrap_err();
        assert!(matches!(err, FormError::Config(_)));
    }

    #[test]
    fn test_server_url_gets_trailing_slash() {
        let mut config = ClientConfig::default();
        assert_eq!(config.server_url().unwrap().as_str(), "http://localhost:8000/");

        config.server_url = "https://forms.example.com/api?x=1#top".to_string();
        assert_eq!(config.server_url().unwrap().as_str(), "https://forms.example.com/api/");
    }

    #[test]
    fn test_server_url_rejects_other_schemes() {
        let mut config = ClientConfig::default();
        config.server_url = "ftp://files.local".to_string();
        assert!(matches!(config.server_url(), Err(FormError::Config(_))));

        config.server_url = "not a url".to_string();
        assert!(matches!(config.server_url(), Err(FormError::Config(_))));
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("form-upload-test-missing").join("config.toml");
        assert_eq!(ClientConfig::load_from(&path), ClientConfig::default());
    }

    #[test]
    fn test_load_from_broken_file_falls_back() {
        let dir = std::env::temp_dir().join(format!("form-upload-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "request_timeout_secs = \"soon\"").unwrap();

        assert_eq!(ClientConfig::load_from(&path), ClientConfig::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
