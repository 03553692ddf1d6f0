//! Client configuration schema and loader.
//!
//! A `ClientConfig` is read from an optional TOML file, then environment
//! overrides are applied, then the result is validated. Every key is
//! optional:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//!
//! [query]
//! history_capacity = 5
//!
//! [guidelines]
//! max_results = 20
//!
//! [repository]
//! max_results = 50
//! bibliography_format = "bibtex"
//!
//! [logging]
//! tui_log_file = "cds-tui.log"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use cds_contracts::error::{CdsError, CdsResult};

/// Environment variable that overrides `[api] base_url`.
pub const API_URL_ENV: &str = "CDS_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySection {
    pub history_capacity: usize,
}

impl Default for QuerySection {
    fn default() -> Self {
        Self { history_capacity: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidelinesSection {
    pub max_results: u32,
}

impl Default for GuidelinesSection {
    fn default() -> Self {
        Self { max_results: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySection {
    pub max_results: u32,
    /// Passed to the export endpoint as-is.
    pub bibliography_format: String,
}

impl Default for RepositorySection {
    fn default() -> Self {
        Self {
            max_results: 50,
            bibliography_format: "bibtex".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Where the TUI writes its log, since stdout belongs to the screen.
    pub tui_log_file: PathBuf,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            tui_log_file: PathBuf::from("cds-tui.log"),
        }
    }
}

// ── ClientConfig ─────────────────────────────────────────────────────────────

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiSection,
    pub query: QuerySection,
    pub guidelines: GuidelinesSection,
    pub repository: RepositorySection,
    pub logging: LoggingSection,
}

impl ClientConfig {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `CdsError::Config` if the TOML is malformed, has the wrong
    /// shape, or fails validation.
    pub fn from_toml_str(s: &str) -> CdsResult<Self> {
        let config: ClientConfig = toml::from_str(s).map_err(|e| CdsError::Config {
            reason: format!("failed to parse client config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as client configuration.
    pub fn from_file(path: &Path) -> CdsResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CdsError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), "loaded client config");
        Ok(config)
    }

    /// Load `path` if given (defaults otherwise), then apply environment
    /// overrides from the process environment.
    pub fn resolve(path: Option<&Path>) -> CdsResult<Self> {
        Self::resolve_with(path, |key| std::env::var(key).ok())
    }

    /// `resolve` with an injectable environment lookup.
    pub fn resolve_with<F>(path: Option<&Path>, env: F) -> CdsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };

        if let Some(url) = env(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            debug!(env = API_URL_ENV, base_url = %url, "base URL overridden from environment");
            config.api.base_url = url.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL, e.g. from a command-line flag, and re-validate.
    pub fn with_base_url(mut self, url: impl Into<String>) -> CdsResult<Self> {
        self.api.base_url = url.into();
        self.validate()?;
        Ok(self)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> CdsResult<()> {
        validate_base_url(&self.api.base_url)?;

        if self.query.history_capacity == 0 {
            return Err(CdsError::Config {
                reason: "query.history_capacity must be at least 1".to_string(),
            });
        }
        if self.guidelines.max_results == 0 {
            return Err(CdsError::Config {
                reason: "guidelines.max_results must be at least 1".to_string(),
            });
        }
        if self.repository.max_results == 0 {
            return Err(CdsError::Config {
                reason: "repository.max_results must be at least 1".to_string(),
            });
        }
        if self.repository.bibliography_format.trim().is_empty() {
            return Err(CdsError::Config {
                reason: "repository.bibliography_format must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses the URL the same way the HTTP client will, so a config that
/// loads is one the client accepts.
fn validate_base_url(raw: &str) -> CdsResult<()> {
    let parsed = Url::parse(raw.trim()).map_err(|e| CdsError::Config {
        reason: format!("api.base_url '{}' is not a valid URL: {}", raw, e),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(CdsError::Config {
            reason: format!("api.base_url '{}' must be an http:// or https:// URL", raw),
        });
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.query.history_capacity, 5);
        assert_eq!(config.guidelines.max_results, 20);
        assert_eq!(config.repository.max_results, 50);
        assert_eq!(config.repository.bibliography_format, "bibtex");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml = r#"
            [api]
            base_url = "https://cds.example.org/api"

            [repository]
            bibliography_format = "ris"
        "#;
        let config = ClientConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://cds.example.org/api");
        assert_eq!(config.repository.bibliography_format, "ris");
        assert_eq!(config.repository.max_results, 50);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        match ClientConfig::from_toml_str("this is not valid toml ][[[") {
            Err(CdsError::Config { reason }) => {
                assert!(
                    reason.contains("failed to parse client config TOML"),
                    "unexpected reason: {reason}"
                );
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        for url in [
            "ftp://example.org",
            "localhost:8000",
            "http://",
            "https:// spaced",
            "http://localhost:99999",
            "http://[::1",
            "mailto:clinic@example.org",
        ] {
            let toml = format!("[api]\nbase_url = \"{}\"", url);
            let err = ClientConfig::from_toml_str(&toml).unwrap_err();
            assert!(err.to_string().contains("base_url"), "accepted {url}");
        }
    }

    #[test]
    fn base_url_with_port_and_path_is_accepted() {
        let config = ClientConfig::from_toml_str(
            "[api]\nbase_url = \"https://cds.example.org:8443/api/v1/\"",
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://cds.example.org:8443/api/v1/");
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = ClientConfig::from_toml_str("[query]\nhistory_capacity = 0").unwrap_err();
        assert!(err.to_string().contains("history_capacity"));

        let err = ClientConfig::from_toml_str("[guidelines]\nmax_results = 0").unwrap_err();
        assert!(err.to_string().contains("guidelines.max_results"));
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://from-file:9000\"").unwrap();

        let env: HashMap<&str, String> =
            HashMap::from([(API_URL_ENV, "http://from-env:8000".to_string())]);
        let config =
            ClientConfig::resolve_with(Some(file.path()), |k| env.get(k).cloned()).unwrap();
        assert_eq!(config.api.base_url, "http://from-env:8000");

        let config = ClientConfig::resolve_with(Some(file.path()), no_env).unwrap();
        assert_eq!(config.api.base_url, "http://from-file:9000");
    }

    #[test]
    fn file_with_unparseable_url_is_rejected_on_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://localhost:99999\"").unwrap();

        match ClientConfig::from_file(file.path()) {
            Err(CdsError::Config { reason }) => assert!(reason.contains("api.base_url")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn bad_environment_url_fails_validation() {
        let result = ClientConfig::resolve_with(None, |_| Some("not a url".to_string()));
        assert!(matches!(result, Err(CdsError::Config { .. })));
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = ClientConfig::from_file(Path::new("/definitely/not/here.toml"));
        match result {
            Err(CdsError::Config { reason }) => assert!(reason.contains("failed to read")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn with_base_url_revalidates() {
        let config = ClientConfig::default();
        assert!(config.clone().with_base_url("http://10.0.0.5:8000").is_ok());
        assert!(config.with_base_url("nonsense").is_err());
    }
}
