//! Settings loaded from an optional TOML file
//!
//! ```toml
//! python_roots = ["/Library/Frameworks/Python.framework/Versions"]
//!
//! [registry]
//! pypi_url = "https://pypi.org"
//! timeout_secs = 30
//! github_token = "ghp_..."
//! ```
//!
//! Every key has a default; CLI flags and environment variables override
//! file values.

use crate::error::{ConfigError, RegistryError};
use crate::registry::{
    HttpClient, DEFAULT_USER_AGENT, GITHUB_API_URL, MAX_RETRIES, PYPISTATS_URL, PYPI_URL,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where interpreters are usually installed
pub const DEFAULT_PYTHON_ROOTS: [&str; 4] = [
    "/Library/Frameworks/Python.framework/Versions",
    "/opt/homebrew/Frameworks/Python.framework/Versions",
    "/usr/local/lib",
    "/usr/lib",
];

/// Application settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directories whose children are interpreter installs
    pub python_roots: Vec<PathBuf>,
    pub registry: RegistrySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            python_roots: DEFAULT_PYTHON_ROOTS.iter().map(PathBuf::from).collect(),
            registry: RegistrySettings::default(),
        }
    }
}

/// Remote source configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    pub pypi_url: String,
    pub github_api_url: String,
    pub pypistats_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub github_token: Option<String>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            pypi_url: PYPI_URL.to_string(),
            github_api_url: GITHUB_API_URL.to_string(),
            pypistats_url: PYPISTATS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: MAX_RETRIES,
            github_token: None,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text; `origin` is only used in error messages
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from `path`, or defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Replace the interpreter roots when any are given on the command line
    pub fn with_python_roots(mut self, roots: Vec<PathBuf>) -> Self {
        if !roots.is_empty() {
            self.python_roots = roots;
        }
        self
    }

    /// Fall back to a token from the environment when the file has none
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if self.registry.github_token.is_none() {
            self.registry.github_token = token.filter(|t| !t.trim().is_empty());
        }
        self
    }

    /// Override individual registry URLs
    pub fn with_registry_urls(
        mut self,
        pypi: Option<String>,
        github: Option<String>,
        pypistats: Option<String>,
    ) -> Self {
        if let Some(url) = pypi {
            self.registry.pypi_url = url;
        }
        if let Some(url) = github {
            self.registry.github_api_url = url;
        }
        if let Some(url) = pypistats {
            self.registry.pypistats_url = url;
        }
        self
    }
}

impl RegistrySettings {
    /// HTTP client for unauthenticated sources
    pub fn http_client(&self) -> Result<HttpClient, RegistryError> {
        Ok(
            HttpClient::with_config(Duration::from_secs(self.timeout_secs), DEFAULT_USER_AGENT)?
                .with_max_retries(self.max_retries),
        )
    }

    /// HTTP client carrying the GitHub token, if any
    pub fn github_client(&self) -> Result<HttpClient, RegistryError> {
        Ok(self.http_client()?.with_bearer_token(self.github_token.clone()))
    }
}
