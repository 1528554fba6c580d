//! Application error types using thiserror
//!
//! Error hierarchy:
//! - RegistryError: Issues with PyPI, GitHub or pypistats communication
//! - SiteError: Issues locating interpreters, distributions and their files
//! - ConfigError: Issues with CLI options and the configuration file
//! - InspectError: Issues resolving a field for a package

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Remote source related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Local installation related errors
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Field resolution errors
    #[error(transparent)]
    Inspect(#[from] InspectError),
}

/// Errors related to remote source communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry}")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Authentication error
    #[error("authentication failed for {registry}: {message}")]
    AuthenticationError { registry: String, message: String },

    /// The package does not link a GitHub repository
    #[error("package '{package}' has no GitHub repository link")]
    NoRepository { package: String },
}

/// Errors related to local interpreters and distributions
#[derive(Error, Debug)]
pub enum SiteError {
    /// No interpreter matches the requested version
    #[error("python {version} not found (available: {available})")]
    PythonNotFound { version: String, available: String },

    /// The package is not installed for the interpreter
    #[error("package '{package}' is not installed for python {python}")]
    PackageNotFound { package: String, python: String },

    /// No file matches inside the distribution's metadata directory
    #[error("file '{name}' not found for package '{package}'")]
    FileNotFound { package: String, name: String },

    /// Filesystem failure
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '2w', '10d', '1m'")]
    InvalidDuration { value: String },

    /// Invalid comparison operator
    #[error("invalid operator '{value}': expected one of <, <=, ==, !=, >=, > (or lt, le, eq, ne, ge, gt)")]
    InvalidOperator { value: String },

    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the settings schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to field resolution
#[derive(Error, Debug)]
pub enum InspectError {
    /// Local lookup failed
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Remote lookup failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The field has no value for this package
    #[error("'{field}' is not available for package '{package}'")]
    Unavailable { package: String, field: String },

    /// The field needs a local installation that does not exist
    #[error("'{field}' requires '{package}' to be installed locally")]
    RequiresInstall { package: String, field: String },

    /// Comparing an interpreter against itself
    #[error("source and target python are the same ({version})")]
    SamePython { version: String },

    /// No interpreter found on any configured root
    #[error("no python installations found under {roots}")]
    NoPythons { roots: String },
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// True for 404-style failures
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::PackageNotFound { .. } | RegistryError::NoRepository { .. }
        )
    }
}

impl SiteError {
    /// Creates a new PythonNotFound error listing the available versions
    pub fn python_not_found(version: impl Into<String>, available: &[String]) -> Self {
        let available = if available.is_empty() {
            "none".to_string()
        } else {
            available.join(", ")
        };
        SiteError::PythonNotFound {
            version: version.into(),
            available,
        }
    }

    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, python: impl Into<String>) -> Self {
        SiteError::PackageNotFound {
            package: package.into(),
            python: python.into(),
        }
    }

    /// Creates a new FileNotFound error
    pub fn file_not_found(package: impl Into<String>, name: impl Into<String>) -> Self {
        SiteError::FileNotFound {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Creates a new Io error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteError::Io {
            path: path.into(),
            source,
        }
    }
}

impl InspectError {
    /// Creates a new Unavailable error
    pub fn unavailable(package: impl Into<String>, field: impl Into<String>) -> Self {
        InspectError::Unavailable {
            package: package.into(),
            field: field.into(),
        }
    }

    /// Creates a new RequiresInstall error
    pub fn requires_install(package: impl Into<String>, field: impl Into<String>) -> Self {
        InspectError::RequiresInstall {
            package: package.into(),
            field: field.into(),
        }
    }

    /// True when the package is missing locally, so a remote-only answer may still work
    pub fn is_not_installed(&self) -> bool {
        matches!(
            self,
            InspectError::Site(SiteError::PackageNotFound { .. })
                | InspectError::RequiresInstall { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("package 'nonexistent-package' not found"));
        assert!(msg.contains("PyPI"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("requests", "PyPI", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_registry_error_rate_limit() {
        let err = RegistryError::rate_limit_exceeded("GitHub");
        assert!(err.to_string().contains("rate limit exceeded for GitHub"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("flask", "pypistats");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("flask"));
    }

    #[test]
    fn test_site_error_python_not_found() {
        let err = SiteError::python_not_found("3.9", &["3.11".to_string(), "3.12".to_string()]);
        assert_eq!(err.to_string(), "python 3.9 not found (available: 3.11, 3.12)");

        let none = SiteError::python_not_found("3.9", &[]);
        assert!(none.to_string().contains("available: none"));
    }

    #[test]
    fn test_site_error_package_not_found() {
        let err = SiteError::package_not_found("numpy", "3.12");
        assert_eq!(err.to_string(), "package 'numpy' is not installed for python 3.12");
    }

    #[test]
    fn test_config_error_invalid_duration() {
        let err = ConfigError::InvalidDuration {
            value: "abc".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("invalid duration format"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_inspect_error_not_installed() {
        let err: InspectError = SiteError::package_not_found("x", "3.12").into();
        assert!(err.is_not_installed());
        assert!(InspectError::requires_install("x", "doc").is_not_installed());
        assert!(!InspectError::unavailable("x", "doc").is_not_installed());
    }

    #[test]
    fn test_inspect_error_same_python() {
        let err = InspectError::SamePython {
            version: "3.12".to_string(),
        };
        assert!(err.to_string().contains("same (3.12)"));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let app_err: AppError = RegistryError::package_not_found("pkg", "PyPI").into();
        assert!(app_err.to_string().contains("package 'pkg' not found"));
    }

    #[test]
    fn test_app_error_from_site_error() {
        let app_err: AppError = SiteError::file_not_found("pkg", "RECORD").into();
        assert!(app_err.to_string().contains("file 'RECORD' not found"));
    }

    #[test]
    fn test_app_error_from_inspect_error() {
        let inner: InspectError = RegistryError::timeout("pkg", "PyPI").into();
        let app_err: AppError = inner.into();
        assert!(app_err.to_string().contains("timeout while fetching 'pkg'"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = SiteError::file_not_found("pkg", "RECORD");
        let debug = format!("{:?}", err);
        assert!(debug.contains("FileNotFound"));
    }
}
