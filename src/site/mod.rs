//! Local inspection of installed Python environments
//!
//! - `scanner`: interpreter discovery and dist-info enumeration
//! - `record`: RECORD parsing and installed size
//! - `source`: top-level module source and docstrings

pub mod record;
pub mod scanner;
pub mod source;

pub use scanner::SiteScanner;

use crate::error::SiteError;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// When `path` was installed: creation time, or modification time where
/// the filesystem does not record creation
pub fn installed_at(path: &Path) -> Result<DateTime<Utc>, SiteError> {
    let meta = fs::metadata(path).map_err(|e| SiteError::io(path, e))?;
    let time = meta
        .created()
        .or_else(|_| meta.modified())
        .map_err(|e| SiteError::io(path, e))?;
    Ok(DateTime::<Utc>::from(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_installed_at() {
        let dir = TempDir::new().unwrap();
        let before = Utc::now() - chrono::Duration::seconds(5);
        let at = installed_at(dir.path()).unwrap();
        assert!(at >= before);
        assert!(at <= Utc::now() + chrono::Duration::seconds(5));
    }

    #[test]
    fn test_installed_at_missing() {
        let dir = TempDir::new().unwrap();
        let err = installed_at(&dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, SiteError::Io { .. }));
    }
}
