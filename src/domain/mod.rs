//! Core domain models for pkg-inspect
//!
//! This module contains the typed records passed between layers:
//! - Installed interpreters and distributions
//! - Distribution metadata parsed from METADATA/PKG-INFO
//! - Release history and project information from the package index
//! - Repository and download statistics
//! - Inventory differences between interpreters

mod inventory;
mod metadata;
mod project;
mod python;
mod release;
mod stats;

pub use inventory::{InventoryDiff, PackageDelta, PackageVersion};
pub use metadata::{MetadataKey, PackageMetadata};
pub use project::{ProjectInfo, RepositoryRef};
pub use python::{normalize_name, Distribution, PythonInstall};
pub use release::{Release, ReleaseHistory};
pub use stats::{
    CategoryDownloads, DownloadKind, DownloadStats, DownloadSummary, RecentDownloads,
    RepositoryStats,
};
