//! Integration tests for pkg-inspect
//!
//! These tests verify:
//! - Interpreter and distribution discovery on a fake install tree
//! - Field resolution backed by mocked PyPI, GitHub and pypistats servers
//! - Update resolution and interpreter comparisons end to end

use mockito::{Matcher, Server, ServerGuard};
use pkg_inspect::config::Settings;
use pkg_inspect::domain::DownloadStats;
use pkg_inspect::error::{InspectError, RegistryError};
use pkg_inspect::inspect::{Field, FieldValue, Inspector};
use pkg_inspect::version::{parse, UpdateFilter, UpdateOrder};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

const REQUESTS_JSON: &str = r#"{
    "info": {
        "name": "requests",
        "version": "2.31.0",
        "summary": "Python HTTP for Humans.",
        "home_page": "https://requests.readthedocs.io",
        "package_url": "https://pypi.org/project/requests/",
        "project_urls": {
            "Documentation": "https://requests.readthedocs.io",
            "Source": "https://github.com/psf/requests"
        }
    },
    "releases": {
        "2.27.1": [{"upload_time_iso_8601": "2022-01-05T15:40:51.698Z", "yanked": false}],
        "2.28.0": [{"upload_time_iso_8601": "2022-06-09T14:44:34.012Z", "yanked": false}],
        "2.29.0": [{"upload_time_iso_8601": "2023-04-26T15:01:39.581Z", "yanked": true}],
        "2.30.0": [{"upload_time_iso_8601": "2023-05-03T15:30:28.221Z", "yanked": false}],
        "2.31.0": [{"upload_time_iso_8601": "2023-05-22T15:12:44.175Z", "yanked": false}],
        "3.0.0a1": [{"upload_time_iso_8601": "2023-06-01T10:00:00.000Z", "yanked": false}],
        "": []
    }
}"#;

/// Install `name==version` into `python` under `root`
fn install(root: &Path, python: &str, name: &str, version: &str) -> PathBuf {
    let site = root.join(python).join(format!("lib/python{}/site-packages", python));
    let dist_info = site.join(format!("{}-{}.dist-info", name, version));
    fs::create_dir_all(&dist_info).unwrap();
    fs::write(
        dist_info.join("METADATA"),
        format!(
            "Metadata-Version: 2.1\nName: {}\nVersion: {}\nSummary: The {} package\nLicense: Apache 2.0\n\nLong description.\n",
            name, version, name
        ),
    )
    .unwrap();
    fs::write(
        dist_info.join("RECORD"),
        format!(
            "{0}/__init__.py,sha256=abc,1000\n{0}/api.py,sha256=def,1048\n{0}-{1}.dist-info/RECORD,,\n",
            name, version
        ),
    )
    .unwrap();
    fs::write(dist_info.join("top_level.txt"), format!("{}\n", name)).unwrap();

    let package = site.join(name);
    fs::create_dir_all(&package).unwrap();
    fs::write(
        package.join("__init__.py"),
        format!("# -*- coding: utf-8 -*-\n\"\"\"\n{} library.\n\nMore words.\n\"\"\"\n\n__version__ = \"{}\"\n", name, version),
    )
    .unwrap();
    site
}

fn fixture() -> TempDir {
    let root = TempDir::new().unwrap();
    install(root.path(), "3.11", "requests", "2.28.0");
    install(root.path(), "3.11", "six", "1.16.0");
    install(root.path(), "3.12", "requests", "2.31.0");
    install(root.path(), "3.12", "idna", "3.7");
    root
}

fn inspector(root: &TempDir, server: &ServerGuard) -> Inspector {
    let mut settings = Settings::default()
        .with_python_roots(vec![root.path().to_path_buf()])
        .with_registry_urls(Some(server.url()), Some(server.url()), Some(server.url()));
    settings.registry.max_retries = 0;
    Inspector::from_settings(&settings).unwrap()
}

async fn mock_requests(server: &mut ServerGuard, hits: usize) -> mockito::Mock {
    server
        .mock("GET", "/pypi/requests/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REQUESTS_JSON)
        .expect(hits)
        .create_async()
        .await
}

mod local {
    use super::*;

    #[tokio::test]
    async fn test_local_fields() {
        let root = fixture();
        let server = Server::new_async().await;
        let inspector = inspector(&root, &server);

        let value = inspector
            .inspect("requests", &Field::parse("total_size"), Some("3.11"))
            .await
            .unwrap();
        assert_eq!(value, FieldValue::Bytes(2048));
        assert_eq!(value.to_string(), "2.00 KB");

        let value = inspector
            .inspect("requests", &Field::parse("doc"), Some("3.11"))
            .await
            .unwrap();
        assert_eq!(value.to_string(), "requests library.\n\nMore words.");

        let value = inspector
            .inspect("requests", &Field::parse("short_license"), None)
            .await
            .unwrap();
        assert_eq!(value, FieldValue::Text("Apache 2.0".to_string()));

        let value = inspector
            .inspect("requests", &Field::parse("top_level"), None)
            .await
            .unwrap();
        assert_eq!(value.to_string().trim(), "requests");
    }

    #[tokio::test]
    async fn test_source_file_points_into_site() {
        let root = fixture();
        let server = Server::new_async().await;
        let value = inspector(&root, &server)
            .inspect("six", &Field::SourceFile, Some("3.11"))
            .await
            .unwrap();
        match value {
            FieldValue::Path(path) => assert!(path.ends_with("six/__init__.py")),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_installed_local_field() {
        let root = fixture();
        let server = Server::new_async().await;
        let err = inspector(&root, &server)
            .inspect("six", &Field::InstalledVersion, Some("3.12"))
            .await
            .unwrap_err();
        assert!(err.is_not_installed());
        assert!(err.to_string().contains("not installed for python 3.12"));
    }

    #[test]
    fn test_compare_and_diff() {
        let root = fixture();
        let server = Server::new();
        let inspector = inspector(&root, &server);

        let comparison = inspector.compare_package("Requests", "3.11", "python3.12").unwrap();
        assert_eq!(comparison.newer_in_target, vec![parse("2.31.0")]);
        assert!(!comparison.is_identical());

        let diff = inspector.diff("3.12", "3.11").unwrap();
        assert_eq!(diff.source, "3.12");
        assert_eq!(diff.only_in_source[0].name, "idna");
        assert_eq!(diff.only_in_target[0].name, "six");
        assert_eq!(diff.changed[0].comparison.newer_in_source, vec![parse("2.31.0")]);
    }
}

mod remote {
    use super::*;

    #[tokio::test]
    async fn test_version_fields() {
        let root = fixture();
        let mut server = Server::new_async().await;
        let mock = mock_requests(&mut server, 4).await;
        let inspector = inspector(&root, &server);

        let value = inspector
            .inspect("requests", &Field::AvailableUpdates, Some("3.11"))
            .await
            .unwrap();
        // 2.29.0 is yanked, 3.0.0a1 is a pre-release
        assert_eq!(value, FieldValue::Versions(vec![parse("2.30.0"), parse("2.31.0")]));

        let value = inspector
            .inspect("requests", &Field::IsLatest, Some("3.12"))
            .await
            .unwrap();
        assert_eq!(value, FieldValue::Bool(true));

        let value = inspector
            .inspect("requests", &Field::InitialVersion, None)
            .await
            .unwrap();
        assert_eq!(value, FieldValue::Version(parse("2.27.1")));

        // the blank release key is dropped
        let value = inspector.pypi("requests", &Field::TotalVersions).await.unwrap();
        assert_eq!(value, FieldValue::Count(6));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_uninstalled_package_answers_remote_fields() {
        let root = fixture();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/flask/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"info": {"name": "Flask", "version": "3.0.3", "package_url": null},
                    "releases": {"3.0.2": [], "3.0.3": []}}"#,
            )
            .create_async()
            .await;

        let value = inspector(&root, &server)
            .inspect("flask", &Field::parse("package_url"), None)
            .await
            .unwrap();
        assert_eq!(value.to_string(), "https://pypi.org/project/Flask/");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_repository_stats_via_project_urls() {
        let root = fixture();
        let mut server = Server::new_async().await;
        let pypi = mock_requests(&mut server, 1).await;
        let github = server
            .mock("GET", "/repos/psf/requests")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"full_name": "psf/requests", "stargazers_count": 52000,
                    "forks_count": 9300, "subscribers_count": 1300,
                    "open_issues_count": 250, "size": 2, "default_branch": "main",
                    "license": {"spdx_id": "Apache-2.0", "name": "Apache License 2.0"}}"#,
            )
            .create_async()
            .await;

        let value = inspector(&root, &server)
            .inspect("requests", &Field::parse("github_stats"), None)
            .await
            .unwrap();
        let FieldValue::Repository(stats) = value else {
            panic!("expected repository stats");
        };
        assert_eq!(stats.full_name, "psf/requests");
        assert_eq!(stats.stars, 52000);
        assert_eq!(stats.size_bytes, 2048);

        pypi.assert_async().await;
        github.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_summary() {
        let root = fixture();
        let mut server = Server::new_async().await;
        let recent = server
            .mock("GET", "/api/packages/requests/recent")
            .with_status(200)
            .with_body(r#"{"data": {"last_day": 10, "last_week": 70, "last_month": 300}, "package": "requests", "type": "recent_downloads"}"#)
            .create_async()
            .await;
        let categories = server
            .mock(
                "GET",
                Matcher::Regex(r"^/api/packages/requests/(overall|python_major|python_minor|system)$".to_string()),
            )
            .with_status(200)
            .with_body(
                r#"{"data": [
                    {"category": "Linux", "date": "2024-06-01", "downloads": 5},
                    {"category": "Darwin", "date": "2024-06-01", "downloads": 2},
                    {"category": "Linux", "date": "2024-06-02", "downloads": 4},
                    {"category": null, "date": "2024-06-02", "downloads": 1}
                ]}"#,
            )
            .expect(4)
            .create_async()
            .await;

        let value = inspector(&root, &server)
            .inspect("Requests", &Field::parse("all_pypi_stats"), None)
            .await
            .unwrap();
        let FieldValue::DownloadSummary(summary) = value else {
            panic!("expected a download summary");
        };
        assert_eq!(summary.recent.last_month, 300);
        assert_eq!(summary.system[0].category, "Linux");
        assert_eq!(summary.system[0].downloads, 9);
        assert_eq!(summary.system.last().map(|c| c.category.as_str()), Some("null"));

        recent.assert_async().await;
        categories.assert_async().await;
    }

    #[tokio::test]
    async fn test_single_download_stat() {
        let root = fixture();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/packages/six/recent")
            .with_status(200)
            .with_body(r#"{"data": {"last_day": 1, "last_week": 2, "last_month": 3}}"#)
            .create_async()
            .await;

        let value = inspector(&root, &server)
            .pypi("six", &Field::parse("stats-recent"))
            .await
            .unwrap();
        assert!(matches!(value, FieldValue::Downloads(DownloadStats::Recent(ref r)) if r.last_week == 2));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_updates() {
        let root = fixture();
        let mut server = Server::new_async().await;
        let mock = mock_requests(&mut server, 3).await;
        let inspector = inspector(&root, &server);

        // the newest interpreter already has 2.31.0
        let updates = inspector
            .updates("requests", None, &UpdateFilter::new())
            .await
            .unwrap();
        assert!(updates.is_empty());

        let updates = inspector
            .updates(
                "requests",
                Some("2.27.1"),
                &UpdateFilter::new()
                    .with_yanked(true)
                    .with_prereleases(true)
                    .with_order(UpdateOrder::Descending),
            )
            .await
            .unwrap();
        let versions: Vec<&str> = updates.versions().iter().map(|v| v.raw()).collect();
        assert_eq!(versions, vec!["3.0.0a1", "2.31.0", "2.30.0", "2.29.0", "2.28.0"]);
        assert_eq!(updates.newest(), Some(&parse("3.0.0a1")));

        // every release is years old, so a short cooldown changes nothing
        let updates = inspector
            .updates(
                "requests",
                Some("2.30.0"),
                &UpdateFilter::new().with_min_age(Duration::from_secs(14 * 86400)),
            )
            .await
            .unwrap();
        assert_eq!(updates.versions(), &[parse("2.31.0")]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_package() {
        let root = fixture();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/pypi/nope/json")
            .with_status(404)
            .create_async()
            .await;

        let err = inspector(&root, &server)
            .pypi("nope", &Field::LatestVersion)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InspectError::Registry(RegistryError::PackageNotFound { .. })
        ));
    }
}
