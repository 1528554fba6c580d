//! pypistats.org API adapter
//!
//! Download counts from https://pypistats.org/api/packages/{package}/{kind}.
//! Category endpoints return one row per category per day; rows are summed
//! per category.

use crate::domain::{
    CategoryDownloads, DownloadKind, DownloadStats, DownloadSummary, RecentDownloads,
};
use crate::error::RegistryError;
use crate::registry::{DownloadStatsSource, HttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// pypistats.org base URL
pub const PYPISTATS_URL: &str = "https://pypistats.org";

/// pypistats.org adapter
pub struct PyPIStatsAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RecentResponse {
    data: RecentData,
}

#[derive(Debug, Deserialize)]
struct RecentData {
    #[serde(default)]
    last_day: u64,
    #[serde(default)]
    last_week: u64,
    #[serde(default)]
    last_month: u64,
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    data: Vec<CategoryRow>,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    category: Option<String>,
    #[serde(default)]
    downloads: u64,
}

/// Sum rows per category, highest total first
fn sum_categories(rows: Vec<CategoryRow>) -> Vec<CategoryDownloads> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for row in rows {
        let category = row.category.unwrap_or_else(|| "null".to_string());
        *totals.entry(category).or_default() += row.downloads;
    }
    let mut out: Vec<CategoryDownloads> = totals
        .into_iter()
        .map(|(category, downloads)| CategoryDownloads::new(category, downloads))
        .collect();
    out.sort_by(|a, b| {
        b.downloads
            .cmp(&a.downloads)
            .then_with(|| a.category.cmp(&b.category))
    });
    out
}

impl PyPIStatsAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPISTATS_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, package: &str, kind: DownloadKind) -> String {
        format!(
            "{}/api/packages/{}/{}",
            self.base_url,
            package.to_ascii_lowercase(),
            kind.endpoint()
        )
    }
}

#[async_trait]
impl DownloadStatsSource for PyPIStatsAdapter {
    fn source_name(&self) -> &'static str {
        "pypistats"
    }

    async fn fetch_downloads(
        &self,
        package: &str,
        kind: DownloadKind,
    ) -> Result<DownloadStats, RegistryError> {
        let url = self.build_url(package, kind);
        match kind {
            DownloadKind::Recent => {
                let response: RecentResponse = self
                    .client
                    .get_json(&url, package, self.source_name())
                    .await?;
                Ok(DownloadStats::Recent(RecentDownloads {
                    last_day: response.data.last_day,
                    last_week: response.data.last_week,
                    last_month: response.data.last_month,
                }))
            }
            _ => {
                let response: CategoryResponse = self
                    .client
                    .get_json(&url, package, self.source_name())
                    .await?;
                Ok(DownloadStats::Categories(sum_categories(response.data)))
            }
        }
    }
}

/// Every statistic for `package`, fetched concurrently
pub async fn fetch_summary(
    source: &dyn DownloadStatsSource,
    package: &str,
) -> Result<DownloadSummary, RegistryError> {
    let (recent, overall, major, minor, system) = tokio::join!(
        source.fetch_downloads(package, DownloadKind::Recent),
        source.fetch_downloads(package, DownloadKind::Overall),
        source.fetch_downloads(package, DownloadKind::PythonMajor),
        source.fetch_downloads(package, DownloadKind::PythonMinor),
        source.fetch_downloads(package, DownloadKind::System),
    );

    let categories = |stats: DownloadStats| match stats {
        DownloadStats::Categories(rows) => rows,
        DownloadStats::Recent(_) => Vec::new(),
    };
    let recent = match recent? {
        DownloadStats::Recent(recent) => recent,
        DownloadStats::Categories(_) => RecentDownloads::default(),
    };

    Ok(DownloadSummary {
        recent,
        overall: categories(overall?),
        python_major: categories(major?),
        python_minor: categories(minor?),
        system: categories(system?),
    })
}
