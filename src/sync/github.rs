// psqlsync/src/sync/github.rs
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{Result, SyncError};

pub const GITHUB_API: &str = "https://api.github.com";

/// Somewhere backup artifacts can be pulled from into a local directory.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Downloads every artifact into `target_dir`.
    ///
    /// With `overwrite` the directory is emptied first; without it files that are
    /// already present are kept and not downloaded again.
    async fn fetch_all(&self, target_dir: &Path, overwrite: bool) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
}

/// Parses a GitHub contents API listing of a directory.
pub fn parse_listing(body: &str) -> Result<Vec<ContentEntry>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Err(SyncError::Config(
            "Expected a directory listing from the GitHub contents API, got a single entry. Check --repo-dir".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Prepares `target_dir` according to the overwrite flag.
pub async fn prepare_target_dir(target_dir: &Path, overwrite: bool) -> Result<()> {
    if overwrite && target_dir.exists() {
        info!("Overwriting target directory {}", target_dir.display());
        tokio::fs::remove_dir_all(target_dir).await?;
    }
    tokio::fs::create_dir_all(target_dir).await?;
    Ok(())
}

/// A directory in a GitHub repository, read through the contents API.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    pub owner: String,
    pub repo: String,
    pub repo_dir: String,
    token: String,
    api_base: String,
}

impl GitHubSource {
    pub fn new(owner: &str, repo: &str, repo_dir: &str, token: String) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            repo_dir: repo_dir.trim_matches('/').to_string(),
            token,
            api_base: GITHUB_API.to_string(),
        }
    }

    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, self.repo, self.repo_dir
        )
    }

    fn client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .user_agent(concat!("psqlsync/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }
}

#[async_trait]
impl RemoteSource for GitHubSource {
    async fn fetch_all(&self, target_dir: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
        let client = self.client()?;
        let url = self.contents_url();
        info!("Listing {}", url);

        let body = client
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let entries = parse_listing(&body)?;

        prepare_target_dir(target_dir, overwrite).await?;

        let mut downloaded = Vec::new();
        for entry in entries {
            let download_url = match (entry.kind.as_str(), &entry.download_url) {
                ("file", Some(download_url)) => download_url,
                _ => {
                    debug!(name = %entry.name, kind = %entry.kind, "skipping entry");
                    continue;
                }
            };
            let destination = target_dir.join(&entry.name);
            if destination.exists() {
                info!("{} already present, not downloading", destination.display());
                continue;
            }

            let bytes = client
                .get(download_url)
                .bearer_auth(&self.token)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            tokio::fs::write(&destination, &bytes).await?;
            info!("Downloaded {} ({} bytes)", entry.name, bytes.len());
            downloaded.push(destination);
        }
        Ok(downloaded)
    }
}
