use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::application::ports::{MediaDownloader, ProviderError, VideoSearcher};
use crate::domain::{MediaKind, SearchQuery, VideoSummary};

const SEARCH_DEPTH: usize = 10;
const MAX_SEARCH_RESULTS: usize = 5;

/// Media downloader and search backed by the `yt-dlp` executable.
pub struct YtDlpClient {
    binary: String,
    cookies_file: Option<PathBuf>,
    download_timeout: Duration,
    search_timeout: Duration,
}

#[derive(Deserialize)]
struct SearchListing {
    #[serde(default)]
    entries: Vec<SearchEntry>,
}

#[derive(Deserialize)]
struct SearchEntry {
    id: Option<String>,
    title: Option<String>,
    #[serde(default)]
    thumbnails: Vec<Thumbnail>,
    duration: Option<f64>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl YtDlpClient {
    pub fn new(
        binary: String,
        cookies_file: Option<PathBuf>,
        download_timeout: Duration,
        search_timeout: Duration,
    ) -> Self {
        Self {
            binary,
            cookies_file,
            download_timeout,
            search_timeout,
        }
    }

    async fn existing_cookies(&self) -> Option<&Path> {
        let path = self.cookies_file.as_deref()?;
        match tokio::fs::try_exists(path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }

    async fn run(
        &self,
        mut command: Command,
        timeout: Duration,
    ) -> Result<std::process::Output, ProviderError> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!("yt-dlp exceeded {}s", timeout.as_secs()))
            })?
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    ProviderError::RemoteFailure(format!("{} is not installed", self.binary))
                } else {
                    ProviderError::RemoteFailure(format!("failed to run {}: {}", self.binary, e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(status = %output.status, stderr = %stderr.trim(), "yt-dlp failed");
            return Err(ProviderError::RemoteFailure(last_line(&stderr)));
        }
        Ok(output)
    }
}

#[async_trait]
impl MediaDownloader for YtDlpClient {
    async fn download(
        &self,
        url: &str,
        kind: MediaKind,
        output_stem: &Path,
    ) -> Result<(), ProviderError> {
        validate_url(url)?;

        let mut command = Command::new(&self.binary);
        command
            .arg("--newline")
            .arg("--no-playlist")
            .arg("--no-overwrites")
            .arg("--retries")
            .arg("3")
            .arg("--fragment-retries")
            .arg("3")
            .arg("--socket-timeout")
            .arg("12")
            .arg("-f")
            .arg(kind.format_selector())
            .arg("--output")
            .arg(format!("{}.%(ext)s", output_stem.display()));
        if let Some(cookies) = self.existing_cookies().await {
            command.arg("--cookies").arg(cookies);
        }
        command.arg(url);

        tracing::debug!(kind = %kind, "Starting yt-dlp download");
        self.run(command, self.download_timeout).await?;
        Ok(())
    }
}

#[async_trait]
impl VideoSearcher for YtDlpClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoSummary>, ProviderError> {
        let mut command = Command::new(&self.binary);
        command
            .arg("--flat-playlist")
            .arg("--dump-single-json")
            .arg("--no-warnings")
            .arg("--retries")
            .arg("3");
        if let Some(cookies) = self.existing_cookies().await {
            command.arg("--cookies").arg(cookies);
        }
        command.arg(format!("ytsearch{}:{}", SEARCH_DEPTH, query.as_str()));

        let output = self.run(command, self.search_timeout).await?;
        parse_search_listing(&output.stdout)
    }
}

/// Maps `yt-dlp -J` output to the top results that carry a video id.
pub fn parse_search_listing(stdout: &[u8]) -> Result<Vec<VideoSummary>, ProviderError> {
    let listing: SearchListing = serde_json::from_slice(stdout)
        .map_err(|e| ProviderError::RemoteFailure(format!("unreadable search listing: {}", e)))?;

    Ok(listing
        .entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id?;
            let thumbnail = entry.thumbnails.into_iter().next().and_then(|t| t.url);
            Some(VideoSummary::from_video_id(
                &id,
                entry.title,
                thumbnail,
                entry.duration,
            ))
        })
        .take(MAX_SEARCH_RESULTS)
        .collect())
}

fn validate_url(url: &str) -> Result<(), ProviderError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ProviderError::InvalidInput(format!("invalid url: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProviderError::InvalidInput(format!(
            "unsupported url scheme: {}",
            other
        ))),
    }
}

fn last_line(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
        .unwrap_or("download failed")
        .to_string()
}
