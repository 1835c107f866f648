//! HTTP client for the lyrics search and scrape endpoints.
//!
//! The backend answers `POST {base}/genius-search` with a best-match song
//! record and `POST {base}/lyrics-scrape` with the page text for a result
//! URL. Both responses may be flagged `mock` when the upstream source was
//! unavailable on the server side.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    song: &'a str,
    artist: &'a str,
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

/// One search result from the lyrics backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[allow(dead_code)]
    pub id: i64,
    #[allow(dead_code)]
    pub title: String,
    #[allow(dead_code)]
    pub artist: String,
    pub url: String,
    #[allow(dead_code)]
    pub lyrics_url: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub release_date: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub mock: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub lyrics: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
    #[allow(dead_code)]
    #[serde(default)]
    pub cached: bool,
    #[allow(dead_code)]
    #[serde(default)]
    pub mock: bool,
}

/// Remote transport behind the lyrics provider. Implemented over HTTP in
/// production and by fakes in tests.
pub trait LyricsBackend {
    fn search(
        &self,
        song: &str,
        artist: &str,
    ) -> impl Future<Output = anyhow::Result<SearchHit>> + Send;

    fn scrape(&self, url: &str) -> impl Future<Output = anyhow::Result<ScrapeResponse>> + Send;
}

/// reqwest-based backend with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    const USER_AGENT: &'static str = "vibelines/0.1.0";

    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(Self::USER_AGENT)
                .timeout(timeout)
                .build()
                .expect("failed to create reqwest client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl LyricsBackend for HttpBackend {
    async fn search(&self, song: &str, artist: &str) -> anyhow::Result<SearchHit> {
        let url = format!("{}/genius-search", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SearchRequest { song, artist })
            .send()
            .await
            .context("send search request")?
            .error_for_status()
            .context("search http status")?;
        response.json().await.context("parse search json")
    }

    async fn scrape(&self, url: &str) -> anyhow::Result<ScrapeResponse> {
        let endpoint = format!("{}/lyrics-scrape", self.base_url);
        let response = self
            .client
            .post(&endpoint)
            .json(&ScrapeRequest { url })
            .send()
            .await
            .context("send scrape request")?
            .error_for_status()
            .context("scrape http status")?;
        response.json().await.context("parse scrape json")
    }
}
