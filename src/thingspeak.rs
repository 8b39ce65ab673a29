//! HTTP client for the hosted telemetry store.
//!
//! Reads go to `GET {base}/channels/{id}/feeds.json` and the single write
//! (the alarm threshold in `field6`) goes to `GET {base}/update`. Both keys
//! are sent as query parameters, which is how the store authenticates.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;

use crate::models::{FeedEntry, FeedResponse};

// ---

#[derive(Debug, Clone)]
pub struct ThingSpeakClient {
    // ---
    http: Client,
    base_url: String,
    channel_id: String,
    read_key: String,
    write_key: String,
}

impl ThingSpeakClient {
    // ---
    pub fn new(base_url: &str, channel_id: &str, read_key: &str, write_key: &str) -> Self {
        // ---
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            channel_id: channel_id.to_string(),
            read_key: read_key.to_string(),
            write_key: write_key.to_string(),
        }
    }

    /// Fetch the most recent `results` entries, ordered newest first.
    ///
    /// The order is established here from the timestamps rather than trusted
    /// from the wire, so callers can rely on `entries[0]` being the newest.
    pub async fn fetch_latest(&self, results: u32) -> Result<Vec<FeedEntry>> {
        // ---
        let url = format!("{}/channels/{}/feeds.json", self.base_url, self.channel_id);
        tracing::debug!("Fetching {} entries from: {}", results, url);

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.read_key.as_str())])
            .query(&[("results", results)])
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?;

        let body: FeedResponse = response
            .json()
            .await
            .context("feed response was not valid JSON")?;

        let mut entries: Vec<FeedEntry> = body.feeds.iter().map(|raw| raw.to_entry()).collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        tracing::debug!("Fetched {} feed entries", entries.len());
        Ok(entries)
    }

    /// Read the alarm threshold mirrored in the newest entry, if any.
    pub async fn fetch_threshold(&self) -> Result<Option<f64>> {
        // ---
        let entries = self.fetch_latest(1).await?;
        Ok(entries.first().and_then(|e| e.threshold))
    }

    /// Persist a new alarm threshold. Returns the entry id the store assigned.
    pub async fn write_threshold(&self, value: f64) -> Result<u64> {
        // ---
        let url = format!("{}/update", self.base_url);
        let text = self
            .http
            .get(&url)
            .query(&[("api_key", self.write_key.as_str())])
            .query(&[("field6", value)])
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?
            .text()
            .await?;

        // The store answers "0" when it rejects an update (rate limit, bad key).
        match text.trim().parse::<u64>() {
            Ok(0) => Err(anyhow!("telemetry store rejected the update")),
            Ok(entry_id) => Ok(entry_id),
            Err(_) => Err(anyhow!("unexpected update response: {}", text.trim())),
        }
    }
}
