//! HTTP client for the external character-stats API.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Url;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::common::error::StatsError;
use crate::config::types::StatsConfig;

const SEARCH_PATH: &str = "api/character/search";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Looks up live character statistics by nickname.
///
/// Fail-fast: any non-success status is reported as "character not found".
pub struct StatsClient {
    http: reqwest::Client,
    base_url: Url,
    server: String,
    race: String,
}

impl StatsClient {
    pub fn new(config: &StatsConfig) -> Result<Self, StatsError> {
        let mut base_url =
            Url::parse(&config.base_url).map_err(|e| StatsError::InvalidUrl(e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url,
            server: config.server.clone(),
            race: config.race.clone(),
        })
    }

    /// Search URL for a nickname on the configured server and race.
    pub fn search_url(&self, nickname: &str) -> Result<Url, StatsError> {
        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|e| StatsError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("nickname", nickname)
            .append_pair("server", &self.server)
            .append_pair("race", &self.race);
        Ok(url)
    }

    /// Fetch the `data` object for a character (empty when the API omits it).
    pub async fn fetch_character(&self, nickname: &str) -> Result<Map<String, Value>, StatsError> {
        let url = self.search_url(nickname)?;
        debug!("Stats lookup: {}", url);

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "ko-KR,ko;q=0.9")
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(REFERER, self.base_url.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Stats lookup for '{}' returned {}", nickname, response.status());
            return Err(StatsError::CharacterNotFound);
        }

        let body: Value = response.json().await?;
        Ok(extract_data(body))
    }
}

fn extract_data(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(mut root) => match root.remove("data") {
            Some(Value::Object(data)) => data,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}
