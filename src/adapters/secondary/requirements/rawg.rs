/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! RAWG game database search

use crate::domain::parsers::parse_requirements_text;
use crate::domain::{GameQuery, LookupError, RequirementLookup};
use crate::ports::RequirementsSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const GAMES_URL: &str = "https://api.rawg.io/api/games";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<GameResult>,
}

#[derive(Debug, Deserialize)]
struct GameResult {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    platforms: Option<Vec<PlatformEntry>>,
}

#[derive(Debug, Deserialize)]
struct PlatformEntry {
    platform: Platform,
    #[serde(default)]
    requirements: Option<Requirements>,
}

#[derive(Debug, Deserialize)]
struct Platform {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Requirements {
    #[serde(default)]
    minimum: Option<String>,
}

/// Pick the first search result with non-empty PC minimum requirements
///
/// # Returns
/// * `Ok(Some(lookup))` - Requirements found
/// * `Ok(None)` - No result lists PC requirements
/// * `Err(LookupError::MalformedResponse)` - Body is not a RAWG search response
pub fn extract_rawg_requirements(body: &str) -> Result<Option<RequirementLookup>, LookupError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| LookupError::MalformedResponse(format!("RAWG response: {e}")))?;

    let found = response.results.into_iter().find_map(|game| {
        let minimum = game
            .platforms
            .unwrap_or_default()
            .into_iter()
            .filter(|entry| entry.platform.name.eq_ignore_ascii_case("pc"))
            .find_map(|entry| entry.requirements.and_then(|r| r.minimum))
            .filter(|minimum| !minimum.trim().is_empty())?;
        Some((game.name, minimum))
    });

    Ok(found.map(|(game_name, minimum)| RequirementLookup {
        game_name,
        requirements: parse_requirements_text(&minimum),
        source: "rawg".to_string(),
    }))
}

/// Client for the RAWG `games` search endpoint
pub struct RawgClient {
    client: Client,
    api_key: String,
}

impl RawgClient {
    /// Create a new RAWG client
    ///
    /// # Arguments
    /// * `api_key` - RAWG API key
    /// * `timeout` - HTTP request timeout
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::NetworkFailed(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl RequirementsSource for RawgClient {
    async fn lookup(&self, query: &GameQuery) -> Result<RequirementLookup, LookupError> {
        let name = query
            .name()
            .ok_or_else(|| LookupError::NotFound(query.to_string()))?;

        let response = self
            .client
            .get(GAMES_URL)
            .query(&[("key", self.api_key.as_str()), ("search", name)])
            .send()
            .await
            .map_err(|e| LookupError::NetworkFailed(format!("RAWG request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::NetworkFailed(format!("RAWG returned HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::NetworkFailed(format!("RAWG response: {e}")))?;
        extract_rawg_requirements(&body)?.ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}
