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

//! Steam storefront requirement lookup

use crate::domain::parsers::parse_requirements_text;
use crate::domain::{GameQuery, LookupError, RequirementLookup};
use crate::ports::RequirementsSource;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const APP_DETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";

/// AppIDs for titles that storefront search commonly misses
const KNOWN_APP_IDS: &[(&str, &str)] = &[
    ("cyberpunk 2077", "1091500"),
    ("half-life 2", "220"),
    ("elden ring", "1245620"),
];

/// AppID for a game name from the built-in table (case-insensitive)
pub fn known_app_id(name: &str) -> Option<&'static str> {
    let key = name.trim().to_lowercase();
    KNOWN_APP_IDS
        .iter()
        .find(|(title, _)| *title == key)
        .map(|(_, id)| *id)
}

/// Extract minimum PC requirements from an `appdetails` response
///
/// # Arguments
/// * `body` - Parsed response, keyed by AppID
/// * `app_id` - The AppID that was requested
///
/// # Returns
/// * `Ok(RequirementLookup)` - Parsed `pc_requirements.minimum`
/// * `Err(LookupError::NotFound)` - Unknown app or no PC minimum listed
/// * `Err(LookupError::MalformedResponse)` - Response lacks the AppID entry
pub fn extract_steam_requirements(body: &Value, app_id: &str) -> Result<RequirementLookup, LookupError> {
    let app = body.get(app_id).ok_or_else(|| {
        LookupError::MalformedResponse(format!("Steam response has no entry for AppID {app_id}"))
    })?;

    if !app.get("success").and_then(Value::as_bool).unwrap_or(false) {
        return Err(LookupError::NotFound(format!("AppID {app_id}")));
    }

    let data = app.get("data");
    // Steam sends `pc_requirements: []` for apps without requirements
    let minimum = data
        .and_then(|d| d.get("pc_requirements"))
        .and_then(|r| r.get("minimum"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| LookupError::NotFound(format!("PC requirements for AppID {app_id}")))?;

    let game_name = data
        .and_then(|d| d.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);
    debug!("Steam minimum requirements for {app_id}: {minimum}");

    Ok(RequirementLookup {
        game_name,
        requirements: parse_requirements_text(minimum),
        source: "steam".to_string(),
    })
}

/// Client for the Steam storefront `appdetails` API
pub struct SteamStoreClient {
    client: Client,
}

impl SteamStoreClient {
    /// Create a new Steam client
    ///
    /// # Arguments
    /// * `timeout` - HTTP request timeout
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::NetworkFailed(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch and parse requirements for one AppID
    pub async fn fetch_app(&self, app_id: &str) -> Result<RequirementLookup, LookupError> {
        let response = self
            .client
            .get(APP_DETAILS_URL)
            .query(&[("appids", app_id), ("l", "english")])
            .send()
            .await
            .map_err(|e| LookupError::NetworkFailed(format!("Steam request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::NetworkFailed(format!("Steam returned HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LookupError::MalformedResponse(format!("Steam response: {e}")))?;
        extract_steam_requirements(&body, app_id)
    }
}

#[async_trait]
impl RequirementsSource for SteamStoreClient {
    async fn lookup(&self, query: &GameQuery) -> Result<RequirementLookup, LookupError> {
        let app_id = query
            .app_id()
            .or_else(|| query.name().and_then(known_app_id))
            .ok_or_else(|| LookupError::NotFound(query.to_string()))?;
        self.fetch_app(app_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_app_ids() {
        assert_eq!(known_app_id("  Cyberpunk 2077 "), Some("1091500"));
        assert_eq!(known_app_id("HALF-LIFE 2"), Some("220"));
        assert_eq!(known_app_id("elden ring"), Some("1245620"));
        assert_eq!(known_app_id("portal"), None);
    }

    #[test]
    fn test_extract_steam_requirements() {
        let body = json!({
            "1245620": {
                "success": true,
                "data": {
                    "name": "ELDEN RING",
                    "pc_requirements": {
                        "minimum": "<strong>Minimum:</strong><br><ul class=\"bb_ul\"><li><strong>Processor:</strong> INTEL CORE I5-8400<br></li><li><strong>Memory:</strong> 12 GB RAM<br></li><li><strong>Graphics:</strong> NVIDIA GEFORCE GTX 1060 3 GB<br></li><li><strong>Storage:</strong> 60 GB available space<br></li></ul>",
                        "recommended": "<strong>Recommended:</strong>"
                    }
                }
            }
        });

        let lookup = extract_steam_requirements(&body, "1245620").unwrap();
        assert_eq!(lookup.game_name.as_deref(), Some("ELDEN RING"));
        assert_eq!(lookup.source, "steam");
        assert_eq!(lookup.requirements.cpu, "INTEL CORE I5-8400");
        assert_eq!(lookup.requirements.ram, "12 GB RAM");
        assert_eq!(lookup.requirements.gpu, "NVIDIA GEFORCE GTX 1060 3 GB");
        assert_eq!(lookup.requirements.storage, "60 GB available space");
    }

    #[test]
    fn test_extract_steam_failures() {
        let unknown = json!({ "1": { "success": false } });
        assert!(matches!(
            extract_steam_requirements(&unknown, "1"),
            Err(LookupError::NotFound(_))
        ));

        let no_reqs = json!({ "2": { "success": true, "data": { "name": "Tool", "pc_requirements": [] } } });
        assert!(matches!(
            extract_steam_requirements(&no_reqs, "2"),
            Err(LookupError::NotFound(_))
        ));

        assert!(matches!(
            extract_steam_requirements(&json!({}), "3"),
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_without_app_id_or_known_name() {
        let client = SteamStoreClient::new(Duration::from_secs(1)).unwrap();
        let err = client
            .lookup(&GameQuery::by_name("Some Indie Game"))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }
}
