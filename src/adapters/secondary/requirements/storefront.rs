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

use crate::domain::{GameQuery, LookupError, RequirementLookup};
use crate::ports::RequirementsSource;
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

/// Tries RAWG search first for name queries, then Steam
///
/// Queries carrying an AppID go straight to Steam. Without a RAWG key only
/// Steam is used, which resolves names through its known-AppID table.
pub struct StorefrontLookup {
    steam: Arc<dyn RequirementsSource>,
    rawg: Option<Arc<dyn RequirementsSource>>,
}

impl StorefrontLookup {
    pub fn new(
        steam: Arc<dyn RequirementsSource>,
        rawg: Option<Arc<dyn RequirementsSource>>,
    ) -> Self {
        Self { steam, rawg }
    }
}

#[async_trait]
impl RequirementsSource for StorefrontLookup {
    async fn lookup(&self, query: &GameQuery) -> Result<RequirementLookup, LookupError> {
        if query.app_id().is_some() {
            return self.steam.lookup(query).await;
        }

        let rawg_error = match &self.rawg {
            Some(rawg) => match rawg.lookup(query).await {
                Ok(lookup) => return Ok(lookup),
                Err(LookupError::NotFound(_)) => {
                    debug!("RAWG has no PC requirements for {query}, trying Steam");
                    None
                }
                Err(e) => {
                    warn!("RAWG lookup failed, trying Steam: {e}");
                    Some(e)
                }
            },
            None => None,
        };

        match (self.steam.lookup(query).await, rawg_error) {
            // Steam could not even resolve the name; report the RAWG failure instead
            (Err(LookupError::NotFound(_)), Some(e)) => Err(e),
            (result, _) => result,
        }
    }
}
