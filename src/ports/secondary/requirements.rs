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
use async_trait::async_trait;

/// Secondary port - Published game requirements
///
/// Implemented by storefront clients (Steam, RAWG) and by the chained
/// lookup that tries them in turn.
#[async_trait]
pub trait RequirementsSource: Send + Sync {
    /// Look up the minimum requirements for a game
    ///
    /// # Arguments
    /// * `query` - Game name and/or Steam AppID
    ///
    /// # Returns
    /// * `Ok(RequirementLookup)` - Parsed requirements and the answering source
    /// * `Err(LookupError)` - Network failure, unknown game, or bad payload
    async fn lookup(&self, query: &GameQuery) -> Result<RequirementLookup, LookupError>;
}
