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

use crate::domain::{CheckError, CheckOutcome, GameQuery, RequirementLookup, SystemSpecs};
use async_trait::async_trait;

/// Primary port - Main interface offered by the compatibility domain
///
/// This is what external systems (CLI, library consumers) use to check a
/// game against the local machine.
#[async_trait]
pub trait CompatibilityChecking: Send + Sync {
    /// Detect the local machine's CPU, GPU, RAM and free storage
    ///
    /// # Returns
    /// * `Ok(SystemSpecs)` - Detected values; undetected components are `None`
    /// * `Err(CheckError)` - Diagnostics could not be run at all
    async fn collect_system_specs(&self) -> Result<SystemSpecs, CheckError>;

    /// Fetch the published minimum requirements for a game
    ///
    /// # Arguments
    /// * `query` - Game name and/or Steam AppID; at least one is required
    ///
    /// # Returns
    /// * `Ok(RequirementLookup)` - Requirements and canonical game name
    /// * `Err(CheckError)` - Invalid query or failed lookup
    async fn lookup_requirements(&self, query: &GameQuery)
        -> Result<RequirementLookup, CheckError>;

    /// Run detection and lookup concurrently and compare the results
    ///
    /// A failure on either side is recorded in the outcome instead of being
    /// returned; only an invalid query is an error.
    ///
    /// # Returns
    /// * `Ok(CheckOutcome)` - Report when both sides succeeded, plus per-side errors
    /// * `Err(CheckError)` - The query names no game
    async fn check(&self, query: &GameQuery) -> Result<CheckOutcome, CheckError>;

    /// Tools the configured diagnostics provider needs but cannot find
    async fn validate_dependencies(&self) -> Result<Vec<String>, CheckError>;
}
