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

use crate::domain::{CheckOutcome, PublishError};
use async_trait::async_trait;
use std::path::Path;

/// Secondary port - File-based storage of check outcomes
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Save an outcome as pretty-printed JSON
    async fn save_json(&self, outcome: &CheckOutcome, path: &Path) -> Result<(), PublishError>;

    /// Save an outcome as TOML
    async fn save_toml(&self, outcome: &CheckOutcome, path: &Path) -> Result<(), PublishError>;

    /// Save an outcome, picking the format from the file extension
    ///
    /// `.toml` writes TOML; anything else writes JSON.
    async fn save(&self, outcome: &CheckOutcome, path: &Path) -> Result<(), PublishError> {
        if is_toml_path(path) {
            self.save_toml(outcome, path).await
        } else {
            self.save_json(outcome, path).await
        }
    }

    /// Load an outcome from a JSON file
    async fn load_json(&self, path: &Path) -> Result<CheckOutcome, PublishError>;

    /// Load an outcome from a TOML file
    async fn load_toml(&self, path: &Path) -> Result<CheckOutcome, PublishError>;

    /// Load an outcome written by [`ReportRepository::save`]
    async fn load(&self, path: &Path) -> Result<CheckOutcome, PublishError> {
        if is_toml_path(path) {
            self.load_toml(path).await
        } else {
            self.load_json(path).await
        }
    }
}

fn is_toml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}
