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

//! Saving check outcomes to local files

use crate::domain::{CheckOutcome, PublishError};
use crate::ports::ReportRepository;
use async_trait::async_trait;
use log::info;
use std::path::Path;
use tokio::fs;

/// File system repository for check outcomes
#[derive(Debug, Default)]
pub struct FileSystemRepository;

impl FileSystemRepository {
    pub fn new() -> Self {
        Self
    }

    async fn write(&self, path: &Path, contents: String) -> Result<(), PublishError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PublishError::Io(format!("Failed to create directory: {e}")))?;
        }

        fs::write(path, contents)
            .await
            .map_err(|e| PublishError::Io(format!("Failed to write {}: {e}", path.display())))?;
        info!("Report saved to {}", path.display());
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<String, PublishError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| PublishError::Io(format!("Failed to read {}: {e}", path.display())))
    }
}

#[async_trait]
impl ReportRepository for FileSystemRepository {
    async fn save_json(&self, outcome: &CheckOutcome, path: &Path) -> Result<(), PublishError> {
        let json_string = serde_json::to_string_pretty(outcome).map_err(|e| {
            PublishError::SerializationFailed(format!("JSON serialization failed: {e}"))
        })?;
        self.write(path, json_string).await
    }

    async fn save_toml(&self, outcome: &CheckOutcome, path: &Path) -> Result<(), PublishError> {
        let toml_string = toml::to_string_pretty(outcome).map_err(|e| {
            PublishError::SerializationFailed(format!("TOML serialization failed: {e}"))
        })?;
        self.write(path, toml_string).await
    }

    async fn load_json(&self, path: &Path) -> Result<CheckOutcome, PublishError> {
        let json_string = self.read(path).await?;
        serde_json::from_str(&json_string).map_err(|e| {
            PublishError::SerializationFailed(format!("JSON deserialization failed: {e}"))
        })
    }

    async fn load_toml(&self, path: &Path) -> Result<CheckOutcome, PublishError> {
        let toml_string = self.read(path).await?;
        toml::from_str(&toml_string).map_err(|e| {
            PublishError::SerializationFailed(format!("TOML deserialization failed: {e}"))
        })
    }
}
