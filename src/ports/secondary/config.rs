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

use crate::domain::{DomainError, RankTables};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Secondary port - Configuration provider abstraction
///
/// Abstracts where settings come from (CLI flags, files, environment).
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Get the rank tables used by the comparison engine
    ///
    /// # Returns
    /// * `Ok(Arc<RankTables>)` - Built-in tables or a loaded override
    /// * `Err(DomainError)` - The override could not be loaded
    async fn get_rank_tables(&self) -> Result<Arc<RankTables>, DomainError>;

    /// Get output format preference
    async fn get_output_format(&self) -> Result<OutputFormat, DomainError>;
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colour-coded table for the terminal
    #[default]
    Text,
    /// JSON format
    Json,
    /// TOML format
    Toml,
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "toml" => Ok(OutputFormat::Toml),
            other => Err(DomainError::InvalidConfiguration(format!(
                "unknown output format '{other}' (expected text, json or toml)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Toml => "toml",
        })
    }
}
