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

//! Rank tables used by the CPU and GPU rankers
//!
//! Tables are ordered lists of `(pattern, rank)` rules. They are built once
//! (either the built-in set or a TOML override loaded at startup) and shared
//! read-only between rankers.

use crate::domain::ConfigError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

lazy_static! {
    static ref BUILTIN_TABLES: Arc<RankTables> = Arc::new(RankTables::builtin());
}

/// A substring pattern and the rank it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRule {
    pub pattern: String,
    pub rank: u32,
}

impl RankRule {
    pub fn new(pattern: &str, rank: u32) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            rank,
        }
    }
}

fn rules(entries: &[(&str, u32)]) -> Vec<RankRule> {
    entries
        .iter()
        .map(|(pattern, rank)| RankRule::new(pattern, *rank))
        .collect()
}

/// Lookup tables for the component rankers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTables {
    /// CPU tiers, evaluated in order; the first contained pattern wins
    pub cpu: Vec<RankRule>,
    /// GPU series bases, added to the model number found in the text
    pub gpu_series: Vec<RankRule>,
    /// Fully qualified GPU models with fixed ranks
    pub gpu_models: Vec<RankRule>,
}

/// On-disk shape of a rank table override; missing tables keep the built-ins
#[derive(Debug, Default, Deserialize)]
struct RankTablesFile {
    cpu: Option<Vec<RankRule>>,
    gpu_series: Option<Vec<RankRule>>,
    gpu_models: Option<Vec<RankRule>>,
}

impl RankTables {
    /// The built-in tables
    pub fn builtin() -> Self {
        Self {
            cpu: rules(&[
                ("i3", 1),
                ("i5", 2),
                ("i7", 3),
                ("i9", 4),
                ("ryzen 3", 1),
                ("ryzen 5", 2),
                ("ryzen 7", 3),
                ("ryzen 9", 4),
            ]),
            gpu_series: rules(&[
                ("rtx", 1000),
                ("gtx", 800),
                ("gt", 600),
                ("rx", 900),
                ("r9", 700),
                ("r7", 600),
                ("r5", 500),
                ("arc", 850),
                ("quadro", 700),
                ("tesla", 700),
                ("hd", 200),
                ("iris", 300),
                ("vega", 400),
                ("mx", 250),
                ("uhd", 100),
                ("intel hd", 100),
                ("intel iris", 200),
            ]),
            gpu_models: rules(&[
                ("gtx 750", 751),
                ("gtx 950", 951),
                ("gtx 960", 960),
                ("gtx 970", 970),
                ("gtx 1050", 1050),
                ("gtx 1060", 1060),
                ("gtx 1070", 1070),
                ("gtx 1080", 1080),
                ("gtx 1650", 1650),
                ("gtx 1660", 1660),
                ("rtx 2060", 2060),
                ("rtx 2070", 2070),
                ("rtx 2080", 2080),
                ("rtx 3050", 3050),
                ("rtx 3060", 3060),
                ("rtx 3070", 3070),
                ("rtx 3080", 3080),
                ("rtx 4060", 4060),
                ("rtx 4070", 4070),
                ("rtx 4080", 4080),
                ("rx 560", 560),
                ("rx 570", 570),
                ("rx 580", 580),
                ("rx 590", 590),
                ("rx 5500", 5500),
                ("rx 5600", 5600),
                ("rx 5700", 5700),
                ("rx 6600", 6600),
                ("rx 6700", 6700),
                ("rx 6800", 6800),
                ("rx 6900", 6900),
                ("arc a380", 1380),
                ("arc a750", 1750),
                ("arc a770", 1770),
                ("quadro p2000", 2200),
                ("quadro rtx 4000", 4000),
                ("mx150", 1150),
                ("mx250", 1250),
                ("mx330", 1330),
                ("intel hd", 100),
                ("intel iris", 200),
                ("uhd", 100),
            ]),
        }
    }

    /// Shared handle to the built-in tables
    pub fn shared_builtin() -> Arc<RankTables> {
        Arc::clone(&BUILTIN_TABLES)
    }

    /// Parse an override from TOML, falling back to built-ins per table
    ///
    /// ```toml
    /// [[cpu]]
    /// pattern = "i3"
    /// rank = 1
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: RankTablesFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let builtin = Self::builtin();

        let normalize = |table: Option<Vec<RankRule>>, fallback: Vec<RankRule>| {
            table
                .map(|rules| {
                    rules
                        .into_iter()
                        .map(|rule| RankRule::new(rule.pattern.trim(), rule.rank))
                        .collect::<Vec<_>>()
                })
                .unwrap_or(fallback)
        };

        let tables = Self {
            cpu: normalize(file.cpu, builtin.cpu),
            gpu_series: normalize(file.gpu_series, builtin.gpu_series),
            gpu_models: normalize(file.gpu_models, builtin.gpu_models),
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Load an override file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Check the tables are usable
    ///
    /// Patterns must be non-empty. In the CPU table, where the first match
    /// wins, a pattern must not be a strict substring of a later pattern with
    /// a different rank (`i1` before `i10` would shadow it).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, table) in [
            ("cpu", &self.cpu),
            ("gpu_series", &self.gpu_series),
            ("gpu_models", &self.gpu_models),
        ] {
            if let Some(index) = table.iter().position(|r| r.pattern.is_empty()) {
                return Err(ConfigError::InvalidTable(format!(
                    "{name} rule #{} has an empty pattern",
                    index + 1
                )));
            }
        }

        for (i, earlier) in self.cpu.iter().enumerate() {
            for later in &self.cpu[i + 1..] {
                if later.pattern != earlier.pattern
                    && later.pattern.contains(&earlier.pattern)
                    && later.rank != earlier.rank
                {
                    return Err(ConfigError::InvalidTable(format!(
                        "cpu pattern '{}' shadows later pattern '{}'",
                        earlier.pattern, later.pattern
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for RankTables {
    fn default() -> Self {
        Self::builtin()
    }
}
