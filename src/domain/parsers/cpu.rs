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

//! CPU tier ranking

use crate::domain::RankTables;

/// Highest tier in the built-in CPU table
pub const MAX_BUILTIN_CPU_RANK: u32 = 4;

/// Rank a CPU description by tier
///
/// The text is case-folded and checked for containment of each pattern in
/// `tables.cpu`, in table order. The first match wins.
///
/// # Arguments
/// * `tables` - Rank tables to evaluate
/// * `text` - Free-text CPU description (e.g. "Intel i7-12700K")
///
/// # Returns
/// * Tier (1..=4 with the built-in table), or `0` when nothing matched
pub fn cpu_rank(tables: &RankTables, text: &str) -> u32 {
    let text = text.to_lowercase();
    tables
        .cpu
        .iter()
        .find(|rule| text.contains(&rule.pattern))
        .map(|rule| rule.rank)
        .unwrap_or(0)
}
