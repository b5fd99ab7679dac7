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

//! GPU ranking functions

use crate::domain::RankTables;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MODEL_NUMBER_RE: Regex = Regex::new(r"(\d{3,4})").unwrap();
}

/// Rank a GPU description
///
/// Two independent stages are run and the larger result is returned:
///
/// * series stage: every series token contained in the text contributes
///   `base + model number`, where the model number is the first 3-4 digit
///   run anywhere in the text
/// * model stage: every fully qualified model contained in the text
///   contributes its fixed rank
///
/// The series stage generalizes to unlisted cards of a known series; the
/// model stage pins parts the arithmetic would misrank (mobile MX chips).
///
/// # Returns
/// * Rank (unbounded), or `0` when the text matched nothing
pub fn gpu_rank(tables: &RankTables, text: &str) -> u32 {
    let text = text.to_lowercase();
    series_rank(tables, &text).max(model_rank(tables, &text))
}

/// Series stage of [`gpu_rank`]; `text` must already be lowercase
fn series_rank(tables: &RankTables, text: &str) -> u32 {
    let model_number = extract_model_number(text);
    tables
        .gpu_series
        .iter()
        .filter(|rule| text.contains(&rule.pattern))
        .map(|rule| rule.rank.saturating_add(model_number))
        .max()
        .unwrap_or(0)
}

/// Model stage of [`gpu_rank`]; `text` must already be lowercase
fn model_rank(tables: &RankTables, text: &str) -> u32 {
    tables
        .gpu_models
        .iter()
        .filter(|rule| text.contains(&rule.pattern))
        .map(|rule| rule.rank)
        .max()
        .unwrap_or(0)
}

/// First 3-4 digit number in the text, `0` if there is none
pub fn extract_model_number(text: &str) -> u32 {
    MODEL_NUMBER_RE
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
        .unwrap_or(0)
}
