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

//! Common parsing utilities and the quantity normalizer

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref QUANTITY_RE: Regex = Regex::new(r"(?i)(\d+)\s*(MB|GB|TB)").unwrap();
    pub static ref VRAM_RE: Regex = Regex::new(r"(?i)(\d+)\s*(MB|GB)").unwrap();
    pub static ref HTML_TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    pub static ref BYTE_COUNT_RE: Regex = Regex::new(r"(\d{10,})").unwrap();
}

const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Convert a value and unit symbol to megabytes
fn to_mb(value: u64, unit: &str) -> u64 {
    match unit.to_ascii_uppercase().as_str() {
        "TB" => value.saturating_mul(1024 * 1024),
        "GB" => value.saturating_mul(1024),
        _ => value,
    }
}

fn first_quantity_mb(re: &Regex, text: &str) -> u64 {
    re.captures(text)
        .and_then(|captures| {
            let value = captures[1].parse::<u64>().ok()?;
            Some(to_mb(value, &captures[2]))
        })
        .unwrap_or(0)
}

/// Normalize a free-text quantity (e.g. "8 GB", "500MB", "1 TB") to megabytes
///
/// Only the first number directly followed by `MB`, `GB` or `TB` (any case,
/// optional whitespace) is considered.
///
/// # Returns
/// * Size in MB, or `0` when no quantity was found. Callers must read `0`
///   as "unparseable", not as zero capacity.
pub fn normalize_to_mb(text: &str) -> u64 {
    first_quantity_mb(&QUANTITY_RE, text)
}

/// Extract a video memory amount in MB from a GPU descriptor
///
/// Same rules as [`normalize_to_mb`] but only `MB` and `GB` are recognised.
pub fn parse_vram_mb(text: &str) -> u64 {
    first_quantity_mb(&VRAM_RE, text)
}

/// Remove HTML tags from a storefront snippet
pub fn strip_html_tags(text: &str) -> String {
    HTML_TAG_RE.replace_all(text, "").into_owned()
}

/// Clean and normalize a string value
pub fn clean_value(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find a raw byte count (10+ digits) in a diagnostics value and convert to GB
pub fn extract_gigabytes(value: &str) -> Option<f64> {
    BYTE_COUNT_RE
        .captures(value)
        .and_then(|captures| captures[1].parse::<u64>().ok())
        .map(|bytes| bytes as f64 / BYTES_PER_GB)
}

/// Format a GB amount with no decimals (e.g. "412 GB")
pub fn format_gigabytes(gb: f64) -> String {
    format!("{gb:.0} GB")
}
