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

//! Rendering of check outcomes for the terminal

use crate::domain::{CheckOutcome, ComponentVerdict, PublishError, Verdict};
use crate::ports::OutputFormat;
use colored::{ColoredString, Colorize};

/// Formats a [`CheckOutcome`] in the configured output format
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render the outcome
    ///
    /// JSON and TOML serialize the whole outcome; text shows one line per
    /// component followed by any detection or lookup failure.
    pub fn render(&self, outcome: &CheckOutcome) -> Result<String, PublishError> {
        match self.format {
            OutputFormat::Text => Ok(render_text(outcome)),
            OutputFormat::Json => serde_json::to_string_pretty(outcome)
                .map_err(|e| PublishError::SerializationFailed(format!("JSON serialization failed: {e}"))),
            OutputFormat::Toml => toml::to_string_pretty(outcome)
                .map_err(|e| PublishError::SerializationFailed(format!("TOML serialization failed: {e}"))),
        }
    }
}

fn colorize(verdict: Verdict) -> ColoredString {
    let label = verdict.label();
    match verdict {
        Verdict::MeetsOrExceeds => label.green().bold(),
        Verdict::MayNotMeet => label.red().bold(),
        _ => label.yellow(),
    }
}

fn render_row(row: &ComponentVerdict) -> String {
    let requirement = if row.requirement_value.trim().is_empty() {
        "N/A"
    } else {
        row.requirement_value.as_str()
    };
    format!(
        "{:<8} {}\n  System:      {}\n  Requirement: {}",
        row.component.label().bold(),
        colorize(row.verdict),
        row.system_value.as_deref().unwrap_or("N/A"),
        requirement
    )
}

fn render_text(outcome: &CheckOutcome) -> String {
    let mut lines = Vec::new();

    if let Some(name) = &outcome.game_name {
        lines.push(format!("{} {}", "Game:".bold(), name.cyan()));
    }

    match &outcome.report {
        Some(report) => {
            lines.extend(report.verdicts.iter().map(render_row));
            let summary = if report.all_met() {
                "This system meets the minimum requirements.".green()
            } else {
                "Some components may not meet the minimum requirements.".yellow()
            };
            lines.push(summary.to_string());
        }
        None => lines.push("No comparison available.".yellow().to_string()),
    }

    if let Some(error) = &outcome.system_error {
        lines.push(format!("{} {error}", "System detection failed:".red()));
    }
    if let Some(error) = &outcome.lookup_error {
        lines.push(format!("{} {error}", "Requirement lookup failed:".red()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComparisonEngine, RequirementSpecs, SystemSpecs};

    fn outcome() -> CheckOutcome {
        let system = SystemSpecs {
            cpu: Some("Intel Core i7-9700K".to_string()),
            ram: Some("16384MB RAM".to_string()),
            ..Default::default()
        };
        let requirements = RequirementSpecs {
            cpu: "Intel Core i5-8400".to_string(),
            ram: "32 GB RAM".to_string(),
            ..Default::default()
        };
        CheckOutcome {
            report: Some(ComparisonEngine::default().compare(&system, &requirements)),
            system_specs: Some(system),
            requirements: Some(requirements),
            game_name: Some("Test Game".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_text() {
        colored::control::set_override(false);
        let text = OutputFormatter::new(OutputFormat::Text).render(&outcome()).unwrap();

        assert!(text.starts_with("Game: Test Game"));
        assert!(text.contains("CPU      Meets or Exceeds"));
        assert!(text.contains("RAM      May Not Meet"));
        assert!(text.contains("GPU      Unknown\n  System:      N/A\n  Requirement: N/A"));
        assert!(text.contains("Some components may not meet"));
    }

    #[test]
    fn test_render_text_with_errors() {
        colored::control::set_override(false);
        let outcome = CheckOutcome {
            lookup_error: Some("No requirements found for Nope".to_string()),
            ..Default::default()
        };
        let text = OutputFormatter::new(OutputFormat::Text).render(&outcome).unwrap();
        assert!(text.contains("No comparison available."));
        assert!(text.contains("Requirement lookup failed: No requirements found for Nope"));
    }

    #[test]
    fn test_render_json() {
        let json = OutputFormatter::new(OutputFormat::Json).render(&outcome()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["game_name"], "Test Game");
        assert_eq!(value["report"]["verdicts"][2]["verdict"], "MayNotMeet");
    }
}
