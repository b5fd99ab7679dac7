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

use crate::domain::CheckError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware components tracked by the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Cpu,
    Gpu,
    Ram,
    Storage,
}

impl Component {
    /// Every tracked component, in report order
    pub const ALL: [Component; 4] = [
        Component::Cpu,
        Component::Gpu,
        Component::Ram,
        Component::Storage,
    ];

    /// Display label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Component::Cpu => "CPU",
            Component::Gpu => "GPU",
            Component::Ram => "RAM",
            Component::Storage => "Storage",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hardware detected on the local machine
///
/// Each field holds the free-text value reported by the diagnostics tool, or
/// `None` when detection failed for that component. A fresh diagnostics run
/// replaces the whole value; fields are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSpecs {
    /// Processor description (e.g. "Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz")
    pub cpu: Option<String>,
    /// Display adapter name, optionally with its memory
    pub gpu: Option<String>,
    /// Installed memory (e.g. "16384MB RAM")
    pub ram: Option<String>,
    /// Largest free space on any logical disk (e.g. "412 GB")
    pub storage: Option<String>,
    /// Per-drive listing shown in place of `storage`
    pub storage_display: Option<String>,
}

impl SystemSpecs {
    /// Detected value for a component, exactly as collected
    pub fn get(&self, component: Component) -> Option<&str> {
        match component {
            Component::Cpu => self.cpu.as_deref(),
            Component::Gpu => self.gpu.as_deref(),
            Component::Ram => self.ram.as_deref(),
            Component::Storage => self.storage.as_deref(),
        }
    }

    /// Value to show to the user for a component
    pub fn display_value(&self, component: Component) -> Option<&str> {
        match component {
            Component::Storage => self
                .storage_display
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .or_else(|| self.get(component)),
            _ => self.get(component),
        }
    }

    /// True when no component carries any non-blank text
    pub fn is_empty(&self) -> bool {
        Component::ALL
            .iter()
            .all(|c| self.get(*c).map_or(true, |v| v.trim().is_empty()))
    }
}

/// Minimum requirements published for a game
///
/// Empty strings mean the lookup found nothing for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSpecs {
    pub cpu: String,
    pub gpu: String,
    pub ram: String,
    pub storage: String,
}

impl RequirementSpecs {
    pub fn get(&self, component: Component) -> &str {
        match component {
            Component::Cpu => &self.cpu,
            Component::Gpu => &self.gpu,
            Component::Ram => &self.ram,
            Component::Storage => &self.storage,
        }
    }

    pub fn is_empty(&self) -> bool {
        Component::ALL
            .iter()
            .all(|c| self.get(*c).trim().is_empty())
    }
}

/// Outcome of comparing one component against its requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    MeetsOrExceeds,
    MayNotMeet,
    Unknown,
    SystemInfoNotFound,
    RequirementNotSpecified,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::MeetsOrExceeds => "Meets or Exceeds",
            Verdict::MayNotMeet => "May Not Meet",
            Verdict::Unknown => "Unknown",
            Verdict::SystemInfoNotFound => "System Info Not Found",
            Verdict::RequirementNotSpecified => "Requirement Not Specified",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict for one component, paired with the raw values it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentVerdict {
    pub component: Component,
    pub verdict: Verdict,
    /// Detected value as shown to the user, `None` when not detected
    pub system_value: Option<String>,
    /// Requirement text as published
    pub requirement_value: String,
}

/// Result of a full comparison run (one verdict per tracked component)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub verdicts: Vec<ComponentVerdict>,
}

impl ComparisonReport {
    /// Verdict row for a component
    pub fn get(&self, component: Component) -> Option<&ComponentVerdict> {
        self.verdicts.iter().find(|v| v.component == component)
    }

    /// Verdict for a component, `Unknown` if the row is missing
    pub fn verdict(&self, component: Component) -> Verdict {
        self.get(component)
            .map(|v| v.verdict)
            .unwrap_or(Verdict::Unknown)
    }

    /// True when every component meets or exceeds its requirement
    pub fn all_met(&self) -> bool {
        !self.verdicts.is_empty()
            && self
                .verdicts
                .iter()
                .all(|v| v.verdict == Verdict::MeetsOrExceeds)
    }
}

/// One named section of a diagnostics report
///
/// Rows are usually `[key, value]` pairs; logical disks use a three-part row
/// of drive, free space and size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsSection {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl DiagnosticsSection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Values of every `[key, value]` row whose key matches
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.len() > 1 && row[0] == key)
            .filter_map(|row| row.last().map(String::as_str))
    }
}

/// What to look up requirements for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    /// Free-text game title
    pub name: Option<String>,
    /// Steam application id
    pub app_id: Option<String>,
}

impl GameQuery {
    pub fn by_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            app_id: None,
        }
    }

    pub fn by_app_id(app_id: &str) -> Self {
        Self {
            name: None,
            app_id: Some(app_id.to_string()),
        }
    }

    /// Trimmed, non-empty game name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Trimmed, non-empty AppID
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Ensure at least a name or an AppID was given
    pub fn validate(&self) -> Result<(), CheckError> {
        if self.name().is_none() && self.app_id().is_none() {
            return Err(CheckError::InvalidQuery(
                "enter a game name or Steam AppID".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for GameQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.app_id()) {
            (Some(name), Some(id)) => write!(f, "{name} (AppID {id})"),
            (Some(name), None) => f.write_str(name),
            (None, Some(id)) => write!(f, "AppID {id}"),
            (None, None) => f.write_str("<empty query>"),
        }
    }
}

/// Requirements returned by a requirement source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementLookup {
    /// Canonical title reported by the storefront, when known
    pub game_name: Option<String>,
    pub requirements: RequirementSpecs,
    /// Which service answered ("steam", "rawg")
    pub source: String,
}

/// Everything produced by one end-to-end compatibility check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Comparison result, present only when both inputs were available
    pub report: Option<ComparisonReport>,
    pub system_specs: Option<SystemSpecs>,
    pub requirements: Option<RequirementSpecs>,
    pub game_name: Option<String>,
    /// Why system detection failed, if it did
    pub system_error: Option<String>,
    /// Why the requirement lookup failed, if it did
    pub lookup_error: Option<String>,
}
