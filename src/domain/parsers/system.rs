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

//! Mapping of diagnostics sections to the tracked system specs

use super::common::{extract_gigabytes, format_gigabytes};
use super::dxdiag::{DISPLAY_DEVICES, LOGICAL_DISKS, SYSTEM_INFORMATION};
use crate::domain::{DiagnosticsSection, SystemSpecs};
use log::debug;

fn find_section<'a>(sections: &'a [DiagnosticsSection], name: &str) -> Option<&'a DiagnosticsSection> {
    sections.iter().find(|s| s.name == name)
}

/// Extract CPU, GPU, RAM and Storage from parsed diagnostics sections
///
/// * CPU and RAM come from `SystemInformation` (`Processor`, `Memory`)
/// * GPU is the last `CardName` under `DisplayDevices`
/// * Storage is the largest free space across `LogicalDisks`, in GB; the
///   per-drive listing goes to `storage_display`
///
/// Components with no data stay `None`.
pub fn extract_system_specs(sections: &[DiagnosticsSection]) -> SystemSpecs {
    let mut specs = SystemSpecs::default();

    if let Some(info) = find_section(sections, SYSTEM_INFORMATION) {
        specs.cpu = info.values("Processor").last().map(str::to_string);
        specs.ram = info.values("Memory").last().map(str::to_string);
        debug!("Extracted CPU: {:?}, RAM: {:?}", specs.cpu, specs.ram);
    }

    if let Some(display) = find_section(sections, DISPLAY_DEVICES) {
        specs.gpu = display.values("CardName").last().map(str::to_string);
        debug!("Extracted GPU: {:?}", specs.gpu);
    }

    if let Some(disks) = find_section(sections, LOGICAL_DISKS) {
        let mut details = Vec::new();
        let mut max_free_gb = 0.0_f64;

        for row in disks.rows.iter().filter(|row| row.len() >= 3) {
            let (drive, free, size) = (&row[0], &row[1], &row[2]);
            let size_text = extract_gigabytes(size)
                .map(format_gigabytes)
                .unwrap_or_else(|| size.clone());
            let free_text = match extract_gigabytes(free) {
                Some(gb) => {
                    max_free_gb = max_free_gb.max(gb);
                    format_gigabytes(gb)
                }
                None => free.clone(),
            };
            details.push(format!("{drive} ({size_text}) Free: {free_text}"));
        }

        if !details.is_empty() {
            specs.storage = Some(format_gigabytes(max_free_gb));
            specs.storage_display = Some(details.join("; "));
            debug!("Extracted Storage: {:?}", specs.storage);
        }
    }

    specs
}
