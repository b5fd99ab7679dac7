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

//! Cross-platform diagnostics fallback built on `sysinfo`
//!
//! Used where dxdiag is unavailable. Results are laid out as dxdiag sections
//! so the same extraction applies. GPU names need the `nvidia` feature.

use crate::domain::parsers::{clean_value, DISPLAY_DEVICES, LOGICAL_DISKS, SYSTEM_INFORMATION};
use crate::domain::{DiagnosticsSection, SystemError};
use crate::ports::DiagnosticsProvider;
use async_trait::async_trait;
use log::debug;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

const BYTES_PER_MB: u64 = 1024 * 1024;
const BYTES_PER_GB: u64 = 1024 * BYTES_PER_MB;

/// Raw values read from the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostProbe {
    pub cpu_brand: Option<String>,
    pub total_memory_bytes: u64,
    /// `(name, total video memory in bytes)`
    pub gpus: Vec<(String, Option<u64>)>,
    /// `(mount point, available bytes, total bytes)`
    pub disks: Vec<(String, u64, u64)>,
}

impl HostProbe {
    /// Lay the probe out as `SystemInformation`, `DisplayDevices` and
    /// `LogicalDisks` sections; empty sections are left out
    pub fn into_sections(self) -> Vec<DiagnosticsSection> {
        let mut sections = Vec::new();

        let mut info = DiagnosticsSection::new(SYSTEM_INFORMATION);
        if let Some(brand) = self.cpu_brand.as_deref().map(clean_value).filter(|b| !b.is_empty()) {
            info.rows.push(vec!["Processor".to_string(), brand]);
        }
        if self.total_memory_bytes > 0 {
            info.rows.push(vec![
                "Memory".to_string(),
                format!("{}MB RAM", self.total_memory_bytes / BYTES_PER_MB),
            ]);
        }
        if !info.rows.is_empty() {
            sections.push(info);
        }

        let mut display = DiagnosticsSection::new(DISPLAY_DEVICES);
        for (name, vram) in self.gpus {
            let card = match vram {
                // Whole GB stays below three digits, so the ranker never reads it as a model number
                Some(bytes) if bytes >= BYTES_PER_GB => {
                    format!("{name} ({} GB)", (bytes + BYTES_PER_GB / 2) / BYTES_PER_GB)
                }
                _ => name,
            };
            display.rows.push(vec!["CardName".to_string(), card]);
        }
        if !display.rows.is_empty() {
            sections.push(display);
        }

        let mut disks = DiagnosticsSection::new(LOGICAL_DISKS);
        for (mount, available, total) in self.disks {
            disks.rows.push(vec![
                format!("Drive: {mount}"),
                format!("Free Space: {available}"),
                format!("Size: {total}"),
            ]);
        }
        if !disks.rows.is_empty() {
            sections.push(disks);
        }

        sections
    }
}

/// Diagnostics from `sysinfo`, plus NVML and CPUID when those features are on
#[derive(Debug, Default)]
pub struct SysinfoProvider;

impl SysinfoProvider {
    pub fn new() -> Self {
        Self
    }

    fn probe() -> HostProbe {
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        let cpu_brand = cpuid_brand().or_else(|| {
            system
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .filter(|brand| !brand.trim().is_empty())
        });

        let disks = Disks::new_with_refreshed_list()
            .iter()
            .map(|disk| {
                (
                    disk.mount_point().to_string_lossy().to_string(),
                    disk.available_space(),
                    disk.total_space(),
                )
            })
            .collect();

        HostProbe {
            cpu_brand,
            total_memory_bytes: system.total_memory(),
            gpus: nvml_gpus(),
            disks,
        }
    }
}

#[async_trait]
impl DiagnosticsProvider for SysinfoProvider {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    async fn collect_sections(&self) -> Result<Vec<DiagnosticsSection>, SystemError> {
        let probe = tokio::task::spawn_blocking(Self::probe)
            .await
            .map_err(|e| SystemError::IoError(format!("System probe failed: {e}")))?;
        debug!("sysinfo probe: {probe:?}");
        Ok(probe.into_sections())
    }

    async fn get_missing_dependencies(&self) -> Result<Vec<String>, SystemError> {
        Ok(Vec::new())
    }
}

#[cfg(all(feature = "x86-cpu", any(target_arch = "x86", target_arch = "x86_64")))]
fn cpuid_brand() -> Option<String> {
    raw_cpuid::CpuId::new()
        .get_processor_brand_string()
        .map(|brand| brand.as_str().trim().to_string())
        .filter(|brand| !brand.is_empty())
}

#[cfg(not(all(feature = "x86-cpu", any(target_arch = "x86", target_arch = "x86_64"))))]
fn cpuid_brand() -> Option<String> {
    None
}

#[cfg(feature = "nvidia")]
fn nvml_gpus() -> Vec<(String, Option<u64>)> {
    use nvml_wrapper::Nvml;

    let nvml = match Nvml::init() {
        Ok(nvml) => nvml,
        Err(e) => {
            debug!("NVML unavailable: {e}");
            return Vec::new();
        }
    };
    let count = nvml.device_count().unwrap_or(0);

    (0..count)
        .filter_map(|index| {
            let device = nvml.device_by_index(index).ok()?;
            let name = device.name().ok()?;
            let vram = device.memory_info().ok().map(|memory| memory.total);
            Some((name, vram))
        })
        .collect()
}

#[cfg(not(feature = "nvidia"))]
fn nvml_gpus() -> Vec<(String, Option<u64>)> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parsers::{extract_system_specs, gpu_rank, parse_vram_mb};
    use crate::domain::RankTables;

    #[test]
    fn test_probe_into_sections() {
        let probe = HostProbe {
            cpu_brand: Some("AMD Ryzen 9 7950X   16-Core Processor".to_string()),
            total_memory_bytes: 34_359_738_368,
            gpus: vec![("NVIDIA GeForce RTX 4080".to_string(), Some(17_171_480_576))],
            disks: vec![("/".to_string(), 214_748_364_800, 1_099_511_627_776)],
        };

        let specs = extract_system_specs(&probe.into_sections());
        assert_eq!(specs.cpu.as_deref(), Some("AMD Ryzen 9 7950X 16-Core Processor"));
        assert_eq!(specs.ram.as_deref(), Some("32768MB RAM"));
        assert_eq!(specs.gpu.as_deref(), Some("NVIDIA GeForce RTX 4080 (16 GB)"));
        assert_eq!(specs.storage.as_deref(), Some("200 GB"));
        assert_eq!(
            specs.storage_display.as_deref(),
            Some("Drive: / (1024 GB) Free: 200 GB")
        );
    }

    #[test]
    fn test_vram_does_not_look_like_a_model_number() {
        let tables = RankTables::builtin();
        let probe = HostProbe {
            cpu_brand: None,
            total_memory_bytes: 0,
            gpus: vec![
                ("NVIDIA TITAN RTX".to_string(), Some(25_769_803_776)),
                ("Tiny Adapter".to_string(), Some(536_870_912)),
            ],
            disks: Vec::new(),
        };

        let sections = probe.into_sections();
        let cards: Vec<&str> = sections[0].values("CardName").collect();
        assert_eq!(cards, vec!["NVIDIA TITAN RTX (24 GB)", "Tiny Adapter"]);
        assert_eq!(gpu_rank(&tables, cards[0]), gpu_rank(&tables, "NVIDIA TITAN RTX"));
        assert_eq!(parse_vram_mb(cards[0]), 24 * 1024);
    }

    #[test]
    fn test_empty_probe_has_no_sections() {
        assert!(HostProbe::default().into_sections().is_empty());
    }

    #[tokio::test]
    async fn test_collect_sections_runs() {
        let provider = SysinfoProvider::new();
        assert!(provider.collect_sections().await.is_ok());
        assert!(provider.get_missing_dependencies().await.unwrap().is_empty());
    }
}
