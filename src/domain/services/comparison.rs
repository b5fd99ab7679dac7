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

use crate::domain::parsers::{cpu_rank, gpu_rank, normalize_to_mb, parse_vram_mb};
use crate::domain::{
    ComparisonReport, Component, ComponentVerdict, RankTables, RequirementSpecs, SystemSpecs,
    Verdict,
};
use log::debug;
use std::sync::Arc;

/// Compares detected hardware against published requirements
///
/// The engine keeps no state besides its rank tables: [`compare`] is a pure
/// function of its two inputs and may be called from any thread.
///
/// [`compare`]: ComparisonEngine::compare
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    tables: Arc<RankTables>,
}

impl ComparisonEngine {
    pub fn new(tables: Arc<RankTables>) -> Self {
        Self { tables }
    }

    /// Engine over the shared built-in tables
    pub fn with_builtin_tables() -> Self {
        Self::new(RankTables::shared_builtin())
    }

    pub fn tables(&self) -> &RankTables {
        &self.tables
    }

    /// Produce one verdict per tracked component, in CPU, GPU, RAM, Storage order
    pub fn compare(&self, system: &SystemSpecs, requirements: &RequirementSpecs) -> ComparisonReport {
        let verdicts = Component::ALL
            .iter()
            .map(|&component| {
                let requirement = requirements.get(component);
                let verdict = self.evaluate(component, system.get(component), requirement);
                debug!("{component}: {verdict}");
                ComponentVerdict {
                    component,
                    verdict,
                    system_value: system.display_value(component).map(str::to_string),
                    requirement_value: requirement.to_string(),
                }
            })
            .collect();

        ComparisonReport { verdicts }
    }

    /// Verdict for a single component
    ///
    /// Presence is checked first, the same way for every component: a system
    /// value is present when it is `Some`, a requirement when it is non-empty.
    /// Whitespace counts as text, so a blank requirement reaches the component
    /// rule and usually yields `Unknown`.
    pub fn evaluate(&self, component: Component, system: Option<&str>, requirement: &str) -> Verdict {
        match (system, requirement.is_empty()) {
            (Some(system), false) => match component {
                Component::Cpu => self.compare_cpu(system, requirement),
                Component::Gpu => self.compare_gpu(system, requirement),
                Component::Ram | Component::Storage => compare_quantity(system, requirement),
            },
            (None, false) => Verdict::SystemInfoNotFound,
            (Some(_), true) => Verdict::RequirementNotSpecified,
            (None, true) => Verdict::Unknown,
        }
    }

    fn compare_cpu(&self, system: &str, requirement: &str) -> Verdict {
        let user_rank = cpu_rank(&self.tables, system);
        let required_rank = cpu_rank(&self.tables, requirement);
        debug!("CPU ranks: system {user_rank}, required {required_rank}");

        if user_rank == 0 || required_rank == 0 {
            return Verdict::Unknown;
        }
        at_least(user_rank, required_rank)
    }

    fn compare_gpu(&self, system: &str, requirement: &str) -> Verdict {
        let user_rank = gpu_rank(&self.tables, system);
        let required_rank = gpu_rank(&self.tables, requirement);
        debug!("GPU ranks: system {user_rank}, required {required_rank}");

        if user_rank == 0 || required_rank == 0 {
            // Unranked card: video memory is the only signal left
            return compare_vram(system, requirement).unwrap_or(Verdict::Unknown);
        }

        if user_rank == required_rank {
            // Same tier with unknown memory on either side counts as a match
            return compare_vram(system, requirement).unwrap_or(Verdict::MeetsOrExceeds);
        }
        at_least(user_rank, required_rank)
    }
}

impl Default for ComparisonEngine {
    fn default() -> Self {
        Self::with_builtin_tables()
    }
}

fn at_least<T: PartialOrd>(system: T, required: T) -> Verdict {
    if system >= required {
        Verdict::MeetsOrExceeds
    } else {
        Verdict::MayNotMeet
    }
}

/// VRAM comparison, `None` when either side states no amount
fn compare_vram(system: &str, requirement: &str) -> Option<Verdict> {
    let user_vram = parse_vram_mb(system);
    let required_vram = parse_vram_mb(requirement);
    debug!("VRAM: system {user_vram} MB, required {required_vram} MB");

    (user_vram > 0 && required_vram > 0).then(|| at_least(user_vram, required_vram))
}

/// RAM and storage rule
fn compare_quantity(system: &str, requirement: &str) -> Verdict {
    let user_mb = normalize_to_mb(system);
    let required_mb = normalize_to_mb(requirement);

    if user_mb == 0 || required_mb == 0 {
        return Verdict::Unknown;
    }
    at_least(user_mb, required_mb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(cpu: Option<&str>, gpu: Option<&str>, ram: Option<&str>, storage: Option<&str>) -> SystemSpecs {
        SystemSpecs {
            cpu: cpu.map(str::to_string),
            gpu: gpu.map(str::to_string),
            ram: ram.map(str::to_string),
            storage: storage.map(str::to_string),
            storage_display: None,
        }
    }

    fn requirements(cpu: &str, gpu: &str, ram: &str, storage: &str) -> RequirementSpecs {
        RequirementSpecs {
            cpu: cpu.to_string(),
            gpu: gpu.to_string(),
            ram: ram.to_string(),
            storage: storage.to_string(),
        }
    }

    #[test]
    fn test_cpu_meets_higher_tier() {
        let engine = ComparisonEngine::default();
        let verdict = engine.evaluate(Component::Cpu, Some("Intel i7-9700K"), "Intel i5-9400");
        assert_eq!(verdict, Verdict::MeetsOrExceeds);
        let verdict = engine.evaluate(Component::Cpu, Some("Intel i5-9400"), "Intel i7-9700K");
        assert_eq!(verdict, Verdict::MayNotMeet);
    }

    #[test]
    fn test_cpu_unknown_rank_is_unknown() {
        let engine = ComparisonEngine::default();
        assert_eq!(
            engine.evaluate(Component::Cpu, Some("Celeron N4000"), "Intel i3-8100"),
            Verdict::Unknown
        );
        // An unranked requirement is not "met" just because the system is strong
        assert_eq!(
            engine.evaluate(Component::Cpu, Some("Intel i9-13900K"), "Quad-core 3.0 GHz"),
            Verdict::Unknown
        );
    }

    #[test]
    fn test_missing_system_ram() {
        let engine = ComparisonEngine::default();
        let report = engine.compare(
            &system(Some("Intel i7-9700K"), None, None, None),
            &requirements("", "", "8 GB", ""),
        );
        assert_eq!(report.verdict(Component::Ram), Verdict::SystemInfoNotFound);
        assert_eq!(report.verdict(Component::Cpu), Verdict::RequirementNotSpecified);
        assert_eq!(report.verdict(Component::Gpu), Verdict::Unknown);
        assert_eq!(report.get(Component::Ram).unwrap().system_value, None);
    }

    #[test]
    fn test_storage_below_requirement() {
        let engine = ComparisonEngine::default();
        assert_eq!(
            engine.evaluate(Component::Storage, Some("500 GB"), "1 TB"),
            Verdict::MayNotMeet
        );
        assert_eq!(
            engine.evaluate(Component::Storage, Some("2 TB"), "70 GB available space"),
            Verdict::MeetsOrExceeds
        );
    }

    #[test]
    fn test_quantity_unparseable_is_unknown() {
        let engine = ComparisonEngine::default();
        assert_eq!(
            engine.evaluate(Component::Ram, Some("16384MB RAM"), "lots"),
            Verdict::Unknown
        );
        assert_eq!(
            engine.evaluate(Component::Ram, Some("16384MB RAM"), "12 GB RAM"),
            Verdict::MeetsOrExceeds
        );
    }

    #[test]
    fn test_gpu_equal_rank_without_vram_is_optimistic() {
        let engine = ComparisonEngine::default();
        let system_gpu = "NVIDIA GeForce GTX 1080";
        let required_gpu = "GTX 1080 8GB";
        assert_eq!(
            gpu_rank(engine.tables(), system_gpu),
            gpu_rank(engine.tables(), required_gpu)
        );
        assert_eq!(
            engine.evaluate(Component::Gpu, Some(system_gpu), required_gpu),
            Verdict::MeetsOrExceeds
        );
    }

    #[test]
    fn test_gpu_equal_rank_decided_by_vram() {
        let engine = ComparisonEngine::default();
        assert_eq!(
            engine.evaluate(Component::Gpu, Some("GTX 1060 3GB"), "GTX 1060 6GB"),
            Verdict::MayNotMeet
        );
        assert_eq!(
            engine.evaluate(Component::Gpu, Some("GTX 1060 6GB"), "GTX 1060 3GB"),
            Verdict::MeetsOrExceeds
        );
    }

    #[test]
    fn test_gpu_rank_decides_before_vram() {
        let engine = ComparisonEngine::default();
        assert_eq!(
            engine.evaluate(Component::Gpu, Some("NVIDIA GeForce RTX 3070"), "GTX 1060 6GB"),
            Verdict::MeetsOrExceeds
        );
        assert_eq!(
            engine.evaluate(Component::Gpu, Some("NVIDIA GeForce MX150"), "RTX 2060"),
            Verdict::MayNotMeet
        );
    }

    #[test]
    fn test_unranked_gpu_falls_back_to_vram() {
        let engine = ComparisonEngine::default();
        assert_eq!(
            engine.evaluate(Component::Gpu, Some("Mystery Card 8 GB"), "Any DX12 card with 4 GB"),
            Verdict::MeetsOrExceeds
        );
        assert_eq!(
            engine.evaluate(Component::Gpu, Some("Mystery Card"), "Any DX12 card with 4 GB"),
            Verdict::Unknown
        );
    }

    #[test]
    fn test_blank_text_counts_as_present() {
        let engine = ComparisonEngine::default();
        assert_eq!(
            engine.evaluate(Component::Ram, Some("16 GB"), "   "),
            Verdict::Unknown
        );
        assert_eq!(engine.evaluate(Component::Ram, Some(""), "8 GB"), Verdict::Unknown);
        assert_eq!(engine.evaluate(Component::Cpu, Some("  "), "i5-8400"), Verdict::Unknown);
        assert_eq!(engine.evaluate(Component::Gpu, Some(""), " "), Verdict::Unknown);
        assert_eq!(
            engine.evaluate(Component::Storage, Some("412 GB"), ""),
            Verdict::RequirementNotSpecified
        );
        assert_eq!(
            engine.evaluate(Component::Storage, None, "60 GB"),
            Verdict::SystemInfoNotFound
        );
    }

    #[test]
    fn test_full_report_and_idempotence() {
        let engine = ComparisonEngine::default();
        let specs = SystemSpecs {
            cpu: Some("Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz".to_string()),
            gpu: Some("NVIDIA GeForce RTX 2070 SUPER".to_string()),
            ram: Some("16384MB RAM".to_string()),
            storage: Some("412 GB".to_string()),
            storage_display: Some("Drive: C: (931 GB) Free: 412 GB".to_string()),
        };
        let reqs = requirements("Intel Core i5-8400", "GTX 1060 6GB", "12 GB RAM", "60 GB");

        let first = engine.compare(&specs, &reqs);
        let second = engine.compare(&specs, &reqs);
        assert_eq!(first, second);
        assert!(first.all_met());

        let components: Vec<Component> = first.verdicts.iter().map(|v| v.component).collect();
        assert_eq!(components, Component::ALL.to_vec());
        assert_eq!(
            first.get(Component::Storage).unwrap().system_value.as_deref(),
            Some("Drive: C: (931 GB) Free: 412 GB")
        );
    }
}
