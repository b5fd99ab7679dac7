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

use super::{ComparisonEngine, ComparisonSession};
use crate::domain::parsers::extract_system_specs;
use crate::domain::{
    CheckError, CheckOutcome, DomainError, GameQuery, RequirementLookup, SystemSpecs,
};
use crate::ports::{CompatibilityChecking, DiagnosticsProvider, RequirementsSource};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

/// Domain service that implements the compatibility check
///
/// Coordinates the diagnostics provider and the requirements source and
/// feeds their results into a fresh [`ComparisonSession`] per check.
pub struct CompatibilityCheckService {
    /// Hardware diagnostics (dxdiag, sysinfo, or a saved report)
    diagnostics: Arc<dyn DiagnosticsProvider>,
    /// Storefront requirement lookup
    requirements: Arc<dyn RequirementsSource>,
    engine: ComparisonEngine,
}

impl CompatibilityCheckService {
    /// Create a new compatibility check service
    ///
    /// # Arguments
    /// * `diagnostics` - Provider of the local diagnostics report
    /// * `requirements` - Source of published game requirements
    /// * `engine` - Comparison engine holding the rank tables
    pub fn new(
        diagnostics: Arc<dyn DiagnosticsProvider>,
        requirements: Arc<dyn RequirementsSource>,
        engine: ComparisonEngine,
    ) -> Self {
        Self {
            diagnostics,
            requirements,
            engine,
        }
    }
}

#[async_trait]
impl CompatibilityChecking for CompatibilityCheckService {
    async fn collect_system_specs(&self) -> Result<SystemSpecs, CheckError> {
        let sections = self
            .diagnostics
            .collect_sections()
            .await
            .map_err(DomainError::from)?;

        let specs = extract_system_specs(&sections);
        if specs.is_empty() {
            return Err(DomainError::SystemInfoUnavailable(format!(
                "{} report contained no CPU, GPU, RAM or storage data",
                self.diagnostics.name()
            ))
            .into());
        }

        info!("System specs collected via {}", self.diagnostics.name());
        Ok(specs)
    }

    async fn lookup_requirements(
        &self,
        query: &GameQuery,
    ) -> Result<RequirementLookup, CheckError> {
        query.validate()?;
        let lookup = self.requirements.lookup(query).await?;
        info!("Requirements for {query} found via {}", lookup.source);
        Ok(lookup)
    }

    async fn check(&self, query: &GameQuery) -> Result<CheckOutcome, CheckError> {
        query.validate()?;

        let (system_result, lookup_result) =
            tokio::join!(self.collect_system_specs(), self.lookup_requirements(query));

        let mut session = ComparisonSession::new(self.engine.clone());
        let mut outcome = CheckOutcome::default();

        match system_result {
            Ok(specs) => {
                session.set_system_specs(specs);
            }
            Err(e) => {
                warn!("System detection failed: {e}");
                outcome.system_error = Some(e.to_string());
            }
        }

        match lookup_result {
            Ok(lookup) => {
                outcome.game_name = lookup.game_name;
                session.set_requirements(lookup.requirements);
            }
            Err(e) => {
                warn!("Requirement lookup for {query} failed: {e}");
                outcome.lookup_error = Some(e.to_string());
            }
        }

        if outcome.game_name.is_none() {
            outcome.game_name = query.name().map(str::to_string);
        }

        let (system_specs, requirements, report) = session.into_parts();
        outcome.system_specs = system_specs;
        outcome.requirements = requirements;
        outcome.report = report;
        Ok(outcome)
    }

    async fn validate_dependencies(&self) -> Result<Vec<String>, CheckError> {
        self.diagnostics
            .get_missing_dependencies()
            .await
            .map_err(|e| CheckError::Domain(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parsers::{DISPLAY_DEVICES, SYSTEM_INFORMATION};
    use crate::domain::{
        Component, DiagnosticsSection, LookupError, RequirementSpecs, SystemError, Verdict,
    };

    struct MockDiagnostics {
        sections: Option<Vec<DiagnosticsSection>>,
    }

    #[async_trait]
    impl DiagnosticsProvider for MockDiagnostics {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn collect_sections(&self) -> Result<Vec<DiagnosticsSection>, SystemError> {
            self.sections
                .clone()
                .ok_or_else(|| SystemError::CommandNotFound("dxdiag".to_string()))
        }

        async fn get_missing_dependencies(&self) -> Result<Vec<String>, SystemError> {
            Ok(if self.sections.is_some() {
                Vec::new()
            } else {
                vec!["dxdiag".to_string()]
            })
        }
    }

    struct MockRequirements {
        result: Option<RequirementLookup>,
    }

    #[async_trait]
    impl RequirementsSource for MockRequirements {
        async fn lookup(&self, query: &GameQuery) -> Result<RequirementLookup, LookupError> {
            self.result
                .clone()
                .ok_or_else(|| LookupError::NotFound(query.to_string()))
        }
    }

    fn sections() -> Vec<DiagnosticsSection> {
        let row = |k: &str, v: &str| vec![k.to_string(), v.to_string()];
        vec![
            DiagnosticsSection {
                name: SYSTEM_INFORMATION.to_string(),
                rows: vec![
                    row("Processor", "AMD Ryzen 7 5800X 8-Core Processor"),
                    row("Memory", "32768MB RAM"),
                ],
            },
            DiagnosticsSection {
                name: DISPLAY_DEVICES.to_string(),
                rows: vec![row("CardName", "NVIDIA GeForce RTX 3070")],
            },
        ]
    }

    fn lookup() -> RequirementLookup {
        RequirementLookup {
            game_name: Some("ELDEN RING".to_string()),
            requirements: RequirementSpecs {
                cpu: "INTEL CORE I5-8400 or AMD RYZEN 3 3300X".to_string(),
                gpu: "NVIDIA GEFORCE GTX 1060 3 GB".to_string(),
                ram: "12 GB RAM".to_string(),
                storage: "60 GB available space".to_string(),
            },
            source: "steam".to_string(),
        }
    }

    fn service(
        sections: Option<Vec<DiagnosticsSection>>,
        result: Option<RequirementLookup>,
    ) -> CompatibilityCheckService {
        CompatibilityCheckService::new(
            Arc::new(MockDiagnostics { sections }),
            Arc::new(MockRequirements { result }),
            ComparisonEngine::default(),
        )
    }

    #[tokio::test]
    async fn test_check_produces_report() {
        let service = service(Some(sections()), Some(lookup()));
        let outcome = service.check(&GameQuery::by_name("elden ring")).await.unwrap();

        let report = outcome.report.unwrap();
        assert_eq!(report.verdict(Component::Cpu), Verdict::MeetsOrExceeds);
        assert_eq!(report.verdict(Component::Gpu), Verdict::MeetsOrExceeds);
        assert_eq!(report.verdict(Component::Ram), Verdict::MeetsOrExceeds);
        assert_eq!(report.verdict(Component::Storage), Verdict::SystemInfoNotFound);
        assert_eq!(outcome.game_name.as_deref(), Some("ELDEN RING"));
        assert!(outcome.system_error.is_none());
        assert!(outcome.lookup_error.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_keeps_system_specs() {
        let service = service(Some(sections()), None);
        let outcome = service.check(&GameQuery::by_name("Unknown Game")).await.unwrap();

        assert!(outcome.report.is_none());
        assert!(outcome.system_specs.is_some());
        assert!(outcome.lookup_error.unwrap().contains("Unknown Game"));
        assert_eq!(outcome.game_name.as_deref(), Some("Unknown Game"));
    }

    #[tokio::test]
    async fn test_diagnostics_failure_keeps_requirements() {
        let service = service(None, Some(lookup()));
        let outcome = service.check(&GameQuery::by_app_id("1245620")).await.unwrap();

        assert!(outcome.report.is_none());
        assert!(outcome.requirements.is_some());
        assert!(outcome.system_error.unwrap().contains("dxdiag"));
        assert_eq!(
            service.validate_dependencies().await.unwrap(),
            vec!["dxdiag".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_report_is_unavailable() {
        let service = service(Some(Vec::new()), Some(lookup()));
        let err = service.collect_system_specs().await.unwrap_err();
        assert!(matches!(
            err,
            CheckError::Domain(DomainError::SystemInfoUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_query_rejected() {
        let service = service(Some(sections()), Some(lookup()));
        let err = service.check(&GameQuery::default()).await.unwrap_err();
        assert!(matches!(err, CheckError::InvalidQuery(_)));
    }
}
