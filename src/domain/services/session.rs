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

use super::ComparisonEngine;
use crate::domain::{ComparisonReport, RequirementSpecs, SystemSpecs};
use log::debug;

/// Holds the latest system specs and requirements of one check
///
/// Either slot may be filled first. Every update goes through
/// [`recompute_if_ready`], which produces a new report only once both slots
/// are filled and otherwise leaves the previous report in place.
///
/// [`recompute_if_ready`]: ComparisonSession::recompute_if_ready
#[derive(Debug, Default)]
pub struct ComparisonSession {
    engine: ComparisonEngine,
    system_specs: Option<SystemSpecs>,
    requirements: Option<RequirementSpecs>,
    latest_report: Option<ComparisonReport>,
}

impl ComparisonSession {
    pub fn new(engine: ComparisonEngine) -> Self {
        Self {
            engine,
            system_specs: None,
            requirements: None,
            latest_report: None,
        }
    }

    /// Replace the system slot and recompute
    pub fn set_system_specs(&mut self, specs: SystemSpecs) -> Option<&ComparisonReport> {
        self.system_specs = Some(specs);
        self.recompute_if_ready()
    }

    /// Replace the requirements slot and recompute
    pub fn set_requirements(&mut self, requirements: RequirementSpecs) -> Option<&ComparisonReport> {
        self.requirements = Some(requirements);
        self.recompute_if_ready()
    }

    /// Compare when both slots are filled
    ///
    /// # Returns
    /// * `Some(report)` - Freshly computed report
    /// * `None` - A slot is still empty; the latest report is unchanged
    pub fn recompute_if_ready(&mut self) -> Option<&ComparisonReport> {
        let (Some(system), Some(requirements)) = (&self.system_specs, &self.requirements) else {
            debug!(
                "Comparison deferred (system: {}, requirements: {})",
                self.system_specs.is_some(),
                self.requirements.is_some()
            );
            return None;
        };

        let report = self.engine.compare(system, requirements);
        self.latest_report = Some(report);
        self.latest_report.as_ref()
    }

    pub fn latest_report(&self) -> Option<&ComparisonReport> {
        self.latest_report.as_ref()
    }

    pub fn system_specs(&self) -> Option<&SystemSpecs> {
        self.system_specs.as_ref()
    }

    pub fn requirements(&self) -> Option<&RequirementSpecs> {
        self.requirements.as_ref()
    }

    /// Empty both slots and drop the latest report
    pub fn clear(&mut self) {
        self.system_specs = None;
        self.requirements = None;
        self.latest_report = None;
    }

    /// Consume the session, returning its slots and latest report
    pub fn into_parts(
        self,
    ) -> (
        Option<SystemSpecs>,
        Option<RequirementSpecs>,
        Option<ComparisonReport>,
    ) {
        (self.system_specs, self.requirements, self.latest_report)
    }
}
