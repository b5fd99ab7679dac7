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

use crate::domain::{DiagnosticsSection, SystemError};
use async_trait::async_trait;

/// Secondary port - Hardware diagnostics source
///
/// Implementations produce the raw sections of a diagnostics report; the
/// domain maps them to [`SystemSpecs`](crate::domain::SystemSpecs).
#[async_trait]
pub trait DiagnosticsProvider: Send + Sync {
    /// Short name used in log messages ("dxdiag", "sysinfo")
    fn name(&self) -> &'static str;

    /// Run the diagnostics and return the report sections
    ///
    /// # Returns
    /// * `Ok(Vec<DiagnosticsSection>)` - Sections in report order
    /// * `Err(SystemError)` - Tool missing, timed out, or produced no report
    async fn collect_sections(&self) -> Result<Vec<DiagnosticsSection>, SystemError>;

    /// Tools this provider needs that are not installed
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Missing programs (empty if all present)
    async fn get_missing_dependencies(&self) -> Result<Vec<String>, SystemError>;
}
