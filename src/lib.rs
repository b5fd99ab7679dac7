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

//! Rigcheck Library
//!
//! This library compares the hardware of the current PC against a game's
//! minimum system requirements using a Ports and Adapters (Hexagonal)
//! architecture.
//!
//! # Architecture
//!
//! - **Domain**: Rank tables, text parsers and the comparison engine
//! - **Ports**: Interfaces for diagnostics, requirement sources and storage
//! - **Adapters**: dxdiag, sysinfo, Steam, RAWG and file system implementations
//!
//! # Usage
//!
//! ## As a Library
//!
//! ```rust,no_run
//! use rigcheck::{ContainerConfig, GameQuery, ServiceContainer};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = ServiceContainer::new(ContainerConfig::default());
//!     let service = container.create_compatibility_service().await?;
//!
//!     let outcome = service.check(&GameQuery::by_name("Portal 2")).await?;
//!     if let Some(report) = outcome.report {
//!         for row in &report.verdicts {
//!             println!("{}: {}", row.component, row.verdict);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Comparing Known Values
//!
//! ```rust
//! use rigcheck::{Component, ComparisonEngine, RequirementSpecs, SystemSpecs, Verdict};
//!
//! let system = SystemSpecs {
//!     ram: Some("16384MB RAM".to_string()),
//!     ..Default::default()
//! };
//! let requirements = RequirementSpecs {
//!     ram: "8 GB RAM".to_string(),
//!     ..Default::default()
//! };
//! let report = ComparisonEngine::default().compare(&system, &requirements);
//! assert_eq!(report.verdict(Component::Ram), Verdict::MeetsOrExceeds);
//! ```

pub mod adapters;
pub mod container;
pub mod domain;
pub mod output;
pub mod ports;

pub use adapters::{
    DxDiagProvider, DxDiagReportFile, FileSystemRepository, ProcessCommandExecutor, RawgClient,
    SteamStoreClient, StorefrontLookup, SysinfoProvider,
};
pub use container::{ContainerConfig, ContainerConfigBuilder, ProviderKind, ServiceContainer};
pub use domain::{
    CheckError, CheckOutcome, ComparisonEngine, ComparisonReport, ComparisonSession, Component,
    ComponentVerdict, ConfigError, DomainError, GameQuery, LookupError, PublishError, RankRule,
    RankTables, RequirementLookup, RequirementSpecs, SystemError, SystemSpecs, Verdict,
};
pub use output::OutputFormatter;
pub use ports::{
    CommandExecutor, CompatibilityChecking, ConfigurationProvider, DiagnosticsProvider,
    OutputFormat, ReportRepository, RequirementsSource,
};
