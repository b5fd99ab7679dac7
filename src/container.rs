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

//! Dependency injection container for compatibility check services

use crate::adapters::{
    DxDiagProvider, DxDiagReportFile, FileSystemRepository, ProcessCommandExecutor, RawgClient,
    SteamStoreClient, StorefrontLookup, SysinfoProvider,
};
use crate::domain::{CompatibilityCheckService, ComparisonEngine, DomainError, RankTables};
use crate::ports::{
    CommandExecutor, CompatibilityChecking, ConfigurationProvider, DiagnosticsProvider,
    OutputFormat, ReportRepository, RequirementsSource,
};
use log::info;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Which diagnostics provider to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    /// dxdiag on Windows, sysinfo elsewhere
    #[default]
    Auto,
    DxDiag,
    Sysinfo,
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ProviderKind::Auto),
            "dxdiag" => Ok(ProviderKind::DxDiag),
            "sysinfo" => Ok(ProviderKind::Sysinfo),
            other => Err(DomainError::InvalidConfiguration(format!(
                "unknown provider '{other}' (expected auto, dxdiag or sysinfo)"
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Auto => "auto",
            ProviderKind::DxDiag => "dxdiag",
            ProviderKind::Sysinfo => "sysinfo",
        })
    }
}

/// Configuration for the dependency injection container
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Deadline for the diagnostics tool, including writing its report
    pub command_timeout: Duration,
    /// Command retry count
    pub retry_count: u32,
    /// Enable verbose logging
    pub verbose: bool,
    /// Timeout for each storefront request
    pub http_timeout: Duration,
    pub provider: ProviderKind,
    /// Existing dxdiag report to read instead of running a provider
    pub report_path: Option<PathBuf>,
    /// Rank table override file
    pub tables_path: Option<PathBuf>,
    /// RAWG API key; RAWG search is skipped without one
    pub rawg_api_key: Option<String>,
    pub output_format: OutputFormat,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(120),
            retry_count: 0,
            verbose: false,
            http_timeout: Duration::from_secs(30),
            provider: ProviderKind::Auto,
            report_path: None,
            tables_path: None,
            rawg_api_key: None,
            output_format: OutputFormat::Text,
        }
    }
}

/// Configuration provider backed by a [`ContainerConfig`]
pub struct SimpleConfigurationProvider {
    config: ContainerConfig,
}

impl SimpleConfigurationProvider {
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl ConfigurationProvider for SimpleConfigurationProvider {
    async fn get_rank_tables(&self) -> Result<Arc<RankTables>, DomainError> {
        match &self.config.tables_path {
            Some(path) => {
                let tables = RankTables::load(path)?;
                info!("Loaded rank tables from {}", path.display());
                Ok(Arc::new(tables))
            }
            None => Ok(RankTables::shared_builtin()),
        }
    }

    async fn get_output_format(&self) -> Result<OutputFormat, DomainError> {
        Ok(self.config.output_format)
    }
}

/// Dependency injection container
pub struct ServiceContainer {
    config: ContainerConfig,
}

impl ServiceContainer {
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Create the command executor
    pub fn create_command_executor(&self) -> Arc<dyn CommandExecutor> {
        Arc::new(ProcessCommandExecutor::new(
            self.config.command_timeout,
            self.config.retry_count,
            self.config.verbose,
        ))
    }

    /// Create the diagnostics provider
    ///
    /// A configured report file wins over the provider choice.
    pub fn create_diagnostics_provider(&self) -> Arc<dyn DiagnosticsProvider> {
        if let Some(path) = &self.config.report_path {
            return Arc::new(DxDiagReportFile::new(path.clone()));
        }

        let use_dxdiag = match self.config.provider {
            ProviderKind::DxDiag => true,
            ProviderKind::Sysinfo => false,
            ProviderKind::Auto => cfg!(windows),
        };

        if use_dxdiag {
            Arc::new(DxDiagProvider::with_temp_output(
                self.create_command_executor(),
                self.config.command_timeout,
            ))
        } else {
            Arc::new(SysinfoProvider::new())
        }
    }

    /// Create the storefront requirement lookup
    pub fn create_requirements_source(&self) -> Result<Arc<dyn RequirementsSource>, Box<dyn Error>> {
        let steam: Arc<dyn RequirementsSource> =
            Arc::new(SteamStoreClient::new(self.config.http_timeout)?);

        let rawg = match self.config.rawg_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                let client: Arc<dyn RequirementsSource> =
                    Arc::new(RawgClient::new(key, self.config.http_timeout)?);
                Some(client)
            }
            _ => None,
        };

        Ok(Arc::new(StorefrontLookup::new(steam, rawg)))
    }

    /// Create the configuration provider
    pub fn create_configuration_provider(&self) -> Arc<dyn ConfigurationProvider> {
        Arc::new(SimpleConfigurationProvider::new(self.config.clone()))
    }

    /// Create the report repository
    pub fn create_report_repository(&self) -> Arc<dyn ReportRepository> {
        Arc::new(FileSystemRepository::new())
    }

    /// Create the complete compatibility check service
    pub async fn create_compatibility_service(
        &self,
    ) -> Result<Arc<dyn CompatibilityChecking>, Box<dyn Error>> {
        let tables = self.create_configuration_provider().get_rank_tables().await?;
        let service = CompatibilityCheckService::new(
            self.create_diagnostics_provider(),
            self.create_requirements_source()?,
            ComparisonEngine::new(tables),
        );
        Ok(Arc::new(service))
    }

    /// Get platform name for logging
    pub fn get_platform_name(&self) -> &'static str {
        if cfg!(windows) {
            "Windows"
        } else if cfg!(target_os = "macos") {
            "macOS"
        } else if cfg!(target_os = "linux") {
            "Linux"
        } else {
            "Unknown"
        }
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

/// Builder pattern for container configuration
#[derive(Default)]
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.command_timeout = timeout;
        self
    }

    pub fn retry_count(mut self, count: u32) -> Self {
        self.config.retry_count = count;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.config.provider = provider;
        self
    }

    pub fn report_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.report_path = path;
        self
    }

    pub fn tables_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.tables_path = path;
        self
    }

    pub fn rawg_api_key(mut self, key: Option<String>) -> Self {
        self.config.rawg_api_key = key;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ContainerConfig {
        self.config
    }
}
