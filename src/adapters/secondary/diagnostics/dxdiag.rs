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

//! dxdiag-based diagnostics providers
//!
//! [`DxDiagProvider`] runs `dxdiag /x <file>` and parses the XML it writes;
//! [`DxDiagReportFile`] parses a report saved earlier.

use crate::domain::parsers::{decode_report_bytes, parse_dxdiag_xml};
use crate::domain::{DiagnosticsSection, SystemError};
use crate::ports::{CommandExecutor, DiagnosticsProvider, SystemCommand};
use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::time::{sleep, Instant};

const DXDIAG: &str = "dxdiag";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

async fn read_report(path: &Path) -> Result<Vec<DiagnosticsSection>, SystemError> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| SystemError::IoError(format!("Could not open {}: {e}", path.display())))?;
    let xml = decode_report_bytes(&bytes);
    let sections = parse_dxdiag_xml(&xml).map_err(SystemError::ParseError)?;
    debug!("Parsed {} sections from {}", sections.len(), path.display());
    Ok(sections)
}

/// Runs the DirectX diagnostic tool and parses its XML output
pub struct DxDiagProvider {
    command_executor: Arc<dyn CommandExecutor>,
    /// Where dxdiag writes its report
    output_path: PathBuf,
    /// Upper bound for the tool run and for the report file to appear
    timeout: Duration,
}

impl DxDiagProvider {
    /// Create a new dxdiag provider
    ///
    /// # Arguments
    /// * `command_executor` - Executor used to launch dxdiag
    /// * `output_path` - Report file location
    /// * `timeout` - Deadline for dxdiag to finish writing the report
    pub fn new(
        command_executor: Arc<dyn CommandExecutor>,
        output_path: PathBuf,
        timeout: Duration,
    ) -> Self {
        Self {
            command_executor,
            output_path,
            timeout,
        }
    }

    /// Provider writing its report to the system temp directory
    pub fn with_temp_output(command_executor: Arc<dyn CommandExecutor>, timeout: Duration) -> Self {
        let output_path = std::env::temp_dir().join("rigcheck_dxdiag.xml");
        Self::new(command_executor, output_path, timeout)
    }

    /// dxdiag may return before the report is flushed; wait for a non-empty file
    async fn wait_for_report(&self, deadline: Instant) -> Result<(), SystemError> {
        loop {
            if let Ok(metadata) = fs::metadata(&self.output_path).await {
                if metadata.len() > 0 {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(SystemError::Timeout(format!(
                    "dxdiag did not write {} within {:?}",
                    self.output_path.display(),
                    self.timeout
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl DiagnosticsProvider for DxDiagProvider {
    fn name(&self) -> &'static str {
        DXDIAG
    }

    async fn collect_sections(&self) -> Result<Vec<DiagnosticsSection>, SystemError> {
        // A stale report would otherwise satisfy the wait immediately
        if fs::metadata(&self.output_path).await.is_ok() {
            fs::remove_file(&self.output_path).await.map_err(|e| {
                SystemError::IoError(format!(
                    "Could not remove stale {}: {e}",
                    self.output_path.display()
                ))
            })?;
        }

        let deadline = Instant::now() + self.timeout;
        let output_arg = self.output_path.to_string_lossy().into_owned();
        let command = SystemCommand::new(DXDIAG)
            .args(&["/x", output_arg.as_str()])
            .timeout(self.timeout);

        info!("Running {}", command.display());
        let output = self.command_executor.execute(&command).await?;
        if !output.success {
            return Err(SystemError::CommandFailed {
                command: command.display(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        self.wait_for_report(deadline).await?;
        let sections = read_report(&self.output_path).await;

        if let Err(e) = fs::remove_file(&self.output_path).await {
            debug!("Could not remove {}: {e}", self.output_path.display());
        }
        sections
    }

    async fn get_missing_dependencies(&self) -> Result<Vec<String>, SystemError> {
        let available = self.command_executor.is_command_available(DXDIAG).await?;
        Ok(if available {
            Vec::new()
        } else {
            vec![DXDIAG.to_string()]
        })
    }
}

/// Parses a dxdiag XML report that already exists on disk
pub struct DxDiagReportFile {
    path: PathBuf,
}

impl DxDiagReportFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DiagnosticsProvider for DxDiagReportFile {
    fn name(&self) -> &'static str {
        "dxdiag report"
    }

    async fn collect_sections(&self) -> Result<Vec<DiagnosticsSection>, SystemError> {
        info!("Reading dxdiag report {}", self.path.display());
        read_report(&self.path).await
    }

    async fn get_missing_dependencies(&self) -> Result<Vec<String>, SystemError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommandError;
    use crate::domain::parsers::{DISPLAY_DEVICES, SYSTEM_INFORMATION};
    use crate::ports::CommandOutput;
    use tempfile::tempdir;

    const REPORT: &str = "<DxDiag><SystemInformation><Processor>Intel Core i5-9400</Processor>\
        <Memory>8192MB RAM</Memory></SystemInformation><DisplayDevices><DisplayDevice>\
        <CardName>NVIDIA GeForce GTX 1660</CardName></DisplayDevice></DisplayDevices></DxDiag>";

    /// Writes the canned report to the path passed after `/x`
    struct FakeDxDiag {
        exit_code: i32,
        write_report: bool,
    }

    #[async_trait]
    impl CommandExecutor for FakeDxDiag {
        async fn execute(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError> {
            assert_eq!(command.program, "dxdiag");
            assert_eq!(command.args[0], "/x");
            if self.write_report {
                std::fs::write(&command.args[1], REPORT)
                    .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;
            }
            Ok(CommandOutput {
                stdout: String::new(),
                stderr: if self.exit_code == 0 {
                    String::new()
                } else {
                    "access denied".to_string()
                },
                exit_code: Some(self.exit_code),
                success: self.exit_code == 0,
            })
        }

        async fn is_command_available(&self, _command_name: &str) -> Result<bool, CommandError> {
            Ok(self.write_report)
        }
    }

    fn provider(dir: &Path, exit_code: i32, write_report: bool) -> DxDiagProvider {
        DxDiagProvider::new(
            Arc::new(FakeDxDiag {
                exit_code,
                write_report,
            }),
            dir.join("dxdiag.xml"),
            Duration::from_millis(600),
        )
    }

    #[tokio::test]
    async fn test_collect_sections_from_dxdiag() {
        let dir = tempdir().unwrap();
        let provider = provider(dir.path(), 0, true);

        let sections = provider.collect_sections().await.unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, SYSTEM_INFORMATION);
        assert_eq!(sections[1].name, DISPLAY_DEVICES);
        assert!(!dir.path().join("dxdiag.xml").exists());
        assert!(provider.get_missing_dependencies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_dxdiag_run() {
        let dir = tempdir().unwrap();
        let provider = provider(dir.path(), 1, true);

        let err = provider.collect_sections().await.unwrap_err();
        assert!(matches!(err, SystemError::CommandFailed { .. }));
        assert!(err.to_string().contains("access denied"));
    }

    #[tokio::test]
    async fn test_report_never_written() {
        let dir = tempdir().unwrap();
        let provider = provider(dir.path(), 0, false);

        let err = provider.collect_sections().await.unwrap_err();
        assert!(matches!(err, SystemError::Timeout(_)));
        assert_eq!(
            provider.get_missing_dependencies().await.unwrap(),
            vec!["dxdiag".to_string()]
        );
    }

    #[tokio::test]
    async fn test_existing_report_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.xml");
        std::fs::write(&path, REPORT).unwrap();

        let sections = DxDiagReportFile::new(path).collect_sections().await.unwrap();
        assert_eq!(sections[0].values("Processor").next(), Some("Intel Core i5-9400"));

        let missing = DxDiagReportFile::new(dir.path().join("missing.xml"));
        assert!(matches!(
            missing.collect_sections().await,
            Err(SystemError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_report_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.xml");
        std::fs::write(&path, "<Report></Report>").unwrap();

        let err = DxDiagReportFile::new(path).collect_sections().await.unwrap_err();
        assert!(matches!(err, SystemError::ParseError(_)));
    }
}
