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

//! Local process execution adapter

use crate::domain::{CommandError, SystemError};
use crate::ports::{CommandExecutor, CommandOutput, SystemCommand};
use async_trait::async_trait;
use log::{debug, warn};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Program used to resolve a command on `PATH`
const LOCATOR: &str = if cfg!(windows) { "where" } else { "which" };

/// Runs commands as child processes with timeouts and retries
pub struct ProcessCommandExecutor {
    /// Default timeout for commands
    default_timeout: Duration,
    /// Number of retry attempts for failed commands
    retry_count: u32,
    verbose: bool,
}

impl ProcessCommandExecutor {
    /// Create a new process command executor
    ///
    /// # Arguments
    /// * `default_timeout` - Timeout for commands that set none
    /// * `retry_count` - Extra attempts after a failed spawn or timeout
    /// * `verbose` - Log every command line at debug level
    pub fn new(default_timeout: Duration, retry_count: u32, verbose: bool) -> Self {
        Self {
            default_timeout,
            retry_count,
            verbose,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Duration::from_secs(30), 2, false)
    }

    async fn execute_with_retry(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError> {
        let mut attempt = 0;
        loop {
            match self.execute_once(command).await {
                Ok(output) => return Ok(output),
                // A missing program will not appear between attempts
                Err(e @ CommandError::System(SystemError::CommandNotFound(_))) => return Err(e),
                Err(e) if attempt >= self.retry_count => return Err(e),
                Err(e) => {
                    attempt += 1;
                    warn!(
                        "'{}' failed on attempt {attempt}, retrying: {e}",
                        command.display()
                    );
                    tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                }
            }
        }
    }

    async fn execute_once(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError> {
        let command_timeout = command.timeout.unwrap_or(self.default_timeout);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if self.verbose {
            debug!("Executing: {}", command.display());
        }

        match timeout(command_timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                let success = output.status.success();
                let exit_code = output.status.code();

                if !success {
                    debug!("'{}' exited with {exit_code:?}: {}", command.program, stderr.trim());
                }

                Ok(CommandOutput {
                    stdout,
                    stderr,
                    exit_code,
                    success,
                })
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => Err(CommandError::System(
                SystemError::CommandNotFound(command.program.clone()),
            )),
            Ok(Err(e)) if e.kind() == ErrorKind::PermissionDenied => Err(CommandError::System(
                SystemError::PermissionDenied(format!("{}: {e}", command.program)),
            )),
            Ok(Err(e)) => Err(CommandError::ExecutionFailed(format!(
                "Failed to execute command '{}': {e}",
                command.program
            ))),
            Err(_) => Err(CommandError::System(SystemError::Timeout(format!(
                "Command '{}' timed out after {command_timeout:?}",
                command.program
            )))),
        }
    }
}

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError> {
        self.execute_with_retry(command).await
    }

    async fn is_command_available(&self, command_name: &str) -> Result<bool, CommandError> {
        let locate = SystemCommand::new(LOCATOR)
            .args(&[command_name])
            .timeout(Duration::from_secs(5));

        match self.execute_once(&locate).await {
            Ok(output) => Ok(output.success && !output.stdout.trim().is_empty()),
            Err(_) => Ok(false),
        }
    }
}
