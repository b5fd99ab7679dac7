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

use crate::domain::CommandError;
use async_trait::async_trait;
use std::time::Duration;

/// An external program invocation (e.g. `dxdiag /x report.xml`)
#[derive(Debug, Clone)]
pub struct SystemCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Execution timeout; the executor default applies when unset
    pub timeout: Option<Duration>,
}

impl SystemCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Command line as typed in a shell, for log messages
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub success: bool,
}

/// Secondary port - Command execution abstraction
///
/// Lets diagnostics adapters run external tools without depending on the
/// process API, so tests can substitute canned output.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute a system command
    ///
    /// # Arguments
    /// * `command` - The command to execute
    ///
    /// # Returns
    /// * `Ok(CommandOutput)` - Output and status, including non-zero exits
    /// * `Err(CommandError)` - The command could not be run or timed out
    async fn execute(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError>;

    /// Check if a program can be found on `PATH`
    async fn is_command_available(&self, command_name: &str) -> Result<bool, CommandError>;
}
