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

use thiserror::Error;

/// Domain-level errors that don't expose infrastructure details
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// System information unavailable
    #[error("System information unavailable: {0}")]
    SystemInfoUnavailable(String),
    /// Insufficient privileges to collect information
    #[error("Insufficient privileges: {0}")]
    InsufficientPrivileges(String),
    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Required system dependencies missing
    #[error("Missing required dependencies: {}", .0.join(", "))]
    MissingDependencies(Vec<String>),
    /// Data parsing failed
    #[error("Data parsing failed: {0}")]
    ParsingFailed(String),
    /// Operation timed out
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Errors surfaced by the compatibility checking service
#[derive(Debug, Clone, Error)]
pub enum CheckError {
    /// Domain operation failed
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Requirement lookup failed
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// Neither a game name nor an AppID was supplied
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Errors raised by requirement sources (storefront and metadata services)
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// Network/HTTP operation failed
    #[error("Network operation failed: {0}")]
    NetworkFailed(String),
    /// The service answered but had no PC requirements for the game
    #[error("No requirements found for {0}")]
    NotFound(String),
    /// The response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors specific to saving comparison reports
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// Reading or writing the report file failed
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

/// Errors raised while loading rank tables and other configuration
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Failed to parse rank tables: {0}")]
    Parse(String),
    #[error("Invalid rank table: {0}")]
    InvalidTable(String),
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        DomainError::InvalidConfiguration(err.to_string())
    }
}

/// System-level errors for adapters (not exposed to domain)
#[derive(Debug, Clone, Error)]
pub enum SystemError {
    /// Command execution failed
    #[error("Command '{command}' failed{}", describe_failure(.exit_code, .stderr))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    /// Command not found
    #[error("Command not found: {0}")]
    CommandNotFound(String),
    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// I/O operation failed
    #[error("I/O error: {0}")]
    IoError(String),
    /// Parsing error
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Timeout
    #[error("Timeout: {0}")]
    Timeout(String),
    /// The provider cannot run on this platform
    #[error("Unsupported platform: {0}")]
    Unsupported(String),
}

fn describe_failure(exit_code: &Option<i32>, stderr: &str) -> String {
    let mut detail = String::new();
    if let Some(code) = exit_code {
        detail.push_str(&format!(" with exit code {code}"));
    }
    if !stderr.is_empty() {
        detail.push_str(&format!(": {stderr}"));
    }
    detail
}

/// Convert system errors to domain errors (with context loss for abstraction)
impl From<SystemError> for DomainError {
    fn from(err: SystemError) -> Self {
        match err {
            SystemError::CommandFailed { command, .. } => {
                DomainError::SystemInfoUnavailable(format!("System command failed: {command}"))
            }
            SystemError::CommandNotFound(cmd) => DomainError::MissingDependencies(vec![cmd]),
            SystemError::PermissionDenied(_) => {
                DomainError::InsufficientPrivileges("System access denied".to_string())
            }
            SystemError::IoError(msg) => {
                DomainError::SystemInfoUnavailable(format!("I/O error: {msg}"))
            }
            SystemError::ParseError(msg) => DomainError::ParsingFailed(msg),
            SystemError::Timeout(msg) => DomainError::Timeout(msg),
            SystemError::Unsupported(msg) => DomainError::SystemInfoUnavailable(msg),
        }
    }
}

/// Command execution errors
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// System error occurred
    #[error(transparent)]
    System(#[from] SystemError),
    /// Command execution failed
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),
    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl From<CommandError> for SystemError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::System(sys_err) => sys_err,
            CommandError::ExecutionFailed(msg) => SystemError::IoError(msg),
            CommandError::InvalidArguments(msg) => {
                SystemError::IoError(format!("Invalid command arguments: {msg}"))
            }
        }
    }
}

impl From<CommandError> for DomainError {
    fn from(err: CommandError) -> Self {
        SystemError::from(err).into()
    }
}
