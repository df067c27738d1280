//! Error types for the formula domain

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while resolving, running or cleaning up a formula
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// Definition failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Formula could not be located or installed
    #[error("Formula '{formula}' could not be resolved: {reason}")]
    Resolution {
        /// Logical path of the formula.
        formula: String,
        /// What went wrong.
        reason: String,
    },

    /// Formula config file could not be read or parsed
    #[error("Invalid formula config '{path}': {reason}")]
    Config {
        /// Path of the config file.
        path: String,
        /// Parser or IO error message.
        reason: String,
    },

    /// A required input could not be satisfied
    #[error("Input '{input}' could not be satisfied: {reason}")]
    Input {
        /// Name of the input.
        input: String,
        /// What went wrong.
        reason: String,
    },

    /// Formula binary could not be started
    #[error("Failed to start '{bin}': {reason}")]
    Start {
        /// Binary that failed to start.
        bin: String,
        /// OS error message.
        reason: String,
    },

    /// Waiting for the formula process failed
    #[error("Failed to wait for '{bin}': {reason}")]
    Wait {
        /// Binary being waited on.
        bin: String,
        /// OS error message.
        reason: String,
    },

    /// Formula process exited unsuccessfully
    #[error("Formula '{bin}' exited with {}", exit_description(.code))]
    Exit {
        /// Binary that exited.
        bin: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// Temporary resources could not be released
    #[error("Cleanup of '{path}' failed: {reason}")]
    Cleanup {
        /// Path that could not be removed.
        path: String,
        /// OS error message.
        reason: String,
    },

    /// Container teardown failed
    #[error("Container '{id}' teardown failed: {reason}")]
    Container {
        /// Container identifier.
        id: String,
        /// What went wrong.
        reason: String,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(String),
}

impl FormulaError {
    /// Builds a resolution error for a formula path
    pub fn resolution(formula: impl Into<String>, reason: impl ToString) -> Self {
        Self::Resolution {
            formula: formula.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds an input error
    pub fn input(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::Input {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds a cleanup error for a filesystem path
    pub fn cleanup(path: &Path, reason: impl ToString) -> Self {
        Self::Cleanup {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error came from releasing resources after a run
    #[must_use]
    pub fn is_cleanup(&self) -> bool {
        matches!(self, Self::Cleanup { .. } | Self::Container { .. })
    }
}

impl From<std::io::Error> for FormulaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

/// Validation errors for formula definitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Path cannot be empty
    #[error("Formula path cannot be empty")]
    EmptyPath,

    /// Path cannot start or end with a separator
    #[error("Formula path '{path}' cannot start or end with '/'")]
    DanglingSeparator {
        /// The offending path.
        path: String,
    },

    /// No binary name resolves for the current platform
    #[error("Formula '{path}' has no binary for {os}")]
    MissingBinary {
        /// Formula path.
        path: String,
        /// Platform identifier.
        os: String,
    },
}
