//! Container runtime (Docker/Podman)
//!
//! Tears down containers left behind by containerized formula runs.

use crate::formula::FormulaError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::process::Command;

/// Container runtime type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRuntime {
    /// Docker runtime
    #[default]
    Docker,
    /// Podman runtime
    Podman,
}

impl std::fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.runtime_command())
    }
}

impl ContainerRuntime {
    /// Gets the runtime executable name
    #[must_use]
    pub fn runtime_command(&self) -> &'static str {
        match self {
            ContainerRuntime::Docker => "docker",
            ContainerRuntime::Podman => "podman",
        }
    }

    /// Arguments that force-remove a container
    fn remove_args(id: &str) -> [&str; 3] {
        ["rm", "-f", id]
    }

    /// Force-removes a container with the runtime found on `PATH`
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::Container`] if the runtime cannot be invoked or
    /// refuses to remove the container
    pub fn remove_container(&self, id: &str) -> Result<(), FormulaError> {
        self.remove_container_with(self.runtime_command(), id)
    }

    /// Force-removes a container by invoking `program` as this runtime
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::Container`] if `program` cannot be invoked or
    /// refuses to remove the container
    pub fn remove_container_with(
        &self,
        program: impl AsRef<OsStr>,
        id: &str,
    ) -> Result<(), FormulaError> {
        let program = program.as_ref();
        tracing::info!(
            runtime = %self,
            program = %program.to_string_lossy(),
            container = %id,
            "Removing formula container"
        );

        let output = Command::new(program)
            .args(Self::remove_args(id))
            .output()
            .map_err(|e| FormulaError::Container {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(FormulaError::Container {
                id: id.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
