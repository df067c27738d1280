//! Resolved execution context for a single formula run

use super::config::Config;
use std::path::{Path, PathBuf};

/// Machine-local context produced by a pre-runner for one invocation
///
/// A `Setup` is never reused across runs and is read-only once built; only
/// pre-runners construct it, through [`SetupBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    pwd: PathBuf,
    formula_path: PathBuf,
    bin_path: PathBuf,
    tmp_dir: PathBuf,
    tmp_bin_dir: PathBuf,
    tmp_bin_file_path: PathBuf,
    config: Config,
    container_id: Option<String>,
}

impl Setup {
    /// Starts building a setup
    #[must_use]
    pub fn builder() -> SetupBuilder {
        SetupBuilder::default()
    }

    /// Working directory of the caller
    #[must_use]
    pub fn pwd(&self) -> &Path {
        &self.pwd
    }

    /// Installed formula directory
    #[must_use]
    pub fn formula_path(&self) -> &Path {
        &self.formula_path
    }

    /// Installed binary directory
    #[must_use]
    pub fn bin_path(&self) -> &Path {
        &self.bin_path
    }

    /// Per-run temporary root
    #[must_use]
    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// Per-run copy of the formula binaries
    #[must_use]
    pub fn tmp_bin_dir(&self) -> &Path {
        &self.tmp_bin_dir
    }

    /// Binary the run executes
    #[must_use]
    pub fn tmp_bin_file_path(&self) -> &Path {
        &self.tmp_bin_file_path
    }

    /// Parsed formula config
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Container backing a containerized run
    #[must_use]
    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }
}

/// Builder for [`Setup`]
#[derive(Debug, Clone, Default)]
pub struct SetupBuilder {
    pwd: PathBuf,
    formula_path: PathBuf,
    bin_path: PathBuf,
    tmp_dir: PathBuf,
    tmp_bin_dir: PathBuf,
    tmp_bin_file_path: PathBuf,
    config: Config,
    container_id: Option<String>,
}

impl SetupBuilder {
    /// Sets the caller's working directory
    #[must_use]
    pub fn pwd(mut self, pwd: impl Into<PathBuf>) -> Self {
        self.pwd = pwd.into();
        self
    }

    /// Sets the installed formula and binary directories
    #[must_use]
    pub fn formula(mut self, formula_path: impl Into<PathBuf>, bin_path: impl Into<PathBuf>) -> Self {
        self.formula_path = formula_path.into();
        self.bin_path = bin_path.into();
        self
    }

    /// Sets the temporary root and binary directories
    #[must_use]
    pub fn tmp(mut self, tmp_dir: impl Into<PathBuf>, tmp_bin_dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = tmp_dir.into();
        self.tmp_bin_dir = tmp_bin_dir.into();
        self
    }

    /// Sets the binary to execute
    #[must_use]
    pub fn tmp_bin_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tmp_bin_file_path = path.into();
        self
    }

    /// Sets the parsed config
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the container identifier; empty identifiers are ignored
    #[must_use]
    pub fn container_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.container_id = if id.is_empty() { None } else { Some(id) };
        self
    }

    /// Finishes the setup
    #[must_use]
    pub fn build(self) -> Setup {
        Setup {
            pwd: self.pwd,
            formula_path: self.formula_path,
            bin_path: self.bin_path,
            tmp_dir: self.tmp_dir,
            tmp_bin_dir: self.tmp_bin_dir,
            tmp_bin_file_path: self.tmp_bin_file_path,
            config: self.config,
            container_id: self.container_id,
        }
    }
}
