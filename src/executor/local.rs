use super::temp_files::{RunWorkspace, make_executable, remove_tree};
use super::traits::{PostRunner, PreRunner};
use crate::formula::{Config, Definition, FormulaError, Layout, Setup, Validate};
use crate::infrastructure::ContainerRuntime;
use std::path::{Path, PathBuf};

/// Pre-runner that resolves installed formulas from the local home
///
/// Each call copies the formula's `bin/` directory into a fresh
/// `tmp/<run_id>/<path>` tree and points the setup at that copy.
#[derive(Debug, Clone)]
pub struct LocalPreRunner {
    /// Layout formulas are resolved against
    layout: Layout,
}

impl LocalPreRunner {
    /// Creates a pre-runner for the given layout
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    fn not_installed(def: &Definition, formula_path: &Path) -> FormulaError {
        let mut reason = format!("not installed at {}", formula_path.display());
        if !def.repo_url.is_empty() {
            reason.push_str(&format!(", bundle available at {}", def.bundle_url()));
        }
        FormulaError::resolution(&def.path, reason)
    }
}

impl PreRunner for LocalPreRunner {
    fn pre_run(&self, def: &Definition) -> Result<Setup, FormulaError> {
        def.validate()?;

        let layout = self.layout.absolute()?;
        let formula_path = def.formula_path(&layout);
        if !formula_path.is_dir() {
            return Err(Self::not_installed(def, &formula_path));
        }

        let bin_name = def.bin_name();
        let bin_path = def.bin_path(&formula_path);
        let bin_file = def.bin_file_path(&bin_path, &bin_name);
        if !bin_file.is_file() {
            return Err(FormulaError::resolution(
                &def.path,
                format!("binary {} not found", bin_file.display()),
            ));
        }

        let config = Config::load(&def.config_path(&formula_path, def.config_name()))?;
        let pwd = std::env::current_dir()?;

        let workspace = RunWorkspace::create(&layout, def)
            .map_err(|e| FormulaError::resolution(&def.path, e))?;
        tracing::debug!(
            formula = %def,
            run_id = %workspace.run_id(),
            tmp_bin_dir = %workspace.tmp_bin_dir().display(),
            "Created run workspace"
        );

        let tmp_bin_file = def.bin_file_path(workspace.tmp_bin_dir(), &bin_name);
        let prepared = workspace
            .copy_bin_dir(&bin_path)
            .and_then(|()| make_executable(&tmp_bin_file));
        if let Err(e) = prepared {
            if let Err(cleanup) = remove_tree(workspace.tmp_dir()) {
                tracing::warn!(error = %cleanup, "Could not remove partial run workspace");
            }
            return Err(FormulaError::resolution(&def.path, e));
        }

        Ok(Setup::builder()
            .pwd(pwd)
            .formula(formula_path, bin_path)
            .tmp(workspace.tmp_dir(), workspace.tmp_bin_dir())
            .tmp_bin_file_path(tmp_bin_file)
            .config(config)
            .build())
    }
}

/// Post-runner that removes the run workspace and, for containerized runs,
/// the container
#[derive(Debug, Clone, Default)]
pub struct LocalPostRunner {
    /// Runtime used to remove containers
    runtime: ContainerRuntime,
    /// Runtime executable; looked up on `PATH` when unset
    program: Option<PathBuf>,
}

impl LocalPostRunner {
    /// Creates a post-runner using Docker for container teardown
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container runtime
    #[must_use]
    pub fn with_runtime(mut self, runtime: ContainerRuntime) -> Self {
        self.runtime = runtime;
        self
    }

    /// Invokes the runtime through a specific executable
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    fn remove_container(&self, id: &str) -> Result<(), FormulaError> {
        match &self.program {
            Some(program) => self.runtime.remove_container_with(program, id),
            None => self.runtime.remove_container(id),
        }
    }
}

impl PostRunner for LocalPostRunner {
    fn post_run(&self, setup: &Setup, docker: bool) -> Result<(), FormulaError> {
        let container = if docker {
            match setup.container_id() {
                Some(id) => self.remove_container(id),
                None => {
                    tracing::warn!("Containerized run has no container id, nothing to remove");
                    Ok(())
                }
            }
        } else {
            Ok(())
        };

        match remove_tree(setup.tmp_dir()) {
            Ok(true) => tracing::debug!(tmp_dir = %setup.tmp_dir().display(), "Removed run workspace"),
            Ok(false) => {
                tracing::warn!(tmp_dir = %setup.tmp_dir().display(), "Run workspace already removed");
            }
            Err(e) => return Err(FormulaError::cleanup(setup.tmp_dir(), e)),
        }

        container
    }
}
