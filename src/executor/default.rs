//! Native-process execution strategy

use super::traits::{InputRunner, PostRunner, PreRunner, Runner};
use crate::formula::{Definition, FormulaError, InputType};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Runs a formula as a child process of the current program
///
/// The pipeline is strictly linear: pre-run, build the command, attach
/// inputs, spawn, wait, post-run. The first failing stage ends the run and
/// its error is returned as is. Post-run only happens after a zero exit.
#[derive(Debug, Clone)]
pub struct DefaultRunner<P, I, O> {
    pre: P,
    input: I,
    post: O,
}

impl<P, I, O> DefaultRunner<P, I, O>
where
    P: PreRunner,
    I: InputRunner,
    O: PostRunner,
{
    /// Composes a runner from its collaborators
    #[must_use]
    pub fn new(pre: P, input: I, post: O) -> Self {
        Self { pre, input, post }
    }
}

impl<P, I, O> Runner for DefaultRunner<P, I, O>
where
    P: PreRunner,
    I: InputRunner,
    O: PostRunner,
{
    fn run(&self, def: &Definition, input_type: InputType) -> Result<(), FormulaError> {
        tracing::info!(formula = %def, input_type = %input_type, "Starting formula run");

        let setup = self.pre.pre_run(def)?;
        let bin = setup.tmp_bin_file_path().display().to_string();
        tracing::debug!(bin = %bin, tmp_dir = %setup.tmp_dir().display(), "Formula resolved");

        let mut cmd = Command::new(setup.tmp_bin_file_path());
        cmd.current_dir(setup.tmp_bin_dir())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        self.input.inputs(&mut cmd, &setup, input_type)?;

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|e| FormulaError::Start {
            bin: bin.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(pid = child.id(), "Formula process started");

        let status = child.wait().map_err(|e| FormulaError::Wait {
            bin: bin.clone(),
            reason: e.to_string(),
        })?;
        tracing::info!(
            formula = %def,
            status = %status,
            duration_ms = start.elapsed().as_millis(),
            "Formula process finished"
        );

        if !status.success() {
            tracing::error!(formula = %def, "Formula failed, skipping cleanup");
            return Err(FormulaError::Exit {
                bin,
                code: status.code(),
            });
        }

        self.post.post_run(&setup, false)
    }
}
