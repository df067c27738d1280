//! Formula execution traits
//!
//! A run is split between three collaborators that each own one side of the
//! process lifecycle. Strategies (native process, container) provide their
//! own implementations and are composed by a [`Runner`].

use crate::formula::{Definition, FormulaResult, InputType, Setup};
use std::process::Command;

/// Turns a definition into a ready-to-run [`Setup`]
#[allow(clippy::missing_errors_doc)]
pub trait PreRunner: Send + Sync {
    /// Resolves the formula; on success every path in the setup exists and
    /// the binary is executable
    fn pre_run(&self, def: &Definition) -> FormulaResult<Setup>;
}

/// Layers formula inputs onto a prepared, not yet started, process
#[allow(clippy::missing_errors_doc)]
pub trait InputRunner: Send + Sync {
    /// Attaches environment and stdin derived from the setup's config
    fn inputs(
        &self,
        cmd: &mut Command,
        setup: &Setup,
        input_type: InputType,
    ) -> FormulaResult<()>;
}

/// Releases what a [`PreRunner`] allocated
#[allow(clippy::missing_errors_doc)]
pub trait PostRunner: Send + Sync {
    /// Removes the temporary tree; with `docker` also tears down the container
    fn post_run(&self, setup: &Setup, docker: bool) -> FormulaResult<()>;
}

/// Runs a formula end to end
#[allow(clippy::missing_errors_doc)]
pub trait Runner: Send + Sync {
    /// Executes the formula described by `def`
    fn run(&self, def: &Definition, input_type: InputType) -> FormulaResult<()>;
}

impl<T: PreRunner + ?Sized> PreRunner for Box<T> {
    fn pre_run(&self, def: &Definition) -> FormulaResult<Setup> {
        (**self).pre_run(def)
    }
}

impl<T: InputRunner + ?Sized> InputRunner for Box<T> {
    fn inputs(
        &self,
        cmd: &mut Command,
        setup: &Setup,
        input_type: InputType,
    ) -> FormulaResult<()> {
        (**self).inputs(cmd, setup, input_type)
    }
}

impl<T: PostRunner + ?Sized> PostRunner for Box<T> {
    fn post_run(&self, setup: &Setup, docker: bool) -> FormulaResult<()> {
        (**self).post_run(setup, docker)
    }
}
