//! Formula execution layer
//!
//! This module contains the collaborator traits and the native-process
//! implementations of each of them.

mod cache;
mod default;
mod inputs;
mod local;
mod temp_files;
mod traits;

use crate::formula::Layout;
use crate::infrastructure::ContainerRuntime;

pub use cache::{cache_path, load_cached, store_cached};
pub use default::DefaultRunner;
pub use inputs::{COMMAND_ENV, EnvInputRunner, PWD_ENV, Prompter, TerminalPrompter};
pub use local::{LocalPostRunner, LocalPreRunner};
pub use temp_files::{RunWorkspace, make_executable, remove_tree};
pub use traits::{InputRunner, PostRunner, PreRunner, Runner};

/// Native runner wired with the local collaborators
pub type NativeRunner = DefaultRunner<LocalPreRunner, EnvInputRunner<TerminalPrompter>, LocalPostRunner>;

/// Builds the native runner for a layout, tearing containers down with `runtime`
#[must_use]
pub fn native_runner(layout: Layout, runtime: ContainerRuntime) -> NativeRunner {
    DefaultRunner::new(
        LocalPreRunner::new(layout),
        EnvInputRunner::terminal(),
        LocalPostRunner::new().with_runtime(runtime),
    )
}
