//! # Formula Runner - Execute packaged formulas as child processes
//!
//! A formula is an executable bundle installed under a home directory:
//! a `bin/` directory holding one binary per platform plus a JSON config
//! declaring the inputs the binary expects. The runner copies the binary
//! into a private temporary workspace, feeds it inputs through environment
//! variables, waits for it and removes the workspace afterwards.
//!
//! ## Quick Start
//!
//! ```no_run
//! use formula_runner::prelude::*;
//!
//! let runner = native_runner(Layout::new("/home/dennis/.formula"), ContainerRuntime::Docker);
//! let def = Definition::new("greet/hello").with_bin("hello-${so}");
//! runner.run(&def, InputType::Prompt)?;
//! # Ok::<(), formula_runner::FormulaError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`formula`]: definitions, configs and the per-run [`Setup`]
//! - [`executor`]: the [`Runner`] and its pre, input and post collaborators
//! - [`session`]: team session validation used by the CLI
//! - [`infrastructure`]: configuration, logging and container runtimes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod executor;
pub mod formula;
pub mod infrastructure;
pub mod session;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use executor::{
    DefaultRunner, EnvInputRunner, InputRunner, LocalPostRunner, LocalPreRunner, NativeRunner,
    PostRunner, PreRunner, Prompter, Runner, TerminalPrompter, native_runner,
};
pub use formula::{
    Config as FormulaConfig, Definition, FormulaError, FormulaResult, Input, InputKind, InputType,
    Layout, Os, Setup, SetupBuilder, Validate, ValidationError,
};
pub use infrastructure::{Config, ContainerRuntime};
pub use session::{SessionError, SessionManager, TeamValidator, Validator};

/// Version of the formula-runner crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
