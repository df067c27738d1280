//! Prelude module for common imports

// Formula model
pub use crate::formula::config::{Cache, Config as FormulaConfig, Input, InputKind};
pub use crate::formula::definition::{Definition, Layout, OS_PLACEHOLDER, Os};
pub use crate::formula::errors::{FormulaError, ValidationError};
pub use crate::formula::setup::{Setup, SetupBuilder};
pub use crate::formula::types::{FormulaResult, InputType, Validate};

// Execution
pub use crate::executor::{
    DefaultRunner, EnvInputRunner, InputRunner, LocalPostRunner, LocalPreRunner, NativeRunner,
    PostRunner, PreRunner, Prompter, Runner, TerminalPrompter, native_runner,
};

// Infrastructure
pub use crate::infrastructure::ContainerRuntime;
