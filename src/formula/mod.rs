//! Formula domain types
//!
//! Definitions, configs and the resolved per-run setup.

pub mod config;
pub mod definition;
pub mod errors;
pub mod setup;
pub mod types;

pub use config::{Cache, Config, DEFAULT_CACHE_NEW_LABEL, DEFAULT_CACHE_QTY, Input, InputKind};
pub use definition::{BIN_DIR, DEFAULT_CONFIG, Definition, Layout, OS_PLACEHOLDER, Os};
pub use errors::{FormulaError, ValidationError};
pub use setup::{Setup, SetupBuilder};
pub use types::{FormulaResult, InputType, Validate};
