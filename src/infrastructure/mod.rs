//! Infrastructure layer
//!
//! This module contains external integrations and adapters.

mod config;
mod container;
mod logging;

pub use config::{Config, HOME_ENV, LOG_ENV, TEAM_ENV};
pub use container::ContainerRuntime;
pub use logging::init_logging;
