//! Session and identity validation
//!
//! The engine never calls into this module itself; the CLI consults a
//! [`Validator`] before running formulas in team deployments.

mod errors;
mod manager;
mod team;

pub use errors::SessionError;
pub use manager::{SESSION_FILE, Session, SessionManager};
pub use team::{TeamValidator, Validator};
