//! Core types shared across the formula domain

#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, super::errors::FormulaError>;

/// How formula inputs are collected before the process starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Ask the user for each value on the terminal
    #[default]
    Prompt,
    /// Read all values as a JSON object from standard input
    Stdin,
}

impl InputType {
    /// Returns true if values are collected interactively
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Prompt)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt => write!(f, "prompt"),
            Self::Stdin => write!(f, "stdin"),
        }
    }
}

/// Trait for types that can be validated
#[allow(clippy::missing_errors_doc)]
pub trait Validate {
    /// Type of validation error
    type Error;

    /// Validates this type
    fn validate(&self) -> std::result::Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_display() {
        assert_eq!(InputType::Prompt.to_string(), "prompt");
        assert_eq!(InputType::Stdin.to_string(), "stdin");
    }

    #[test]
    fn test_input_type_serde() {
        let json = serde_json::to_string(&InputType::Stdin).unwrap();
        assert_eq!(json, r#""stdin""#);
        let parsed: InputType = serde_json::from_str(r#""prompt""#).unwrap();
        assert!(parsed.is_interactive());
    }
}
