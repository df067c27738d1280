//! Formula config file model
//!
//! Every installed formula ships a JSON config describing itself and the
//! inputs it expects:
//!
//! ```json
//! {
//!   "name": "hello",
//!   "command": "greet hello",
//!   "description": "Says hello",
//!   "language": "shell",
//!   "inputs": [
//!     { "name": "who", "type": "text", "label": "Who? ",
//!       "cache": { "active": true, "qty": 3, "newLabel": "Someone else" } }
//!   ]
//! }
//! ```

use super::errors::FormulaError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of cached values kept when a config does not say
pub const DEFAULT_CACHE_QTY: usize = 5;

/// Label offered for typing a value that is not in the cache
pub const DEFAULT_CACHE_NEW_LABEL: &str = "Type new value?";

/// Formula display metadata plus its ordered inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display name
    pub name: String,

    /// Command line that invokes the formula
    pub command: String,

    /// Short description
    pub description: String,

    /// Implementation language
    pub language: String,

    /// Inputs in prompt order
    pub inputs: Vec<Input>,
}

impl Config {
    /// Parses a config from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::Config`] if the text is not a valid config
    pub fn from_json(json: &str, origin: &Path) -> Result<Self, FormulaError> {
        serde_json::from_str(json).map_err(|e| FormulaError::Config {
            path: origin.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Loads a config from a file
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::Config`] if the file is missing or malformed
    pub fn load(path: &Path) -> Result<Self, FormulaError> {
        let json = fs::read_to_string(path).map_err(|e| FormulaError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json, path)
    }
}

/// Kind of value an input accepts
///
/// Unknown kinds are read as [`InputKind::Text`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum InputKind {
    /// Free text, or a single choice when `items` is set
    #[default]
    Text,
    /// Yes/no
    Bool,
    /// Hidden free text
    Password,
}

impl From<String> for InputKind {
    fn from(kind: String) -> Self {
        match kind.to_lowercase().as_str() {
            "bool" => Self::Bool,
            "password" => Self::Password,
            _ => Self::Text,
        }
    }
}

/// One parameter the formula accepts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    /// Parameter name; exported upper-cased as an environment variable
    pub name: String,

    /// Value kind
    #[serde(rename = "type")]
    pub kind: InputKind,

    /// Value used when nothing else is supplied
    pub default: String,

    /// Prompt label
    pub label: String,

    /// Allowed values for a choice input
    pub items: Vec<String>,

    /// Recent-value cache policy
    pub cache: Cache,
}

impl Input {
    /// Name of the environment variable carrying this input
    #[must_use]
    pub fn env_name(&self) -> String {
        self.name.to_uppercase()
    }

    /// Returns true if the input is a choice among `items`
    #[must_use]
    pub fn is_choice(&self) -> bool {
        !self.items.is_empty()
    }

    /// Default value, if the config provides one
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        if self.default.is_empty() {
            None
        } else {
            Some(&self.default)
        }
    }
}

/// Whether and how previously entered values are offered again
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cache {
    /// Offer previous values
    pub active: bool,

    /// How many values to keep; zero means [`DEFAULT_CACHE_QTY`]
    pub qty: usize,

    /// Label of the "enter a new value" entry
    pub new_label: String,
}

impl Cache {
    /// Number of values to retain
    #[must_use]
    pub fn capacity(&self) -> usize {
        if self.qty == 0 {
            DEFAULT_CACHE_QTY
        } else {
            self.qty
        }
    }

    /// Label of the "enter a new value" entry
    #[must_use]
    pub fn new_value_label(&self) -> &str {
        if self.new_label.is_empty() {
            DEFAULT_CACHE_NEW_LABEL
        } else {
            &self.new_label
        }
    }
}
