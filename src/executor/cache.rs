//! Recently entered input values
//!
//! Values live next to the installed formula in `.<NAME>.cache`, a JSON
//! array with the newest value first.

use crate::formula::Input;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Cache file of an input inside a formula directory
#[must_use]
pub fn cache_path(formula_path: &Path, input: &Input) -> PathBuf {
    formula_path.join(format!(".{}.cache", input.env_name()))
}

/// Reads cached values; a missing or unreadable cache is empty
#[must_use]
pub fn load_cached(path: &Path) -> Vec<String> {
    let Ok(json) = fs::read_to_string(path) else {
        return Vec::new();
    };
    serde_json::from_str(&json).unwrap_or_else(|e| {
        tracing::warn!(cache = %path.display(), error = %e, "Ignoring corrupt input cache");
        Vec::new()
    })
}

/// Puts `value` at the front of the cache, keeping at most `capacity` values
///
/// # Errors
///
/// Returns `std::io::Error` if the cache cannot be written
pub fn store_cached(path: &Path, value: &str, capacity: usize) -> io::Result<()> {
    let mut values = load_cached(path);
    values.retain(|v| v != value);
    values.insert(0, value.to_string());
    values.truncate(capacity);

    let json = serde_json::to_string(&values).map_err(io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_cache_path() {
        let input = Input {
            name: "who".to_string(),
            ..Input::default()
        };
        assert_eq!(
            cache_path(Path::new("/h/formulas/a"), &input),
            PathBuf::from("/h/formulas/a/.WHO.cache")
        );
    }

    #[test]
    fn test_store_keeps_newest_first_and_bounded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".WHO.cache");

        for value in ["a", "b", "c", "a"] {
            store_cached(&path, value, 2).unwrap();
        }

        assert_eq!(load_cached(&path), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_load_missing_or_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".X.cache");
        assert!(load_cached(&path).is_empty());

        fs::write(&path, "not json").unwrap();
        assert!(load_cached(&path).is_empty());
    }
}
