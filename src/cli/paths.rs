//! `formula paths` - Show where a formula resolves to
//!
//! Prints every path and URL derived from a definition, without touching the
//! filesystem.
//!
//! ```bash
//! formula paths greet/hello --bin 'hello-${so}' --repo-url https://repo.example.com
//! ```

use formula_runner::{Definition, Layout, Os};
use serde::Serialize;
use std::path::PathBuf;

/// Everything a definition resolves to on this machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub os: String,
    pub formula_path: PathBuf,
    pub bin_name: String,
    pub bin_path: PathBuf,
    pub bin_file_path: PathBuf,
    pub config_path: PathBuf,
    pub tmp_root: PathBuf,
    pub bundle_name: String,
    pub bundle_url: String,
    pub config_url: String,
}

impl ResolvedPaths {
    pub fn resolve(def: &Definition, layout: &Layout) -> Self {
        let formula_path = def.formula_path(layout);
        let bin_name = def.bin_name();
        let bin_path = def.bin_path(&formula_path);
        let bin_file_path = def.bin_file_path(&bin_path, &bin_name);
        let config_path = def.config_path(&formula_path, def.config_name());

        Self {
            os: Os::current().to_string(),
            bin_name,
            bin_path,
            bin_file_path,
            config_path,
            tmp_root: layout.tmp_root(),
            bundle_name: def.bundle_name(),
            bundle_url: def.bundle_url(),
            config_url: def.config_url(def.config_name()),
            formula_path,
        }
    }
}
