//! Formula definitions and the filesystem layout they resolve against
//!
//! A [`Definition`] is portable: it names binaries for every supported
//! platform and only materializes a concrete binary name when asked, using
//! either the running platform ([`Definition::bin_name`]) or an explicit one
//! ([`Definition::bin_name_for`]).
//!
//! ```rust
//! use formula_runner::{Definition, Layout, Os};
//!
//! let def = Definition::new("group/formula").with_bin("tool-${so}");
//! assert_eq!(def.bin_name_for(Os::Windows), "tool-windows.exe");
//! assert_eq!(def.bin_name_for(Os::Linux), "tool-linux");
//!
//! let layout = Layout::new("/home/me/.formula");
//! assert_eq!(
//!     def.formula_path(&layout),
//!     std::path::PathBuf::from("/home/me/.formula/formulas/group/formula")
//! );
//! ```

use super::errors::ValidationError;
use super::types::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the platform identifier in binary and bundle names
pub const OS_PLACEHOLDER: &str = "${so}";

/// Config file name used when a definition does not override it
pub const DEFAULT_CONFIG: &str = "config.json";

/// Directory holding a formula's binaries, relative to the formula root
pub const BIN_DIR: &str = "bin";

const WINDOWS_SUFFIX: &str = ".exe";

/// Platforms a formula can ship binaries for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux
    Linux,
    /// macOS
    Darwin,
    /// Windows
    Windows,
    /// Any other platform, carrying its identifier
    Other(&'static str),
}

impl Os {
    /// Returns the platform this process is running on
    #[must_use]
    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Maps a platform name to an [`Os`]; `macos` and `darwin` are equivalent
    #[must_use]
    pub fn from_identifier(id: &'static str) -> Self {
        match id {
            "linux" => Self::Linux,
            "macos" | "darwin" => Self::Darwin,
            "windows" => Self::Windows,
            other => Self::Other(other),
        }
    }

    /// Identifier substituted for [`OS_PLACEHOLDER`]
    #[must_use]
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
            Self::Other(id) => id,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Filesystem layout rooted at the formula home directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Home root every other directory hangs off
    pub home: PathBuf,

    /// Directory of installed formulas, relative to `home`
    pub formulas_dir: String,

    /// Directory of per-run temporary trees, relative to `home`
    pub tmp_dir: String,
}

impl Layout {
    /// Creates the default layout under `home`
    #[must_use]
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            formulas_dir: "formulas".to_string(),
            tmp_dir: "tmp".to_string(),
        }
    }

    /// Root of all installed formulas
    #[must_use]
    pub fn formulas_root(&self) -> PathBuf {
        self.home.join(&self.formulas_dir)
    }

    /// Root of all per-run temporary trees
    #[must_use]
    pub fn tmp_root(&self) -> PathBuf {
        self.home.join(&self.tmp_dir)
    }

    /// Same layout with `home` resolved against the current directory
    ///
    /// Paths handed to a child process that runs in another directory must
    /// not be relative.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined
    pub fn absolute(&self) -> io::Result<Self> {
        Ok(Self {
            home: std::path::absolute(&self.home)?,
            ..self.clone()
        })
    }
}

/// Portable descriptor of a formula package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Logical slash-separated formula identifier
    pub path: String,

    /// Binary name used when no platform override applies
    pub bin: String,

    /// Linux binary override
    #[serde(default)]
    pub linux_bin: String,

    /// macOS binary override
    #[serde(default)]
    pub mac_bin: String,

    /// Windows binary override
    #[serde(default)]
    pub windows_bin: String,

    /// Bundle archive name, may contain [`OS_PLACEHOLDER`]
    #[serde(default)]
    pub bundle: String,

    /// Config file name override
    #[serde(default)]
    pub config: String,

    /// Repository base URL
    #[serde(default)]
    pub repo_url: String,

    /// Repository name
    #[serde(default)]
    pub repo_name: String,
}

impl Definition {
    /// Creates a definition for the given formula path
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the default binary name
    #[must_use]
    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    /// Sets the Linux binary override
    #[must_use]
    pub fn with_linux_bin(mut self, bin: impl Into<String>) -> Self {
        self.linux_bin = bin.into();
        self
    }

    /// Sets the macOS binary override
    #[must_use]
    pub fn with_mac_bin(mut self, bin: impl Into<String>) -> Self {
        self.mac_bin = bin.into();
        self
    }

    /// Sets the Windows binary override
    #[must_use]
    pub fn with_windows_bin(mut self, bin: impl Into<String>) -> Self {
        self.windows_bin = bin.into();
        self
    }

    /// Sets the bundle name
    #[must_use]
    pub fn with_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = bundle.into();
        self
    }

    /// Sets the config file name
    #[must_use]
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = config.into();
        self
    }

    /// Sets the repository this formula comes from
    #[must_use]
    pub fn with_repo(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.repo_url = url.into();
        self.repo_name = name.into();
        self
    }

    /// Installed formula directory: `home/formulas/<path>`
    #[must_use]
    pub fn formula_path(&self, layout: &Layout) -> PathBuf {
        layout.formulas_root().join(&self.path)
    }

    /// Per-run temporary directories: `(home/tmp/<run_id>, home/tmp/<run_id>/<path>)`
    ///
    /// `run_id` must be unique per invocation; it is the only thing keeping
    /// concurrent runs of the same formula apart.
    #[must_use]
    pub fn tmp_work_dir_path(&self, layout: &Layout, run_id: &str) -> (PathBuf, PathBuf) {
        let tmp_dir = layout.tmp_root().join(run_id);
        let tmp_bin_dir = tmp_dir.join(&self.path);
        (tmp_dir, tmp_bin_dir)
    }

    /// Binary name for the running platform
    #[must_use]
    pub fn bin_name(&self) -> String {
        self.bin_name_for(Os::current())
    }

    /// Binary name for `os`
    ///
    /// The platform override wins when set. A name containing
    /// [`OS_PLACEHOLDER`] gets the platform identifier substituted, plus
    /// `.exe` on Windows.
    #[must_use]
    pub fn bin_name_for(&self, os: Os) -> String {
        let candidate = match os {
            Os::Windows => &self.windows_bin,
            Os::Darwin => &self.mac_bin,
            Os::Linux => &self.linux_bin,
            Os::Other(_) => &self.bin,
        };
        let name = if candidate.is_empty() {
            &self.bin
        } else {
            candidate
        };

        if !name.contains(OS_PLACEHOLDER) {
            return name.clone();
        }

        let suffix = if os == Os::Windows { WINDOWS_SUFFIX } else { "" };
        format!("{}{suffix}", name.replace(OS_PLACEHOLDER, os.identifier()))
    }

    /// Bundle name for the running platform
    #[must_use]
    pub fn bundle_name(&self) -> String {
        self.bundle_name_for(Os::current())
    }

    /// Bundle name for `os`; never carries an executable suffix
    #[must_use]
    pub fn bundle_name_for(&self, os: Os) -> String {
        self.bundle.replace(OS_PLACEHOLDER, os.identifier())
    }

    /// Binary directory of a formula root: `formula/bin`
    #[must_use]
    pub fn bin_path(&self, formula: &Path) -> PathBuf {
        formula.join(BIN_DIR)
    }

    /// Binary file inside a binary directory
    #[must_use]
    pub fn bin_file_path(&self, bin_path: &Path, bin_name: &str) -> PathBuf {
        bin_path.join(bin_name)
    }

    /// Remote location of the bundle: `repo_url/path/<bundle_name>`
    #[must_use]
    pub fn bundle_url(&self) -> String {
        format!("{}/{}/{}", self.repo_url, self.path, self.bundle_name())
    }

    /// Config file name, falling back to [`DEFAULT_CONFIG`]
    #[must_use]
    pub fn config_name(&self) -> &str {
        if self.config.is_empty() {
            DEFAULT_CONFIG
        } else {
            &self.config
        }
    }

    /// Config file inside a formula root
    #[must_use]
    pub fn config_path(&self, formula_path: &Path, config_name: &str) -> PathBuf {
        formula_path.join(config_name)
    }

    /// Remote location of a config file: `repo_url/path/<name>`
    #[must_use]
    pub fn config_url(&self, config_name: &str) -> String {
        format!("{}/{}/{}", self.repo_url, self.path, config_name)
    }
}

impl Validate for Definition {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.path.is_empty() {
            return Err(ValidationError::EmptyPath);
        }
        if self.path.starts_with('/') || self.path.ends_with('/') {
            return Err(ValidationError::DanglingSeparator {
                path: self.path.clone(),
            });
        }
        if self.bin_name().is_empty() {
            return Err(ValidationError::MissingBinary {
                path: self.path.clone(),
                os: Os::current().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
