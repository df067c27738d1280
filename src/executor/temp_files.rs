//! Per-run temporary trees
//!
//! Every run gets its own directory under `home/tmp/<run_id>`:
//!
//! - `tmp/<run_id>/` - temporary root, removed after the run
//! - `tmp/<run_id>/<formula path>/` - private copy of the formula binaries
//!
//! Runs never share a tree, so concurrent invocations of the same formula
//! cannot see each other's files.

use crate::formula::{Definition, Layout};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Temporary tree owned by a single formula run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWorkspace {
    /// Run identifier
    run_id: String,

    /// Temporary root
    tmp_dir: PathBuf,

    /// Binary copy directory
    tmp_bin_dir: PathBuf,
}

impl RunWorkspace {
    /// Creates the tree for a fresh random run id
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if directories cannot be created
    pub fn create(layout: &Layout, def: &Definition) -> io::Result<Self> {
        Self::create_with_id(layout, def, &Uuid::new_v4().to_string())
    }

    /// Creates the tree for a caller-supplied run id
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if the tree already exists or cannot be created
    pub fn create_with_id(layout: &Layout, def: &Definition, run_id: &str) -> io::Result<Self> {
        let (tmp_dir, tmp_bin_dir) = def.tmp_work_dir_path(layout, run_id);

        if tmp_dir.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Run directory already exists: {}", tmp_dir.display()),
            ));
        }
        fs::create_dir_all(&tmp_bin_dir)?;

        Ok(Self {
            run_id: run_id.to_string(),
            tmp_dir,
            tmp_bin_dir,
        })
    }

    /// Copies the contents of `src` into the binary copy directory
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if any entry cannot be copied
    pub fn copy_bin_dir(&self, src: &Path) -> io::Result<()> {
        copy_dir(src, &self.tmp_bin_dir)
    }

    /// Run identifier
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Temporary root
    #[must_use]
    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// Binary copy directory
    #[must_use]
    pub fn tmp_bin_dir(&self) -> &Path {
        &self.tmp_bin_dir
    }
}

/// Removes a run's temporary root
///
/// Returns `Ok(false)` when there was nothing left to remove.
///
/// # Errors
///
/// Returns `std::io::Error` if the tree exists but cannot be removed
pub fn remove_tree(tmp_dir: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(tmp_dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Marks a file executable for its owner, group and others
///
/// # Errors
///
/// Returns `std::io::Error` if permissions cannot be read or changed
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)
}

/// Executability is decided by the file extension on this platform
///
/// # Errors
///
/// Returns `std::io::Error` if the file does not exist
#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}

fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
