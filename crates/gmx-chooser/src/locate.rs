//! Executable lookup inside per-variant install directories.
//!
//! Installed GROMACS binaries are world-executable, so a candidate only
//! counts when the owner, group and other execute bits are all set. Any
//! failure while listing or reading metadata makes the pair not-found;
//! it never aborts the sweep.

use crate::catalog::Variant;
use serde::Serialize;
use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Execute bits for owner, group and other.
pub const EXECUTE_ALL: u32 = 0o111;

/// Result of looking one name up in one variant directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Present, regular file, executable by every permission class.
    Found,
    /// The variant directory does not exist.
    NoDirectory,
    /// The directory exists but has no entry with this exact name.
    NotListed,
    /// The entry exists but is not a world-executable regular file.
    NotExecutable,
    /// Listing the directory or reading the entry's metadata failed.
    Unreadable,
}

impl LookupOutcome {
    pub fn is_found(self) -> bool {
        self == LookupOutcome::Found
    }
}

impl std::fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupOutcome::Found => write!(f, "found"),
            LookupOutcome::NoDirectory => write!(f, "no directory"),
            LookupOutcome::NotListed => write!(f, "not listed"),
            LookupOutcome::NotExecutable => write!(f, "not executable"),
            LookupOutcome::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// Finds variant binaries under an installation prefix.
#[derive(Debug, Clone)]
pub struct BinaryLocator {
    prefix: PathBuf,
}

impl BinaryLocator {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        BinaryLocator {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// `<prefix>/bin.<suffix>` for a variant.
    pub fn variant_dir(&self, variant: &Variant) -> PathBuf {
        self.prefix.join(variant.directory_name())
    }

    /// Full path of `name` in the variant directory when it is usable.
    pub fn locate(&self, variant: &Variant, name: &str) -> Option<PathBuf> {
        match self.lookup(variant, name) {
            LookupOutcome::Found => Some(self.variant_dir(variant).join(name)),
            _ => None,
        }
    }

    /// Classify `name` in the variant directory.
    pub fn lookup(&self, variant: &Variant, name: &str) -> LookupOutcome {
        let dir = self.variant_dir(variant);
        if !dir.is_dir() {
            trace!(dir = %dir.display(), "variant directory absent");
            return LookupOutcome::NoDirectory;
        }

        match is_listed(&dir, name) {
            Ok(true) => {}
            Ok(false) => return LookupOutcome::NotListed,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "failed to list variant directory");
                return LookupOutcome::Unreadable;
            }
        }

        let path = dir.join(name);
        // Follows symlinks: a dangling or looping link errors here.
        match fs::metadata(&path) {
            Ok(meta) if is_world_executable(&meta) => LookupOutcome::Found,
            Ok(meta) => {
                let mode = meta.permissions().mode() & 0o7777;
                debug!(
                    path = %path.display(),
                    mode = %format!("{:o}", mode),
                    "binary lacks execute permission for some class"
                );
                LookupOutcome::NotExecutable
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "failed to read binary metadata");
                LookupOutcome::Unreadable
            }
        }
    }
}

/// Whether `dir` has an entry named exactly `name`.
fn is_listed(dir: &Path, name: &str) -> std::io::Result<bool> {
    let wanted = OsStr::new(name);
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        if entry.file_name() == wanted {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Regular file with execute permission for owner, group and other.
pub fn is_world_executable(meta: &Metadata) -> bool {
    meta.is_file() && meta.permissions().mode() & EXECUTE_ALL == EXECUTE_ALL
}
