//! Test fixtures: throwaway multi-variant install trees.

use crate::catalog::Variant;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary `<prefix>/bin.<SUFFIX>/` layout.
pub struct InstallTree {
    dir: TempDir,
}

impl InstallTree {
    pub fn new() -> Self {
        InstallTree {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn prefix(&self) -> &Path {
        self.dir.path()
    }

    /// Create an empty variant directory.
    pub fn variant_dir(&self, variant: &Variant) -> PathBuf {
        let dir = self.prefix().join(variant.directory_name());
        fs::create_dir_all(&dir).expect("Failed to create variant dir");
        dir
    }

    /// Install a fake binary with the given permission bits.
    pub fn install(&self, variant: &Variant, name: &str, mode: u32) -> PathBuf {
        let path = self.variant_dir(variant).join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").expect("Failed to write binary");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode))
            .expect("Failed to set permissions");
        path
    }

    /// Install a world-executable (0o755) fake binary.
    pub fn install_exe(&self, variant: &Variant, name: &str) -> PathBuf {
        self.install(variant, name, 0o755)
    }
}

impl Default for InstallTree {
    fn default() -> Self {
        Self::new()
    }
}
