//! Throwaway multi-variant GROMACS install trees for integration tests.

#![allow(dead_code)]
// Test support intentionally provides more helpers than any single test uses.

use gmx_chooser::catalog::Variant;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Script that reports its own path and each argument on its own line.
pub const ECHO_SCRIPT: &str = "#!/bin/sh\necho \"ran=$0\"\nfor a in \"$@\"; do printf '<%s>\\n' \"$a\"; done\n";

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

    pub fn variant_dir(&self, variant: &Variant) -> PathBuf {
        let dir = self.prefix().join(variant.directory_name());
        fs::create_dir_all(&dir).expect("Failed to create variant dir");
        dir
    }

    /// Install an argument-echoing script with the given permission bits.
    pub fn install(&self, variant: &Variant, name: &str, mode: u32) -> PathBuf {
        self.install_script(variant, name, ECHO_SCRIPT, mode)
    }

    /// Install an arbitrary script body with the given permission bits.
    pub fn install_script(&self, variant: &Variant, name: &str, body: &str, mode: u32) -> PathBuf {
        let path = self.variant_dir(variant).join(name);
        fs::write(&path, body).expect("Failed to write binary");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode))
            .expect("Failed to set permissions");
        path
    }

    /// Install a world-executable (0o755) script.
    pub fn install_exe(&self, variant: &Variant, name: &str) -> PathBuf {
        self.install(variant, name, 0o755)
    }

    /// Symlink the chooser binary into `<prefix>/bin/<name>` as an entry point.
    pub fn entry_point(&self, name: &str) -> PathBuf {
        let bin = self.prefix().join("bin");
        fs::create_dir_all(&bin).expect("Failed to create bin dir");
        let link = bin.join(name);
        std::os::unix::fs::symlink(env!("CARGO_BIN_EXE_gmx-chooser"), &link)
            .expect("Failed to link entry point");
        link
    }
}

impl Default for InstallTree {
    fn default() -> Self {
        Self::new()
    }
}
