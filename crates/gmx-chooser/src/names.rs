//! Program-name rules shared by the dispatcher and the launcher.
//!
//! GROMACS ships two command families: the full `gmx` driver (which runs
//! the MD engine through its `mdrun` subcommand) and the standalone
//! `mdrun` engine. Each family carries the same build suffixes (`_mpi`,
//! `_d`, `_mpi_d`), so one family's binary can stand in for the other's
//! by swapping the leading family prefix.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::Path;

/// Prefix of the full driver family (`gmx`, `gmx_mpi`, ...).
pub const GMX_FAMILY: &str = "gmx";

/// Prefix of the standalone engine family (`mdrun`, `mdrun_mpi`, ...).
pub const MDRUN_FAMILY: &str = "mdrun";

/// Subcommand token the `gmx` driver uses to select the MD engine.
pub const MDRUN_SUBCOMMAND: &str = "mdrun";

/// CPU flag advertising the RDTSCP timing instruction.
pub const RDTSCP_FLAG: &str = "rdtscp";

/// Basename suffix of binaries built with `GMX_USE_RDTSCP=ON`.
pub const RDTSCP_SUFFIX: &str = "_rdtscp";

/// Command family of a program basename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Gmx,
    Mdrun,
}

impl Family {
    /// Classify a basename by its leading family prefix.
    pub fn of(name: &str) -> Option<Family> {
        if name.starts_with(MDRUN_FAMILY) {
            Some(Family::Mdrun)
        } else if name.starts_with(GMX_FAMILY) {
            Some(Family::Gmx)
        } else {
            None
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Family::Gmx => GMX_FAMILY,
            Family::Mdrun => MDRUN_FAMILY,
        }
    }

    /// The other family.
    pub fn counterpart(self) -> Family {
        match self {
            Family::Gmx => Family::Mdrun,
            Family::Mdrun => Family::Gmx,
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Swap the leading family prefix: `mdrun_mpi` -> `gmx_mpi`, `gmx_d` -> `mdrun_d`.
///
/// Returns `None` for names outside both families.
pub fn counterpart_name(name: &str) -> Option<String> {
    let family = Family::of(name)?;
    let rest = &name[family.prefix().len()..];
    Some(format!("{}{}", family.counterpart().prefix(), rest))
}

/// Whether a forwarded argument names the mdrun engine (`mdrun`, `mdrun_mpi`, ...).
pub fn is_mdrun_token(arg: &OsStr) -> bool {
    arg.to_str()
        .is_some_and(|s| Family::of(s) == Some(Family::Mdrun))
}

/// Append the RDTSCP build suffix to a basename.
pub fn with_rdtscp_suffix(name: &str) -> String {
    format!("{}{}", name, RDTSCP_SUFFIX)
}

/// Basename of an `argv[0]`-style path, if it has one.
pub fn invoked_basename(arg0: &OsStr) -> Option<String> {
    Path::new(arg0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}
