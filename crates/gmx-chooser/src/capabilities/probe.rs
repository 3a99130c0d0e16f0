//! Platform-specific capability probes.

use super::features::{parse_cpuinfo_flags, parse_sysctl_features, FeatureSet};
use gmx_common::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Kernel processor-information pseudo-file on Linux.
pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// sysctl keys holding the CPU feature strings on macOS.
pub const SYSCTL_FEATURE_KEYS: [&str; 2] = ["machdep.cpu.features", "machdep.cpu.leaf7_features"];

/// Source of a [`FeatureSet`].
pub trait CapabilityProbe {
    /// Short identifier for diagnostics.
    fn name(&self) -> &'static str;

    /// Read the host's CPU flags.
    fn probe(&self) -> Result<FeatureSet>;
}

/// Supported host platform families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Darwin,
}

impl Platform {
    /// Detect the running platform family.
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a platform family.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" | "android" => Ok(Platform::Linux),
            "macos" | "ios" => Ok(Platform::Darwin),
            other => Err(Error::UnsupportedPlatform {
                os: other.to_string(),
            }),
        }
    }
}

/// Linux probe: first `flags` line of `/proc/cpuinfo`.
#[derive(Debug, Clone)]
pub struct CpuinfoProbe {
    path: PathBuf,
}

impl Default for CpuinfoProbe {
    fn default() -> Self {
        CpuinfoProbe {
            path: PathBuf::from(CPUINFO_PATH),
        }
    }
}

impl CpuinfoProbe {
    /// Probe an alternative cpuinfo-formatted file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        CpuinfoProbe { path: path.into() }
    }
}

impl CapabilityProbe for CpuinfoProbe {
    fn name(&self) -> &'static str {
        "cpuinfo"
    }

    fn probe(&self) -> Result<FeatureSet> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::Probe(format!("{}: {}", self.path.display(), e)))?;
        let features = parse_cpuinfo_flags(&content);
        debug!(path = %self.path.display(), tokens = features.len(), "read cpuinfo flags");
        Ok(features)
    }
}

/// Default program for [`SysctlProbe`].
pub const SYSCTL_PROGRAM: &str = "sysctl";

/// macOS probe: `sysctl -n machdep.cpu.features machdep.cpu.leaf7_features`.
#[derive(Debug, Clone)]
pub struct SysctlProbe {
    program: PathBuf,
}

impl Default for SysctlProbe {
    fn default() -> Self {
        SysctlProbe {
            program: PathBuf::from(SYSCTL_PROGRAM),
        }
    }
}

impl SysctlProbe {
    /// Run an alternative sysctl-compatible program.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        SysctlProbe {
            program: program.into(),
        }
    }
}

impl CapabilityProbe for SysctlProbe {
    fn name(&self) -> &'static str {
        "sysctl"
    }

    fn probe(&self) -> Result<FeatureSet> {
        let program = self.program.display();
        let output = Command::new(&self.program)
            .arg("-n")
            .args(SYSCTL_FEATURE_KEYS)
            .output()
            .map_err(|e| Error::Probe(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Probe(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        let features = parse_sysctl_features(&String::from_utf8_lossy(&output.stdout));
        debug!(program = %program, tokens = features.len(), "read sysctl features");
        Ok(features)
    }
}

/// Fixed feature set, used for `GMX_CHOOSER_FLAGS` overrides and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    features: FeatureSet,
}

impl StaticProbe {
    pub fn new(features: FeatureSet) -> Self {
        StaticProbe { features }
    }

    pub fn from_flags(text: &str) -> Self {
        StaticProbe::new(FeatureSet::from_flags(text))
    }
}

impl CapabilityProbe for StaticProbe {
    fn name(&self) -> &'static str {
        "static"
    }

    fn probe(&self) -> Result<FeatureSet> {
        Ok(self.features.clone())
    }
}

/// The probe for the running host; fails fast on unsupported platforms.
pub fn host_probe() -> Result<Box<dyn CapabilityProbe>> {
    Ok(match Platform::detect()? {
        Platform::Linux => Box::new(CpuinfoProbe::default()),
        Platform::Darwin => Box::new(SysctlProbe::default()),
    })
}
