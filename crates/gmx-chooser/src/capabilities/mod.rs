//! Host CPU capability detection.
//!
//! A [`CapabilityProbe`] reads the host's CPU feature flags into a
//! normalized [`FeatureSet`]. One implementation exists per supported
//! platform family, plus a static one for overrides and tests.

mod features;
mod probe;

pub use features::{parse_cpuinfo_flags, parse_sysctl_features, FeatureSet};
pub use probe::{
    host_probe, CapabilityProbe, CpuinfoProbe, Platform, StaticProbe, SysctlProbe,
    CPUINFO_PATH, SYSCTL_FEATURE_KEYS, SYSCTL_PROGRAM,
};
