//! Runtime configuration resolution.
//!
//! The chooser reads no configuration files. Two settings can be adjusted,
//! each resolved as: CLI argument → environment variable → built-in default.
//! - installation prefix holding the `bin.<SIMD>` directories
//! - CPU flag override replacing the host probe

use crate::capabilities::{host_probe, CapabilityProbe, StaticProbe};
use crate::dispatch::Dispatcher;
use crate::locate::BinaryLocator;
use gmx_common::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default GROMACS installation prefix.
pub const DEFAULT_PREFIX: &str = "/usr/local/gromacs";

/// Environment variable overriding the installation prefix.
pub const ENV_PREFIX: &str = "GMX_CHOOSER_PREFIX";

/// Environment variable replacing the CPU probe with fixed flags.
pub const ENV_FLAGS: &str = "GMX_CHOOSER_FLAGS";

/// Where a setting came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,
    /// Set via environment variable.
    Environment,
    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Resolved chooser settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChooserConfig {
    pub prefix: PathBuf,
    pub prefix_source: ConfigSource,
    /// Fixed flags replacing the host probe, if any.
    pub flags_override: Option<String>,
    pub flags_source: ConfigSource,
}

impl Default for ChooserConfig {
    fn default() -> Self {
        ChooserConfig {
            prefix: PathBuf::from(DEFAULT_PREFIX),
            prefix_source: ConfigSource::BuiltinDefault,
            flags_override: None,
            flags_source: ConfigSource::BuiltinDefault,
        }
    }
}

impl ChooserConfig {
    /// The probe to use: the flag override when set, otherwise the host's.
    pub fn probe(&self) -> Result<Box<dyn CapabilityProbe>> {
        match &self.flags_override {
            Some(flags) => Ok(Box::new(StaticProbe::from_flags(flags))),
            None => host_probe(),
        }
    }

    pub fn locator(&self) -> BinaryLocator {
        BinaryLocator::new(&self.prefix)
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.locator())
    }
}

/// Resolve configuration from CLI values and the process environment.
pub fn resolve_config(cli_prefix: Option<&Path>, cli_flags: Option<&str>) -> ChooserConfig {
    resolve_with(cli_prefix, cli_flags, |key| std::env::var(key).ok())
}

/// Resolve configuration from CLI values and an arbitrary variable lookup.
///
/// Empty values are treated as unset.
pub fn resolve_with(
    cli_prefix: Option<&Path>,
    cli_flags: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> ChooserConfig {
    let mut config = ChooserConfig::default();

    if let Some(prefix) = cli_prefix.filter(|p| !p.as_os_str().is_empty()) {
        config.prefix = prefix.to_path_buf();
        config.prefix_source = ConfigSource::CliArgument;
    } else if let Some(prefix) = lookup(ENV_PREFIX).filter(|v| !v.is_empty()) {
        config.prefix = PathBuf::from(prefix);
        config.prefix_source = ConfigSource::Environment;
    }

    if let Some(flags) = cli_flags.filter(|f| !f.trim().is_empty()) {
        config.flags_override = Some(flags.to_string());
        config.flags_source = ConfigSource::CliArgument;
    } else if let Some(flags) = lookup(ENV_FLAGS).filter(|v| !v.trim().is_empty()) {
        config.flags_override = Some(flags);
        config.flags_source = ConfigSource::Environment;
    }

    config
}
