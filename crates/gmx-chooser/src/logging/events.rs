//! Structured event vocabulary.
//!
//! Every dispatch log line carries an `event` field from [`event_names`]
//! and, where useful, a [`Stage`].

use serde::{Deserialize, Serialize};

/// Stages of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Configuration and platform detection.
    Init,
    /// Reading CPU flags.
    Probe,
    /// Sweeping candidates × variants.
    Resolve,
    /// Argument rewrite and exec.
    Launch,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Probe => "probe",
            Stage::Resolve => "resolve",
            Stage::Launch => "launch",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    pub const CONFIG_RESOLVED: &str = "config.resolved";
    pub const PROBE_DONE: &str = "probe.done";
    pub const PROBE_FAILED: &str = "probe.failed";
    pub const LOCATE_RESULT: &str = "locate.result";
    pub const DISPATCH_SELECTED: &str = "dispatch.selected";
    pub const DISPATCH_NONE: &str = "dispatch.none";
    pub const LAUNCH_EXEC: &str = "launch.exec";
    pub const LAUNCH_FAILED: &str = "launch.failed";
}
