//! Error types for the GROMACS SIMD chooser.
//!
//! Every failure the dispatcher can report carries:
//! - A stable error code for machine parsing
//! - A category for grouping
//! - A headline and remediation hint for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! No Suitable Binary: no installed GROMACS binary found for 'gmx_mpi'
//!   Fix: Check that /usr/local/gromacs/bin.<SIMD> holds world-executable binaries
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 30,
//!   "category": "selection",
//!   "message": "no installed GROMACS binary found for 'gmx_mpi'",
//!   "context": { "name": "gmx_mpi" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for chooser operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid invocation or arguments.
    Usage,
    /// Host platform is not supported.
    Platform,
    /// Reading CPU capability flags failed.
    Probe,
    /// No binary could be selected.
    Selection,
    /// Replacing the process image failed.
    Launch,
    /// File I/O errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Usage => write!(f, "usage"),
            ErrorCategory::Platform => write!(f, "platform"),
            ErrorCategory::Probe => write!(f, "probe"),
            ErrorCategory::Selection => write!(f, "selection"),
            ErrorCategory::Launch => write!(f, "launch"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the chooser.
#[derive(Error, Debug)]
pub enum Error {
    // Usage errors (10-19)
    #[error("invalid invocation: {0}")]
    Args(String),

    // Platform errors (20-29)
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    #[error("failed to read CPU flags: {0}")]
    Probe(String),

    // Selection errors (30-39)
    #[error("no installed GROMACS binary found for '{name}'")]
    NoSuitableBinary { name: String },

    // Launch errors (40-49)
    #[error("failed to launch {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Usage errors
    /// - 20-29: Platform and probe errors
    /// - 30-39: Selection errors
    /// - 40-49: Launch errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Args(_) => 10,
            Error::UnsupportedPlatform { .. } => 20,
            Error::Probe(_) => 21,
            Error::NoSuitableBinary { .. } => 30,
            Error::Launch { .. } => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Args(_) => ErrorCategory::Usage,
            Error::UnsupportedPlatform { .. } => ErrorCategory::Platform,
            Error::Probe(_) => ErrorCategory::Probe,
            Error::NoSuitableBinary { .. } => ErrorCategory::Selection,
            Error::Launch { .. } => ErrorCategory::Launch,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Args(_) => "Invoke through an installed entry point, or run 'gmx-chooser --help'.",
            Error::UnsupportedPlatform { .. } => {
                "Only Linux and macOS hosts can be probed. Set GMX_CHOOSER_FLAGS to bypass the probe."
            }
            Error::Probe(_) => {
                "Check that /proc/cpuinfo (Linux) or sysctl (macOS) is readable, or set GMX_CHOOSER_FLAGS."
            }
            Error::NoSuitableBinary { .. } => {
                "Check that <prefix>/bin.<SIMD> holds world-executable binaries supported by this CPU."
            }
            Error::Launch { .. } => {
                "The selected binary could not be executed. Check its interpreter and shared libraries."
            }
            Error::Io(_) => "Check permissions on the installation prefix and retry.",
            Error::Json(_) => "Internal serialization failure. Retry with '--format human'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Args(_) => "Invalid Invocation",
            Error::UnsupportedPlatform { .. } => "Unsupported Platform",
            Error::Probe(_) => "CPU Probe Failed",
            Error::NoSuitableBinary { .. } => "No Suitable Binary",
            Error::Launch { .. } => "Launch Failed",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }

    /// Format as a single diagnostic line followed by the fix hint.
    pub fn format_human(&self) -> String {
        format!("{}: {}\n  Fix: {}", self.headline(), self, self.remediation())
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Additional structured context (e.g., candidate name, path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::UnsupportedPlatform { os } => {
                context.insert("os".to_string(), serde_json::json!(os));
            }
            Error::NoSuitableBinary { name } => {
                context.insert("name".to_string(), serde_json::json!(name));
            }
            Error::Launch { path, .. } => {
                context.insert("path".to_string(), serde_json::json!(path.display().to_string()));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
