//! Exit codes for gmx-chooser.
//!
//! A successful dispatch never exits: the chooser becomes the selected
//! binary, and that program's exit status is what callers observe. The
//! codes below only appear when the chooser itself stops.
//!
//! Exit code ranges:
//! - 0: Operator CLI command succeeded
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use gmx_common::Error;

/// Exit codes for gmx-chooser operations.
///
/// These codes are a stable contract for job scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success (operator CLI only)
    Clean = 0,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid invocation or arguments
    ArgsError = 10,

    /// Host platform cannot be probed
    UnsupportedPlatform = 11,

    /// No installed variant fits this host
    NoSuitableBinary = 12,

    /// The selected binary could not be executed
    LaunchFailed = 13,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error (including CPU flag reads)
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map an error onto its exit code.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Args(_) => ExitCode::ArgsError,
            Error::UnsupportedPlatform { .. } => ExitCode::UnsupportedPlatform,
            Error::NoSuitableBinary { .. } => ExitCode::NoSuitableBinary,
            Error::Launch { .. } => ExitCode::LaunchFailed,
            Error::Probe(_) | Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::UnsupportedPlatform => "ERR_PLATFORM",
            ExitCode::NoSuitableBinary => "ERR_NO_BINARY",
            ExitCode::LaunchFailed => "ERR_LAUNCH",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        ExitCode::from_error(err)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
