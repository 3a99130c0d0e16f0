//! GROMACS SIMD Chooser Library
//!
//! This library decides which precompiled GROMACS variant to run on the
//! current host and becomes it:
//! - CPU capability probing (`/proc/cpuinfo`, `sysctl`)
//! - The fixed SIMD variant catalog
//! - Executable lookup inside per-variant install directories
//! - Candidate-name construction and best-variant resolution
//! - Argument rewriting and process image replacement
//!
//! The binary entry point is in `main.rs`.

pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod exit_codes;
pub mod launch;
pub mod locate;
pub mod logging;
pub mod names;

#[cfg(test)]
pub(crate) mod test_utils;
