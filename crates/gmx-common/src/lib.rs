//! Common types for the GROMACS SIMD chooser.
//!
//! This crate provides the pieces shared between the dispatcher library and
//! its binary:
//! - The error taxonomy and its stable codes
//! - Output format selection for the operator CLI

pub mod error;
pub mod output;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
