//! Argument rewriting and process image replacement.

use crate::dispatch::{Invocation, SelectionResult};
use crate::logging::event_names;
use crate::names::{is_mdrun_token, Family, MDRUN_SUBCOMMAND};
use gmx_common::Error;
use std::ffi::OsString;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Adapt forwarded arguments when one family's binary stands in for the other.
///
/// - invoked `gmx*`, chosen `mdrun*`: a leading `mdrun` subcommand is dropped.
/// - invoked `mdrun*`, chosen `gmx*`: `mdrun` is inserted as the subcommand.
/// - anything else is forwarded unchanged.
pub fn rewrite_args(invoked: &str, chosen: &str, args: &[OsString]) -> Vec<OsString> {
    match (Family::of(invoked), Family::of(chosen)) {
        (Some(Family::Gmx), Some(Family::Mdrun)) => match args.split_first() {
            Some((first, rest)) if is_mdrun_token(first) => rest.to_vec(),
            _ => args.to_vec(),
        },
        (Some(Family::Mdrun), Some(Family::Gmx)) => {
            let mut rewritten = Vec::with_capacity(args.len() + 1);
            rewritten.push(OsString::from(MDRUN_SUBCOMMAND));
            rewritten.extend_from_slice(args);
            rewritten
        }
        _ => args.to_vec(),
    }
}

/// Everything needed to become the chosen binary.
///
/// The program runs under its full path, which is also its `argv[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl LaunchPlan {
    pub fn new(selection: &SelectionResult, invocation: &Invocation) -> Self {
        LaunchPlan {
            program: selection.binary_path.clone(),
            args: rewrite_args(&invocation.name, &selection.binary_name, &invocation.args),
        }
    }

    /// Arguments as display strings (lossy for non-UTF-8).
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    /// Argument-vector command; no shell is involved.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Replace the current process image. Only returns if `execve` failed.
    pub fn exec(self) -> Error {
        debug!(
            event = event_names::LAUNCH_EXEC,
            program = %self.program.display(),
            argc = self.args.len(),
            "replacing process image"
        );
        let source = self.command().exec();
        Error::Launch {
            path: self.program,
            source,
        }
    }
}

/// Rewrite arguments for `selection` and become it.
pub fn launch(selection: &SelectionResult, invocation: &Invocation) -> Error {
    LaunchPlan::new(selection, invocation).exec()
}
