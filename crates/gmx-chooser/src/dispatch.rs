//! Variant resolution.
//!
//! Resolution runs in three steps:
//! 1. Base names: the invoked name, plus its family counterpart when the
//!    mdrun/gmx aliasing rule applies.
//! 2. Candidates: with RDTSCP available, every base name's `_rdtscp` form
//!    comes first, followed by the plain base names.
//! 3. Sweep: candidates (outer) × catalog variants (inner). A pair is viable
//!    when the host supports the variant and the locator finds the binary.
//!
//! The winner is the minimum viable pair under [`SelectionKey`]: lower
//! variant priority first, then earlier candidate order. The whole grid is
//! swept; a later candidate's more capable variant can still win.

use crate::capabilities::FeatureSet;
use crate::catalog::{variants, Variant};
use crate::locate::{BinaryLocator, LookupOutcome};
use crate::logging::{event_names, Stage};
use crate::names::{counterpart_name, is_mdrun_token, with_rdtscp_suffix, Family};
use gmx_common::{Error, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, info};

/// One dispatcher invocation: the entry-point basename and its forwarded
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Invocation {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the first forwarded argument names the mdrun engine.
    pub fn first_arg_is_mdrun(&self) -> bool {
        self.args.first().is_some_and(|arg| is_mdrun_token(arg))
    }
}

/// A program basename considered during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateName {
    pub name: String,
    /// Position in the evaluation order; earlier wins ties.
    pub order: usize,
    /// Whether this is the `_rdtscp` form of a base name.
    pub rdtscp: bool,
}

/// Total order over viable (candidate, variant) pairs. Smaller is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SelectionKey {
    pub priority: usize,
    pub candidate_order: usize,
}

impl SelectionKey {
    pub fn new(variant: &Variant, candidate: &CandidateName) -> Self {
        SelectionKey {
            priority: variant.priority,
            candidate_order: candidate.order,
        }
    }
}

/// The chosen (binary, variant) pair of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionResult {
    pub variant: Variant,
    pub directory: PathBuf,
    pub binary_name: String,
    pub binary_path: PathBuf,
    pub candidate_order: usize,
}

/// One evaluated cell of the candidates × catalog grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepEntry {
    pub candidate: CandidateName,
    pub variant: Variant,
    /// Whether the host advertises the variant's instruction set.
    pub supported: bool,
    /// Locator verdict; `None` when the variant is unsupported and the
    /// filesystem was not consulted.
    pub outcome: Option<LookupOutcome>,
    pub path: PathBuf,
}

impl SweepEntry {
    pub fn is_viable(&self) -> bool {
        self.supported && self.outcome.is_some_and(LookupOutcome::is_found)
    }

    pub fn key(&self) -> SelectionKey {
        SelectionKey::new(&self.variant, &self.candidate)
    }

    fn to_selection(&self, directory: PathBuf) -> SelectionResult {
        SelectionResult {
            variant: self.variant,
            directory,
            binary_name: self.candidate.name.clone(),
            binary_path: self.path.clone(),
            candidate_order: self.candidate.order,
        }
    }
}

/// Step 1: the invoked name, then its family counterpart when aliasing applies.
pub fn base_names(invocation: &Invocation) -> Vec<String> {
    let mut names = vec![invocation.name.clone()];

    let alias = match Family::of(&invocation.name) {
        Some(Family::Mdrun) => true,
        Some(Family::Gmx) => invocation.first_arg_is_mdrun(),
        None => false,
    };

    if alias {
        if let Some(counterpart) = counterpart_name(&invocation.name) {
            names.push(counterpart);
        }
    }

    names
}

/// Step 2: expand base names for the RDTSCP build, numbering the result.
pub fn candidate_names(invocation: &Invocation, features: &FeatureSet) -> Vec<CandidateName> {
    let bases = base_names(invocation);
    let rdtscp = features.has_rdtscp();

    let suffixed = bases
        .iter()
        .filter(|_| rdtscp)
        .map(|name| (with_rdtscp_suffix(name), true));
    let plain = bases.iter().map(|name| (name.clone(), false));

    suffixed
        .chain(plain)
        .enumerate()
        .map(|(order, (name, rdtscp))| CandidateName {
            name,
            order,
            rdtscp,
        })
        .collect()
}

/// Pick the minimum viable entry under [`SelectionKey`].
pub fn select_best<'a>(entries: impl IntoIterator<Item = &'a SweepEntry>) -> Option<&'a SweepEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.is_viable())
        .min_by_key(|entry| entry.key())
}

/// Resolves invocations against an install tree.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    locator: BinaryLocator,
}

impl Dispatcher {
    pub fn new(locator: BinaryLocator) -> Self {
        Dispatcher { locator }
    }

    pub fn locator(&self) -> &BinaryLocator {
        &self.locator
    }

    /// Step 3: evaluate every (candidate, variant) pair in sweep order.
    pub fn sweep(&self, invocation: &Invocation, features: &FeatureSet) -> Vec<SweepEntry> {
        let candidates = candidate_names(invocation, features);
        let mut entries = Vec::with_capacity(candidates.len() * variants().len());

        for candidate in &candidates {
            for variant in variants() {
                let supported = variant.is_supported_by(features);
                let outcome = supported.then(|| self.locator.lookup(variant, &candidate.name));
                let path = self.locator.variant_dir(variant).join(&candidate.name);

                if let Some(outcome) = outcome {
                    debug!(
                        event = event_names::LOCATE_RESULT,
                        stage = %Stage::Resolve,
                        candidate = %candidate.name,
                        variant = variant.directory_suffix,
                        outcome = %outcome,
                        "evaluated candidate"
                    );
                }

                entries.push(SweepEntry {
                    candidate: candidate.clone(),
                    variant: *variant,
                    supported,
                    outcome,
                    path,
                });
            }
        }

        entries
    }

    /// Best viable pair of an already evaluated sweep.
    ///
    /// Reads nothing from disk, so the result always agrees with `entries`.
    pub fn select(&self, entries: &[SweepEntry]) -> Option<SelectionResult> {
        select_best(entries)
            .map(|entry| entry.to_selection(self.locator.variant_dir(&entry.variant)))
    }

    /// Best viable pair, or `None` when nothing installed fits this host.
    pub fn resolve(&self, invocation: &Invocation, features: &FeatureSet) -> Option<SelectionResult> {
        self.select(&self.sweep(invocation, features))
    }

    /// Like [`Dispatcher::resolve`], failing with `NoSuitableBinary`.
    pub fn dispatch(&self, invocation: &Invocation, features: &FeatureSet) -> Result<SelectionResult> {
        match self.resolve(invocation, features) {
            Some(selection) => {
                info!(
                    event = event_names::DISPATCH_SELECTED,
                    stage = %Stage::Resolve,
                    invoked = %invocation.name,
                    binary = %selection.binary_path.display(),
                    variant = selection.variant.simd,
                    "selected binary"
                );
                Ok(selection)
            }
            None => {
                debug!(
                    event = event_names::DISPATCH_NONE,
                    stage = %Stage::Resolve,
                    invoked = %invocation.name,
                    prefix = %self.locator.prefix().display(),
                    "no viable binary"
                );
                Err(Error::NoSuitableBinary {
                    name: invocation.name.clone(),
                })
            }
        }
    }
}
