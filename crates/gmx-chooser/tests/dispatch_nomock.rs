//! Dispatch scenarios against real install trees.
//!
//! No mocks: every scenario lays out `bin.<SIMD>` directories on disk and
//! runs the full probe-free pipeline (candidates, sweep, selection, argument
//! rewrite) through the public API.

mod support;

use gmx_chooser::capabilities::{CapabilityProbe, FeatureSet, StaticProbe};
use gmx_chooser::catalog::{Variant, VARIANTS};
use gmx_chooser::dispatch::{Dispatcher, Invocation};
use gmx_chooser::launch::LaunchPlan;
use gmx_chooser::locate::{BinaryLocator, LookupOutcome};
use gmx_common::Error;
use std::ffi::OsString;
use support::install_tree::InstallTree;

const AVX512: &Variant = &VARIANTS[0];
const AVX2: &Variant = &VARIANTS[1];
const AVX: &Variant = &VARIANTS[2];
const SSE2: &Variant = &VARIANTS[3];

fn dispatcher(tree: &InstallTree) -> Dispatcher {
    Dispatcher::new(BinaryLocator::new(tree.prefix()))
}

fn plan_for(tree: &InstallTree, invocation: &Invocation, flags: &str) -> LaunchPlan {
    let features = StaticProbe::from_flags(flags)
        .probe()
        .expect("static probe never fails");
    let selection = dispatcher(tree)
        .dispatch(invocation, &features)
        .expect("a viable binary should be installed");
    LaunchPlan::new(&selection, invocation)
}

#[test]
fn gmx_mdrun_falls_back_to_mdrun_binary_without_subcommand() {
    let tree = InstallTree::new();
    let mdrun = tree.install_exe(AVX2, "mdrun");

    let inv = Invocation::new("gmx", ["mdrun", "-s", "topol.tpr"]);
    let plan = plan_for(&tree, &inv, "fpu sse2 avx avx2");

    assert_eq!(plan.program, mdrun);
    assert_eq!(plan.display_args(), ["-s", "topol.tpr"]);
}

#[test]
fn mdrun_falls_back_to_gmx_binary_with_subcommand() {
    let tree = InstallTree::new();
    let gmx = tree.install_exe(AVX2, "gmx");

    let inv = Invocation::new("mdrun", ["-s", "topol.tpr"]);
    let plan = plan_for(&tree, &inv, "fpu sse2 avx avx2");

    assert_eq!(plan.program, gmx);
    assert_eq!(plan.display_args(), ["mdrun", "-s", "topol.tpr"]);
}

#[test]
fn mpi_double_precision_family_is_preserved() {
    let tree = InstallTree::new();
    let gmx = tree.install_exe(AVX, "gmx_mpi_d");
    tree.install_exe(AVX, "gmx");

    let inv = Invocation::new("mdrun_mpi_d", ["-deffnm", "npt"]);
    let plan = plan_for(&tree, &inv, "sse2 avx");

    assert_eq!(plan.program, gmx);
    assert_eq!(plan.display_args(), ["mdrun", "-deffnm", "npt"]);
}

#[test]
fn rdtscp_build_selected_with_args_unchanged() {
    let tree = InstallTree::new();
    let target = tree.install_exe(AVX2, "mdrun_mpi_rdtscp");

    let inv = Invocation::new("mdrun_mpi", ["-ntomp", "8"]);
    let plan = plan_for(&tree, &inv, "sse2 avx avx2 rdtscp");

    assert_eq!(plan.program, target);
    assert_eq!(plan.display_args(), ["-ntomp", "8"]);
}

#[test]
fn rdtscp_build_beats_plain_build_at_same_variant() {
    let tree = InstallTree::new();
    tree.install_exe(AVX2, "gmx");
    let rdtscp = tree.install_exe(AVX2, "gmx_rdtscp");

    let inv = Invocation::new("gmx", ["grompp"]);
    let plan = plan_for(&tree, &inv, "sse2 avx avx2 rdtscp");
    assert_eq!(plan.program, rdtscp);
}

#[test]
fn unsupported_variant_never_selected_even_when_installed() {
    let tree = InstallTree::new();
    tree.install_exe(AVX512, "gmx");
    let sse2 = tree.install_exe(SSE2, "gmx");

    let inv = Invocation::new("gmx", Vec::<OsString>::new());
    let plan = plan_for(&tree, &inv, "sse2 avx avx2");
    assert_eq!(plan.program, sse2);
}

#[test]
fn missing_execute_bit_for_any_class_skips_variant() {
    for mode in [0o655, 0o745, 0o754, 0o644] {
        let tree = InstallTree::new();
        tree.install(AVX2, "gmx", mode);
        let fallback = tree.install_exe(AVX, "gmx");

        let inv = Invocation::new("gmx", Vec::<OsString>::new());
        let plan = plan_for(&tree, &inv, "sse2 avx avx2");
        assert_eq!(plan.program, fallback, "mode {mode:o}");

        let outcome = BinaryLocator::new(tree.prefix()).lookup(AVX2, "gmx");
        assert_eq!(outcome, LookupOutcome::NotExecutable, "mode {mode:o}");
    }
}

#[test]
fn nothing_viable_reports_no_suitable_binary() {
    let tree = InstallTree::new();
    tree.install_exe(AVX512, "gmx");
    tree.install(SSE2, "gmx", 0o644);

    let inv = Invocation::new("gmx", ["mdrun"]);
    let features = FeatureSet::from_flags("sse2 avx avx2");
    let err = dispatcher(&tree).dispatch(&inv, &features).unwrap_err();

    assert!(matches!(err, Error::NoSuitableBinary { ref name } if name == "gmx"));
}

#[test]
fn missing_prefix_is_not_an_error_until_selection() {
    let locator = BinaryLocator::new("/nonexistent/gromacs");
    let inv = Invocation::new("gmx", Vec::<OsString>::new());
    let features = FeatureSet::from_flags("sse2");

    let dispatcher = Dispatcher::new(locator);
    let sweep = dispatcher.sweep(&inv, &features);
    assert!(sweep
        .iter()
        .filter(|entry| entry.supported)
        .all(|entry| entry.outcome == Some(LookupOutcome::NoDirectory)));
    assert!(dispatcher.resolve(&inv, &features).is_none());
}

#[test]
fn repeated_dispatch_is_deterministic() {
    let tree = InstallTree::new();
    tree.install_exe(AVX2, "mdrun");
    tree.install_exe(AVX2, "gmx");
    tree.install_exe(SSE2, "mdrun_rdtscp");

    let inv = Invocation::new("mdrun", ["-v"]);
    let features = FeatureSet::from_flags("sse2 avx avx2 rdtscp");
    let dispatcher = dispatcher(&tree);

    let first = dispatcher.resolve(&inv, &features);
    for _ in 0..5 {
        assert_eq!(dispatcher.resolve(&inv, &features), first);
    }
    let first = first.expect("selection");
    assert_eq!(first.binary_name, "mdrun");
    assert_eq!(first.variant, *AVX2);
}
