//! gmx-chooser - runtime SIMD variant dispatcher for GROMACS
//!
//! Multi-call entry point:
//! - Installed as `gmx`, `gmx_mpi`, `mdrun_mpi`, ... it picks the best
//!   installed SIMD build for this CPU and becomes it, forwarding all
//!   arguments untouched.
//! - Invoked as `gmx-chooser`, it offers an operator CLI for the generic
//!   wrapper indirection (`exec`) and for inspecting decisions.

use clap::{Args, Parser, Subcommand};
use gmx_chooser::capabilities::FeatureSet;
use gmx_chooser::catalog::{best_supported, variants, Variant};
use gmx_chooser::config::{resolve_config, ChooserConfig};
use gmx_chooser::dispatch::{Invocation, SelectionResult, SweepEntry};
use gmx_chooser::exit_codes::ExitCode;
use gmx_chooser::launch::{launch, LaunchPlan};
use gmx_chooser::logging::{
    event_names, init_default_logging, init_logging, LogConfig, LogFormat, LogLevel, Stage,
};
use gmx_chooser::names::invoked_basename;
use gmx_common::{Error, OutputFormat, Result, StructuredError};
use serde::Serialize;
use std::convert::Infallible;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Basename under which the operator CLI is served.
const CHOOSER_NAME: &str = "gmx-chooser";

/// GROMACS SIMD chooser - run the best installed build for this CPU
#[derive(Parser)]
#[command(name = "gmx-chooser")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Installation prefix holding the bin.<SIMD> directories [env: GMX_CHOOSER_PREFIX]
    #[arg(long, global = true)]
    prefix: Option<PathBuf>,

    /// Use these CPU flags instead of probing the host [env: GMX_CHOOSER_FLAGS]
    #[arg(long, global = true)]
    flags: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch as if invoked through the entry point NAME
    Exec(InvocationArgs),

    /// Show which binary an invocation would run, without running it
    Which(WhichArgs),

    /// Print the CPU flags the chooser sees
    Flags,

    /// List the SIMD variant catalog for the current prefix
    Catalog,
}

#[derive(Args, Debug)]
struct InvocationArgs {
    /// Entry-point name; a path is reduced to its basename
    name: OsString,

    /// Arguments forwarded to the selected binary
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

impl InvocationArgs {
    fn to_invocation(&self) -> Result<Invocation> {
        let name = invoked_basename(&self.name)
            .ok_or_else(|| Error::Args(format!("invalid entry-point name {:?}", self.name)))?;
        Ok(Invocation::new(name, self.args.iter().cloned()))
    }
}

#[derive(Args, Debug)]
struct WhichArgs {
    /// Print every evaluated (candidate, variant) pair
    #[arg(long)]
    explain: bool,

    #[command(flatten)]
    invocation: InvocationArgs,
}

fn main() {
    let mut argv = std::env::args_os();
    let arg0 = argv.next().unwrap_or_default();

    let exit_code = match invoked_basename(&arg0) {
        Some(name) if name != CHOOSER_NAME => run_entry_point(name, argv.collect()),
        _ => run_cli(Cli::parse()),
    };

    std::process::exit(exit_code.into());
}

// ============================================================================
// Entry-point mode
// ============================================================================

/// Dispatch for an installed entry point. Returns only on failure.
fn run_entry_point(name: String, args: Vec<OsString>) -> ExitCode {
    init_default_logging();
    let config = resolve_config(None, None);
    let invocation = Invocation::new(name, args);

    let err = match dispatch_and_launch(&config, &invocation) {
        Ok(never) => match never {},
        Err(err) => err,
    };
    eprintln!("{}: {}: {}", invocation.name, err.headline(), err);
    let code = ExitCode::from(&err);
    debug!(exit = %code, hint = err.remediation(), "dispatch failed");
    code
}

/// Probe, resolve, and become the selected binary.
fn dispatch_and_launch(config: &ChooserConfig, invocation: &Invocation) -> Result<Infallible> {
    let features = probe_features(config)?;
    let selection = config.dispatcher().dispatch(invocation, &features)?;
    let err = launch(&selection, invocation);
    debug!(
        event = event_names::LAUNCH_FAILED,
        stage = %Stage::Launch,
        error = %err,
        "exec returned"
    );
    Err(err)
}

fn probe_features(config: &ChooserConfig) -> Result<FeatureSet> {
    debug!(
        event = event_names::CONFIG_RESOLVED,
        stage = %Stage::Init,
        prefix = %config.prefix.display(),
        prefix_source = %config.prefix_source,
        flags_source = %config.flags_source,
        "configuration resolved"
    );

    let probe = config.probe()?;
    match probe.probe() {
        Ok(features) => {
            debug!(
                event = event_names::PROBE_DONE,
                stage = %Stage::Probe,
                probe = probe.name(),
                tokens = features.len(),
                rdtscp = features.has_rdtscp(),
                "read CPU flags"
            );
            Ok(features)
        }
        Err(err) => {
            debug!(
                event = event_names::PROBE_FAILED,
                stage = %Stage::Probe,
                probe = probe.name(),
                error = %err,
                "CPU probe failed"
            );
            Err(err)
        }
    }
}

// ============================================================================
// Operator CLI mode
// ============================================================================

fn run_cli(cli: Cli) -> ExitCode {
    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    let format = cli.global.format;
    init_logging(&LogConfig::from_env(cli_level, LogFormat::for_output(format)));

    let config = resolve_config(cli.global.prefix.as_deref(), cli.global.flags.as_deref());

    let result = match &cli.command {
        Commands::Exec(args) => run_exec(&config, args),
        Commands::Which(args) => run_which(&config, args, format),
        Commands::Flags => run_flags(&config, format),
        Commands::Catalog => run_catalog(&config, format),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            report_error(&err, format);
            let code = ExitCode::from(&err);
            debug!(exit = %code, "command failed");
            code
        }
    }
}

fn report_error(err: &Error, format: OutputFormat) {
    match format {
        OutputFormat::Human => eprintln!("{}", err.format_human()),
        OutputFormat::Json => eprintln!("{}", StructuredError::from(err).to_json()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_exec(config: &ChooserConfig, args: &InvocationArgs) -> Result<ExitCode> {
    let invocation = args.to_invocation()?;
    dispatch_and_launch(config, &invocation).map(|never| match never {})
}

/// `which` payload.
#[derive(Serialize)]
struct WhichReport {
    invoked: String,
    prefix: PathBuf,
    features: FeatureSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<SelectionResult>,
    /// Arguments the selected binary would receive.
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sweep: Option<Vec<SweepEntry>>,
}

fn run_which(config: &ChooserConfig, args: &WhichArgs, format: OutputFormat) -> Result<ExitCode> {
    let invocation = args.invocation.to_invocation()?;
    let features = probe_features(config)?;
    let dispatcher = config.dispatcher();

    let sweep = dispatcher.sweep(&invocation, &features);
    let selection = dispatcher.select(&sweep);
    let forwarded = selection
        .as_ref()
        .map(|sel| LaunchPlan::new(sel, &invocation).display_args());

    let report = WhichReport {
        invoked: invocation.name.clone(),
        prefix: config.prefix.clone(),
        features,
        selection,
        args: forwarded,
        sweep: args.explain.then_some(sweep),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_which_human(&report),
    }

    match report.selection {
        Some(_) => Ok(ExitCode::Clean),
        None => Err(Error::NoSuitableBinary {
            name: invocation.name,
        }),
    }
}

fn print_which_human(report: &WhichReport) {
    if let Some(sweep) = &report.sweep {
        for entry in sweep {
            let verdict = match entry.outcome {
                None => "unsupported by CPU".to_string(),
                Some(outcome) => outcome.to_string(),
            };
            let mark = if entry.is_viable() { "+" } else { " " };
            println!(
                "[{}] {:<24} {:<10} {}",
                mark, entry.candidate.name, entry.variant.directory_suffix, verdict
            );
        }
        println!();
    }

    if let (Some(selection), Some(args)) = (&report.selection, &report.args) {
        println!("{} -> {}", report.invoked, selection.binary_path.display());
        println!("  variant: {}", selection.variant);
        println!("  args:    {}", args.join(" "));
    }
}

fn run_flags(config: &ChooserConfig, format: OutputFormat) -> Result<ExitCode> {
    #[derive(Serialize)]
    struct FlagsReport<'a> {
        probe: &'static str,
        rdtscp: bool,
        best_variant: Option<&'static Variant>,
        features: &'a FeatureSet,
    }

    let probe = config.probe()?;
    let features = probe.probe()?;
    let report = FlagsReport {
        probe: probe.name(),
        rdtscp: features.has_rdtscp(),
        best_variant: best_supported(&features),
        features: &features,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => {
            println!("probe:   {}", report.probe);
            println!("rdtscp:  {}", if report.rdtscp { "yes" } else { "no" });
            match report.best_variant {
                Some(variant) => println!("best:    {}", variant),
                None => println!("best:    none"),
            }
            println!("flags:   {}", report.features);
        }
    }
    Ok(ExitCode::Clean)
}

fn run_catalog(config: &ChooserConfig, format: OutputFormat) -> Result<ExitCode> {
    #[derive(Serialize)]
    struct CatalogRow {
        #[serde(flatten)]
        variant: Variant,
        directory: PathBuf,
        installed: bool,
        supported: bool,
    }

    let probe = config.probe()?;
    let features = probe.probe()?;
    let locator = config.locator();
    let rows: Vec<CatalogRow> = variants()
        .iter()
        .map(|variant| {
            let directory = locator.variant_dir(variant);
            CatalogRow {
                variant: *variant,
                installed: directory.is_dir(),
                supported: variant.is_supported_by(&features),
                directory,
            }
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Human => {
            for row in &rows {
                println!(
                    "{} {:<9} {:<8} {:<10} {:<9} {}",
                    row.variant.priority,
                    row.variant.simd,
                    row.variant.tag,
                    if row.supported { "supported" } else { "-" },
                    if row.installed { "installed" } else { "-" },
                    row.directory.display()
                );
            }
        }
    }
    Ok(ExitCode::Clean)
}
