//! # hinge_cli
//!
//! Headless front end over `hinge_core`:
//!
//! ```text
//! hinge_cli run hinges.json [--s2k frame.$2k] [--catalog sections.csv] [--no-export] [--no-save]
//! hinge_cli calc hinges.json [--catalog sections.csv]
//! hinge_cli categories
//! ```
//!
//! Exit code is 0 on success, 1 when any variant failed or a fatal error occurred.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hinge_core::calculations::{calculate, Category, CalculationOutput};
use hinge_core::errors::{CalcError, CalcResult};
use hinge_core::export::{CsvResultsSink, NullSink, ResultsSink};
use hinge_core::file_io::{current_user, load_session, save_session, FileLock};
use hinge_core::hinge::s2k_path_for;
use hinge_core::run_batch;
use hinge_core::sections::SectionCatalog;

#[derive(Parser)]
#[command(name = "hinge_cli", about = "Nonlinear hinge parameters for steel members", version)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate every variant and write the hinges into the model file
    Run(RunArgs),
    /// Calculate every variant and print the results as JSON
    Calc(CalcArgs),
    /// List all category tags
    Categories,
}

#[derive(Args)]
struct RunArgs {
    /// Session file (JSON)
    session: PathBuf,

    /// Model text file to patch (defaults to the session's model, with a .$2k extension)
    #[arg(long, value_name = "PATH")]
    s2k: Option<PathBuf>,

    /// Section catalog CSV (defaults to the built-in catalog)
    #[arg(long, value_name = "CSV")]
    catalog: Option<PathBuf>,

    /// Skip the per-role results tables
    #[arg(long)]
    no_export: bool,

    /// Do not store results back into the session file
    #[arg(long)]
    no_save: bool,
}

#[derive(Args)]
struct CalcArgs {
    /// Session file (JSON)
    session: PathBuf,

    /// Section catalog CSV (defaults to the built-in catalog)
    #[arg(long, value_name = "CSV")]
    catalog: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(path: Option<&Path>) -> CalcResult<SectionCatalog> {
    match path {
        Some(path) => {
            let catalog = SectionCatalog::load_from_csv(path)?;
            info!(path = %path.display(), sections = catalog.len(), "catalog loaded");
            Ok(catalog)
        }
        None => Ok(SectionCatalog::builtin()),
    }
}

fn run(args: RunArgs) -> CalcResult<bool> {
    let catalog = load_catalog(args.catalog.as_deref())?;

    let _session_lock = (!args.no_save)
        .then(|| FileLock::acquire(&args.session, current_user()))
        .transpose()?;
    let mut session = load_session(&args.session)?;

    let model_file = args
        .s2k
        .unwrap_or_else(|| s2k_path_for(&session.resolved_model_path(&args.session)));

    let mut sink: Box<dyn ResultsSink> = if args.no_export {
        Box::new(NullSink)
    } else {
        Box::new(CsvResultsSink::new(&model_file))
    };

    let summary = run_batch(&mut session, &catalog, &model_file, sink.as_mut());

    println!("{}", summary.summary_line());
    for failure in &summary.failures {
        println!(
            "  {} ({}): {:?} - {}",
            failure.variant, failure.section_name, failure.stage, failure.error
        );
    }

    if !args.no_save {
        save_session(&session, &args.session)?;
    }
    Ok(summary.is_success())
}

#[derive(Serialize)]
struct CalcEntry<'a> {
    variant: &'a str,
    section_name: &'a str,
    category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<CalculationOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CalcError>,
}

fn calc(args: CalcArgs) -> CalcResult<bool> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let session = load_session(&args.session)?;
    session.settings.validate()?;

    let entries: Vec<CalcEntry> = session
        .variants
        .iter()
        .map(|variant| {
            let (output, error) = match calculate(&variant.input, &catalog, &session.settings) {
                Ok(output) => (Some(output), None),
                Err(e) => (None, Some(e)),
            };
            CalcEntry {
                variant: &variant.name,
                section_name: variant.section_name(),
                category: variant.input.category(),
                output,
                error,
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(entries.iter().all(|e| e.error.is_none()))
}

fn categories() {
    for category in Category::all() {
        println!("{}", category);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::Calc(args) => calc(args),
        Command::Categories => {
            categories();
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            if let Ok(json) = serde_json::to_string(&e) {
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
