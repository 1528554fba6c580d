//! pkg-inspect - Python package inspector CLI tool
//!
//! Reports on installed interpreters and their packages, and on package
//! release history, repository and download statistics.

use clap::Parser;
use pkg_inspect::cli::{CliArgs, Command};
use pkg_inspect::config::Settings;
use pkg_inspect::error::AppError;
use pkg_inspect::inspect::{Field, Inspector};
use pkg_inspect::output::{create_formatter, OutputConfig};
use pkg_inspect::progress::Progress;
use pkg_inspect::version::{UpdateFilter, UpdateOrder};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pkg_inspect=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.debug);

    tracing::debug!("pkg-inspect starting with args: {:?}", args);

    if args.no_color {
        colored::control::set_override(false);
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Settings file, then CLI flags and environment on top
fn build_inspector(args: &CliArgs) -> Result<Inspector, AppError> {
    let settings = Settings::load(args.config.as_deref())?
        .with_python_roots(args.python_roots.clone())
        .with_env_token(std::env::var("GITHUB_TOKEN").ok())
        .with_registry_urls(
            args.pypi_url.clone(),
            args.github_url.clone(),
            args.pypistats_url.clone(),
        );
    tracing::debug!("python roots: {:?}", settings.python_roots);

    Ok(Inspector::from_settings(&settings)?)
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let inspector = build_inspector(&args)?;
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.no_color);
    let mut progress = Progress::new(output_config.shows_progress() && args.is_remote());
    let formatter = create_formatter(output_config);
    let mut out: Vec<u8> = Vec::new();

    match &args.command {
        Command::Pythons => formatter.format_pythons(&inspector.pythons()?, &mut out)?,
        Command::Packages { python } => {
            let (python, dists) = inspector.packages(python.as_deref())?;
            formatter.format_packages(&python, &dists, &mut out)?;
        }
        Command::Fields => formatter.format_fields(Field::names(), &mut out)?,
        Command::Inspect {
            package,
            field,
            python,
        } => {
            let field = Field::parse(field);
            progress.spinner(&format!("Inspecting {} {}", package, field));
            let value = inspector.inspect(package, &field, python.as_deref()).await;
            progress.finish_and_clear();
            formatter.format_value(package, &field, &value?, &mut out)?;
        }
        Command::Pypi { package, field } => {
            let field = Field::parse(field);
            progress.spinner(&format!("Querying {} {}", package, field));
            let value = inspector.pypi(package, &field).await;
            progress.finish_and_clear();
            formatter.format_value(package, &field, &value?, &mut out)?;
        }
        Command::Updates {
            package,
            current,
            prereleases,
            yanked,
            age,
            descending,
        } => {
            let order = if *descending {
                UpdateOrder::Descending
            } else {
                UpdateOrder::Ascending
            };
            let mut filter = UpdateFilter::new()
                .with_prereleases(*prereleases)
                .with_yanked(*yanked)
                .with_order(order);
            if let Some(age) = age {
                filter = filter.with_min_age(*age);
            }

            progress.spinner(&format!("Fetching releases of {}", package));
            let updates = inspector.updates(package, current.as_deref(), &filter).await;
            progress.finish_and_clear();
            formatter.format_updates(package, &updates?, &mut out)?;
        }
        Command::Compare {
            package,
            field: None,
            source,
            target,
            ..
        } => {
            let comparison = inspector.compare_package(package, source, target)?;
            formatter.format_comparison(package, &comparison, &mut out)?;
        }
        Command::Compare {
            package,
            field: Some(field),
            source,
            target,
            op,
        } => {
            let field = Field::parse(field);
            progress.spinner(&format!("Comparing {} {}", package, field));
            let comparison = inspector
                .compare_field(package, &field, source, target, *op)
                .await;
            progress.finish_and_clear();
            formatter.format_field_comparison(&comparison?, &mut out)?;
        }
        Command::Diff { source, target } => {
            let diff = inspector.diff(source, target)?;
            formatter.format_diff(&diff, &mut out)?;
        }
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(&out)?;
    stdout.flush()?;
    Ok(())
}
