use anyhow::{bail, Context, Result};
use clap::Parser;
use config_tree_core::parse_file;
use ned2oc::xr::check_features;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod cli;
mod coverage_cmd;
mod path_guard;
mod translate_cmd;

use cli::{CheckXrArgs, Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Translate(args) => translate_cmd::run_translate(args),
        Command::Coverage(args) => coverage_cmd::run_coverage(args),
        Command::CheckXr(args) => run_check_xr(args),
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ned2oc={level}")));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run_check_xr(args: CheckXrArgs) -> Result<()> {
    let service = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    if let Err(err) = check_features(&service) {
        bail!("check-xr failed: {err}");
    }
    println!("check-xr ok: no unsupported OpenConfig families configured");
    Ok(())
}
