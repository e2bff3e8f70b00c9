use anyhow::{Context, Result};
use config_tree_core::{coverage_with_options, format_json, parse_file, CoverageOptions};
use ned2oc::report::{render_coverage, render_coverage_summary};
use ned2oc::translate::unwrap_config;

use crate::cli::{CoverageArgs, OutputFormat};

pub fn run_coverage(args: CoverageArgs) -> Result<()> {
    let before = parse_file(&args.before)
        .with_context(|| format!("failed to parse {}", args.before.display()))?;
    let leftover = parse_file(&args.leftover)
        .with_context(|| format!("failed to parse {}", args.leftover.display()))?;

    let opts = CoverageOptions {
        include_remaining: args.remaining,
        max_depth: args
            .max_depth
            .map(|depth| i32::try_from(depth).unwrap_or(i32::MAX))
            .unwrap_or(-1),
        ignore_paths: args.ignore,
    };
    let entries = coverage_with_options(unwrap_config(&before), unwrap_config(&leftover), &opts);

    if args.summary {
        println!("{}", render_coverage_summary(&entries));
        return Ok(());
    }
    match args.format {
        OutputFormat::Text => {
            println!("{}", render_coverage(&entries));
            println!("{}", render_coverage_summary(&entries));
        }
        OutputFormat::Json => println!("{}", format_json(&entries)),
    }
    Ok(())
}
