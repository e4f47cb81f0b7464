use anyhow::{Context, Result};
use clap::Parser;

use emaildomains::{import, report, utils, Args, TracingDiagnostics};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    let options = args.import_options();
    let result = import(&args.path, &options, &TracingDiagnostics)
        .with_context(|| format!("failed to import {}", args.path.display()))?;
    report::print_report(&result, &args).context("Failed to write report")?;
    Ok(())
}
