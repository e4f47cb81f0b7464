use std::io::{self, Write};

use crate::stats::{DomainCount, ImportReport};
use crate::utils::{format_number, redact_domain};
use crate::Args;

/// Domains in display order: by name, or by descending count when `--top`
/// is given.
fn displayed(report: &ImportReport, args: &Args) -> Vec<DomainCount> {
    let mut domains: Vec<DomainCount> = report.domains.iter().cloned().collect();
    if let Some(top) = args.top {
        // Stable sort keeps name order among equal counts.
        domains.sort_by(|a, b| b.count.cmp(&a.count));
        domains.truncate(top);
    }
    if args.redact {
        for domain in &mut domains {
            domain.name = redact_domain(&domain.name);
        }
    }
    domains
}

pub fn write_report<W: Write>(out: &mut W, report: &ImportReport, args: &Args) -> io::Result<()> {
    let domains = displayed(report, args);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &domains)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "--- Email domains in {} ---", args.path.display())?;
    writeln!(out, "Rows read: {}", format_number(report.rows_read))?;
    writeln!(out, "Rows skipped: {}", format_number(report.rows_skipped))?;
    writeln!(
        out,
        "Unique domains: {}",
        format_number(report.domains.len() as u64)
    )?;

    match args.top {
        Some(top) => writeln!(
            out,
            "\nTop {} domains:",
            std::cmp::min(top, report.domains.len())
        )?,
        None => writeln!(out)?,
    }
    for domain in &domains {
        writeln!(out, "{}: {}", domain.name, format_number(domain.count))?;
    }
    Ok(())
}

pub fn print_report(report: &ImportReport, args: &Args) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, args)
}
