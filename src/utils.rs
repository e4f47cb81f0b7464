use time::macros::format_description;
use time::UtcOffset;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
/// Logs go to stderr so stdout carries only results.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(
        offset,
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Masks every label but the TLD. Short second-level labels collapse to
/// `???` so they cannot be guessed from their length.
pub fn redact_domain(domain: &str) -> String {
    let Some((rest, tld)) = domain.rsplit_once('.') else {
        return domain.to_string();
    };

    let second_level = rest.rsplit('.').next().unwrap_or(rest);
    if second_level.len() <= 3 {
        return format!("???.{}", tld);
    }

    let masked: Vec<String> = rest.split('.').map(|label| "*".repeat(label.len())).collect();
    format!("{}.{}", masked.join("."), tld)
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if let Some(top) = args.top {
        if top == 0 {
            anyhow::bail!("--top must be greater than 0");
        }
    }

    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    if args.chunk_size == 0 {
        anyhow::bail!("--chunk-size must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn redacts_domains() {
        assert_eq!(redact_domain("localhost"), "localhost");
        assert_eq!(redact_domain("ibm.com"), "???.com");
        assert_eq!(redact_domain("acme.com"), "****.com");
        assert_eq!(redact_domain("mail.acme.co.uk"), "???.uk");
        assert_eq!(redact_domain("mail.acme.co"), "****.****.co");
    }

    #[test]
    fn rejects_zero_limits() {
        let args = crate::args::Args::parse_from(["emaildomains", "--top", "0"]);
        assert!(validate_args(&args).is_err());
        let args = crate::args::Args::parse_from(["emaildomains", "--chunk-size", "0"]);
        assert!(validate_args(&args).is_err());
        let args = crate::args::Args::parse_from(["emaildomains", "--workers", "2"]);
        assert!(validate_args(&args).is_ok());
    }
}
