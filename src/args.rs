use clap::Parser;
use std::path::PathBuf;

use crate::domain::EMAIL_COLUMN;
use crate::importer::{ImportOptions, DEFAULT_CHUNK_SIZE};

#[derive(Parser, Debug)]
#[command(
    name = "emaildomains",
    about = "Count customers per email domain in a CSV file",
    version,
    long_about = None
)]
pub struct Args {
    /// CSV file with a header row containing an email column
    #[arg(default_value = "customers.csv")]
    pub path: PathBuf,

    /// Header label of the email column
    #[arg(short, long, default_value = EMAIL_COLUMN)]
    pub column: String,

    /// Process rows on a worker pool
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of worker threads (implies --parallel)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Rows handed to the worker pool at a time
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Number of most common domains to display
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Redact domain names for privacy
    #[arg(long)]
    pub redact: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn import_options(&self) -> ImportOptions {
        let workers = match (self.workers, self.parallel) {
            (Some(workers), _) => Some(workers),
            (None, true) => Some(std::cmp::min(num_cpus::get(), 8)),
            (None, false) => None,
        };
        ImportOptions {
            column: self.column.clone(),
            workers,
            chunk_size: self.chunk_size,
        }
    }
}
