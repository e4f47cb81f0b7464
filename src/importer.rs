use std::io::Read;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::aggregate::{Diagnostics, DomainAggregator, TracingDiagnostics};
use crate::domain::EMAIL_COLUMN;
use crate::error::{ImportError, Result};
use crate::source::RowSource;
use crate::stats::{DomainCounts, ImportReport};

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Header label of the email column.
    pub column: String,
    /// `None` runs a single sequential pass; `Some(n)` folds chunks of rows
    /// on `n` worker threads.
    pub workers: Option<usize>,
    /// Rows read per parallel chunk.
    pub chunk_size: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            column: EMAIL_COLUMN.to_string(),
            workers: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Counts customers per email domain in the CSV at `path`, sorted by domain.
/// Rows without a usable email are logged and skipped.
pub fn compute_domain_counts(path: &Path) -> Result<DomainCounts> {
    let report = import(path, &ImportOptions::default(), &TracingDiagnostics)?;
    Ok(report.domains)
}

pub fn import(
    path: &Path,
    options: &ImportOptions,
    diagnostics: &dyn Diagnostics,
) -> Result<ImportReport> {
    // The file handle is released when the source drops, on every return path.
    let source = RowSource::open(path)?;
    run(source, options, diagnostics)
}

pub fn import_reader<R: Read>(
    reader: R,
    name: &str,
    options: &ImportOptions,
    diagnostics: &dyn Diagnostics,
) -> Result<ImportReport> {
    run(RowSource::from_reader(reader, name), options, diagnostics)
}

fn run<R: Read>(
    mut source: RowSource<R>,
    options: &ImportOptions,
    diagnostics: &dyn Diagnostics,
) -> Result<ImportReport> {
    let start_time = Instant::now();
    info!(action = "start", component = "import", source = source.name(), "Starting domain import");

    let header = source.header()?;
    let column = header
        .position_of(&options.column)
        .ok_or_else(|| ImportError::ColumnNotFound {
            column: options.column.clone(),
            source_name: source.name().to_string(),
        })?;
    info!(
        action = "resolve",
        component = "header",
        column = options.column.as_str(),
        index = column,
        header_len = header.len(),
        "Resolved email column"
    );

    let aggregator = match options.workers {
        None => aggregate_sequential(&mut source, column, diagnostics)?,
        Some(workers) => aggregate_parallel(
            &mut source,
            column,
            workers,
            options.chunk_size,
            diagnostics,
        )?,
    };

    let report = aggregator.finish();
    info!(
        action = "complete",
        component = "import",
        source = source.name(),
        rows_read = report.rows_read,
        rows_skipped = report.rows_skipped,
        unique_domains = report.domains.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Domain import completed"
    );
    Ok(report)
}

fn aggregate_sequential<R: Read>(
    source: &mut RowSource<R>,
    column: usize,
    diagnostics: &dyn Diagnostics,
) -> Result<DomainAggregator> {
    let mut aggregator = DomainAggregator::new(column);
    for row in source.rows() {
        aggregator.push(&row?, diagnostics);
    }
    Ok(aggregator)
}

/// Reads bounded chunks on the calling thread and folds each chunk on the
/// pool into thread-local partials, which are merged here once the chunk
/// completes.
fn aggregate_parallel<R: Read>(
    source: &mut RowSource<R>,
    column: usize,
    workers: usize,
    chunk_size: usize,
    diagnostics: &dyn Diagnostics,
) -> Result<DomainAggregator> {
    let workers = workers.max(1);
    let chunk_size = chunk_size.max(1);
    let pool = ThreadPoolBuilder::new().num_threads(workers).build()?;
    info!(
        action = "configure",
        component = "import",
        worker_count = workers,
        chunk_size,
        "Using workers for processing"
    );

    let mut total = DomainAggregator::new(column);
    let mut chunk = Vec::with_capacity(chunk_size);
    let mut rows = source.rows();

    loop {
        chunk.clear();
        for row in rows.by_ref().take(chunk_size) {
            chunk.push(row?);
        }
        if chunk.is_empty() {
            break;
        }

        let partials: Vec<DomainAggregator> = pool.install(|| {
            chunk
                .par_iter()
                .fold(
                    || DomainAggregator::new(column),
                    |mut acc, row| {
                        acc.push(row, diagnostics);
                        acc
                    },
                )
                .collect()
        });
        debug!(
            action = "merge",
            component = "import",
            chunk_rows = chunk.len(),
            partials = partials.len(),
            "Merging chunk partials"
        );
        for partial in partials {
            total.merge(partial);
        }

        if chunk.len() < chunk_size {
            break;
        }
    }

    Ok(total)
}
