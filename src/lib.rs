pub mod aggregate;
pub mod args;
pub mod domain;
pub mod error;
pub mod importer;
pub mod report;
pub mod source;
pub mod stats;
pub mod utils;

pub use aggregate::{CollectingDiagnostics, Diagnostics, DomainAggregator, TracingDiagnostics};
pub use args::Args;
pub use error::{ErrorKind, ImportError};
pub use importer::{compute_domain_counts, import, import_reader, ImportOptions};
pub use source::{Header, Row, RowSource};
pub use stats::{DomainCount, DomainCounts, ImportReport};
