use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of an import run. Rows without a usable email are not
/// errors; they are reported through [`crate::Diagnostics`] instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed reading {source_name}: {inner}")]
    Read {
        source_name: String,
        #[source]
        inner: csv::Error,
    },

    #[error("{source_name} has no header row")]
    EmptyInput { source_name: String },

    #[error("{column} column not found in file: {source_name}")]
    ColumnNotFound { column: String, source_name: String },

    #[error("could not start worker pool: {0}")]
    Worker(#[from] rayon::ThreadPoolBuildError),
}

/// Coarse category of an [`ImportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    ColumnNotFound,
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            ImportError::Open { .. }
            | ImportError::Read { .. }
            | ImportError::EmptyInput { .. }
            | ImportError::Worker(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_not_found_names_the_source() {
        let err = ImportError::ColumnNotFound {
            column: "email".to_string(),
            source_name: "customers.csv".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
        assert_eq!(
            err.to_string(),
            "email column not found in file: customers.csv"
        );
    }

    #[test]
    fn open_failure_is_io() {
        let err = ImportError::Open {
            path: PathBuf::from("missing.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
