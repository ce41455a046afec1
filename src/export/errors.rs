// gridmark/src/export/errors.rs

use crate::axis::RangeParseError;
use crate::grid::GridError;
use crate::parameter::UnknownParameterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No notes to export")]
    NothingToExport,
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("File IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid metadata {key:?}: {source}")]
    InvalidRange {
        key: String,
        #[source]
        source: RangeParseError,
    },
    #[error("Invalid metadata {key:?}: {source}")]
    InvalidAxis {
        key: String,
        #[source]
        source: UnknownParameterError,
    },
    #[error(transparent)]
    GridError(#[from] GridError),
    #[error("Unreadable table header: {0}")]
    InvalidHeader(#[from] csv::Error),
}
