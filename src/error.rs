//! Error types for the BOM converter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no usable entries in {path}")]
    EmptyConfig { path: String },

    #[error("format rules do not name a refdes column")]
    MissingRefDesRule,

    #[error("column {column:?} not found in BOM header")]
    UnknownColumn { column: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
