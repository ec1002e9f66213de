use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to read spreadsheet '{}': {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("invalid config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cycle detected in hierarchy: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("target node '{0}' not found in hierarchy")]
    TargetNotFound(String),

    #[error("unknown kecamatan '{key}' (available: {available})")]
    UnknownRegion { key: String, available: String },

    #[error("unsupported file format '{}': expected .csv, .xls or .xlsx", .0.display())]
    UnsupportedFormat(PathBuf),
}
