use std::path::PathBuf;
use thiserror::Error;

/// Error type for failures that abort the processing of a table.
///
/// Missing reference data is not an error: lookups return `None` and the
/// affected derived value degrades instead.
#[derive(Error, Debug)]
pub enum EacvError {
    #[error("{0}")]
    Error(String),
    #[error("Missing required column \"{column}\" for the {module} module")]
    MissingColumn { module: String, column: String },
    #[error("Row {row} has {found} fields, expected {expected}")]
    RowLength {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown module \"{0}\"")]
    UnknownModule(String),
}

/// Convenience type for `Result<T, EacvError>`.
pub type EacvResult<T> = Result<T, EacvError>;
