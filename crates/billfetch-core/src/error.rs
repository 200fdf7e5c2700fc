use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Output file already exists, refusing to overwrite: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),
}

/// One schema violation: which row, which field, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// 1-indexed row number in the source file, header counted as row 1.
    pub row: usize,
    pub field: String,
    pub reason: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}, Field '{}': {}", self.row, self.field, self.reason)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
