use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// Row-level data-quality problems never show up here: the validator drops
/// such rows instead of failing.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("input is missing mandatory column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("input names column {column} more than once")]
    DuplicateColumn { column: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
