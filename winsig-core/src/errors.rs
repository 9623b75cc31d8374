use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntervalError {
    #[error("Failed to open file {path}: {source}")]
    FileOpen {
        path: String,
        source: std::io::Error,
    },

    #[error("Error parsing interval at line {line}: {reason}")]
    IntervalParse { line: usize, reason: String },

    #[error("Error parsing sequence sizes at line {line}: {reason}")]
    SequenceSizeParse { line: usize, reason: String },

    #[error("Sequence {0} is listed more than once in the sequence sizes file")]
    DuplicateSequence(String),

    #[error("Corrupted file. 0 intervals found in the file: {0}")]
    EmptyIntervalSet(String),

    #[error("Invalid window parameters: size={size}, step={step}")]
    InvalidWindowParameters { size: i64, step: i64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
