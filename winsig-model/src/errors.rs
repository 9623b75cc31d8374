use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Query intervals should not be empty")]
    EmptyQueryIntervals,

    #[error("Transition probability T[{row}][{col}] = {value} is not a probability")]
    InvalidTransitionProbability { row: usize, col: usize, value: f64 },

    #[error("Can't calculate stationary distribution: T[0][1] + T[1][0] is {0}, the chain is not irreducible")]
    NotIrreducible(f64),

    #[error("Expected a 2x2 matrix, got {rows}x{cols}")]
    MatrixShape { rows: usize, cols: usize },

    #[error("Expected a 2x2 probability tensor with equal length cells: {0}")]
    TensorShape(String),

    #[error("Negative gap between {from} and {to}")]
    NegativeGap { from: i64, to: i64 },

    #[error("Negative interval length: [{begin}, {end})")]
    NegativeLength { begin: i64, end: i64 },

    #[error("Intervals [{}, {}) and [{}, {}) overlap", .first.0, .first.1, .second.0, .second.1)]
    OverlappingIntervals { first: (i64, i64), second: (i64, i64) },

    #[error("Sections [{}, {}) and [{}, {}) are not adjacent", .left.0, .left.1, .right.0, .right.1)]
    NonAdjacentSections { left: (i64, i64), right: (i64, i64) },

    #[error("Combined significance must be resolved to enrichment or depletion first")]
    UnresolvedSignificance,

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
