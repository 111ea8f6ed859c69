//! Error taxonomy shared by the counter, the tournament graph and the loaders.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TournamentError>;

/// Errors raised while building, indexing, or loading colorings.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// A digit row does not have the triangular length `row`.
    #[error("row {row} has {got} digits, expected {expected}")]
    RowLength {
        /// Row index.
        row: usize,
        /// Required length (equal to the row index).
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// A digit lies outside `[0, base)`.
    #[error("digit {digit} at ({row}, {col}) is outside [0, {base})")]
    DigitOutOfRange {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending digit.
        digit: u8,
        /// Counter base.
        base: u8,
    },

    /// Counters need at least two symbols per digit.
    #[error("base {base} is not supported (need base >= 2)")]
    InvalidBase {
        /// Requested base.
        base: u8,
    },

    /// Recoloring with a value that is not one of the three colors.
    #[error("color {color} is not one of 0, 1, 2")]
    InvalidColor {
        /// Offending color.
        color: u8,
    },

    /// A vertex index is not below the graph order.
    #[error("vertex {vertex} is out of range for order {order}")]
    VertexOutOfRange {
        /// Offending vertex.
        vertex: usize,
        /// Number of vertices.
        order: usize,
    },

    /// An arc was requested between a vertex and itself.
    #[error("vertex {vertex} has no arc to itself")]
    SelfArc {
        /// Offending vertex.
        vertex: usize,
    },

    /// A vertex appears twice in a subgraph selection.
    #[error("vertex {vertex} selected more than once")]
    DuplicateVertex {
        /// Offending vertex.
        vertex: usize,
    },

    /// A raw hash code has more base-3 digits than the triangle holds.
    #[error("hash code does not fit a coloring of order {order}")]
    HashOutOfRange {
        /// Requested order.
        order: usize,
    },

    /// The full enumeration cycle `base^C(n,2)` overflows `u64`.
    #[error("enumeration space for order {order} in base {base} does not fit in u64")]
    SpaceTooLarge {
        /// Requested order.
        order: usize,
        /// Counter base.
        base: u8,
    },

    /// The persisted text contained no tokens.
    #[error("coloring file is empty")]
    Empty,

    /// A token could not be read as a number.
    #[error("token {index} ({token:?}) is not a valid number")]
    BadToken {
        /// Zero-based token position.
        index: usize,
        /// The token text.
        token: String,
    },

    /// Fewer color digits than `n(n-1)/2`.
    #[error("expected {expected} color digits, found {got}")]
    Truncated {
        /// Required digit count.
        expected: usize,
        /// Digits present.
        got: usize,
    },

    /// Extra tokens after the last color digit.
    #[error("unexpected data after {expected} color digits")]
    TrailingData {
        /// Required digit count.
        expected: usize,
    },

    /// File could not be opened, read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
