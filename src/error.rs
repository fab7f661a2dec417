//! Error types for the dropfour crate

use thiserror::Error;

use crate::board::Side;

/// Main error type for the dropfour crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: column {column} is out of range (board width is {width})")]
    ColumnOutOfRange { column: usize, width: usize },

    #[error("invalid move: column {column} is full")]
    ColumnFull { column: usize },

    #[error("game already over")]
    GameOver,

    #[error("move out of turn: it is the {expected} side's turn")]
    OutOfTurn { expected: Side },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("protocol violation: {context}")]
    ProtocolViolation { context: String },

    #[error("board diagram has {got} rows, expected {expected}")]
    InvalidRowCount { expected: usize, got: usize },

    #[error("board row '{row}' has {got} cells, expected {expected}")]
    InvalidRowLength {
        expected: usize,
        got: usize,
        row: String,
    },

    #[error("invalid character '{character}' in board row '{row}'")]
    InvalidCellCharacter { character: char, row: String },

    #[error("column {column} violates gravity: a piece sits above an empty cell")]
    FloatingPiece { column: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a recoverable invalid move that the interactive
    /// caller should answer with a re-prompt.
    pub fn is_invalid_move(&self) -> bool {
        matches!(
            self,
            Error::ColumnOutOfRange { .. } | Error::ColumnFull { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
