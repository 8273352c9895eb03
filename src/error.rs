use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid frequency matrix at position {position}: {message}")]
    InvalidMatrix { position: usize, message: String },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Symbol '{0}' is outside the registered glyph set")]
    UnknownSymbol(char),

    #[error("Glyph index {0} is outside the registered glyph set")]
    UnknownGlyphIndex(usize),

    #[error("Derived heights not computed for record '{0}': call update_state after parsing")]
    HeightsNotComputed(String),

    #[error("Data error: {0}")]
    DataError(String),
}

/// Type alias for Result with LogoError
pub type Result<T> = std::result::Result<T, LogoError>;

impl LogoError {
    /// Create a new MalformedInput error
    pub fn malformed(message: impl Into<String>) -> Self {
        LogoError::MalformedInput(message.into())
    }

    /// Create a new InvalidMatrix error
    pub fn invalid_matrix(position: usize, message: impl Into<String>) -> Self {
        LogoError::InvalidMatrix {
            position,
            message: message.into(),
        }
    }

    /// Create a new DegenerateInput error
    pub fn degenerate(message: impl Into<String>) -> Self {
        LogoError::DegenerateInput(message.into())
    }
}
