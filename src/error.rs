//! Error types for the furigana library.
//!
//! Only I/O and schema problems are errors. Matching, reading inference and
//! annotation splicing never fail; an absent match is an empty result, not an
//! error.
//!
//! # Examples
//!
//! ```
//! use furigana::error::{FuriganaError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FuriganaError::dictionary_load("dictionary is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for furigana operations.
#[derive(Error, Debug)]
pub enum FuriganaError {
    /// I/O errors (reading dictionaries, writing reports, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The reading dictionary could not be loaded or is unusable.
    #[error("Dictionary load error: {0}")]
    DictionaryLoad(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FuriganaError.
pub type Result<T> = std::result::Result<T, FuriganaError>;

impl FuriganaError {
    /// Create a new dictionary load error.
    pub fn dictionary_load<S: Into<String>>(msg: S) -> Self {
        FuriganaError::DictionaryLoad(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        FuriganaError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FuriganaError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        FuriganaError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error means the dictionary itself is unusable.
    pub fn is_dictionary_load(&self) -> bool {
        matches!(self, FuriganaError::DictionaryLoad(_))
    }
}
