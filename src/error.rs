//! Error types for the query codec

use thiserror::Error;

/// Errors that can occur while collecting names, minifying or expanding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Lex error at byte {index}: {message}")]
    Lex { message: String, index: usize },

    #[error("Introspection JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("Minified input has no header line")]
    MissingHeader,

    #[error("Invalid name in header: {0:?}")]
    InvalidName(String),

    #[error("Malformed code token: {0:?}")]
    MalformedCode(String),

    #[error("Unknown code: {0:?}")]
    UnknownCode(String),

    #[error("Name has no code in the dictionary: {0:?}")]
    UnmappedName(String),

    #[error("Baseline mismatch: expected fingerprint {expected}, got {found}")]
    BaselineMismatch { expected: String, found: String },
}

impl From<apollo_parser::Error> for CodecError {
    fn from(err: apollo_parser::Error) -> Self {
        CodecError::Lex {
            message: err.message().to_string(),
            index: err.index(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
