use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown curve algorithm: {0}")]
    UnknownCurve(String),

    #[error("configuration error: {0}")]
    Config(String),
}
