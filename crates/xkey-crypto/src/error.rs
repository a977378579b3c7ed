use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("public key does not decode to a curve point")]
    InvalidPublicKey,

    #[error("MAC initialization failed: {0}")]
    Mac(String),

    #[error("base58check decoding failed: {0}")]
    Base58(String),
}

impl CryptoError {
    pub(crate) fn key_length(what: &str, actual: usize) -> Self {
        Self::InvalidInput(format!("{what} must be 32 bytes, got {actual}"))
    }
}
