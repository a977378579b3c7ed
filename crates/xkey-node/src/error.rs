use thiserror::Error;
use xkey_crypto::CryptoError;
use xkey_types::CurveAlgorithm;

/// Errors produced by key-node construction, derivation and serialization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("seed must be 16 to 64 bytes, got {0}")]
    InvalidSeedLength(usize),

    #[error("extended key payload must be 78 bytes, got {0}")]
    InvalidPayloadLength(usize),

    #[error("version {0:#010x} matches neither network prefix")]
    UnknownVersion(u32),

    #[error("depth-0 node has parent fingerprint {parent_fingerprint:#010x} and child index {child_index}")]
    InconsistentMasterNode {
        parent_fingerprint: u32,
        child_index: u32,
    },

    #[error("private key data must start with 0x00, got {0:#04x}")]
    MalformedPrivateKey(u8),

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("path starting with m/ requires a master node")]
    ExpectedMasterNode,

    #[error("operation requires a private key")]
    MissingPrivateKey,

    #[error("non-hardened derivation is not permitted for ed25519")]
    UnsupportedDerivation,

    #[error("hardened index {0} exceeds 2^31 - 1")]
    IndexOverflow(u32),

    #[error("child depth would exceed 255")]
    DepthOverflow,

    #[error("{operation} is not available on {curve}")]
    UnsupportedOperation {
        operation: &'static str,
        curve: CurveAlgorithm,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("base58check decoding failed: {0}")]
    Base58(String),

    #[error("public key does not decode to a curve point")]
    InvalidPublicKey,

    #[error("secp256k1 delegate: {0}")]
    Secp256k1(String),

    #[error("crypto error: {0}")]
    Crypto(CryptoError),
}

impl From<CryptoError> for KeyError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidInput(msg) => Self::InvalidInput(msg),
            CryptoError::InvalidPublicKey => Self::InvalidPublicKey,
            CryptoError::Base58(msg) => Self::Base58(msg),
            other => Self::Crypto(other),
        }
    }
}

impl From<bip32::Error> for KeyError {
    fn from(e: bip32::Error) -> Self {
        Self::Secp256k1(e.to_string())
    }
}

/// Result alias for key-node operations.
pub type KeyResult<T> = Result<T, KeyError>;
