use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Keyed hash combining a chain code (or seed key) with derivation data into
/// 64 bytes of key material.
///
/// Chosen once per key tree and carried through every derivation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacAlgorithm {
    /// HMAC over SHA-512 (SLIP-10 / BIP32).
    #[default]
    HmacSha512,
    /// KMAC256 with a 512-bit output and an optional customization string.
    Kmac256,
}

impl fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HmacSha512 => write!(f, "hmac-sha512"),
            Self::Kmac256 => write!(f, "kmac256"),
        }
    }
}

impl FromStr for MacAlgorithm {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hmac-sha512" | "hmac" => Ok(Self::HmacSha512),
            "kmac256" | "kmac" => Ok(Self::Kmac256),
            other => Err(TypeError::Config(format!("unknown MAC algorithm: {other}"))),
        }
    }
}

/// Hash family used by the ed25519 engine to expand private keys and to
/// hash EdDSA transcripts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlgorithm {
    /// SHA-512, as in RFC 8032 and SLIP-10.
    #[default]
    Sha512,
    /// SHA3-512 (Catapult / Symbol).
    #[serde(rename = "sha3-512")]
    Sha3_512,
    /// Keccak-512 with the original padding (NIS1).
    #[serde(rename = "keccak512")]
    Keccak512,
}

impl DigestAlgorithm {
    pub const ALL: [Self; 3] = [Self::Sha512, Self::Sha3_512, Self::Keccak512];
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha512 => write!(f, "sha512"),
            Self::Sha3_512 => write!(f, "sha3-512"),
            Self::Keccak512 => write!(f, "keccak512"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha512" | "sha-512" => Ok(Self::Sha512),
            "sha3-512" | "sha3" => Ok(Self::Sha3_512),
            "keccak512" | "keccak" => Ok(Self::Keccak512),
            other => Err(TypeError::Config(format!("unknown digest algorithm: {other}"))),
        }
    }
}
