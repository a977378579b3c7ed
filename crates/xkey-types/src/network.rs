use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Elliptic curve a key tree lives on.
///
/// The set is closed: ed25519 is implemented by xkey itself, secp256k1 is
/// forwarded to an existing BIP32 implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveAlgorithm {
    Secp256k1,
    Ed25519,
}

impl fmt::Display for CurveAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256k1 => write!(f, "secp256k1"),
            Self::Ed25519 => write!(f, "ed25519"),
        }
    }
}

impl FromStr for CurveAlgorithm {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(Self::Secp256k1),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(TypeError::UnknownCurve(other.to_string())),
        }
    }
}

/// Which half of a network's prefix pair a payload version matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyVisibility {
    Private,
    Public,
}

/// Extended-key version prefixes and the curve they select.
///
/// Equality is structural: two descriptors are the same network when both
/// prefixes and the curve agree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    public_prefix: u32,
    private_prefix: u32,
    curve: CurveAlgorithm,
}

impl NetworkDescriptor {
    /// Bitcoin mainnet prefixes (`xpub` / `xprv`) on secp256k1.
    pub const BITCOIN: Self = Self::new(0x0488_b21e, 0x0488_ade4, CurveAlgorithm::Secp256k1);

    /// Catapult prefixes (`xpub` / `xprv`) on ed25519.
    pub const CATAPULT: Self = Self::new(0x0488_b21e, 0x0488_ade4, CurveAlgorithm::Ed25519);

    /// Catapult public network; same prefixes and curve as [`Self::CATAPULT`].
    pub const CATAPULT_PUBLIC: Self = Self::new(0x0488_b21e, 0x0488_ade4, CurveAlgorithm::Ed25519);

    pub const fn new(public_prefix: u32, private_prefix: u32, curve: CurveAlgorithm) -> Self {
        Self {
            public_prefix,
            private_prefix,
            curve,
        }
    }

    /// Version prefix for serialized public (neutered) keys.
    pub fn public_prefix(&self) -> u32 {
        self.public_prefix
    }

    /// Version prefix for serialized private keys.
    pub fn private_prefix(&self) -> u32 {
        self.private_prefix
    }

    pub fn curve(&self) -> CurveAlgorithm {
        self.curve
    }

    /// Classify a payload version against this network's prefixes.
    ///
    /// The private prefix wins when a network uses the same value for both.
    pub fn version_kind(&self, version: u32) -> Option<KeyVisibility> {
        if version == self.private_prefix {
            Some(KeyVisibility::Private)
        } else if version == self.public_prefix {
            Some(KeyVisibility::Public)
        } else {
            None
        }
    }

    /// The version prefix to serialize a key of the given visibility with.
    pub fn prefix_for(&self, visibility: KeyVisibility) -> u32 {
        match visibility {
            KeyVisibility::Private => self.private_prefix,
            KeyVisibility::Public => self.public_prefix,
        }
    }
}

impl fmt::Debug for NetworkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NetworkDescriptor({}, pub={:08x}, prv={:08x})",
            self.curve, self.public_prefix, self.private_prefix
        )
    }
}
