use serde::{Deserialize, Serialize};

use crate::algorithm::{DigestAlgorithm, MacAlgorithm};
use crate::error::TypeError;

/// Algorithm choices for one key tree.
///
/// Selected when the master (or a decoded) node is created and propagated
/// unchanged to every child. Mixing algorithms inside one path is not
/// supported: a different configuration is a different tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// Keyed hash for master and child derivation.
    pub mac: MacAlgorithm,
    /// Hash family for ed25519 public-key extraction and signatures.
    pub digest: DigestAlgorithm,
    /// KMAC customization string. Ignored by HMAC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kmac_salt: Option<String>,
}

impl DerivationConfig {
    /// KMAC256 derivation with the default digest and no customization.
    pub fn kmac() -> Self {
        Self {
            mac: MacAlgorithm::Kmac256,
            ..Default::default()
        }
    }

    pub fn with_mac(mut self, mac: MacAlgorithm) -> Self {
        self.mac = mac;
        self
    }

    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    pub fn with_kmac_salt(mut self, salt: impl Into<String>) -> Self {
        self.kmac_salt = Some(salt.into());
        self
    }

    /// The customization bytes handed to the MAC provider.
    pub fn salt_bytes(&self) -> Option<&[u8]> {
        self.kmac_salt.as_deref().map(str::as_bytes)
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, TypeError> {
        toml::from_str(s).map_err(|e| TypeError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, TypeError> {
        toml::to_string(self).map_err(|e| TypeError::Config(e.to_string()))
    }
}
