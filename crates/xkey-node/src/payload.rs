use tracing::debug;
use xkey_crypto::{decode_check, encode_check};
use xkey_types::{KeyVisibility, NetworkDescriptor};
use zeroize::Zeroizing;

use crate::error::{KeyError, KeyResult};

/// Serialized extended-key size, before the Base58Check checksum.
pub const PAYLOAD_SIZE: usize = 78;

/// Size of the key-data field.
pub const KEY_DATA_SIZE: usize = 33;

/// The BIP32 78-byte extended-key layout, shared by both curves.
///
/// ```text
/// version(4, BE) ‖ depth(1) ‖ parent_fingerprint(4, BE) ‖ child_index(4, BE)
///     ‖ chain_code(32) ‖ key_data(33)
/// ```
///
/// `key_data` is `0x00 ‖ private_key` for private payloads and a 33-byte
/// public-key encoding otherwise. It is zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedKeyPayload {
    pub version: u32,
    pub depth: u8,
    pub parent_fingerprint: u32,
    pub child_index: u32,
    pub chain_code: [u8; 32],
    pub key_data: Zeroizing<[u8; KEY_DATA_SIZE]>,
}

impl ExtendedKeyPayload {
    /// Parse the raw layout. Only the length is checked here.
    pub fn from_bytes(bytes: &[u8]) -> KeyResult<Self> {
        if bytes.len() != PAYLOAD_SIZE {
            return Err(KeyError::InvalidPayloadLength(bytes.len()));
        }

        let be32 = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&bytes[13..45]);
        let mut key_data = Zeroizing::new([0u8; KEY_DATA_SIZE]);
        key_data.copy_from_slice(&bytes[45..]);

        Ok(Self {
            version: be32(0),
            depth: bytes[4],
            parent_fingerprint: be32(5),
            child_index: be32(9),
            chain_code,
            key_data,
        })
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; PAYLOAD_SIZE]> {
        let mut out = Zeroizing::new([0u8; PAYLOAD_SIZE]);
        out[..4].copy_from_slice(&self.version.to_be_bytes());
        out[4] = self.depth;
        out[5..9].copy_from_slice(&self.parent_fingerprint.to_be_bytes());
        out[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        out[13..45].copy_from_slice(&self.chain_code);
        out[45..].copy_from_slice(&self.key_data[..]);
        out
    }

    /// Base58Check-decode and parse.
    pub fn from_base58(encoded: &str) -> KeyResult<Self> {
        let bytes = Zeroizing::new(decode_check(encoded)?);
        let payload = Self::from_bytes(&bytes)?;
        debug!(
            version = format_args!("{:08x}", payload.version),
            depth = payload.depth,
            child_index = payload.child_index,
            "decoded extended key payload"
        );
        Ok(payload)
    }

    pub fn to_base58(&self) -> String {
        encode_check(&self.to_bytes()[..])
    }

    /// Check the version against `network` and the master-node invariant,
    /// returning which kind of key the payload carries.
    ///
    /// Private payloads must also lead their key data with `0x00`.
    pub fn validate(&self, network: &NetworkDescriptor) -> KeyResult<KeyVisibility> {
        let visibility = network
            .version_kind(self.version)
            .ok_or(KeyError::UnknownVersion(self.version))?;

        if self.depth == 0 && (self.parent_fingerprint != 0 || self.child_index != 0) {
            return Err(KeyError::InconsistentMasterNode {
                parent_fingerprint: self.parent_fingerprint,
                child_index: self.child_index,
            });
        }

        if visibility == KeyVisibility::Private && self.key_data[0] != 0 {
            return Err(KeyError::MalformedPrivateKey(self.key_data[0]));
        }

        Ok(visibility)
    }

    /// The 32 bytes following the key-data lead byte.
    pub fn key_body(&self) -> Zeroizing<[u8; 32]> {
        let mut body = Zeroizing::new([0u8; 32]);
        body.copy_from_slice(&self.key_data[1..]);
        body
    }
}

impl std::fmt::Debug for ExtendedKeyPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedKeyPayload")
            .field("version", &format_args!("{:08x}", self.version))
            .field("depth", &self.depth)
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .field("key_data", &"<redacted>")
            .finish_non_exhaustive()
    }
}
