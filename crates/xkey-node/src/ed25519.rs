//! SLIP-10 ed25519 key nodes.
//!
//! Only hardened derivation exists on this curve: every child mixes in the
//! parent's private key, and a neutered node is a dead end for derivation.

use tracing::debug;
use xkey_crypto::{ecc, hash160, mac, mac_chunks, Signature};
use xkey_types::{CurveAlgorithm, DerivationConfig, KeyVisibility, NetworkDescriptor};
use zeroize::Zeroizing;

use crate::error::{KeyError, KeyResult};
use crate::path::{DerivationPath, HARDENED_OFFSET};
use crate::payload::{ExtendedKeyPayload, KEY_DATA_SIZE};

/// MAC key for master-node generation.
const MASTER_KEY: &[u8] = b"ed25519 seed";

/// Accepted seed sizes, in bytes.
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

pub(crate) fn check_seed(seed: &[u8]) -> KeyResult<()> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
        return Err(KeyError::InvalidSeedLength(seed.len()));
    }
    Ok(())
}

/// An immutable node in an ed25519 key tree.
///
/// The public key is computed when the node is built, so a node is never
/// missing both halves of its key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519Node {
    private_key: Option<Zeroizing<[u8; 32]>>,
    public_key: [u8; 32],
    chain_code: [u8; 32],
    network: NetworkDescriptor,
    config: DerivationConfig,
    depth: u8,
    child_index: u32,
    parent_fingerprint: u32,
}

/// Position of a node in its tree.
#[derive(Clone, Copy)]
struct Lineage {
    depth: u8,
    child_index: u32,
    parent_fingerprint: u32,
}

impl Lineage {
    const MASTER: Self = Self {
        depth: 0,
        child_index: 0,
        parent_fingerprint: 0,
    };
}

impl Ed25519Node {
    /// Build the master node for `seed`.
    ///
    /// `I = MAC("ed25519 seed", seed)`; the left half is the private key and
    /// the right half the chain code.
    pub fn from_seed(
        seed: &[u8],
        network: NetworkDescriptor,
        config: DerivationConfig,
    ) -> KeyResult<Self> {
        check_seed(seed)?;
        let i = mac(config.mac, MASTER_KEY, seed, config.salt_bytes())?;
        let node = Self::from_mac_output(&i, network, config, Lineage::MASTER)?;
        debug!(
            mac = %node.config.mac,
            digest = %node.config.digest,
            fingerprint = format_args!("{:08x}", node.fingerprint()),
            "created ed25519 master node"
        );
        Ok(node)
    }

    /// Decode a Base58Check extended key.
    pub fn from_base58(
        encoded: &str,
        network: NetworkDescriptor,
        config: DerivationConfig,
    ) -> KeyResult<Self> {
        Self::from_payload(&ExtendedKeyPayload::from_base58(encoded)?, network, config)
    }

    /// Build a node from a parsed payload, validating it against `network`.
    ///
    /// The lead byte of public key data is reserved; only the low 32 bytes
    /// are read, and they must decode to a curve point.
    pub fn from_payload(
        payload: &ExtendedKeyPayload,
        network: NetworkDescriptor,
        config: DerivationConfig,
    ) -> KeyResult<Self> {
        let visibility = payload.validate(&network)?;
        let lineage = Lineage {
            depth: payload.depth,
            child_index: payload.child_index,
            parent_fingerprint: payload.parent_fingerprint,
        };
        match visibility {
            KeyVisibility::Private => {
                Self::from_private(payload.key_body(), payload.chain_code, network, config, lineage)
            }
            KeyVisibility::Public => {
                let public_key = *payload.key_body();
                if !ecc::is_valid_public_key(&public_key) {
                    return Err(KeyError::InvalidPublicKey);
                }
                Ok(Self {
                    private_key: None,
                    public_key,
                    chain_code: payload.chain_code,
                    network,
                    config,
                    depth: lineage.depth,
                    child_index: lineage.child_index,
                    parent_fingerprint: lineage.parent_fingerprint,
                })
            }
        }
    }

    fn from_private(
        private_key: Zeroizing<[u8; 32]>,
        chain_code: [u8; 32],
        network: NetworkDescriptor,
        config: DerivationConfig,
        lineage: Lineage,
    ) -> KeyResult<Self> {
        let public_key = ecc::extract_public_key(&private_key[..], config.digest)?;
        Ok(Self {
            private_key: Some(private_key),
            public_key,
            chain_code,
            network,
            config,
            depth: lineage.depth,
            child_index: lineage.child_index,
            parent_fingerprint: lineage.parent_fingerprint,
        })
    }

    fn from_mac_output(
        i: &[u8; 64],
        network: NetworkDescriptor,
        config: DerivationConfig,
        lineage: Lineage,
    ) -> KeyResult<Self> {
        let mut private_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = [0u8; 32];
        private_key.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);
        Self::from_private(private_key, chain_code, network, config, lineage)
    }

    /// Binary extended-key payload, private when a private key is held.
    pub fn to_payload(&self) -> ExtendedKeyPayload {
        let visibility = if self.is_neutered() {
            KeyVisibility::Public
        } else {
            KeyVisibility::Private
        };
        let mut key_data = Zeroizing::new([0u8; KEY_DATA_SIZE]);
        match &self.private_key {
            Some(private_key) => key_data[1..].copy_from_slice(&private_key[..]),
            None => key_data[1..].copy_from_slice(&self.public_key),
        }
        ExtendedKeyPayload {
            version: self.network.prefix_for(visibility),
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            chain_code: self.chain_code,
            key_data,
        }
    }

    /// Base58Check encoding of [`Self::to_payload`].
    pub fn to_base58(&self) -> String {
        self.to_payload().to_base58()
    }

    /// Derive the child at `index`.
    ///
    /// Fails with `UnsupportedDerivation` for any index below 2^31 and with
    /// `MissingPrivateKey` on a neutered node.
    pub fn derive(&self, index: u32) -> KeyResult<Self> {
        let private_key = match (&self.private_key, index >= HARDENED_OFFSET) {
            (_, false) => return Err(KeyError::UnsupportedDerivation),
            (None, true) => return Err(KeyError::MissingPrivateKey),
            (Some(private_key), true) => private_key,
        };

        let depth = self.depth.checked_add(1).ok_or(KeyError::DepthOverflow)?;
        let i = mac_chunks(
            self.config.mac,
            &self.chain_code,
            &[&[0u8][..], &private_key[..], &index.to_be_bytes()[..]],
            self.config.salt_bytes(),
        )?;

        let lineage = Lineage {
            depth,
            child_index: index,
            parent_fingerprint: self.fingerprint(),
        };
        let child = Self::from_mac_output(&i, self.network, self.config.clone(), lineage)?;
        debug!(
            depth,
            index = index - HARDENED_OFFSET,
            parent = format_args!("{:08x}", lineage.parent_fingerprint),
            "derived ed25519 child"
        );
        Ok(child)
    }

    /// Derive the hardened child `index'`.
    pub fn derive_hardened(&self, index: u32) -> KeyResult<Self> {
        if index >= HARDENED_OFFSET {
            return Err(KeyError::IndexOverflow(index));
        }
        self.derive(index + HARDENED_OFFSET)
    }

    /// Walk `path` from this node. Every segment is hardened, marker or not.
    pub fn derive_path(&self, path: &str) -> KeyResult<Self> {
        let path: DerivationPath = path.parse()?;
        if path.is_absolute() && self.parent_fingerprint != 0 {
            return Err(KeyError::ExpectedMasterNode);
        }
        path.segments()
            .iter()
            .try_fold(self.clone(), |node, segment| node.derive_hardened(segment.index))
    }

    /// Public-only projection of this node.
    pub fn neutered(&self) -> Self {
        Self {
            private_key: None,
            ..self.clone()
        }
    }

    /// True when the node carries no private key.
    pub fn is_neutered(&self) -> bool {
        self.private_key.is_none()
    }

    /// True at depth zero.
    pub fn is_master(&self) -> bool {
        self.depth == 0
    }

    /// Private scalar, or `MissingPrivateKey` on a neutered node.
    pub fn private_key(&self) -> KeyResult<&[u8; 32]> {
        self.private_key
            .as_deref()
            .ok_or(KeyError::MissingPrivateKey)
    }

    /// 32-byte compressed ed25519 point.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Public key in its 33-byte key-data form, `0x00 ‖ point`.
    pub fn key_data(&self) -> [u8; KEY_DATA_SIZE] {
        let mut data = [0u8; KEY_DATA_SIZE];
        data[1..].copy_from_slice(&self.public_key);
        data
    }

    /// `hash160` of the 32-byte public key.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.public_key)
    }

    /// First four identifier bytes, big-endian.
    pub fn fingerprint(&self) -> u32 {
        let id = self.identifier();
        u32::from_be_bytes([id[0], id[1], id[2], id[3]])
    }

    /// Chain code fed to child derivation.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Network this node encodes for.
    pub fn network(&self) -> NetworkDescriptor {
        self.network
    }

    /// MAC and digest selection shared by the whole tree.
    pub fn config(&self) -> &DerivationConfig {
        &self.config
    }

    /// Distance from the master node.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Index this node was derived at, hardened offset included.
    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    /// Fingerprint of the parent, zero for a master node.
    pub fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    /// Sign `message` with the configured digest.
    pub fn sign(&self, message: &[u8]) -> KeyResult<Signature> {
        let private_key = self.private_key()?;
        Ok(ecc::sign(message, &self.public_key, private_key, self.config.digest)?)
    }

    /// Check `signature` over `message` against this node's public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        ecc::verify(&self.public_key, message, signature, self.config.digest)
    }

    /// Salted shared key between this node's private key and `their_public_key`.
    pub fn derive_shared_key(
        &self,
        salt: &[u8; 32],
        their_public_key: &[u8; 32],
    ) -> KeyResult<[u8; 32]> {
        let private_key = self.private_key()?;
        Ok(ecc::derive_shared_key(
            salt,
            private_key,
            their_public_key,
            self.config.digest,
        )?)
    }

    /// Always [`CurveAlgorithm::Ed25519`].
    pub fn curve(&self) -> CurveAlgorithm {
        CurveAlgorithm::Ed25519
    }
}

impl std::fmt::Debug for Ed25519Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Node")
            .field("public_key", &hex::encode(self.public_key))
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint))
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}
