//! BIP32 secp256k1 key nodes, delegated to the `bip32` and `k256` crates.
//!
//! Derivation, neutering and ECDSA are the delegate's. This module only maps
//! between its types and the shared payload layout and error kinds.

use bip32::{ChildNumber, ExtendedKey, ExtendedKeyAttrs, Prefix, XPrv, XPub};
use k256::ecdsa::signature::{Signer, Verifier};
use tracing::debug;
use xkey_crypto::{hash160, Signature};
use xkey_types::{CurveAlgorithm, KeyVisibility, NetworkDescriptor};
use zeroize::Zeroizing;

use crate::ed25519::check_seed;
use crate::error::{KeyError, KeyResult};
use crate::path::{DerivationPath, HARDENED_OFFSET};
use crate::payload::{ExtendedKeyPayload, KEY_DATA_SIZE};

#[derive(Clone)]
enum Secp256k1Key {
    Private(XPrv),
    Public(XPub),
}

/// An immutable node in a secp256k1 BIP32 key tree.
#[derive(Clone)]
pub struct Secp256k1Node {
    key: Secp256k1Key,
    network: NetworkDescriptor,
}

impl Secp256k1Node {
    /// BIP32 master node for `seed` (HMAC-SHA512 keyed with "Bitcoin seed").
    pub fn from_seed(seed: &[u8], network: NetworkDescriptor) -> KeyResult<Self> {
        check_seed(seed)?;
        let node = Self {
            key: Secp256k1Key::Private(XPrv::new(seed)?),
            network,
        };
        debug!(
            fingerprint = format_args!("{:08x}", node.fingerprint()),
            "created secp256k1 master node"
        );
        Ok(node)
    }

    /// Decode a Base58Check extended key for `network`.
    pub fn from_base58(encoded: &str, network: NetworkDescriptor) -> KeyResult<Self> {
        Self::from_payload(&ExtendedKeyPayload::from_base58(encoded)?, network)
    }

    /// Build a node from a parsed payload, validating it against `network`.
    pub fn from_payload(payload: &ExtendedKeyPayload, network: NetworkDescriptor) -> KeyResult<Self> {
        let visibility = payload.validate(&network)?;
        let attrs = ExtendedKeyAttrs {
            depth: payload.depth,
            parent_fingerprint: payload.parent_fingerprint.to_be_bytes(),
            child_number: ChildNumber(payload.child_index),
            chain_code: payload.chain_code,
        };
        let key = match visibility {
            KeyVisibility::Private => Secp256k1Key::Private(XPrv::try_from(ExtendedKey {
                prefix: Prefix::XPRV,
                attrs,
                key_bytes: *payload.key_data,
            })?),
            KeyVisibility::Public => Secp256k1Key::Public(
                XPub::try_from(ExtendedKey {
                    prefix: Prefix::XPUB,
                    attrs,
                    key_bytes: *payload.key_data,
                })
                .map_err(|_| KeyError::InvalidPublicKey)?,
            ),
        };
        Ok(Self { key, network })
    }

    fn attrs(&self) -> &ExtendedKeyAttrs {
        match &self.key {
            Secp256k1Key::Private(xprv) => xprv.attrs(),
            Secp256k1Key::Public(xpub) => xpub.attrs(),
        }
    }

    /// Binary extended-key payload, private when a private key is held.
    pub fn to_payload(&self) -> ExtendedKeyPayload {
        let (visibility, key_data) = match &self.key {
            Secp256k1Key::Private(xprv) => {
                let mut data = Zeroizing::new([0u8; KEY_DATA_SIZE]);
                data[1..].copy_from_slice(&xprv.to_bytes());
                (KeyVisibility::Private, data)
            }
            Secp256k1Key::Public(xpub) => (KeyVisibility::Public, Zeroizing::new(xpub.to_bytes())),
        };
        let attrs = self.attrs();
        ExtendedKeyPayload {
            version: self.network.prefix_for(visibility),
            depth: attrs.depth,
            parent_fingerprint: u32::from_be_bytes(attrs.parent_fingerprint),
            child_index: attrs.child_number.0,
            chain_code: attrs.chain_code,
            key_data,
        }
    }

    /// Base58Check encoding of [`Self::to_payload`].
    pub fn to_base58(&self) -> String {
        self.to_payload().to_base58()
    }

    /// Derive the child at `index`; indices from 2^31 up are hardened.
    pub fn derive(&self, index: u32) -> KeyResult<Self> {
        let child_number = ChildNumber(index);
        let key = match &self.key {
            Secp256k1Key::Private(xprv) => Secp256k1Key::Private(xprv.derive_child(child_number)?),
            Secp256k1Key::Public(_) if child_number.is_hardened() => {
                return Err(KeyError::MissingPrivateKey)
            }
            Secp256k1Key::Public(xpub) => Secp256k1Key::Public(xpub.derive_child(child_number)?),
        };
        let child = Self {
            key,
            network: self.network,
        };
        debug!(
            depth = child.depth(),
            index,
            neutered = child.is_neutered(),
            "derived secp256k1 child"
        );
        Ok(child)
    }

    /// Derive the hardened child `index + 2^31`.
    pub fn derive_hardened(&self, index: u32) -> KeyResult<Self> {
        if index >= HARDENED_OFFSET {
            return Err(KeyError::IndexOverflow(index));
        }
        self.derive(index + HARDENED_OFFSET)
    }

    /// Walk `path`; segments without `'` are non-hardened.
    pub fn derive_path(&self, path: &str) -> KeyResult<Self> {
        let path: DerivationPath = path.parse()?;
        if path.is_absolute() && self.parent_fingerprint() != 0 {
            return Err(KeyError::ExpectedMasterNode);
        }
        path.segments()
            .iter()
            .try_fold(self.clone(), |node, segment| match segment.hardened {
                true => node.derive_hardened(segment.index),
                false if segment.index >= HARDENED_OFFSET => {
                    Err(KeyError::IndexOverflow(segment.index))
                }
                false => node.derive(segment.index),
            })
    }

    /// Public-only projection of this node.
    pub fn neutered(&self) -> Self {
        let key = match &self.key {
            Secp256k1Key::Private(xprv) => Secp256k1Key::Public(xprv.public_key()),
            Secp256k1Key::Public(xpub) => Secp256k1Key::Public(xpub.clone()),
        };
        Self {
            key,
            network: self.network,
        }
    }

    /// True when the node carries no private key.
    pub fn is_neutered(&self) -> bool {
        matches!(self.key, Secp256k1Key::Public(_))
    }

    /// True at depth zero.
    pub fn is_master(&self) -> bool {
        self.depth() == 0
    }

    /// Private scalar, or `MissingPrivateKey` on a neutered node.
    pub fn private_key(&self) -> KeyResult<Zeroizing<[u8; 32]>> {
        match &self.key {
            Secp256k1Key::Private(xprv) => Ok(Zeroizing::new(xprv.to_bytes())),
            Secp256k1Key::Public(_) => Err(KeyError::MissingPrivateKey),
        }
    }

    /// Compressed SEC1 public key; also the payload key data.
    pub fn public_key(&self) -> [u8; KEY_DATA_SIZE] {
        match &self.key {
            Secp256k1Key::Private(xprv) => xprv.public_key().to_bytes(),
            Secp256k1Key::Public(xpub) => xpub.to_bytes(),
        }
    }

    /// `hash160` of the compressed public key.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.public_key())
    }

    /// First four identifier bytes, big-endian.
    pub fn fingerprint(&self) -> u32 {
        let id = self.identifier();
        u32::from_be_bytes([id[0], id[1], id[2], id[3]])
    }

    /// Chain code fed to child derivation.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.attrs().chain_code
    }

    /// Network this node encodes for.
    pub fn network(&self) -> NetworkDescriptor {
        self.network
    }

    /// Distance from the master node.
    pub fn depth(&self) -> u8 {
        self.attrs().depth
    }

    /// Index this node was derived at, hardened offset included.
    pub fn child_index(&self) -> u32 {
        self.attrs().child_number.0
    }

    /// Fingerprint of the parent, zero for a master node.
    pub fn parent_fingerprint(&self) -> u32 {
        u32::from_be_bytes(self.attrs().parent_fingerprint)
    }

    /// ECDSA over SHA-256 of `message` (RFC 6979 nonces, low-S).
    pub fn sign(&self, message: &[u8]) -> KeyResult<Signature> {
        let Secp256k1Key::Private(xprv) = &self.key else {
            return Err(KeyError::MissingPrivateKey);
        };
        let signature: k256::ecdsa::Signature = xprv.private_key().sign(message);
        Ok(Signature::from_slice(&signature.to_bytes())?)
    }

    /// Check an ECDSA `signature` over `message` against the public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(signature) = k256::ecdsa::Signature::from_slice(&signature.to_bytes()) else {
            return false;
        };
        let result = match &self.key {
            Secp256k1Key::Private(xprv) => xprv
                .private_key()
                .verifying_key()
                .verify(message, &signature),
            Secp256k1Key::Public(xpub) => xpub.public_key().verify(message, &signature),
        };
        result.is_ok()
    }

    /// Always [`CurveAlgorithm::Secp256k1`].
    pub fn curve(&self) -> CurveAlgorithm {
        CurveAlgorithm::Secp256k1
    }
}

impl PartialEq for Secp256k1Node {
    fn eq(&self, other: &Self) -> bool {
        self.network == other.network && self.to_payload() == other.to_payload()
    }
}

impl Eq for Secp256k1Node {}

impl std::fmt::Debug for Secp256k1Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1Node")
            .field("public_key", &hex::encode(self.public_key()))
            .field("private_key", &(!self.is_neutered()).then_some("<redacted>"))
            .field("depth", &self.depth())
            .field("child_index", &self.child_index())
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint()))
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}
