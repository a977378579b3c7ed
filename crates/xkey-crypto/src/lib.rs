//! Cryptographic primitives for xkey.
//!
//! Provides the keyed-hash (MAC) provider used by child-key derivation, the
//! digest provider used as the EdDSA hash, the ed25519 engine (public-key
//! extraction, signing, verification, shared-key derivation) and the
//! Base58Check codec for extended-key payloads.
//!
//! Curve arithmetic is delegated to `curve25519-dalek`; hashes come from the
//! RustCrypto crates and `tiny-keccak`.

pub mod base58;
pub mod ecc;
pub mod error;
pub mod hasher;
pub mod mac;
pub mod signature;

pub use base58::{decode_check, encode_check};
pub use ecc::KEY_SIZE;
pub use error::CryptoError;
pub use hasher::{hash160, Digester, StreamHasher};
pub use mac::{mac, mac_chunks, MAC_SIZE};
pub use signature::{Signature, SIGNATURE_SIZE};
