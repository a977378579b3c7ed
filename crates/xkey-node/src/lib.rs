//! Hierarchical-deterministic key nodes for xkey.
//!
//! A [`KeyNode`] is one immutable point in a key tree. It is created from a
//! seed (the master node), decoded from a Base58Check extended key, or
//! derived from a parent. ed25519 trees follow SLIP-10 and only derive
//! hardened children; secp256k1 trees are handed to a BIP32 implementation.
//!
//! ```no_run
//! use xkey_node::KeyNode;
//! use xkey_types::{DerivationConfig, NetworkDescriptor};
//!
//! # fn main() -> xkey_node::KeyResult<()> {
//! let seed = [7u8; 32];
//! let master = KeyNode::from_seed(&seed, NetworkDescriptor::CATAPULT, DerivationConfig::default())?;
//! let account = master.derive_path("m/44'/4343'/0'/0'/0'")?;
//! let signature = account.sign(b"message")?;
//! assert!(account.neutered().verify(b"message", &signature));
//! # Ok(())
//! # }
//! ```

pub mod ed25519;
pub mod error;
pub mod node;
pub mod path;
pub mod payload;
pub mod secp256k1;

pub use ed25519::Ed25519Node;
pub use error::{KeyError, KeyResult};
pub use node::KeyNode;
pub use path::{DerivationPath, PathSegment, HARDENED_OFFSET};
pub use payload::{ExtendedKeyPayload, PAYLOAD_SIZE};
pub use secp256k1::Secp256k1Node;
