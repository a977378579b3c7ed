//! Foundation types for xkey, an ed25519 hierarchical-deterministic key engine.
//!
//! This crate holds the small value types every other xkey crate agrees on.
//! Nothing here touches key material.
//!
//! # Key Types
//!
//! - [`NetworkDescriptor`]: Extended-key version prefixes plus the curve they select
//! - [`CurveAlgorithm`]: Closed set of supported curves (ed25519, delegated secp256k1)
//! - [`MacAlgorithm`]: Keyed hash used by child-key derivation
//! - [`DigestAlgorithm`]: EdDSA hash family (SHA-512, SHA3-512, Keccak-512)
//! - [`DerivationConfig`]: Per-tree algorithm choices, loadable from TOML

pub mod algorithm;
pub mod config;
pub mod error;
pub mod network;

pub use algorithm::{DigestAlgorithm, MacAlgorithm};
pub use config::DerivationConfig;
pub use error::TypeError;
pub use network::{CurveAlgorithm, KeyVisibility, NetworkDescriptor};
