use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use sha3::{Keccak256, Keccak512, Sha3_256, Sha3_512};
use xkey_types::DigestAlgorithm;

use crate::error::CryptoError;

/// Output size of the wide (expand) hash, in bytes.
pub const HASH_SIZE: usize = 64;

/// Digest provider for one EdDSA hash family.
///
/// `expand` is the 64-byte hash the ed25519 engine uses to stretch a private
/// key into a clamped scalar plus a nonce prefix; `hash32` is the 32-byte
/// member of the same family, used to hash shared keys. `stream` hands out
/// an incremental hasher for multi-chunk signing and verification.
///
/// Output length is limited to the two members of each family, 64 and 32
/// bytes. `hash` takes the length at runtime and rejects anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digester {
    algorithm: DigestAlgorithm,
}

impl Digester {
    /// SHA-512 / SHA-256 (RFC 8032, SLIP-10).
    pub const SHA512: Self = Self::new(DigestAlgorithm::Sha512);
    /// SHA3-512 / SHA3-256 (Catapult).
    pub const SHA3_512: Self = Self::new(DigestAlgorithm::Sha3_512);
    /// Keccak-512 / Keccak-256 (NIS1).
    pub const KECCAK512: Self = Self::new(DigestAlgorithm::Keccak512);

    pub const fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Family this provider hashes with.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Single-shot 64-byte hash.
    pub fn expand(&self, data: &[u8]) -> [u8; HASH_SIZE] {
        let mut hasher = self.stream();
        hasher.update(data);
        hasher.finalize()
    }

    /// Single-shot 32-byte hash from the same family.
    pub fn hash32(&self, data: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        match self.algorithm {
            DigestAlgorithm::Sha512 => out.copy_from_slice(&Sha256::digest(data)),
            DigestAlgorithm::Sha3_512 => out.copy_from_slice(&Sha3_256::digest(data)),
            DigestAlgorithm::Keccak512 => out.copy_from_slice(&Keccak256::digest(data)),
        }
        out
    }

    /// Single-shot hash with a caller-chosen output length of 64 or 32 bytes.
    pub fn hash(&self, data: &[u8], output_len: usize) -> Result<Vec<u8>, CryptoError> {
        match output_len {
            HASH_SIZE => Ok(self.expand(data).to_vec()),
            32 => Ok(self.hash32(data).to_vec()),
            other => Err(CryptoError::InvalidInput(format!(
                "digest output must be 64 or 32 bytes, got {other}"
            ))),
        }
    }

    /// A fresh incremental hasher.
    pub fn stream(&self) -> StreamHasher {
        StreamHasher::new(self.algorithm)
    }
}

impl From<DigestAlgorithm> for Digester {
    fn from(algorithm: DigestAlgorithm) -> Self {
        Self::new(algorithm)
    }
}

/// Incremental 64-byte hasher with reset/update/finalize semantics.
#[derive(Clone)]
pub struct StreamHasher {
    inner: StreamInner,
}

#[derive(Clone)]
enum StreamInner {
    Sha512(Sha512),
    Sha3(Sha3_512),
    Keccak(Keccak512),
}

impl StreamHasher {
    /// Empty hasher for `algorithm`.
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        let inner = match algorithm {
            DigestAlgorithm::Sha512 => StreamInner::Sha512(Sha512::new()),
            DigestAlgorithm::Sha3_512 => StreamInner::Sha3(Sha3_512::new()),
            DigestAlgorithm::Keccak512 => StreamInner::Keccak(Keccak512::new()),
        };
        Self { inner }
    }

    /// Discard everything absorbed so far.
    pub fn reset(&mut self) {
        match &mut self.inner {
            StreamInner::Sha512(h) => Digest::reset(h),
            StreamInner::Sha3(h) => Digest::reset(h),
            StreamInner::Keccak(h) => Digest::reset(h),
        }
    }

    /// Absorb `data`.
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.inner {
            StreamInner::Sha512(h) => Digest::update(h, data),
            StreamInner::Sha3(h) => Digest::update(h, data),
            StreamInner::Keccak(h) => Digest::update(h, data),
        }
    }

    /// Produce the digest and reset the hasher for reuse.
    pub fn finalize(&mut self) -> [u8; HASH_SIZE] {
        let mut out = [0u8; HASH_SIZE];
        match &mut self.inner {
            StreamInner::Sha512(h) => out.copy_from_slice(&h.finalize_reset()),
            StreamInner::Sha3(h) => out.copy_from_slice(&h.finalize_reset()),
            StreamInner::Keccak(h) => out.copy_from_slice(&h.finalize_reset()),
        }
        out
    }
}

/// RIPEMD160(SHA256(data)), the BIP32 key identifier hash.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(sha));
    out
}
