//! ed25519 engine over raw 32-byte keys.
//!
//! Every function here is stateless. The EdDSA hash family is injected as a
//! [`DigestAlgorithm`] so the same code path serves SHA-512 (RFC 8032,
//! SLIP-10), SHA3-512 (Catapult) and Keccak-512 (NIS1) networks.
//!
//! Scalar multiplications by a clamped secret multiply by the full clamped
//! integer, and all reductions are the standard reduction of a 512-bit
//! little-endian integer modulo the group order `L`, so signatures are
//! byte-identical to the reference TweetNaCl-derived implementation.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use subtle::ConstantTimeEq;
use tracing::trace;
use xkey_types::DigestAlgorithm;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::hasher::{Digester, HASH_SIZE};
use crate::signature::Signature;

/// Size of private keys, public keys and shared keys, in bytes.
pub const KEY_SIZE: usize = 32;

/// Force a 32-byte string into ed25519 scalar form.
///
/// Clears the three low bits of byte 0, clears the top bit of byte 31 and
/// sets bit 6 of byte 31.
pub fn clamp(d: &mut [u8; KEY_SIZE]) {
    d[0] &= 248;
    d[31] &= 127;
    d[31] |= 64;
}

/// A private key run through the expand hash: the clamped scalar half and
/// the nonce-prefix half.
#[derive(Zeroize, ZeroizeOnDrop)]
struct ExpandedSecret {
    scalar: [u8; KEY_SIZE],
    prefix: [u8; KEY_SIZE],
}

impl ExpandedSecret {
    fn from_hash(mut hash: [u8; HASH_SIZE]) -> Self {
        let mut scalar = [0u8; KEY_SIZE];
        let mut prefix = [0u8; KEY_SIZE];
        scalar.copy_from_slice(&hash[..KEY_SIZE]);
        prefix.copy_from_slice(&hash[KEY_SIZE..]);
        hash.zeroize();
        clamp(&mut scalar);
        Self { scalar, prefix }
    }

    fn new(private_key: &[u8], digester: &Digester) -> Result<Self, CryptoError> {
        check_private_key(private_key)?;
        Ok(Self::from_hash(digester.expand(private_key)))
    }
}

fn check_private_key(private_key: &[u8]) -> Result<(), CryptoError> {
    if private_key.len() != KEY_SIZE {
        return Err(CryptoError::key_length("private key", private_key.len()));
    }
    Ok(())
}

fn reduce(wide: &[u8; HASH_SIZE]) -> Scalar {
    Scalar::from_bytes_mod_order_wide(wide)
}

/// Whether `s` is already reduced modulo `L`.
pub fn is_reduced(s: &[u8; KEY_SIZE]) -> bool {
    bool::from(Scalar::from_canonical_bytes(*s).is_some())
}

/// Whether `s` is an acceptable signature `S` half: reduced and non-zero.
pub fn is_canonical_s(s: &[u8; KEY_SIZE]) -> bool {
    s.iter().any(|&b| b != 0) && is_reduced(s)
}

/// Whether `public_key` decodes to a point on the curve.
pub fn is_valid_public_key(public_key: &[u8; KEY_SIZE]) -> bool {
    CompressedEdwardsY(*public_key).decompress().is_some()
}

/// Derive the packed public point for a private key.
///
/// `d = clamp(expand(private_key)[..32])`, result is `pack(d·B)`.
pub fn extract_public_key(
    private_key: &[u8],
    digest: DigestAlgorithm,
) -> Result<[u8; KEY_SIZE], CryptoError> {
    let expanded = ExpandedSecret::new(private_key, &Digester::new(digest))?;
    Ok(EdwardsPoint::mul_base_clamped(expanded.scalar)
        .compress()
        .to_bytes())
}

/// Deterministic EdDSA signature of `message`.
///
/// The caller supplies the public key matching `private_key`; it is hashed
/// into the challenge as-is.
pub fn sign(
    message: &[u8],
    public_key: &[u8; KEY_SIZE],
    private_key: &[u8],
    digest: DigestAlgorithm,
) -> Result<Signature, CryptoError> {
    check_private_key(private_key)?;
    let mut hasher = Digester::new(digest).stream();

    hasher.update(private_key);
    let expanded = ExpandedSecret::from_hash(hasher.finalize());

    hasher.update(&expanded.prefix);
    hasher.update(message);
    let mut nonce_hash = hasher.finalize();
    let mut r = reduce(&nonce_hash);
    nonce_hash.zeroize();

    let encoded_r = EdwardsPoint::mul_base(&r).compress();

    hasher.update(encoded_r.as_bytes());
    hasher.update(public_key);
    hasher.update(message);
    let h = reduce(&hasher.finalize());

    let mut a = Scalar::from_bytes_mod_order(expanded.scalar);
    let s = (h * a + r).to_bytes();
    a.zeroize();
    r.zeroize();

    debug_assert!(is_reduced(&s), "signature S must come out reduced");
    Ok(Signature::from_parts(encoded_r.to_bytes(), s))
}

/// Verify an EdDSA signature. Never fails; every rejection is `false`.
///
/// Rejects a non-canonical `S`, the all-zero weak public key and public keys
/// that do not decode to a curve point before doing any point arithmetic.
pub fn verify(
    public_key: &[u8; KEY_SIZE],
    message: &[u8],
    signature: &Signature,
    digest: DigestAlgorithm,
) -> bool {
    if !is_canonical_s(signature.s()) {
        trace!("rejecting signature with non-canonical S");
        return false;
    }

    if public_key.iter().all(|&b| b == 0) {
        trace!("rejecting weak (zero) public key");
        return false;
    }

    let Some(a) = CompressedEdwardsY(*public_key).decompress() else {
        trace!("rejecting public key that is not a curve point");
        return false;
    };

    let Some(s) = Option::<Scalar>::from(Scalar::from_canonical_bytes(*signature.s())) else {
        return false;
    };

    let mut hasher = Digester::new(digest).stream();
    hasher.update(signature.r());
    hasher.update(public_key);
    hasher.update(message);
    let h = reduce(&hasher.finalize());

    let check = EdwardsPoint::vartime_double_scalar_mul_basepoint(&h, &-a, &s).compress();
    bool::from(check.as_bytes()[..].ct_eq(&signature.r()[..]))
}

/// Salted Diffie-Hellman shared key for encrypted-message key agreement.
///
/// `raw = pack(d·(−A))` with `d` the clamped expansion of `private_key`;
/// the result is the 32-byte family hash of `raw ⊕ salt`. Both parties
/// arrive at the same key from their own private key and the other's
/// public key.
pub fn derive_shared_key(
    salt: &[u8; KEY_SIZE],
    private_key: &[u8],
    public_key: &[u8; KEY_SIZE],
    digest: DigestAlgorithm,
) -> Result<[u8; KEY_SIZE], CryptoError> {
    let digester = Digester::new(digest);
    let expanded = ExpandedSecret::new(private_key, &digester)?;

    let a = CompressedEdwardsY(*public_key)
        .decompress()
        .ok_or(CryptoError::InvalidPublicKey)?;

    let mut shared = (-a).mul_clamped(expanded.scalar).compress().to_bytes();
    for (byte, salt_byte) in shared.iter_mut().zip(salt) {
        *byte ^= salt_byte;
    }

    let key = digester.hash32(&shared);
    shared.zeroize();
    Ok(key)
}
