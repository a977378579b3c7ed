use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Size of a signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Fixed 64-byte signature.
///
/// For EdDSA bytes 0..32 are `R` (a packed point) and bytes 32..64 are `S`
/// (a little-endian scalar). ECDSA signatures from the secp256k1 path use the
/// same container as `r ‖ s`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self { r, s }
    }

    /// Create from a slice, which must be exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; SIGNATURE_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidInput(format!(
                "signature must be {SIGNATURE_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(arr))
    }

    pub(crate) fn from_parts(r: [u8; 32], s: [u8; 32]) -> Self {
        Self { r, s }
    }

    /// The `R` half.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The `S` half.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl From<Signature> for String {
    fn from(sig: Signature) -> Self {
        sig.to_hex()
    }
}

impl TryFrom<String> for Signature {
    type Error = CryptoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.r[..8]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Signature {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Signature::from_bytes(bytes)
    }

    #[test]
    fn halves_split_at_32() {
        let sig = sample();
        assert_eq!(sig.r()[0], 0);
        assert_eq!(sig.r()[31], 31);
        assert_eq!(sig.s()[0], 32);
        assert_eq!(sig.s()[31], 63);
    }

    #[test]
    fn from_parts_concatenates() {
        let sig = Signature::from_parts([1; 32], [2; 32]);
        assert_eq!(sig.r(), &[1; 32]);
        assert_eq!(sig.s(), &[2; 32]);
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(Signature::from_slice(&[0u8; 64]).is_ok());
        assert!(matches!(
            Signature::from_slice(&[0u8; 63]),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn to_bytes_inverts_from_bytes() {
        let sig = sample();
        assert_eq!(Signature::from_bytes(sig.to_bytes()), sig);
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(Signature::from_hex("zz").is_err());
        assert!(Signature::from_hex("00").is_err());
    }

    #[test]
    fn serde_roundtrip_as_hex() {
        let sig = sample();
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"{}\"", sig.to_hex()));
        let parsed: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, parsed);
    }

    #[test]
    fn debug_is_truncated() {
        let debug = format!("{:?}", sample());
        assert_eq!(debug, "Signature(0001020304050607...)");
    }
}
