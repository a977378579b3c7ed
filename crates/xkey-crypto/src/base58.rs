//! Base58Check with the Bitcoin alphabet and a 4-byte double-SHA256 checksum.

use crate::error::CryptoError;

/// Append the checksum and encode.
pub fn encode_check(payload: &[u8]) -> String {
    bs58::encode(payload).with_check().into_string()
}

/// Decode and strip the checksum. Fails on bad characters, payloads too
/// short to carry a checksum, and checksum mismatch.
pub fn decode_check(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|e| CryptoError::Base58(e.to_string()))
}
