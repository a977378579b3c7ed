use hmac::{Hmac, Mac};
use sha2::Sha512;
use tiny_keccak::{Hasher, Kmac};
use xkey_types::MacAlgorithm;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Output size of every MAC algorithm, in bytes.
pub const MAC_SIZE: usize = 64;

type HmacSha512 = Hmac<Sha512>;

/// Compute a 64-byte MAC of `data` under `key`.
///
/// `salt` is the KMAC customization string (empty when absent) and is
/// ignored by HMAC-SHA512.
pub fn mac(
    algorithm: MacAlgorithm,
    key: &[u8],
    data: &[u8],
    salt: Option<&[u8]>,
) -> Result<Zeroizing<[u8; MAC_SIZE]>, CryptoError> {
    mac_chunks(algorithm, key, &[data], salt)
}

/// Like [`mac`], over the concatenation of `chunks`.
///
/// Lets callers feed `prefix ‖ secret ‖ index` without assembling the secret
/// into a temporary buffer.
pub fn mac_chunks(
    algorithm: MacAlgorithm,
    key: &[u8],
    chunks: &[&[u8]],
    salt: Option<&[u8]>,
) -> Result<Zeroizing<[u8; MAC_SIZE]>, CryptoError> {
    let mut out = Zeroizing::new([0u8; MAC_SIZE]);
    match algorithm {
        MacAlgorithm::HmacSha512 => {
            let mut mac = HmacSha512::new_from_slice(key)
                .map_err(|e| CryptoError::Mac(e.to_string()))?;
            for chunk in chunks {
                mac.update(chunk);
            }
            out.copy_from_slice(&mac.finalize().into_bytes());
        }
        MacAlgorithm::Kmac256 => {
            let mut kmac = Kmac::v256(key, salt.unwrap_or_default());
            for chunk in chunks {
                kmac.update(chunk);
            }
            kmac.finalize(&mut out[..]);
        }
    }
    Ok(out)
}
