//! Payload format produced by [`AesGcmCipher`](crate::AesGcmCipher).
//!
//! ```text
//! base64( {"iv": base64(nonce[12]), "value": base64(ct || gcm_tag[16])} )
//! ```
//!
//! Standard base64 only, so a payload never contains `:` or `_` and cannot be
//! confused with a tagged envelope.

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const NONCE_BYTES: usize = 12;
pub const AEAD_TAG_BYTES: usize = 16;

#[derive(Serialize, Deserialize)]
struct PayloadJson {
    iv: String,
    value: String,
}

/// Decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub nonce: [u8; NONCE_BYTES],
    pub aead_ciphertext: Vec<u8>,
}

pub fn encode_payload(nonce: &[u8; NONCE_BYTES], aead_ct: &[u8]) -> Result<String, Error> {
    if aead_ct.len() < AEAD_TAG_BYTES {
        return Err(Error::EncryptionFailed);
    }
    let json = PayloadJson {
        iv: STANDARD.encode(nonce),
        value: STANDARD.encode(aead_ct),
    };
    let bytes = serde_json::to_vec(&json).map_err(|_| Error::EncryptionFailed)?;
    Ok(STANDARD.encode(bytes))
}

/// Every malformation maps to [`Error::DecryptionFailed`].
pub fn decode_payload(payload: &str) -> Result<Payload, Error> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| Error::DecryptionFailed)?;
    let json: PayloadJson = serde_json::from_slice(&bytes).map_err(|_| Error::DecryptionFailed)?;

    let nonce: [u8; NONCE_BYTES] = STANDARD
        .decode(json.iv)
        .map_err(|_| Error::DecryptionFailed)?
        .try_into()
        .map_err(|_| Error::DecryptionFailed)?;

    let aead_ciphertext = STANDARD
        .decode(json.value)
        .map_err(|_| Error::DecryptionFailed)?;
    if aead_ciphertext.len() < AEAD_TAG_BYTES {
        return Err(Error::DecryptionFailed);
    }

    Ok(Payload {
        nonce,
        aead_ciphertext,
    })
}
