//! Delivery signatures.
//!
//! The ledger signs each delivery with HMAC-SHA256 over the raw request body,
//! keyed by the webhook secret, and sends the lowercase hex digest in
//! `X-SozLedger-Signature`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "x-sozledger-signature";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature header is missing")]
    Missing,

    #[error("signature header is not a hex digest")]
    Malformed,

    #[error("signature does not match payload")]
    Mismatch,

    #[error("webhook secret cannot be used as an HMAC key")]
    Key,
}

fn mac_for(secret: &str, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Key)?;
    mac.update(payload);
    Ok(mac)
}

/// Hex digest the ledger would send for `payload`.
pub fn sign(secret: &str, payload: &[u8]) -> Result<String, SignatureError> {
    let mac = mac_for(secret, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check `header` against `payload` in constant time.
pub fn verify(secret: &str, payload: &[u8], header: Option<&str>) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;
    let expected = hex::decode(header.trim()).map_err(|_| SignatureError::Malformed)?;
    mac_for(secret, payload)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}
