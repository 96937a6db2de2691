//! HMAC-SHA256 signatures on payout webhooks.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::PaymentsServiceError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex signature of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-payout-signature";

/// Hex HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Check `signature` (hex) against the body in constant time.
pub fn verify(secret: &str, body: &[u8], signature: &str) -> Result<(), PaymentsServiceError> {
    let provided =
        hex::decode(signature.trim()).map_err(|_| PaymentsServiceError::InvalidSignature)?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| PaymentsServiceError::InvalidSignature)?;
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| PaymentsServiceError::InvalidSignature)
}
