//! Inbound webhook signature verification.
//!
//! Gophish signs every webhook body with HMAC-SHA256 over the raw request
//! bytes and sends the digest as `X-Gophish-Signature: sha256=<hex>`.
//! Verification must run on the exact bytes received, before any JSON
//! parsing takes place.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Gophish-Signature";

/// Prefix of the signature header value.
const SIGNATURE_PREFIX: &str = "sha256=";

/// Error type for signature verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The header is absent or not of the form `sha256=<hex>`.
    #[error("header X-Gophish-Signature not provided")]
    MissingSignature,

    /// The digest does not match the body.
    #[error("invalid signature")]
    InvalidSignature,
}

/// Verifies `header` against the HMAC-SHA256 of `body` keyed with `secret`.
///
/// The comparison is constant-time over the decoded digest bytes.
///
/// # Errors
///
/// - [`AuthError::MissingSignature`] when the header is absent or malformed
/// - [`AuthError::InvalidSignature`] when the digest does not match
pub fn verify(body: &[u8], header: Option<&str>, secret: &str) -> Result<(), AuthError> {
    let provided = extract_digest(header).ok_or(AuthError::MissingSignature)?;

    // A non-hex digest can never match.
    let provided = hex::decode(provided).map_err(|_| AuthError::InvalidSignature)?;

    let mut mac = new_mac(secret)?;
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| AuthError::InvalidSignature)
}

/// Computes the header value Gophish would send for `body`.
#[must_use]
pub fn sign(body: &[u8], secret: &str) -> String {
    // HMAC accepts keys of any length, so this cannot fail.
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(body);
    format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    )
}

fn new_mac(secret: &str) -> Result<HmacSha256, AuthError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidSignature)
}

fn extract_digest(header: Option<&str>) -> Option<&str> {
    let digest = header?.trim().strip_prefix(SIGNATURE_PREFIX)?;
    if digest.is_empty() || digest.contains(char::is_whitespace) {
        return None;
    }
    Some(digest)
}
