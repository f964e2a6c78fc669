//! Truncated SHA-256 fingerprint of the session signing key.
//!
//! Logged at startup so operators can tell which key a node is using
//! without the key itself appearing anywhere.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First eight bytes of `SHA-256(signing key)`, lowercase hex.
///
/// ```rust
/// use actix_web::cookie::Key;
/// use portal::inbound::http::session_config::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
