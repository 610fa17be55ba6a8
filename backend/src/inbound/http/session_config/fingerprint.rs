//! Session key fingerprinting for operational visibility.
//!
//! The server logs a truncated SHA-256 of the signing key at startup so
//! operators can tell which key is active without exposing key material.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of the key's signing material, as 16
/// lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use notes_backend::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
