//! Hashing helpers for the credential flow.
//!
//! Passwords are pre-hashed client-side before they are sent: one
//! SHA-256 pass over plaintext + fixed salt, hex-encoded. The fixed salt
//! comes from [`crate::ClientConfig`] and must match what the backend
//! expects as its hashing input.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use md5::Md5;
use rand::RngExt;
use sha2::{Digest, Sha256};

/// Characters a random salt is drawn from.
const SALT_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random salt length in characters.
const SALT_LEN: usize = 32;

/// Bytes at or above this are rejected when drawing salt characters.
/// 248 is the largest multiple of the charset size that fits in a byte,
/// so every character stays equally likely.
const SALT_BYTE_LIMIT: u8 = 248;

/// Hex-encoded SHA-256 of the input.
pub fn sha256_hex(text: &str) -> String {
    let mut h = Sha256::new();
    h.update(text.as_bytes());
    hex::encode(h.finalize())
}

/// Hex-encoded MD5 of the input.
pub fn md5_hex(text: &str) -> String {
    let mut h = Md5::new();
    h.update(text.as_bytes());
    hex::encode(h.finalize())
}

/// Generate a 32-character alphanumeric salt, drawn uniformly from an
/// OS-seeded CSPRNG.
pub fn random_salt() -> String {
    let mut rng = rand::rng();
    let mut buf = [0u8; SALT_LEN];
    let mut salt = String::with_capacity(SALT_LEN);
    while salt.len() < SALT_LEN {
        rng.fill(&mut buf);
        for b in buf {
            if salt.len() == SALT_LEN {
                break;
            }
            if let Some(c) = salt_char(b) {
                salt.push(c);
            }
        }
    }
    salt
}

/// Map a random byte to a salt character, rejecting bytes that would
/// skew the distribution.
fn salt_char(b: u8) -> Option<char> {
    if b >= SALT_BYTE_LIMIT {
        return None;
    }
    Some(SALT_CHARSET[b as usize % SALT_CHARSET.len()] as char)
}

/// Pre-hash a password with the client-side fixed salt.
///
/// Order matters: plaintext password first, fixed salt appended.
pub fn hash_password(password: &str, fixed_salt: &str) -> String {
    let mut h = Sha256::new();
    h.update(password.as_bytes());
    h.update(fixed_salt.as_bytes());
    hex::encode(h.finalize())
}

/// Base64-encode a UTF-8 string.
pub fn base64_encode(text: &str) -> String {
    BASE64.encode(text.as_bytes())
}

/// Base64-decode into a UTF-8 string. `None` when the input is not valid
/// Base64 or the payload is not UTF-8.
pub fn base64_decode(text: &str) -> Option<String> {
    let bytes = BASE64.decode(text).ok()?;
    String::from_utf8(bytes).ok()
}

// ── Tests ────────────────────────────────────────────────────────
