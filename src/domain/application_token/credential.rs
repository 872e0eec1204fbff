//! Salted token credential
//!
//! `hash = SHA-256(secret || salt)` where the salt is the hex string stored
//! next to the hash. Both fields are hex encoded.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const DIGEST_LEN: usize = 32;

/// Stored hash and salt of an application token secret
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCredential {
    hash: String,
    salt: String,
}

impl TokenCredential {
    /// Salt length used when none is configured
    pub const DEFAULT_SALT_BYTES: usize = 16;

    /// Secret length used when none is configured
    pub const DEFAULT_SECRET_BYTES: usize = 32;

    /// Derive a credential from a cleartext secret with a fresh random salt
    pub fn generate(raw_secret: &str) -> Self {
        Self::generate_with_salt_bytes(raw_secret, Self::DEFAULT_SALT_BYTES)
    }

    /// Same as [`generate`](Self::generate) with an explicit salt length
    pub fn generate_with_salt_bytes(raw_secret: &str, salt_bytes: usize) -> Self {
        let mut salt = vec![0u8; salt_bytes.max(1)];
        OsRng.fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let hash = hex::encode(digest(raw_secret, &salt));

        Self { hash, salt }
    }

    /// Rebuild a credential from stored columns
    pub fn from_stored(hash: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            salt: salt.into(),
        }
    }

    /// Produce a fresh cleartext secret (URL-safe base64, no padding)
    pub fn generate_secret(bytes: usize) -> String {
        let mut raw = vec![0u8; bytes.max(1)];
        OsRng.fill_bytes(&mut raw);
        URL_SAFE_NO_PAD.encode(raw)
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Check a candidate secret against this credential
    pub fn verify(&self, candidate: &str) -> bool {
        Self::verify_secret(candidate, &self.hash, &self.salt)
    }

    /// Recompute the salted hash of `candidate` and compare in constant time
    ///
    /// Returns false for an empty candidate or malformed stored fields.
    pub fn verify_secret(candidate: &str, stored_hash: &str, stored_salt: &str) -> bool {
        if candidate.is_empty() || stored_salt.is_empty() || hex::decode(stored_salt).is_err() {
            return false;
        }

        let expected = match hex::decode(stored_hash) {
            Ok(bytes) if bytes.len() == DIGEST_LEN => bytes,
            _ => return false,
        };

        constant_time_eq(&digest(candidate, stored_salt), &expected)
    }
}

// Keep secrets out of logs.
impl std::fmt::Debug for TokenCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCredential")
            .field("hash", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

fn digest(secret: &str, salt: &str) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt.as_bytes());

    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;

    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify() {
        let credential = TokenCredential::generate("s3cr3t");

        assert!(credential.verify("s3cr3t"));
        assert!(!credential.verify("wrong"));
        assert_eq!(credential.hash().len(), DIGEST_LEN * 2);
        assert_eq!(credential.salt().len(), TokenCredential::DEFAULT_SALT_BYTES * 2);
    }

    #[test]
    fn test_salt_is_random() {
        let a = TokenCredential::generate("s3cr3t");
        let b = TokenCredential::generate("s3cr3t");

        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.hash(), b.hash());
        assert!(a.verify("s3cr3t") && b.verify("s3cr3t"));
    }

    #[test]
    fn test_verify_from_stored_columns() {
        let credential = TokenCredential::generate("s3cr3t");
        let stored = TokenCredential::from_stored(credential.hash(), credential.salt());

        assert!(stored.verify("s3cr3t"));
        assert_eq!(stored, credential);
    }

    #[test]
    fn test_verify_rejects_malformed_input() {
        let credential = TokenCredential::generate("s3cr3t");

        assert!(!TokenCredential::verify_secret("", credential.hash(), credential.salt()));
        assert!(!TokenCredential::verify_secret("s3cr3t", "", credential.salt()));
        assert!(!TokenCredential::verify_secret("s3cr3t", "not-hex", credential.salt()));
        assert!(!TokenCredential::verify_secret("s3cr3t", "abcd", credential.salt()));
        assert!(!TokenCredential::verify_secret("s3cr3t", credential.hash(), ""));
        assert!(!TokenCredential::verify_secret("s3cr3t", credential.hash(), "zz"));
    }

    #[test]
    fn test_custom_salt_length() {
        let credential = TokenCredential::generate_with_salt_bytes("s3cr3t", 32);
        assert_eq!(credential.salt().len(), 64);
        assert!(credential.verify("s3cr3t"));
    }

    #[test]
    fn test_generate_secret() {
        let a = TokenCredential::generate_secret(32);
        let b = TokenCredential::generate_secret(32);

        // 32 bytes base64-encoded without padding = 43 chars
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(!a.contains(':'));
    }

    #[test]
    fn test_debug_redacts() {
        let credential = TokenCredential::generate("s3cr3t");
        let debug = format!("{:?}", credential);

        assert!(!debug.contains(credential.hash()));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
    }
}
