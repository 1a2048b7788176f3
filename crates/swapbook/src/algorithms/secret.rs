//! # Secret Generation and Verification
//!
//! Cryptographic primitives binding the two legs of a swap. The digest is
//! SHA-256 over the raw 32 secret bytes; both legs of a swap must use the
//! identical algorithm or cross-chain claims become mutually unverifiable.

use crate::domain::{Hash, Secret, SecureSecret};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a 32-byte secret from a cryptographically secure source.
pub fn generate_secret() -> SecureSecret {
    let mut secret = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret);
    SecureSecret::new(secret)
}

/// Derive the public hash lock from a secret.
pub fn hash_lock(secret: &Secret) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.finalize().into()
}

/// Check that a secret opens a hash lock.
pub fn verify_secret(secret: &Secret, digest: &Hash) -> bool {
    hash_lock(secret) == *digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_unique() {
        let s1 = generate_secret();
        let s2 = generate_secret();
        assert_ne!(s1.expose(), s2.expose());
    }

    #[test]
    fn test_hash_lock_deterministic() {
        let secret = [0xABu8; 32];
        assert_eq!(hash_lock(&secret), hash_lock(&secret));
    }

    #[test]
    fn test_hash_lock_differs_per_secret() {
        assert_ne!(hash_lock(&[0xABu8; 32]), hash_lock(&[0xCDu8; 32]));
    }

    #[test]
    fn test_verify_secret_valid() {
        let secret = generate_secret();
        let digest = hash_lock(secret.as_bytes());
        assert!(verify_secret(secret.as_bytes(), &digest));
    }

    #[test]
    fn test_verify_secret_invalid() {
        assert!(!verify_secret(&[0xABu8; 32], &[0xCDu8; 32]));
    }

    #[test]
    fn test_digest_is_plain_sha256() {
        // Known vector: SHA-256 of 32 zero bytes.
        let digest = hash_lock(&[0u8; 32]);
        assert_eq!(
            hex::encode(digest),
            "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925"
        );
    }
}
