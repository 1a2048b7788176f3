//! # Secure Secret Type
//!
//! Wrapper for swap secrets that zeroizes memory on drop.
//!
//! The secret is the only thing standing between a locked leg and a claim,
//! so it must not linger in memory after use or leak through `Debug`
//! output and logs.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::Secret;

/// A swap secret that zeroizes on drop and never prints its value.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureSecret {
    inner: Secret,
}

impl SecureSecret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: Secret) -> Self {
        Self { inner: bytes }
    }

    /// Parse from a hex string (as revealed by a counterparty).
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        if bytes.len() != 32 {
            return None;
        }
        let mut inner = [0u8; 32];
        inner.copy_from_slice(&bytes);
        Some(Self { inner })
    }

    /// Borrow the secret bytes. Use immediately, do not hold on to it.
    pub fn as_bytes(&self) -> &Secret {
        &self.inner
    }

    /// Copy out the raw array for passing to a chain connector.
    pub fn expose(&self) -> Secret {
        self.inner
    }

    /// Hex encoding, for recording a revealed secret on a completed order.
    pub fn to_hex(&self) -> String {
        hex::encode(self.inner)
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureSecret(***)")
    }
}

impl Serialize for SecureSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SecureSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).ok_or_else(|| serde::de::Error::custom("invalid secret encoding"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_hex() {
        let secret = SecureSecret::new([0xCDu8; 32]);
        let parsed = SecureSecret::from_hex(&secret.to_hex()).unwrap();
        assert_eq!(parsed.expose(), [0xCDu8; 32]);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert!(SecureSecret::from_hex("abcd").is_none());
        assert!(SecureSecret::from_hex("not hex").is_none());
    }

    #[test]
    fn test_debug_hides_value() {
        let secret = SecureSecret::new([0xABu8; 32]);
        let debug_str = format!("{:?}", secret);
        assert!(!debug_str.contains("ab"));
        assert!(debug_str.contains("***"));
    }
}
