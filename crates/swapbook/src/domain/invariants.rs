//! # Domain Invariants
//!
//! Business rules enforced at order admission and lock execution.

use super::errors::{Hash, Secret, SwapError};
use super::value_objects::ChainId;

/// Invariant: order amounts are positive finite decimals.
pub fn invariant_positive_amount(amount: f64) -> Result<(), SwapError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(SwapError::InvalidAmount(amount));
    }
    Ok(())
}

/// Invariant: a swap crosses two distinct chains.
pub fn invariant_distinct_chains(maker: ChainId, taker: ChainId) -> Result<(), SwapError> {
    if maker == taker {
        return Err(SwapError::SameChain(maker));
    }
    Ok(())
}

/// Invariant: timelock ordering across legs.
///
/// The leg claimed second (the secret holder's own lock) must outlive the
/// leg claimed first by at least the margin, so the counterparty has time
/// to claim after the secret is revealed.
pub fn invariant_timelock_ordering(
    long_leg: u64,
    short_leg: u64,
    min_margin_secs: u64,
) -> Result<(), SwapError> {
    if long_leg < short_leg + min_margin_secs {
        return Err(SwapError::InvalidTimelockMargin {
            long_leg,
            short_leg,
            required_margin: min_margin_secs,
        });
    }
    Ok(())
}

/// Invariant: both legs of a match carry the same hash lock.
pub fn invariant_hashlock_match(maker_leg: &Hash, taker_leg: &Hash) -> bool {
    maker_leg == taker_leg
}

/// Invariant: SHA-256(secret) equals the hash lock.
pub fn invariant_secret_matches(secret: &Secret, hash_lock: &Hash) -> bool {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.finalize().as_slice() == hash_lock
}
