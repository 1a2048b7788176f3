//! # Per-Leg Timelock Derivation
//!
//! The two legs of a match share one hash lock but not one deadline. The
//! secret holder claims the counter-leg first, revealing the secret; the
//! counterparty then needs a strictly longer window on the secret holder's
//! own leg. The maker leg therefore keeps the order's full timelock and
//! the taker leg expires at least the configured margin earlier.

use crate::domain::{invariant_timelock_ordering, SwapError};

/// Derive (maker leg, taker leg) timelocks from the order's deadline.
///
/// Fails if the deadline is too close to fit the margin.
pub fn leg_timelocks(order_timelock: u64, margin_secs: u64) -> Result<(u64, u64), SwapError> {
    let taker_leg = order_timelock
        .checked_sub(margin_secs)
        .ok_or(SwapError::InvalidTimelock(order_timelock))?;
    invariant_timelock_ordering(order_timelock, taker_leg, margin_secs)?;
    Ok((order_timelock, taker_leg))
}

/// Absolute expiry for a fresh order, Unix seconds.
pub fn order_deadline(now: u64, timelock_hours: u64) -> Result<u64, SwapError> {
    if timelock_hours == 0 {
        return Err(SwapError::InvalidTimelock(timelock_hours));
    }
    Ok(now + timelock_hours * 3600)
}
