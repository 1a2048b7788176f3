//! # Order Matching
//!
//! Compatibility predicate and the first-found scan over the reverse
//! direction bucket. First compatible candidate wins; no price or time
//! priority is applied.

use crate::domain::{OrderStatus, SwapOrder};
use uuid::Uuid;

/// Check whether an existing candidate order can fill a new order.
///
/// Requires distinct makers, mirrored chain directions, and amounts that
/// cross-satisfy within `tolerance`. The bound is exclusive: a difference
/// of exactly `tolerance` does not match.
pub fn is_compatible(new: &SwapOrder, candidate: &SwapOrder, tolerance: f64) -> bool {
    if candidate.status != OrderStatus::Open {
        return false;
    }
    if candidate.maker == new.maker {
        return false;
    }
    if candidate.maker_chain != new.taker_chain || candidate.taker_chain != new.maker_chain {
        return false;
    }
    (new.maker_amount - candidate.taker_amount).abs() < tolerance
        && (new.taker_amount - candidate.maker_amount).abs() < tolerance
}

/// Scan candidates in insertion order and return the first compatible id.
pub fn find_counter_order<'a>(
    new: &SwapOrder,
    candidates: impl IntoIterator<Item = &'a SwapOrder>,
    tolerance: f64,
) -> Option<Uuid> {
    candidates
        .into_iter()
        .find(|candidate| is_compatible(new, candidate, tolerance))
        .map(|candidate| candidate.id)
}
