//! # Algorithms
//!
//! Pure logic: secret generation and verification, the matching scan, and
//! per-leg timelock derivation. No state, no I/O.

pub mod matching;
pub mod secret;
pub mod timelocks;

pub use matching::{find_counter_order, is_compatible};
pub use secret::{generate_secret, hash_lock, verify_secret};
pub use timelocks::{leg_timelocks, order_deadline};
