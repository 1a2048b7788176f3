//! # Domain Layer
//!
//! Entities, value objects, invariants and errors for swap coordination.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod order_book;
pub mod secure_secret;
pub mod value_objects;

pub use entities::{
    ChainConnectionStatus, EngineConfig, LegLock, SwapMatch, SwapOrder, SwapOrderBuilder,
};
pub use errors::{Hash, LockRef, Secret, SwapError};
pub use invariants::{
    invariant_distinct_chains, invariant_hashlock_match, invariant_positive_amount,
    invariant_secret_matches, invariant_timelock_ordering,
};
pub use order_book::OrderBook;
pub use secure_secret::SecureSecret;
pub use value_objects::{ChainId, ChainPair, MatchStatus, OrderStatus};
