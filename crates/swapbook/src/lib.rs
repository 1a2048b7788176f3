//! # Swapbook
//!
//! Coordination engine for cross-chain atomic swaps using HTLC.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Pair opposing swap intents and shepherd each pair through a trustless
//! hash time-locked exchange:
//! - Directed order book with first-found matching
//! - SHA-256 hash locks binding both legs to one secret
//! - Asymmetric per-leg timelocks for refund safety
//! - Background expiry monitor refunding breached locks
//!
//! ## Atomicity
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Shared hash lock | One secret opens both legs |
//! | Timelock margins | Secret holder's leg outlives the counter-leg by 6 hours |
//! | Claim ordering | Shorter-lived leg is claimed first |
//! | Expiry sweeps | Breached locks are refunded, never claimed late |
//!
//! ## Module Structure
//!
//! ```text
//! swapbook/
//! ├── domain/          # SwapOrder, SwapMatch, OrderBook, errors
//! ├── algorithms/      # Secrets, matching, timelock derivation
//! ├── ports/           # SwapCoordinator, ChainConnector
//! ├── adapters/        # Simulated chain connector
//! └── application/     # SwapEngine, expiry monitor
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::SimulatedConnector;
pub use algorithms::{
    find_counter_order, generate_secret, hash_lock, is_compatible, leg_timelocks, order_deadline,
    verify_secret,
};
pub use application::{expiry_monitor_task, spawn_expiry_monitor, SwapEngine};
pub use domain::{
    invariant_distinct_chains, invariant_hashlock_match, invariant_positive_amount,
    invariant_secret_matches, invariant_timelock_ordering, ChainConnectionStatus, ChainId,
    ChainPair, EngineConfig, Hash, LegLock, LockRef, MatchStatus, OrderBook, OrderStatus, Secret,
    SecureSecret, SwapError, SwapMatch, SwapOrder, SwapOrderBuilder,
};
pub use ports::{
    ChainConnector, LockRequest, MockChainConnector, OrderRequest, SubmitReceipt, SwapCoordinator,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
