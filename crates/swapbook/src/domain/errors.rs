//! # Domain Errors
//!
//! Error taxonomy for swap coordination.
//!
//! Every failure here is per-swap and recoverable: rejected submissions
//! mutate nothing, lock failures resolve to a failed match awaiting
//! refund, and transient connector failures are retried by the expiry
//! monitor or by the caller.

use super::value_objects::ChainId;
use thiserror::Error;
use uuid::Uuid;

/// Hash-lock digest type (32-byte SHA-256).
pub type Hash = [u8; 32];

/// Swap secret type (32 bytes).
pub type Secret = [u8; 32];

/// Lock reference assigned by a chain when an HTLC is created.
pub type LockRef = [u8; 32];

/// Swap coordination error types.
#[derive(Debug, Error)]
pub enum SwapError {
    /// Order amount is zero, negative, or not a finite number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Both legs of an order name the same chain.
    #[error("Maker and taker chain must differ: {0:?}")]
    SameChain(ChainId),

    /// Chain is not in the supported set.
    #[error("Unsupported chain: {0:?}")]
    UnsupportedChain(ChainId),

    /// Timelock horizon is zero or would land in the past.
    #[error("Invalid timelock: {0}")]
    InvalidTimelock(u64),

    /// Required chain connectivity missing at submission time.
    #[error("No usable node connection for {chain:?}")]
    NodesUnavailable {
        /// Chain without a connection.
        chain: ChainId,
    },

    /// On-chain lock could not be created for one leg.
    #[error("Lock creation failed on {chain:?}: {reason}")]
    LockCreationFailed {
        /// Chain the lock was attempted on.
        chain: ChainId,
        /// Provider-reported reason.
        reason: String,
    },

    /// Secret does not match the hash lock.
    #[error("Invalid secret")]
    InvalidSecret,

    /// Per-leg timelocks violate the required claim-window margin.
    #[error("Invalid timelock margin: long={long_leg}, short={short_leg}, required={required_margin}")]
    InvalidTimelockMargin {
        /// Timelock of the leg that must outlive the other.
        long_leg: u64,
        /// Timelock of the leg claimed under the shorter window.
        short_leg: u64,
        /// Required margin in seconds.
        required_margin: u64,
    },

    /// No order with this id.
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    /// No match with this id.
    #[error("Match not found: {0}")]
    MatchNotFound(Uuid),

    /// Order status transition violates monotonicity.
    #[error("Invalid order transition: {from} -> {to}")]
    InvalidOrderTransition {
        /// Current status.
        from: String,
        /// Attempted status.
        to: String,
    },

    /// Match status transition violates the execution state machine.
    #[error("Invalid match transition: {from} -> {to}")]
    InvalidMatchTransition {
        /// Current status.
        from: String,
        /// Attempted status.
        to: String,
    },

    /// Transport-level connector failure.
    #[error("Connector error: {0}")]
    Connector(String),
}
