//! # Domain Value Objects
//!
//! Immutable value types for swap coordination: chain identifiers and the
//! order/match lifecycle state machines.

use serde::{Deserialize, Serialize};

/// Supported blockchain identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    /// Bitcoin mainnet (UTXO).
    Bitcoin,
    /// Ethereum mainnet (account-based).
    Ethereum,
    /// Litecoin mainnet (UTXO).
    Litecoin,
    /// Polygon (account-based).
    Polygon,
}

impl ChainId {
    /// Estimated block time in seconds.
    pub fn block_time_secs(&self) -> u64 {
        match self {
            ChainId::Bitcoin => 600,
            ChainId::Ethereum => 12,
            ChainId::Litecoin => 150,
            ChainId::Polygon => 2,
        }
    }

    /// All supported chains, in display order.
    pub fn all() -> &'static [ChainId] {
        &[
            ChainId::Bitcoin,
            ChainId::Ethereum,
            ChainId::Litecoin,
            ChainId::Polygon,
        ]
    }
}

/// Ordered chain pair keying an order-book bucket (from -> to direction).
pub type ChainPair = (ChainId, ChainId);

/// Order lifecycle state machine.
///
/// Transitions are monotonic; `Completed`, `Expired`, `Cancelled` and
/// `Failed` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Standing intent, available for matching or withdrawal.
    #[default]
    Open,
    /// Paired with a counter-order, locks not yet confirmed.
    Matched,
    /// Both legs locked on chain, awaiting secret reveal or expiry.
    Locked,
    /// Both legs claimed with the shared secret.
    Completed,
    /// Timelock breached while locked; legs refunded.
    Expired,
    /// Withdrawn by the maker while still open.
    Cancelled,
    /// Lock creation failed; any created leg awaits refund.
    Failed,
}

impl OrderStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (Self::Open, Self::Matched) => true,
            (Self::Open, Self::Cancelled) => true,
            (Self::Matched, Self::Locked) => true,
            (Self::Matched, Self::Failed) => true,
            (Self::Locked, Self::Completed) => true,
            (Self::Locked, Self::Expired) => true,
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Expired | Self::Cancelled | Self::Failed
        )
    }
}

/// Match execution state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Match created, lock execution not yet finished.
    #[default]
    Pending,
    /// Both legs locked on chain.
    Locked,
    /// Both legs claimed with the shared secret.
    Completed,
    /// Lock creation failed or the locks expired and were swept.
    Failed,
}

impl MatchStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Locked) => true,
            (Self::Pending, Self::Failed) => true,
            (Self::Locked, Self::Completed) => true,
            (Self::Locked, Self::Failed) => true,
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}
