//! # Domain Entities
//!
//! Core entities for swap coordination: orders, matches and the per-chain
//! connection table. These records are owned by the coordination engine for
//! their entire lifetime; no other component mutates them.

use super::errors::{Hash, LockRef, SwapError};
use super::value_objects::{ChainId, MatchStatus, OrderStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A party's standing intent to exchange a fixed amount of one asset for a
/// fixed amount of another across two chains.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapOrder {
    /// Unique order identifier.
    pub id: Uuid,
    /// Maker identity (account/address string).
    pub maker: String,
    /// Chain the maker's funds live on.
    pub maker_chain: ChainId,
    /// Asset symbol offered by the maker.
    pub maker_asset: String,
    /// Amount offered by the maker.
    pub maker_amount: f64,
    /// Chain the maker wants funds on.
    pub taker_chain: ChainId,
    /// Asset symbol wanted by the maker.
    pub taker_asset: String,
    /// Amount wanted by the maker.
    pub taker_amount: f64,
    /// SHA-256 commitment to the swap secret.
    pub hash_lock: Hash,
    /// Absolute expiry, Unix seconds.
    pub timelock: u64,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Creation timestamp, Unix seconds.
    pub created_at: u64,
    /// Counterparty identity once matched.
    pub taker: Option<String>,
    /// Owning match once matched.
    pub match_id: Option<Uuid>,
    /// Lock reference for this order's leg once locked.
    pub lock_ref: Option<LockRef>,
    /// Revealed secret, hex-encoded, once completed.
    pub revealed_secret: Option<String>,
    /// Completion timestamp, Unix seconds.
    pub completed_at: Option<u64>,
}

impl SwapOrder {
    /// Check if the order's timelock has been breached.
    pub fn is_expired(&self, current_time: u64) -> bool {
        current_time > self.timelock
    }

    /// Transition to a new status, enforcing monotonicity.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), SwapError> {
        if !self.status.can_transition_to(next) {
            return Err(SwapError::InvalidOrderTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", next),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Record the counterparty and owning match while moving to `Matched`.
    pub fn record_match(&mut self, taker: String, match_id: Uuid) -> Result<(), SwapError> {
        self.transition_to(OrderStatus::Matched)?;
        self.taker = Some(taker);
        self.match_id = Some(match_id);
        Ok(())
    }

    /// Check if either side of the order belongs to an identity.
    pub fn involves(&self, identity: &str) -> bool {
        self.maker == identity || self.taker.as_deref() == Some(identity)
    }
}

/// Builder for `SwapOrder`. Avoids a long positional constructor.
#[derive(Clone, Debug)]
pub struct SwapOrderBuilder {
    maker: String,
    maker_chain: ChainId,
    maker_asset: String,
    maker_amount: f64,
    taker_chain: ChainId,
    taker_asset: String,
    taker_amount: f64,
    hash_lock: Hash,
    timelock: u64,
    created_at: u64,
}

impl SwapOrderBuilder {
    /// Create a builder with the commitment and timestamps fixed up front.
    pub fn new(hash_lock: Hash, timelock: u64, created_at: u64) -> Self {
        Self {
            maker: String::new(),
            maker_chain: ChainId::Bitcoin,
            maker_asset: String::new(),
            maker_amount: 0.0,
            taker_chain: ChainId::Ethereum,
            taker_asset: String::new(),
            taker_amount: 0.0,
            hash_lock,
            timelock,
            created_at,
        }
    }

    /// Set maker identity.
    pub fn maker(mut self, maker: impl Into<String>) -> Self {
        self.maker = maker.into();
        self
    }

    /// Set the offered leg (chain, asset symbol, amount).
    pub fn offers(mut self, chain: ChainId, asset: impl Into<String>, amount: f64) -> Self {
        self.maker_chain = chain;
        self.maker_asset = asset.into();
        self.maker_amount = amount;
        self
    }

    /// Set the wanted leg (chain, asset symbol, amount).
    pub fn wants(mut self, chain: ChainId, asset: impl Into<String>, amount: f64) -> Self {
        self.taker_chain = chain;
        self.taker_asset = asset.into();
        self.taker_amount = amount;
        self
    }

    /// Build the order in `Open` state with a fresh id.
    pub fn build(self) -> SwapOrder {
        SwapOrder {
            id: Uuid::new_v4(),
            maker: self.maker,
            maker_chain: self.maker_chain,
            maker_asset: self.maker_asset,
            maker_amount: self.maker_amount,
            taker_chain: self.taker_chain,
            taker_asset: self.taker_asset,
            taker_amount: self.taker_amount,
            hash_lock: self.hash_lock,
            timelock: self.timelock,
            status: OrderStatus::Open,
            created_at: self.created_at,
            taker: None,
            match_id: None,
            lock_ref: None,
            revealed_secret: None,
            completed_at: None,
        }
    }
}

/// One chain-side lock of a match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegLock {
    /// Chain the funds are locked on.
    pub chain: ChainId,
    /// Provider-assigned lock reference.
    pub lock_ref: LockRef,
    /// Absolute expiry of this leg, Unix seconds.
    pub timelock: u64,
    /// Whether this leg has been claimed with the secret.
    pub claimed: bool,
    /// Whether the expiry monitor has refunded this leg.
    pub refunded: bool,
}

impl LegLock {
    /// A freshly created, unresolved leg.
    pub fn new(chain: ChainId, lock_ref: LockRef, timelock: u64) -> Self {
        Self {
            chain,
            lock_ref,
            timelock,
            claimed: false,
            refunded: false,
        }
    }

    /// Whether the leg is still live on chain (neither claimed nor
    /// refunded).
    pub fn is_live(&self) -> bool {
        !self.claimed && !self.refunded
    }
}

/// Pairing of two compatible orders plus cross-chain execution state.
///
/// The maker side is the earlier order; its hash lock binds both legs and
/// its maker holds the secret.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapMatch {
    /// Unique match identifier.
    pub id: Uuid,
    /// Earlier order: provides the shared hash lock.
    pub maker_order: Uuid,
    /// Later order: triggered the match.
    pub taker_order: Uuid,
    /// Shared commitment binding both legs.
    pub hash_lock: Hash,
    /// Match timestamp, Unix seconds.
    pub matched_at: u64,
    /// Execution status.
    pub status: MatchStatus,
    /// Lock for the maker order's funds (long timelock, claimed second).
    pub maker_leg: Option<LegLock>,
    /// Lock for the taker order's funds (short timelock, claimed first).
    pub taker_leg: Option<LegLock>,
}

impl SwapMatch {
    /// Create a pending match between two orders.
    pub fn new(maker_order: Uuid, taker_order: Uuid, hash_lock: Hash, matched_at: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            maker_order,
            taker_order,
            hash_lock,
            matched_at,
            status: MatchStatus::Pending,
            maker_leg: None,
            taker_leg: None,
        }
    }

    /// Transition to a new execution status.
    pub fn transition_to(&mut self, next: MatchStatus) -> Result<(), SwapError> {
        if !self.status.can_transition_to(next) {
            return Err(SwapError::InvalidMatchTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", next),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Legs created on chain that are neither claimed nor refunded.
    pub fn live_legs(&self) -> Vec<&LegLock> {
        self.maker_leg
            .iter()
            .chain(self.taker_leg.iter())
            .filter(|leg| leg.is_live())
            .collect()
    }
}

/// Per-chain connectivity snapshot.
///
/// Owned and refreshed exclusively by the expiry monitor's polling cycle;
/// read by order submission as an admission gate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainConnectionStatus {
    /// Chain this status describes.
    pub chain: ChainId,
    /// Whether a usable node connection exists.
    pub connected: bool,
    /// Provider-assigned connection handle, if any.
    pub handle: Option<String>,
    /// Last known block height.
    pub last_height: u64,
    /// Last heartbeat, Unix seconds.
    pub last_seen: u64,
}

impl ChainConnectionStatus {
    /// An untracked chain: never seen, not connected.
    pub fn unknown(chain: ChainId) -> Self {
        Self {
            chain,
            connected: false,
            handle: None,
            last_height: 0,
            last_seen: 0,
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Absolute tolerance for cross-amount matching (exclusive bound).
    pub match_tolerance: f64,
    /// Minimum margin between the two legs' timelocks, seconds.
    pub min_timelock_margin_secs: u64,
    /// Expiry monitor sweep interval, seconds.
    pub expiry_interval_secs: u64,
    /// Chains tracked by the connectivity table.
    pub supported_chains: Vec<ChainId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_tolerance: 0.01,
            min_timelock_margin_secs: 6 * 3600, // 6 hours
            expiry_interval_secs: 30,
            supported_chains: ChainId::all().to_vec(),
        }
    }
}
