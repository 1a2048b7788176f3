//! # Outbound Ports
//!
//! The chain connectivity capability the engine depends on. The connector
//! owns all real network I/O: the engine never talks to a node directly
//! and never persists chain credentials.

use crate::domain::{ChainId, Hash, LockRef, Secret, SwapError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Parameters for creating one chain-side lock.
#[derive(Clone, Debug, PartialEq)]
pub struct LockRequest {
    /// Chain to lock funds on.
    pub chain: ChainId,
    /// Amount to encumber.
    pub amount: f64,
    /// Shared hash-lock digest.
    pub hash_lock: Hash,
    /// Absolute expiry for this leg, Unix seconds.
    pub timelock: u64,
    /// Counterparty address that may claim with the secret.
    pub recipient: String,
}

/// Chain connectivity provider - outbound port.
///
/// `claim_lock` and `refund_lock` return `Ok(false)` for "not (yet)
/// claimable/refundable"; callers treat that as retryable, never as
/// corruption. `Err` is reserved for transport failures.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    /// Whether a usable node connection exists for a chain.
    async fn is_connected(&self, chain: ChainId) -> bool;

    /// Current block height of a chain.
    async fn current_height(&self, chain: ChainId) -> Result<u64, SwapError>;

    /// Create an HTLC on a chain. Funds become encumbered until claim or
    /// refund.
    async fn create_lock(&self, request: LockRequest) -> Result<LockRef, SwapError>;

    /// Reveal the secret on chain to release a lock to its recipient.
    async fn claim_lock(
        &self,
        chain: ChainId,
        lock_ref: LockRef,
        secret: Secret,
    ) -> Result<bool, SwapError>;

    /// Return escrowed funds to the original locker after expiry.
    async fn refund_lock(&self, chain: ChainId, lock_ref: LockRef) -> Result<bool, SwapError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Scriptable connector double for tests.
///
/// Starts with every chain connected; per-chain failure toggles inject
/// lock-creation errors and claim/refund denials.
#[derive(Default)]
pub struct MockChainConnector {
    /// Connected flag per chain (absent = disconnected).
    pub connected: RwLock<HashMap<ChainId, bool>>,
    /// Heights per chain (absent = 100).
    pub heights: RwLock<HashMap<ChainId, u64>>,
    /// Chains where `create_lock` fails.
    pub fail_create_on: RwLock<HashSet<ChainId>>,
    /// Chains where `claim_lock` reports not claimable.
    pub deny_claim_on: RwLock<HashSet<ChainId>>,
    /// Chains where `refund_lock` reports not refundable.
    pub deny_refund_on: RwLock<HashSet<ChainId>>,
    /// Every lock request seen, in call order.
    pub created_locks: RwLock<Vec<LockRequest>>,
    /// Every successful claim.
    pub claimed: RwLock<Vec<(ChainId, LockRef)>>,
    /// Every successful refund.
    pub refunded: RwLock<Vec<(ChainId, LockRef)>>,
    next_ref: AtomicU64,
}

impl MockChainConnector {
    /// Mock with every supported chain connected.
    pub fn all_connected() -> Self {
        let mock = Self::default();
        for chain in ChainId::all() {
            mock.connected.write().insert(*chain, true);
        }
        mock
    }

    /// Flip a chain's connected flag.
    pub fn set_connected(&self, chain: ChainId, connected: bool) {
        self.connected.write().insert(chain, connected);
    }

    /// Make `create_lock` fail on a chain.
    pub fn fail_create(&self, chain: ChainId) {
        self.fail_create_on.write().insert(chain);
    }

    /// Make `claim_lock` return false on a chain.
    pub fn deny_claim(&self, chain: ChainId) {
        self.deny_claim_on.write().insert(chain);
    }

    /// Make `refund_lock` return false on a chain.
    pub fn deny_refund(&self, chain: ChainId) {
        self.deny_refund_on.write().insert(chain);
    }

    /// Clear a previous `refund_lock` denial.
    pub fn allow_refund(&self, chain: ChainId) {
        self.deny_refund_on.write().remove(&chain);
    }
}

#[async_trait]
impl ChainConnector for MockChainConnector {
    async fn is_connected(&self, chain: ChainId) -> bool {
        *self.connected.read().get(&chain).unwrap_or(&false)
    }

    async fn current_height(&self, chain: ChainId) -> Result<u64, SwapError> {
        Ok(*self.heights.read().get(&chain).unwrap_or(&100))
    }

    async fn create_lock(&self, request: LockRequest) -> Result<LockRef, SwapError> {
        if self.fail_create_on.read().contains(&request.chain) {
            return Err(SwapError::LockCreationFailed {
                chain: request.chain,
                reason: "mock failure".to_string(),
            });
        }

        let seq = self.next_ref.fetch_add(1, Ordering::Relaxed) + 1;
        let mut lock_ref = [0u8; 32];
        lock_ref[..8].copy_from_slice(&seq.to_le_bytes());

        self.created_locks.write().push(request);
        Ok(lock_ref)
    }

    async fn claim_lock(
        &self,
        chain: ChainId,
        lock_ref: LockRef,
        _secret: Secret,
    ) -> Result<bool, SwapError> {
        if self.deny_claim_on.read().contains(&chain) {
            return Ok(false);
        }
        self.claimed.write().push((chain, lock_ref));
        Ok(true)
    }

    async fn refund_lock(&self, chain: ChainId, lock_ref: LockRef) -> Result<bool, SwapError> {
        if self.deny_refund_on.read().contains(&chain) {
            return Ok(false);
        }
        self.refunded.write().push((chain, lock_ref));
        Ok(true)
    }
}
