//! Simulated Chain Connector
//!
//! Implements the `ChainConnector` port against in-memory chains. Locks
//! honour real HTLC mechanics: a claim needs the right secret before the
//! timelock, a refund needs the timelock to have passed. In production
//! this adapter is replaced by one making RPC calls to per-chain nodes.

use crate::algorithms::verify_secret;
use crate::domain::{ChainId, Hash, LockRef, Secret, SwapError};
use crate::ports::outbound::{ChainConnector, LockRequest};
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// One simulated chain.
#[derive(Debug)]
struct SimChain {
    connected: bool,
    base_height: u64,
    locks: HashMap<LockRef, SimLock>,
}

#[derive(Clone, Debug)]
struct SimLock {
    hash_lock: Hash,
    timelock: u64,
    state: SimLockState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SimLockState {
    Locked,
    Claimed,
    Refunded,
}

/// In-memory connector simulating independently paced chains.
pub struct SimulatedConnector {
    chains: RwLock<HashMap<ChainId, SimChain>>,
    /// Simulated wall clock, Unix seconds. Heights derive from it.
    current_time: RwLock<u64>,
    base_time: u64,
    next_nonce: AtomicU64,
}

impl SimulatedConnector {
    /// Connector with every supported chain connected.
    pub fn new() -> Self {
        let mut chains = HashMap::new();
        for (i, chain) in ChainId::all().iter().enumerate() {
            chains.insert(
                *chain,
                SimChain {
                    connected: true,
                    base_height: 1_000 * (i as u64 + 1),
                    locks: HashMap::new(),
                },
            );
        }
        Self {
            chains: RwLock::new(chains),
            current_time: RwLock::new(1_700_000_000),
            base_time: 1_700_000_000,
            next_nonce: AtomicU64::new(0),
        }
    }

    /// Set the simulated clock for testing.
    pub fn set_time(&self, time: u64) {
        *self.current_time.write() = time;
    }

    /// Advance the simulated clock for testing.
    pub fn advance_time(&self, secs: u64) {
        *self.current_time.write() += secs;
    }

    /// Current simulated time.
    pub fn now(&self) -> u64 {
        *self.current_time.read()
    }

    /// Flip a chain's node connection for testing.
    pub fn set_connected(&self, chain: ChainId, connected: bool) {
        if let Some(sim) = self.chains.write().get_mut(&chain) {
            sim.connected = connected;
        }
    }
}

impl Default for SimulatedConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a lock reference from the request and a nonce.
fn make_lock_ref(request: &LockRequest, nonce: u64) -> LockRef {
    let mut hasher = Sha256::new();
    hasher.update((request.chain as u8).to_le_bytes());
    hasher.update(request.hash_lock);
    hasher.update(request.timelock.to_le_bytes());
    hasher.update(request.recipient.as_bytes());
    hasher.update(nonce.to_le_bytes());
    hasher.finalize().into()
}

#[async_trait]
impl ChainConnector for SimulatedConnector {
    async fn is_connected(&self, chain: ChainId) -> bool {
        self.chains
            .read()
            .get(&chain)
            .map(|sim| sim.connected)
            .unwrap_or(false)
    }

    async fn current_height(&self, chain: ChainId) -> Result<u64, SwapError> {
        let chains = self.chains.read();
        let sim = chains
            .get(&chain)
            .ok_or(SwapError::UnsupportedChain(chain))?;
        if !sim.connected {
            return Err(SwapError::NodesUnavailable { chain });
        }
        let elapsed = self.now().saturating_sub(self.base_time);
        Ok(sim.base_height + elapsed / chain.block_time_secs())
    }

    async fn create_lock(&self, request: LockRequest) -> Result<LockRef, SwapError> {
        let nonce = self.next_nonce.fetch_add(1, Ordering::Relaxed);
        let lock_ref = make_lock_ref(&request, nonce);

        let mut chains = self.chains.write();
        let sim = chains
            .get_mut(&request.chain)
            .ok_or(SwapError::UnsupportedChain(request.chain))?;
        if !sim.connected {
            return Err(SwapError::NodesUnavailable {
                chain: request.chain,
            });
        }

        info!(
            chain = ?request.chain,
            lock_ref = %hex::encode(&lock_ref[..4]),
            timelock = request.timelock,
            "Creating simulated HTLC"
        );

        sim.locks.insert(
            lock_ref,
            SimLock {
                hash_lock: request.hash_lock,
                timelock: request.timelock,
                state: SimLockState::Locked,
            },
        );
        Ok(lock_ref)
    }

    async fn claim_lock(
        &self,
        chain: ChainId,
        lock_ref: LockRef,
        secret: Secret,
    ) -> Result<bool, SwapError> {
        let now = self.now();
        let mut chains = self.chains.write();
        let sim = chains
            .get_mut(&chain)
            .ok_or(SwapError::UnsupportedChain(chain))?;

        let lock = match sim.locks.get_mut(&lock_ref) {
            Some(lock) => lock,
            None => return Ok(false),
        };
        if lock.state != SimLockState::Locked
            || now > lock.timelock
            || !verify_secret(&secret, &lock.hash_lock)
        {
            debug!(chain = ?chain, "Claim rejected by simulated chain");
            return Ok(false);
        }

        lock.state = SimLockState::Claimed;
        Ok(true)
    }

    async fn refund_lock(&self, chain: ChainId, lock_ref: LockRef) -> Result<bool, SwapError> {
        let now = self.now();
        let mut chains = self.chains.write();
        let sim = chains
            .get_mut(&chain)
            .ok_or(SwapError::UnsupportedChain(chain))?;

        let lock = match sim.locks.get_mut(&lock_ref) {
            Some(lock) => lock,
            None => return Ok(false),
        };
        if lock.state != SimLockState::Locked || now <= lock.timelock {
            debug!(chain = ?chain, "Refund rejected by simulated chain");
            return Ok(false);
        }

        lock.state = SimLockState::Refunded;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{generate_secret, hash_lock};

    fn request(chain: ChainId, digest: Hash, timelock: u64) -> LockRequest {
        LockRequest {
            chain,
            amount: 1.0,
            hash_lock: digest,
            timelock,
            recipient: "0xrecipient".to_string(),
        }
    }

    #[tokio::test]
    async fn test_heights_advance_with_time() {
        let sim = SimulatedConnector::new();
        let before = sim.current_height(ChainId::Ethereum).await.unwrap();
        sim.advance_time(120);
        let after = sim.current_height(ChainId::Ethereum).await.unwrap();
        assert_eq!(after, before + 120 / ChainId::Ethereum.block_time_secs());
    }

    #[tokio::test]
    async fn test_disconnected_chain_rejects_operations() {
        let sim = SimulatedConnector::new();
        sim.set_connected(ChainId::Bitcoin, false);

        assert!(!sim.is_connected(ChainId::Bitcoin).await);
        assert!(sim.current_height(ChainId::Bitcoin).await.is_err());
        let result = sim
            .create_lock(request(ChainId::Bitcoin, [1u8; 32], u64::MAX))
            .await;
        assert!(matches!(result, Err(SwapError::NodesUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_claim_with_valid_secret() {
        let sim = SimulatedConnector::new();
        let secret = generate_secret();
        let digest = hash_lock(secret.as_bytes());
        let timelock = sim.now() + 3600;

        let lock_ref = sim
            .create_lock(request(ChainId::Ethereum, digest, timelock))
            .await
            .unwrap();
        let claimed = sim
            .claim_lock(ChainId::Ethereum, lock_ref, secret.expose())
            .await
            .unwrap();
        assert!(claimed);

        // Second claim observes the resolved lock.
        let again = sim
            .claim_lock(ChainId::Ethereum, lock_ref, secret.expose())
            .await
            .unwrap();
        assert!(!again);
    }

    #[tokio::test]
    async fn test_claim_with_wrong_secret_fails() {
        let sim = SimulatedConnector::new();
        let digest = hash_lock(&[7u8; 32]);
        let timelock = sim.now() + 3600;

        let lock_ref = sim
            .create_lock(request(ChainId::Ethereum, digest, timelock))
            .await
            .unwrap();
        let claimed = sim
            .claim_lock(ChainId::Ethereum, lock_ref, [8u8; 32])
            .await
            .unwrap();
        assert!(!claimed);
    }

    #[tokio::test]
    async fn test_claim_after_expiry_fails_and_refund_succeeds() {
        let sim = SimulatedConnector::new();
        let secret = generate_secret();
        let digest = hash_lock(secret.as_bytes());
        let timelock = sim.now() + 3600;

        let lock_ref = sim
            .create_lock(request(ChainId::Bitcoin, digest, timelock))
            .await
            .unwrap();

        // Refund is premature while the lock is live.
        assert!(!sim.refund_lock(ChainId::Bitcoin, lock_ref).await.unwrap());

        sim.advance_time(7200);
        assert!(!sim
            .claim_lock(ChainId::Bitcoin, lock_ref, secret.expose())
            .await
            .unwrap());
        assert!(sim.refund_lock(ChainId::Bitcoin, lock_ref).await.unwrap());

        // Already resolved.
        assert!(!sim.refund_lock(ChainId::Bitcoin, lock_ref).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_lock_ref_is_not_claimable() {
        let sim = SimulatedConnector::new();
        let claimed = sim
            .claim_lock(ChainId::Bitcoin, [9u8; 32], [1u8; 32])
            .await
            .unwrap();
        assert!(!claimed);
    }
}
