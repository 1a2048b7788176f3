//! # Swap Coordination Engine
//!
//! Owns the order book, the match table and the connectivity table behind
//! a single mutual-exclusion boundary. Connector calls (lock creation,
//! claims, refunds, connectivity probes) are the only blocking operations
//! and are always issued while holding no lock; the lock is reacquired to
//! commit the resulting state transition.

use crate::algorithms::{
    find_counter_order, generate_secret, hash_lock, leg_timelocks, order_deadline, verify_secret,
};
use crate::domain::{
    invariant_distinct_chains, invariant_positive_amount, ChainConnectionStatus, ChainId,
    EngineConfig, LegLock, LockRef, MatchStatus, OrderBook, OrderStatus, Secret, SwapError,
    SwapMatch, SwapOrder, SwapOrderBuilder,
};
use crate::ports::inbound::{OrderRequest, SubmitReceipt, SwapCoordinator};
use crate::ports::outbound::{ChainConnector, LockRequest};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// All coordination state, guarded by one mutex.
#[derive(Default)]
struct EngineState {
    orders: HashMap<Uuid, SwapOrder>,
    book: OrderBook,
    matches: HashMap<Uuid, SwapMatch>,
    connections: HashMap<ChainId, ChainConnectionStatus>,
}

/// One leg scheduled for a refund attempt during a sweep.
struct RefundPlan {
    match_id: Uuid,
    order_id: Uuid,
    maker_side: bool,
    chain: ChainId,
    lock_ref: LockRef,
}

/// The swap coordination engine.
pub struct SwapEngine {
    config: EngineConfig,
    connector: Arc<dyn ChainConnector>,
    state: Mutex<EngineState>,
    /// Test override for the wall clock; `None` follows system time.
    clock_override: RwLock<Option<u64>>,
}

impl SwapEngine {
    /// Engine with default configuration.
    pub fn new(connector: Arc<dyn ChainConnector>) -> Self {
        Self::with_config(EngineConfig::default(), connector)
    }

    /// Engine with explicit configuration.
    pub fn with_config(config: EngineConfig, connector: Arc<dyn ChainConnector>) -> Self {
        Self {
            config,
            connector,
            state: Mutex::new(EngineState::default()),
            clock_override: RwLock::new(None),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current time, Unix seconds.
    pub fn now(&self) -> u64 {
        if let Some(fixed) = *self.clock_override.read() {
            return fixed;
        }
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Pin the engine clock for testing.
    pub fn set_time(&self, time: u64) {
        *self.clock_override.write() = Some(time);
    }

    /// Advance the pinned clock for testing.
    pub fn advance_time(&self, secs: u64) {
        let now = self.now();
        *self.clock_override.write() = Some(now + secs);
    }

    /// Order snapshot by id.
    pub fn get_order(&self, order_id: Uuid) -> Option<SwapOrder> {
        self.state.lock().orders.get(&order_id).cloned()
    }

    /// Match snapshot by id.
    pub fn get_match(&self, match_id: Uuid) -> Option<SwapMatch> {
        self.state.lock().matches.get(&match_id).cloned()
    }

    /// Match snapshot for an order, if the order has been paired.
    pub fn match_for_order(&self, order_id: Uuid) -> Option<SwapMatch> {
        let state = self.state.lock();
        let match_id = state.orders.get(&order_id)?.match_id?;
        state.matches.get(&match_id).cloned()
    }

    /// Refresh the connectivity table from the connector.
    ///
    /// Probes run while holding no lock; the table is updated in one
    /// critical section afterwards. Called on every expiry monitor tick.
    pub async fn refresh_connections(&self) {
        let mut probes = Vec::with_capacity(self.config.supported_chains.len());
        for chain in &self.config.supported_chains {
            let connected = self.connector.is_connected(*chain).await;
            let height = if connected {
                self.connector.current_height(*chain).await.unwrap_or(0)
            } else {
                0
            };
            probes.push((*chain, connected, height));
        }

        let now = self.now();
        let mut state = self.state.lock();
        for (chain, connected, height) in probes {
            let entry = state
                .connections
                .entry(chain)
                .or_insert_with(|| ChainConnectionStatus::unknown(chain));
            entry.connected = connected;
            entry.handle = connected.then(|| format!("{:?}@{}", chain, height));
            if connected {
                entry.last_height = height;
                entry.last_seen = now;
            }
        }
    }

    /// One expiry monitor tick: refresh connectivity, then sweep breached
    /// timelocks. Returns the number of legs refunded.
    ///
    /// Exposed so tests can drive the monitor deterministically.
    pub async fn sweep_once(&self) -> usize {
        self.refresh_connections().await;
        self.sweep_expired().await
    }

    /// Refund every live leg whose timelock has passed.
    ///
    /// Best-effort and retryable: a leg whose refund fails (or is reported
    /// not yet refundable) stays as-is and is retried on the next tick.
    /// This is the only path that moves an order out of `Locked` by time.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.now();

        let plans: Vec<RefundPlan> = {
            let state = self.state.lock();
            let mut plans = Vec::new();
            for m in state.matches.values() {
                if !matches!(m.status, MatchStatus::Locked | MatchStatus::Failed) {
                    continue;
                }
                let legs = [(true, &m.maker_leg), (false, &m.taker_leg)];
                for (maker_side, leg) in legs {
                    if let Some(leg) = leg {
                        if leg.is_live() && now > leg.timelock {
                            plans.push(RefundPlan {
                                match_id: m.id,
                                order_id: if maker_side { m.maker_order } else { m.taker_order },
                                maker_side,
                                chain: leg.chain,
                                lock_ref: leg.lock_ref,
                            });
                        }
                    }
                }
            }
            plans
        };

        let mut refunded = 0usize;
        for plan in plans {
            let outcome = self.connector.refund_lock(plan.chain, plan.lock_ref).await;
            match outcome {
                Ok(true) => {
                    self.commit_refund(&plan);
                    refunded += 1;
                }
                Ok(false) => {
                    debug!(
                        chain = ?plan.chain,
                        order_id = %plan.order_id,
                        "Refund not yet accepted, will retry next tick"
                    );
                }
                Err(err) => {
                    warn!(
                        chain = ?plan.chain,
                        order_id = %plan.order_id,
                        error = %err,
                        "Refund attempt failed, will retry next tick"
                    );
                }
            }
        }
        refunded
    }

    /// Commit a successful leg refund: mark the leg, expire its order, and
    /// fail the match if it was still live.
    fn commit_refund(&self, plan: &RefundPlan) {
        let mut state = self.state.lock();
        if let Some(m) = state.matches.get_mut(&plan.match_id) {
            let leg = if plan.maker_side {
                m.maker_leg.as_mut()
            } else {
                m.taker_leg.as_mut()
            };
            if let Some(leg) = leg {
                leg.refunded = true;
            }
            if m.status == MatchStatus::Locked {
                let _ = m.transition_to(MatchStatus::Failed);
            }
        }
        if let Some(order) = state.orders.get_mut(&plan.order_id) {
            if order.status == OrderStatus::Locked {
                let _ = order.transition_to(OrderStatus::Expired);
                info!(order_id = %order.id, chain = ?plan.chain, "Order expired, leg refunded");
            }
        }
    }

    /// Scan the reverse-direction bucket for a counter-order and, on a
    /// hit, promote both orders into a pending match. Runs entirely inside
    /// the engine lock, so it cannot race a concurrent withdrawal.
    fn try_match(&self, state: &mut EngineState, new_id: Uuid) -> Result<Option<Uuid>, SwapError> {
        let new = match state.orders.get(&new_id) {
            Some(order) => order.clone(),
            None => return Ok(None),
        };

        let bucket: Vec<Uuid> = state.book.ids(new.taker_chain, new.maker_chain).to_vec();
        let candidates = bucket.iter().filter_map(|id| state.orders.get(id));
        let counter_id = match find_counter_order(&new, candidates, self.config.match_tolerance) {
            Some(id) => id,
            None => return Ok(None),
        };

        let counter = state
            .orders
            .get(&counter_id)
            .ok_or(SwapError::OrderNotFound(counter_id))?;
        let counter_maker = counter.maker.clone();
        // The earlier order's commitment binds both legs; its maker holds
        // the secret that unlocks the whole swap.
        let shared_digest = counter.hash_lock;

        let m = SwapMatch::new(counter_id, new_id, shared_digest, self.now());
        let match_id = m.id;

        state
            .orders
            .get_mut(&counter_id)
            .ok_or(SwapError::OrderNotFound(counter_id))?
            .record_match(new.maker.clone(), match_id)?;
        let new_order = state
            .orders
            .get_mut(&new_id)
            .ok_or(SwapError::OrderNotFound(new_id))?;
        new_order.record_match(counter_maker, match_id)?;
        new_order.hash_lock = shared_digest;

        state.book.remove(new.taker_chain, new.maker_chain, counter_id);
        state.book.remove(new.maker_chain, new.taker_chain, new_id);
        state.matches.insert(match_id, m);

        info!(
            match_id = %match_id,
            maker_order = %counter_id,
            taker_order = %new_id,
            "Orders matched"
        );
        Ok(Some(match_id))
    }

    /// Create both legs' locks for a pending match.
    ///
    /// The two `create_lock` calls run concurrently and outside the engine
    /// lock; both results are observed before any state transition. Either
    /// failure marks the match failed and leaves any created leg for the
    /// expiry monitor to refund once its timelock passes.
    async fn execute_lock(&self, match_id: Uuid) -> Result<(), SwapError> {
        let (maker_req, taker_req, maker_order_id, taker_order_id) = {
            let state = self.state.lock();
            let m = state
                .matches
                .get(&match_id)
                .ok_or(SwapError::MatchNotFound(match_id))?;
            let maker_order = state
                .orders
                .get(&m.maker_order)
                .ok_or(SwapError::OrderNotFound(m.maker_order))?;
            let taker_order = state
                .orders
                .get(&m.taker_order)
                .ok_or(SwapError::OrderNotFound(m.taker_order))?;

            let (maker_leg_tl, taker_leg_tl) = leg_timelocks(
                maker_order.timelock,
                self.config.min_timelock_margin_secs,
            )?;

            let maker_req = LockRequest {
                chain: maker_order.maker_chain,
                amount: maker_order.maker_amount,
                hash_lock: m.hash_lock,
                timelock: maker_leg_tl,
                recipient: taker_order.maker.clone(),
            };
            let taker_req = LockRequest {
                chain: taker_order.maker_chain,
                amount: taker_order.maker_amount,
                hash_lock: m.hash_lock,
                timelock: taker_leg_tl,
                recipient: maker_order.maker.clone(),
            };
            (maker_req, taker_req, m.maker_order, m.taker_order)
        };

        let (maker_res, taker_res) = tokio::join!(
            self.connector.create_lock(maker_req.clone()),
            self.connector.create_lock(taker_req.clone()),
        );

        let mut state = self.state.lock();
        let m = state
            .matches
            .get_mut(&match_id)
            .ok_or(SwapError::MatchNotFound(match_id))?;

        match (&maker_res, &taker_res) {
            (Ok(maker_ref), Ok(taker_ref)) => {
                m.maker_leg = Some(LegLock::new(maker_req.chain, *maker_ref, maker_req.timelock));
                m.taker_leg = Some(LegLock::new(taker_req.chain, *taker_ref, taker_req.timelock));
                m.transition_to(MatchStatus::Locked)?;

                let legs = [
                    (maker_order_id, *maker_ref, maker_req.timelock),
                    (taker_order_id, *taker_ref, taker_req.timelock),
                ];
                for (order_id, lock_ref, timelock) in legs {
                    if let Some(order) = state.orders.get_mut(&order_id) {
                        order.transition_to(OrderStatus::Locked)?;
                        order.lock_ref = Some(lock_ref);
                        order.timelock = timelock;
                    }
                }
                info!(match_id = %match_id, "Both legs locked");
                Ok(())
            }
            _ => {
                // Record whichever leg did get created so the expiry
                // monitor can refund it after its timelock.
                if let Ok(maker_ref) = &maker_res {
                    m.maker_leg =
                        Some(LegLock::new(maker_req.chain, *maker_ref, maker_req.timelock));
                }
                if let Ok(taker_ref) = &taker_res {
                    m.taker_leg =
                        Some(LegLock::new(taker_req.chain, *taker_ref, taker_req.timelock));
                }
                m.transition_to(MatchStatus::Failed)?;

                for order_id in [maker_order_id, taker_order_id] {
                    if let Some(order) = state.orders.get_mut(&order_id) {
                        order.transition_to(OrderStatus::Failed)?;
                    }
                }

                let reason = [&maker_res, &taker_res]
                    .iter()
                    .filter_map(|res| res.as_ref().err())
                    .map(|err| err.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!(
                    match_id = %match_id,
                    reason = %reason,
                    "Lock creation failed, match marked failed"
                );
                Ok(())
            }
        }
    }
}

#[async_trait]
impl SwapCoordinator for SwapEngine {
    async fn submit_order(&self, request: OrderRequest) -> Result<SubmitReceipt, SwapError> {
        invariant_positive_amount(request.maker_amount)?;
        invariant_positive_amount(request.taker_amount)?;
        invariant_distinct_chains(request.maker_chain, request.taker_chain)?;
        for chain in [request.maker_chain, request.taker_chain] {
            if !self.config.supported_chains.contains(&chain) {
                return Err(SwapError::UnsupportedChain(chain));
            }
        }
        // The horizon must leave room for the shorter leg's window.
        if request.timelock_hours * 3600 <= self.config.min_timelock_margin_secs {
            return Err(SwapError::InvalidTimelock(request.timelock_hours));
        }

        let now = self.now();
        let timelock = order_deadline(now, request.timelock_hours)?;
        let secret = generate_secret();
        let digest = hash_lock(secret.as_bytes());

        let order = SwapOrderBuilder::new(digest, timelock, now)
            .maker(request.maker.clone())
            .offers(
                request.maker_chain,
                request.maker_asset.clone(),
                request.maker_amount,
            )
            .wants(
                request.taker_chain,
                request.taker_asset.clone(),
                request.taker_amount,
            )
            .build();
        let order_id = order.id;

        let matched = {
            let mut state = self.state.lock();
            // Admission gate: both chains must report connected in the
            // last-refreshed connectivity table.
            for chain in [request.maker_chain, request.taker_chain] {
                let connected = state
                    .connections
                    .get(&chain)
                    .map(|status| status.connected)
                    .unwrap_or(false);
                if !connected {
                    return Err(SwapError::NodesUnavailable { chain });
                }
            }

            info!(
                order_id = %order_id,
                maker = %request.maker,
                pair = ?(request.maker_chain, request.taker_chain),
                maker_amount = request.maker_amount,
                taker_amount = request.taker_amount,
                "Order submitted"
            );
            state.orders.insert(order_id, order);
            state
                .book
                .insert(request.maker_chain, request.taker_chain, order_id);
            self.try_match(&mut state, order_id)?
        };

        if let Some(match_id) = matched {
            self.execute_lock(match_id).await?;
        }

        Ok(SubmitReceipt {
            order_id,
            hash_lock: digest,
            secret,
        })
    }

    async fn cancel_order(&self, order_id: Uuid) -> Result<bool, SwapError> {
        let mut state = self.state.lock();
        let (from, to) = match state.orders.get_mut(&order_id) {
            Some(order) if order.status == OrderStatus::Open => {
                order.transition_to(OrderStatus::Cancelled)?;
                (order.maker_chain, order.taker_chain)
            }
            // Already matched, terminal, or unknown: nothing to withdraw.
            _ => return Ok(false),
        };
        state.book.remove(from, to, order_id);
        info!(order_id = %order_id, "Order cancelled");
        Ok(true)
    }

    async fn complete_swap(&self, order_id: Uuid, secret: &Secret) -> Result<bool, SwapError> {
        let (match_id, maker_leg, taker_leg) = {
            let state = self.state.lock();
            let order = state
                .orders
                .get(&order_id)
                .ok_or(SwapError::OrderNotFound(order_id))?;
            if !verify_secret(secret, &order.hash_lock) {
                debug!(order_id = %order_id, "Completion rejected: secret does not open hash lock");
                return Ok(false);
            }
            let match_id = match order.match_id {
                Some(id) => id,
                None => return Ok(false),
            };
            let m = state
                .matches
                .get(&match_id)
                .ok_or(SwapError::MatchNotFound(match_id))?;
            if m.status != MatchStatus::Locked {
                return Ok(false);
            }
            match (&m.maker_leg, &m.taker_leg) {
                (Some(maker_leg), Some(taker_leg)) => {
                    (match_id, maker_leg.clone(), taker_leg.clone())
                }
                _ => return Ok(false),
            }
        };

        // Claim outside the lock. The taker leg goes first: it carries the
        // shorter window, and claiming it is what reveals the secret.
        let mut taker_claimed = taker_leg.claimed;
        if !taker_claimed {
            taker_claimed = matches!(
                self.connector
                    .claim_lock(taker_leg.chain, taker_leg.lock_ref, *secret)
                    .await,
                Ok(true)
            );
        }
        let mut maker_claimed = maker_leg.claimed;
        if !maker_claimed {
            maker_claimed = matches!(
                self.connector
                    .claim_lock(maker_leg.chain, maker_leg.lock_ref, *secret)
                    .await,
                Ok(true)
            );
        }

        let now = self.now();
        let mut state = self.state.lock();
        let m = match state.matches.get_mut(&match_id) {
            Some(m) => m,
            None => return Ok(false),
        };
        // Re-check after the blocking section: an expiry sweep may have
        // won the race, in which case this completion loses.
        if m.status != MatchStatus::Locked {
            return Ok(false);
        }
        if let Some(leg) = m.taker_leg.as_mut() {
            leg.claimed = taker_claimed;
        }
        if let Some(leg) = m.maker_leg.as_mut() {
            leg.claimed = maker_claimed;
        }
        if !(taker_claimed && maker_claimed) {
            warn!(
                match_id = %match_id,
                taker_claimed,
                maker_claimed,
                "Partial claim, match stays locked for retry"
            );
            return Ok(false);
        }

        m.transition_to(MatchStatus::Completed)?;
        let (maker_order_id, taker_order_id) = (m.maker_order, m.taker_order);
        let secret_hex = hex::encode(secret);
        for order_id in [maker_order_id, taker_order_id] {
            if let Some(order) = state.orders.get_mut(&order_id) {
                order.transition_to(OrderStatus::Completed)?;
                order.revealed_secret = Some(secret_hex.clone());
                order.completed_at = Some(now);
            }
        }
        info!(match_id = %match_id, "Swap completed, both legs claimed");
        Ok(true)
    }

    fn order_book(&self, from: ChainId, to: ChainId) -> Vec<SwapOrder> {
        let state = self.state.lock();
        state
            .book
            .ids(from, to)
            .iter()
            .filter_map(|id| state.orders.get(id))
            .cloned()
            .collect()
    }

    fn orders_for_party(&self, identity: &str) -> Vec<SwapOrder> {
        let state = self.state.lock();
        let mut orders: Vec<SwapOrder> = state
            .orders
            .values()
            .filter(|order| order.involves(identity))
            .cloned()
            .collect();
        orders.sort_by_key(|order| order.created_at);
        orders
    }

    fn connection_status(&self) -> Vec<ChainConnectionStatus> {
        let state = self.state.lock();
        self.config
            .supported_chains
            .iter()
            .map(|chain| {
                state
                    .connections
                    .get(chain)
                    .cloned()
                    .unwrap_or_else(|| ChainConnectionStatus::unknown(*chain))
            })
            .collect()
    }
}
