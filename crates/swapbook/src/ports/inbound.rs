//! # Inbound Ports
//!
//! API trait consumed by UI/CLI collaborators.

use crate::domain::{
    ChainConnectionStatus, ChainId, Hash, Secret, SecureSecret, SwapError, SwapOrder,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Parameters for submitting a swap intent.
#[derive(Clone, Debug)]
pub struct OrderRequest {
    /// Maker identity (account/address string).
    pub maker: String,
    /// Chain the maker's funds live on.
    pub maker_chain: ChainId,
    /// Asset symbol offered.
    pub maker_asset: String,
    /// Amount offered.
    pub maker_amount: f64,
    /// Chain the maker wants funds on.
    pub taker_chain: ChainId,
    /// Asset symbol wanted.
    pub taker_asset: String,
    /// Amount wanted.
    pub taker_amount: f64,
    /// Timelock horizon in hours from submission.
    pub timelock_hours: u64,
}

/// Result of an accepted submission.
///
/// The secret is returned only here, to the maker; the engine keeps just
/// the public commitment.
#[derive(Debug)]
pub struct SubmitReceipt {
    /// Id of the new order.
    pub order_id: Uuid,
    /// Public commitment placed on both legs.
    pub hash_lock: Hash,
    /// The maker's secret. Keep it safe until claim time.
    pub secret: SecureSecret,
}

/// Swap coordination API - inbound port.
#[async_trait]
pub trait SwapCoordinator: Send + Sync {
    /// Submit a swap intent. Validates invariants, gates on connectivity
    /// for both chains, and immediately attempts a match.
    async fn submit_order(&self, request: OrderRequest) -> Result<SubmitReceipt, SwapError>;

    /// Withdraw an order. True only while the order is still open.
    async fn cancel_order(&self, order_id: Uuid) -> Result<bool, SwapError>;

    /// Claim both legs of the owning match by revealing the secret.
    /// False without mutation if the secret is wrong or the match is not
    /// in the locked state.
    async fn complete_swap(&self, order_id: Uuid, secret: &Secret) -> Result<bool, SwapError>;

    /// Open orders for a direction, in insertion order.
    fn order_book(&self, from: ChainId, to: ChainId) -> Vec<SwapOrder>;

    /// All orders, any status, where the identity is maker or taker.
    fn orders_for_party(&self, identity: &str) -> Vec<SwapOrder>;

    /// Last refreshed connectivity snapshot for every tracked chain.
    fn connection_status(&self) -> Vec<ChainConnectionStatus>;
}
