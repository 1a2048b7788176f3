//! # Ports
//!
//! Inbound API trait and outbound chain connectivity trait.

pub mod inbound;
pub mod outbound;

pub use inbound::{OrderRequest, SubmitReceipt, SwapCoordinator};
pub use outbound::{ChainConnector, LockRequest, MockChainConnector};
