//! # Adapters
//!
//! Concrete implementations of the outbound port.

pub mod chain_connector;

pub use chain_connector::SimulatedConnector;
