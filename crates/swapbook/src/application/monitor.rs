//! # Expiry Monitor
//!
//! Background task that drives the engine's timelock sweeps. Each tick
//! refreshes the connectivity table and refunds every leg whose timelock
//! has been breached.

use super::engine::SwapEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Background task sweeping expired locks at the engine's configured
/// interval. Runs until the owning task is aborted.
pub async fn expiry_monitor_task(engine: Arc<SwapEngine>) {
    let period = Duration::from_secs(engine.config().expiry_interval_secs);
    let mut sweep_interval = tokio::time::interval(period);
    sweep_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        sweep_interval.tick().await;
        let refunded = engine.sweep_once().await;
        if refunded > 0 {
            debug!(refunded, "Expiry sweep refunded breached legs");
        }
    }
}

/// Spawn the expiry monitor onto the current runtime.
pub fn spawn_expiry_monitor(engine: Arc<SwapEngine>) -> JoinHandle<()> {
    tokio::spawn(expiry_monitor_task(engine))
}
