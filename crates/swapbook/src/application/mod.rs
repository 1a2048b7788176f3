//! # Application Layer
//!
//! The coordination engine behind the inbound port, plus the expiry
//! monitor that drives its periodic sweeps.

pub mod engine;
pub mod monitor;

pub use engine::SwapEngine;
pub use monitor::{expiry_monitor_task, spawn_expiry_monitor};
