//! # Swapbook Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end swap flows on simulated chains
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p swapbook-tests
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
