//! # End-to-End Swap Flows
//!
//! Drives the coordination engine against the simulated chain connector,
//! so every claim and refund is checked by real HTLC mechanics: right
//! secret before the timelock, refund only after it.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swapbook::{
        ChainId, MatchStatus, OrderRequest, OrderStatus, SimulatedConnector, SwapCoordinator,
        SwapEngine,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Harness {
        engine: Arc<SwapEngine>,
        sim: Arc<SimulatedConnector>,
    }

    impl Harness {
        async fn new() -> Self {
            let sim = Arc::new(SimulatedConnector::new());
            let engine = Arc::new(SwapEngine::new(sim.clone()));
            engine.set_time(sim.now());
            engine.refresh_connections().await;
            Self { engine, sim }
        }

        /// Advance the engine clock and the simulated chains together.
        fn advance(&self, secs: u64) {
            self.engine.advance_time(secs);
            self.sim.advance_time(secs);
        }

        fn request(
            maker: &str,
            offers: (ChainId, f64),
            wants: (ChainId, f64),
        ) -> OrderRequest {
            OrderRequest {
                maker: maker.to_string(),
                maker_chain: offers.0,
                maker_asset: "X".to_string(),
                maker_amount: offers.1,
                taker_chain: wants.0,
                taker_asset: "Y".to_string(),
                taker_amount: wants.1,
                timelock_hours: 24,
            }
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: FULL SWAP LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_full_swap_happy_path() {
        let h = Harness::new().await;

        let maker = h
            .engine
            .submit_order(Harness::request(
                "alice",
                (ChainId::Bitcoin, 1.5),
                (ChainId::Ethereum, 20.0),
            ))
            .await
            .unwrap();
        let taker = h
            .engine
            .submit_order(Harness::request(
                "bob",
                (ChainId::Ethereum, 20.0),
                (ChainId::Bitcoin, 1.5),
            ))
            .await
            .unwrap();

        // Matched and locked on both simulated chains.
        let m = h.engine.match_for_order(maker.order_id).unwrap();
        assert_eq!(m.status, MatchStatus::Locked);
        assert!(m.maker_leg.is_some());
        assert!(m.taker_leg.is_some());

        // The maker reveals the secret from the submission receipt.
        let completed = h
            .engine
            .complete_swap(maker.order_id, maker.secret.as_bytes())
            .await
            .unwrap();
        assert!(completed);

        for order_id in [maker.order_id, taker.order_id] {
            let order = h.engine.get_order(order_id).unwrap();
            assert_eq!(order.status, OrderStatus::Completed);
            assert_eq!(
                order.revealed_secret.as_deref(),
                Some(maker.secret.to_hex().as_str())
            );
        }

        // Nothing left for the expiry monitor even after the timelocks.
        h.advance(48 * 3600);
        assert_eq!(h.engine.sweep_once().await, 0);
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected_before_any_chain_call() {
        let h = Harness::new().await;

        let maker = h
            .engine
            .submit_order(Harness::request(
                "alice",
                (ChainId::Bitcoin, 1.0),
                (ChainId::Ethereum, 15.0),
            ))
            .await
            .unwrap();
        h.engine
            .submit_order(Harness::request(
                "bob",
                (ChainId::Ethereum, 15.0),
                (ChainId::Bitcoin, 1.0),
            ))
            .await
            .unwrap();

        let completed = h
            .engine
            .complete_swap(maker.order_id, &[0xEE; 32])
            .await
            .unwrap();
        assert!(!completed);
        assert_eq!(
            h.engine.match_for_order(maker.order_id).unwrap().status,
            MatchStatus::Locked
        );

        // The right secret still works afterwards.
        assert!(h
            .engine
            .complete_swap(maker.order_id, maker.secret.as_bytes())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_expired_match_is_refunded_on_chain() {
        let h = Harness::new().await;

        let maker = h
            .engine
            .submit_order(Harness::request(
                "alice",
                (ChainId::Litecoin, 30.0),
                (ChainId::Polygon, 500.0),
            ))
            .await
            .unwrap();
        let taker = h
            .engine
            .submit_order(Harness::request(
                "bob",
                (ChainId::Polygon, 500.0),
                (ChainId::Litecoin, 30.0),
            ))
            .await
            .unwrap();

        // Before the timelocks the simulated chains refuse refunds.
        assert_eq!(h.engine.sweep_once().await, 0);

        // Past both legs' windows the sweep refunds both on chain.
        h.advance(48 * 3600);
        assert_eq!(h.engine.sweep_once().await, 2);

        for order_id in [maker.order_id, taker.order_id] {
            assert_eq!(
                h.engine.get_order(order_id).unwrap().status,
                OrderStatus::Expired
            );
        }
        assert_eq!(
            h.engine.match_for_order(maker.order_id).unwrap().status,
            MatchStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_shorter_leg_expires_first() {
        let h = Harness::new().await;

        h.engine
            .submit_order(Harness::request(
                "alice",
                (ChainId::Bitcoin, 1.0),
                (ChainId::Ethereum, 15.0),
            ))
            .await
            .unwrap();
        let taker = h
            .engine
            .submit_order(Harness::request(
                "bob",
                (ChainId::Ethereum, 15.0),
                (ChainId::Bitcoin, 1.0),
            ))
            .await
            .unwrap();

        // Past the taker leg's window (timelock minus the 6h margin) but
        // inside the maker leg's.
        h.advance(20 * 3600);
        assert_eq!(h.engine.sweep_once().await, 1);
        assert_eq!(
            h.engine.get_order(taker.order_id).unwrap().status,
            OrderStatus::Expired
        );

        h.advance(8 * 3600);
        assert_eq!(h.engine.sweep_once().await, 1);
    }

    #[tokio::test]
    async fn test_late_secret_cannot_beat_the_chains() {
        let h = Harness::new().await;

        let maker = h
            .engine
            .submit_order(Harness::request(
                "alice",
                (ChainId::Bitcoin, 1.0),
                (ChainId::Ethereum, 15.0),
            ))
            .await
            .unwrap();
        h.engine
            .submit_order(Harness::request(
                "bob",
                (ChainId::Ethereum, 15.0),
                (ChainId::Bitcoin, 1.0),
            ))
            .await
            .unwrap();

        // Both legs past their timelocks: the chains reject the claims
        // even though the engine has not swept yet.
        h.advance(48 * 3600);
        let completed = h
            .engine
            .complete_swap(maker.order_id, maker.secret.as_bytes())
            .await
            .unwrap();
        assert!(!completed);

        // The sweep then refunds both legs. Exactly one terminal outcome.
        assert_eq!(h.engine.sweep_once().await, 2);
        assert_eq!(
            h.engine.get_order(maker.order_id).unwrap().status,
            OrderStatus::Expired
        );
    }

    #[tokio::test]
    async fn test_disconnected_chain_blocks_submission() {
        let h = Harness::new().await;
        h.sim.set_connected(ChainId::Polygon, false);
        h.engine.refresh_connections().await;

        let result = h
            .engine
            .submit_order(Harness::request(
                "alice",
                (ChainId::Bitcoin, 1.0),
                (ChainId::Polygon, 100.0),
            ))
            .await;
        assert!(result.is_err());

        // Reconnection lifts the gate on the next refresh.
        h.sim.set_connected(ChainId::Polygon, true);
        h.engine.refresh_connections().await;
        assert!(h
            .engine
            .submit_order(Harness::request(
                "alice",
                (ChainId::Bitcoin, 1.0),
                (ChainId::Polygon, 100.0),
            ))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_heights_tracked_per_chain() {
        let h = Harness::new().await;
        let before: Vec<u64> = h
            .engine
            .connection_status()
            .iter()
            .map(|status| status.last_height)
            .collect();

        h.advance(1200);
        h.engine.refresh_connections().await;
        let after: Vec<u64> = h
            .engine
            .connection_status()
            .iter()
            .map(|status| status.last_height)
            .collect();

        // Every chain produced blocks; faster chains produced more.
        for (b, a) in before.iter().zip(&after) {
            assert!(a > b);
        }
    }

    #[tokio::test]
    async fn test_independent_pairs_do_not_interfere() {
        let h = Harness::new().await;

        let btc_eth = h
            .engine
            .submit_order(Harness::request(
                "alice",
                (ChainId::Bitcoin, 1.0),
                (ChainId::Ethereum, 15.0),
            ))
            .await
            .unwrap();
        let ltc_poly = h
            .engine
            .submit_order(Harness::request(
                "carol",
                (ChainId::Litecoin, 30.0),
                (ChainId::Polygon, 500.0),
            ))
            .await
            .unwrap();

        // A taker for the LTC/POLY pair leaves the BTC/ETH order alone.
        h.engine
            .submit_order(Harness::request(
                "dave",
                (ChainId::Polygon, 500.0),
                (ChainId::Litecoin, 30.0),
            ))
            .await
            .unwrap();

        assert_eq!(
            h.engine.get_order(btc_eth.order_id).unwrap().status,
            OrderStatus::Open
        );
        assert_eq!(
            h.engine.get_order(ltc_poly.order_id).unwrap().status,
            OrderStatus::Locked
        );
    }
}
