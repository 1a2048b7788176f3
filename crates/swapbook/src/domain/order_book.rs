//! # Order Book
//!
//! Open orders indexed by directed chain pair. Buckets preserve insertion
//! order for the matching scan; insertion order carries no priority
//! guarantee.

use super::value_objects::{ChainId, ChainPair};
use std::collections::HashMap;
use uuid::Uuid;

/// Pair-indexed open order ids. Order records themselves live in the
/// engine's order table; the book only tracks which ids are open per
/// direction.
#[derive(Debug, Default)]
pub struct OrderBook {
    buckets: HashMap<ChainPair, Vec<Uuid>>,
}

impl OrderBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an open order id into its direction bucket.
    pub fn insert(&mut self, from: ChainId, to: ChainId, id: Uuid) {
        self.buckets.entry((from, to)).or_default().push(id);
    }

    /// Remove an order id from its bucket. Returns false if absent.
    pub fn remove(&mut self, from: ChainId, to: ChainId, id: Uuid) -> bool {
        match self.buckets.get_mut(&(from, to)) {
            Some(bucket) => {
                let before = bucket.len();
                bucket.retain(|entry| *entry != id);
                before != bucket.len()
            }
            None => false,
        }
    }

    /// Open order ids for a direction, in insertion order.
    pub fn ids(&self, from: ChainId, to: ChainId) -> &[Uuid] {
        self.buckets
            .get(&(from, to))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total open orders across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check if no orders are open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut book = OrderBook::new();
        let id = Uuid::new_v4();
        book.insert(ChainId::Bitcoin, ChainId::Ethereum, id);

        assert_eq!(book.ids(ChainId::Bitcoin, ChainId::Ethereum), &[id]);
        assert!(book.ids(ChainId::Ethereum, ChainId::Bitcoin).is_empty());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut book = OrderBook::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        book.insert(ChainId::Bitcoin, ChainId::Ethereum, first);
        book.insert(ChainId::Bitcoin, ChainId::Ethereum, second);

        assert_eq!(book.ids(ChainId::Bitcoin, ChainId::Ethereum), &[first, second]);
    }

    #[test]
    fn test_remove() {
        let mut book = OrderBook::new();
        let id = Uuid::new_v4();
        book.insert(ChainId::Bitcoin, ChainId::Ethereum, id);

        assert!(book.remove(ChainId::Bitcoin, ChainId::Ethereum, id));
        assert!(!book.remove(ChainId::Bitcoin, ChainId::Ethereum, id));
        assert!(book.is_empty());
    }

    #[test]
    fn test_remove_from_missing_bucket() {
        let mut book = OrderBook::new();
        assert!(!book.remove(ChainId::Litecoin, ChainId::Polygon, Uuid::new_v4()));
    }
}
