// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! Per-node measurement history
//!
//! Each major node id owns a bounded FIFO window of its most recent
//! measurements. The store is pre-allocated for the configured node count at
//! startup, so recording is O(1) with bounded memory and an out-of-range id
//! is rejected instead of growing the map from untrusted input.

use std::collections::VecDeque;

use crate::error::{GatewayError, Result};

/// Bounded FIFO window of recent measurements for one node
#[derive(Debug, Clone)]
pub struct NodeHistory {
    window: VecDeque<i64>,
    capacity: usize,
}

impl NodeHistory {
    /// Create an empty history with the given window capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a measurement, evicting the oldest once the window is full
    pub fn push(&mut self, value: i64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(value);
    }

    /// Number of retained measurements
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Check if the window holds no measurements
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Window capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate measurements from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &i64> {
        self.window.iter()
    }

    /// Arithmetic mean of the window, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        // Any parseable i64 is a valid measurement, so two values near the
        // extremes would overflow an i64 accumulator.
        let sum: i128 = self.window.iter().map(|&v| i128::from(v)).sum();
        Some(sum as f64 / self.window.len() as f64)
    }
}

/// Fixed-size store of per-node histories, indexed by major id
#[derive(Debug)]
pub struct HistoryStore {
    nodes: Vec<NodeHistory>,
}

impl HistoryStore {
    /// Pre-allocate histories for majors in `[0, node_count)`
    pub fn new(node_count: usize, window_capacity: usize) -> Self {
        Self {
            nodes: vec![NodeHistory::new(window_capacity); node_count],
        }
    }

    /// Record a measurement for the given major id
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NodeOutOfRange`] if `major` is outside the
    /// pre-allocated range. No history is touched in that case.
    pub fn record(&mut self, major: u32, value: i64) -> Result<()> {
        let max = self.nodes.len();
        let history = self
            .nodes
            .get_mut(major as usize)
            .ok_or(GatewayError::NodeOutOfRange { major, max })?;
        history.push(value);
        Ok(())
    }

    /// Read-only view of a node's history
    pub fn history(&self, major: u32) -> Option<&NodeHistory> {
        self.nodes.get(major as usize)
    }

    /// Number of addressable nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;

    #[test]
    fn test_history_keeps_arrival_order() {
        let mut history = NodeHistory::new(30);
        for v in [5, -3, 12] {
            history.push(v);
        }
        let stored: Vec<i64> = history.iter().copied().collect();
        assert_eq!(stored, vec![5, -3, 12]);
    }

    #[test]
    fn test_history_fifo_eviction() {
        let mut history = NodeHistory::new(30);
        for v in 0..45 {
            history.push(v);
        }
        assert_eq!(history.len(), 30);
        let stored: Vec<i64> = history.iter().copied().collect();
        let expected: Vec<i64> = (15..45).collect();
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_history_fifo_law_random_lengths() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let n: usize = rng.gen_range(1..100);
            let values: Vec<i64> = (0..n).map(|_| rng.gen_range(-1000..1000)).collect();

            let mut history = NodeHistory::new(30);
            for &v in &values {
                history.push(v);
            }

            let stored: Vec<i64> = history.iter().copied().collect();
            let start = values.len().saturating_sub(30);
            assert_eq!(stored, values[start..]);
        }
    }

    #[test]
    fn test_mean_empty_window() {
        let history = NodeHistory::new(30);
        assert_eq!(history.mean(), None);
    }

    #[test]
    fn test_mean_extreme_values_no_overflow() {
        let mut history = NodeHistory::new(30);
        history.push(i64::MAX);
        history.push(i64::MAX);
        assert_relative_eq!(history.mean().unwrap(), i64::MAX as f64);

        let mut history = NodeHistory::new(30);
        history.push(i64::MIN);
        history.push(i64::MIN);
        assert_relative_eq!(history.mean().unwrap(), i64::MIN as f64);

        let mut history = NodeHistory::new(30);
        history.push(i64::MAX);
        history.push(i64::MIN);
        // Sum is -1; the mean must not wrap.
        assert_relative_eq!(history.mean().unwrap(), -0.5);
    }

    #[test]
    fn test_mean_real_division() {
        let mut history = NodeHistory::new(30);
        history.push(1);
        history.push(2);
        assert_relative_eq!(history.mean().unwrap(), 1.5);
    }

    #[test]
    fn test_store_record_and_query() {
        let mut store = HistoryStore::new(100, 30);
        store.record(3, 10).unwrap();
        let history = store.history(3).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_store_isolates_nodes() {
        let mut store = HistoryStore::new(10, 30);
        store.record(1, 100).unwrap();
        store.record(2, 200).unwrap();
        assert_eq!(store.history(1).unwrap().len(), 1);
        assert_eq!(store.history(2).unwrap().len(), 1);
        assert!(store.history(3).unwrap().is_empty());
    }

    #[test]
    fn test_store_rejects_out_of_range() {
        let mut store = HistoryStore::new(100, 30);
        let result = store.record(100, 1);
        assert_eq!(
            result,
            Err(GatewayError::NodeOutOfRange {
                major: 100,
                max: 100
            })
        );
    }
}
