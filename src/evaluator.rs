// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! Threshold evaluation
//!
//! Maps the arithmetic mean of a node's window to a binary decision. The
//! comparison is `>=`: a mean exactly at the threshold closes the valve.

use crate::history::NodeHistory;
use crate::protocol::Decision;

/// Maps window means to actuation decisions against a fixed threshold
#[derive(Debug, Clone, Copy)]
pub struct ThresholdEvaluator {
    threshold: f64,
}

impl ThresholdEvaluator {
    /// Create an evaluator with the given threshold
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Evaluate a node's history window
    ///
    /// Returns `None` for an empty window: no measurement means no decision,
    /// and the caller skips emitting a response. In normal operation a record
    /// always precedes evaluation, so this branch is protective.
    pub fn evaluate(&self, history: &NodeHistory) -> Option<Decision> {
        let mean = history.mean()?;
        if mean >= self.threshold {
            Some(Decision::Close)
        } else {
            Some(Decision::Open)
        }
    }

    /// The configured threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
