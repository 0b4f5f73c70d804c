// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! Gateway loop
//!
//! [`Gateway`] orchestrates the pipeline: read frame → parse → record →
//! evaluate → encode → write. One frame is fully handled before the next
//! read begins; there is no termination condition other than stream closure
//! or a stream error.
//!
//! # Example
//!
//! ```rust
//! use flowgate::{Gateway, GatewayConfig};
//! use std::io::Cursor;
//!
//! let mut gateway = Gateway::new(GatewayConfig::default()).unwrap();
//!
//! let inbound = Cursor::new(b"SENSOR_INFO 3 0 10\n".to_vec());
//! let mut outbound: Vec<u8> = Vec::new();
//!
//! // Runs until the inbound stream closes.
//! let _err = gateway.run(inbound, &mut outbound).unwrap_err();
//! assert_eq!(outbound, b"VALVE 3 0 OPENING_VALVE\n");
//! ```

use std::io::{Read, Write};

use tracing::{debug, error, info, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result, StreamError};
use crate::evaluator::ThresholdEvaluator;
use crate::framing::{FrameReader, FrameWriter};
use crate::history::HistoryStore;
use crate::protocol::{Codec, ParsedFrame, SensorReport};

/// Counters for operational visibility
///
/// Counting non-actionable traffic does not change protocol behavior; no
/// response is ever produced for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayStats {
    /// Complete frames read from the stream
    pub frames_received: u64,
    /// Frames parsed into valid sensor reports
    pub reports_accepted: u64,
    /// Frames with an unrecognized tag or too few tokens
    pub frames_ignored: u64,
    /// Frames with a recognized tag but invalid fields
    pub frames_malformed: u64,
    /// Reports dropped because the major id was out of range
    pub reports_out_of_range: u64,
    /// Actuation responses written to the stream
    pub responses_sent: u64,
}

/// Telemetry-to-actuation relay over a duplex byte stream
pub struct Gateway {
    store: HistoryStore,
    evaluator: ThresholdEvaluator,
    codec: Codec,
    stats: GatewayStats,
}

impl Gateway {
    /// Create a gateway from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: HistoryStore::new(config.node_count, config.window_capacity),
            evaluator: ThresholdEvaluator::new(config.threshold),
            codec: Codec::new(config.protocol),
            stats: GatewayStats::default(),
        })
    }

    /// Run the relay loop until the stream closes or errors
    ///
    /// Reads frames from `source` and writes actuation responses to `sink`.
    /// Always returns an error: the loop has no success exit. The returned
    /// [`GatewayError::Stream`] says whether the peer closed cleanly or the
    /// transport failed.
    pub fn run<R: Read, W: Write>(&mut self, source: R, sink: W) -> Result<()> {
        let mut reader = FrameReader::new(source);
        let mut writer = FrameWriter::new(sink);

        info!(
            threshold = self.evaluator.threshold(),
            nodes = self.store.node_count(),
            "gateway loop started"
        );

        loop {
            let frame = match reader.next_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    match err {
                        StreamError::Closed => info!("stream closed by peer"),
                        StreamError::Io(ref reason) => error!(%reason, "stream error"),
                    }
                    return Err(GatewayError::Stream(err));
                }
            };
            self.stats.frames_received += 1;

            if let Some(response) = self.handle_frame(&frame) {
                writer.send(&response).map_err(GatewayError::Stream)?;
                self.stats.responses_sent += 1;
            }
        }
    }

    /// Process one frame and return the response to emit, if any
    ///
    /// All local error kinds (ignored, malformed, out-of-range, empty
    /// history) are absorbed here.
    pub fn handle_frame(&mut self, frame: &str) -> Option<String> {
        let report = match self.codec.parse(frame) {
            ParsedFrame::Report(report) => report,
            ParsedFrame::Ignored => {
                self.stats.frames_ignored += 1;
                debug!(frame, "ignored non-actionable frame");
                return None;
            }
            ParsedFrame::Malformed(err) => {
                self.stats.frames_malformed += 1;
                warn!(frame, %err, "dropped malformed frame");
                return None;
            }
        };

        self.update_and_decide(report)
    }

    fn update_and_decide(&mut self, report: SensorReport) -> Option<String> {
        if let Err(err) = self.store.record(report.addr.major, report.value) {
            self.stats.reports_out_of_range += 1;
            warn!(node = %report.addr, %err, "dropped report");
            return None;
        }
        self.stats.reports_accepted += 1;

        // record() just appended, so the window cannot be empty; the None
        // arm guards the invariant rather than a reachable state.
        let history = self.store.history(report.addr.major)?;
        let decision = self.evaluator.evaluate(history)?;

        debug!(
            node = %report.addr,
            value = report.value,
            window = history.len(),
            ?decision,
            "evaluated report"
        );

        Some(self.codec.encode_response(report.addr, decision))
    }

    /// Read-only view of the counters
    pub fn stats(&self) -> &GatewayStats {
        &self.stats
    }

    /// Read-only view of a node's history window
    pub fn history(&self, major: u32) -> Option<&crate::history::NodeHistory> {
        self.store.history(major)
    }
}
