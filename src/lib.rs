// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! # Flowgate - Telemetry-to-actuation gateway
//!
//! Flowgate bridges a field-sensor network to a control actuator. It connects
//! to a message source over a stream socket, parses line-delimited ASCII
//! sensor reports, keeps a bounded window of recent measurements per node,
//! and answers with a valve open/close command whenever the window mean
//! crosses a configured threshold.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowgate::{Gateway, GatewayConfig};
//! use std::io::Cursor;
//!
//! let config = GatewayConfig {
//!     threshold: 20.0,
//!     ..Default::default()
//! };
//! let mut gateway = Gateway::new(config).unwrap();
//!
//! // Any Read + Write pair works; production uses a TcpStream.
//! let inbound = Cursor::new(b"SENSOR_INFO 7 1 35\n".to_vec());
//! let mut outbound: Vec<u8> = Vec::new();
//!
//! let _ = gateway.run(inbound, &mut outbound);
//! assert_eq!(outbound, b"VALVE 7 1 CLOSING_VALVE\n");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Flowgate                                                │
//! │                                                          │
//! │  ┌─────────────┐   ┌────────┐   ┌──────────────┐         │
//! │  │ FrameReader │──▶│ Codec  │──▶│ HistoryStore │         │
//! │  │ (newline)   │   │ parse  │   │ (FIFO/node)  │         │
//! │  └─────────────┘   └────────┘   └──────┬───────┘         │
//! │                                        ▼                 │
//! │  ┌─────────────┐   ┌────────┐   ┌──────────────┐         │
//! │  │ FrameWriter │◀──│ Codec  │◀──│ Threshold    │         │
//! │  │ (newline)   │   │ encode │   │ Evaluator    │         │
//! │  └─────────────┘   └────────┘   └──────────────┘         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`framing`]: newline-delimited frame reader/writer
//! - [`protocol`]: message types, parsing, response encoding
//! - [`history`]: per-node bounded measurement windows
//! - [`evaluator`]: mean-vs-threshold decision
//! - [`gateway`]: the relay loop tying it all together
//! - [`config`]: gateway and wire-vocabulary configuration
//! - [`error`]: error taxonomy

// Modules
pub mod config;
pub mod error;
pub mod evaluator;
pub mod framing;
pub mod gateway;
pub mod history;
pub mod protocol;

// Re-exports for convenient access
pub use config::{GatewayConfig, ProtocolConfig};
pub use error::{GatewayError, ParseError, Result, StreamError};
pub use evaluator::ThresholdEvaluator;
pub use framing::{FrameReader, FrameWriter};
pub use gateway::{Gateway, GatewayStats};
pub use history::{HistoryStore, NodeHistory};
pub use protocol::{Codec, Decision, NodeAddress, ParsedFrame, SensorReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
