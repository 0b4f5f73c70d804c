// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! # Flowgate CLI
//!
//! Connects out to the sensor message source and relays actuation commands
//! back over the same connection.
//!
//! ## Usage
//!
//! ```bash
//! # Connect to the default source
//! flowgate --host 127.0.0.1 --port 60001
//!
//! # Custom threshold and an idle timeout for unresponsive peers
//! flowgate --host 10.0.3.2 --port 60001 --threshold 35 --read-timeout-secs 120
//! ```

use std::net::TcpStream;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use flowgate::{Gateway, GatewayConfig, GatewayError, ProtocolConfig, StreamError, VERSION};

/// Flowgate telemetry-to-actuation gateway
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host of the sensor message source
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port of the sensor message source
    #[arg(short, long, default_value = "60001")]
    port: u16,

    /// Mean threshold separating open from close decisions
    #[arg(short, long, default_value = "20.0")]
    threshold: f64,

    /// Measurements retained per node
    #[arg(long, default_value = "30")]
    window_capacity: usize,

    /// Number of addressable major node ids
    #[arg(long, default_value = "100")]
    node_count: usize,

    /// Inbound tag identifying a sensor reading
    #[arg(long, default_value = "SENSOR_INFO")]
    report_tag: String,

    /// Outbound tag identifying an actuation command
    #[arg(long, default_value = "VALVE")]
    action_tag: String,

    /// Drop the connection after this many seconds without inbound data
    /// (default: wait forever)
    #[arg(long)]
    read_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Flowgate v{}", VERSION);

    let config = GatewayConfig {
        threshold: args.threshold,
        window_capacity: args.window_capacity,
        node_count: args.node_count,
        protocol: ProtocolConfig {
            report_tag: args.report_tag.clone(),
            action_tag: args.action_tag.clone(),
            ..Default::default()
        },
    };

    let mut gateway = match Gateway::new(config) {
        Ok(gateway) => gateway,
        Err(err) => {
            error!(%err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let addr = format!("{}:{}", args.host, args.port);
    info!(%addr, "connecting to sensor source");

    let stream = match TcpStream::connect(&addr) {
        Ok(stream) => stream,
        Err(err) => {
            error!(%addr, %err, "connection failed");
            return ExitCode::FAILURE;
        }
    };

    if let Some(secs) = args.read_timeout_secs {
        if let Err(err) = stream.set_read_timeout(Some(Duration::from_secs(secs))) {
            error!(%err, "could not set read timeout");
            return ExitCode::FAILURE;
        }
    }

    // The gateway reads and writes on the same connection.
    let write_half = match stream.try_clone() {
        Ok(clone) => clone,
        Err(err) => {
            error!(%err, "could not clone stream");
            return ExitCode::FAILURE;
        }
    };

    let result = gateway.run(stream, write_half);

    let stats = gateway.stats();
    info!(
        frames = stats.frames_received,
        reports = stats.reports_accepted,
        ignored = stats.frames_ignored,
        malformed = stats.frames_malformed,
        out_of_range = stats.reports_out_of_range,
        responses = stats.responses_sent,
        "gateway stopped"
    );

    match result {
        Err(GatewayError::Stream(StreamError::Closed)) => {
            // A clean close by the peer is the normal way to stop the relay.
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "gateway terminated");
            ExitCode::FAILURE
        }
        Ok(()) => ExitCode::SUCCESS,
    }
}
