// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! Error types for Flowgate
//!
//! Only [`StreamError`] is fatal to the gateway loop. Every other error kind
//! is absorbed at the point of detection: the offending frame or update is
//! dropped and the loop continues.

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Stream error (fatal: terminates the gateway loop)
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// Parse error (local: the frame is dropped)
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Node id outside the configured range (local: the update is dropped)
    #[error("Node {major} out of range (configured for {max} nodes)")]
    NodeOutOfRange { major: u32, max: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors on the underlying byte stream
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Peer closed the connection before a newline was seen
    #[error("Stream closed by peer")]
    Closed,

    /// I/O failure on read or write
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe => StreamError::Closed,
            _ => StreamError::Io(err.to_string()),
        }
    }
}

/// Errors while parsing a sensor report frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A numeric field did not parse as an integer
    #[error("Field '{field}' is not an integer: '{token}'")]
    NotInteger { field: &'static str, token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::NodeOutOfRange { major: 250, max: 100 };
        let msg = format!("{}", err);
        assert!(msg.contains("250"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_error_conversion() {
        let parse_err = ParseError::NotInteger {
            field: "value",
            token: "abc".to_string(),
        };
        let gateway_err: GatewayError = parse_err.into();
        assert!(matches!(gateway_err, GatewayError::Parse(_)));
    }

    #[test]
    fn test_io_error_mapping() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(StreamError::from(eof), StreamError::Closed);

        let other = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert!(matches!(StreamError::from(other), StreamError::Io(_)));
    }
}
