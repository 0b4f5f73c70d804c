// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! Configuration types for Flowgate
//!
//! Field deployments run several gateway processes that differ only in
//! threshold values and message tags. Everything that varies between them is
//! configuration here.

use crate::error::{GatewayError, Result};

/// Gateway-level configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Mean threshold separating open from close decisions
    pub threshold: f64,

    /// Measurements retained per node (FIFO window)
    pub window_capacity: usize,

    /// Number of addressable major node ids, valid range is [0, node_count)
    pub node_count: usize,

    /// Wire protocol vocabulary
    pub protocol: ProtocolConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            window_capacity: 30,
            node_count: 100,
            protocol: ProtocolConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Create a configuration with a custom threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// Create a configuration with a custom window capacity
    pub fn with_window_capacity(window_capacity: usize) -> Self {
        Self {
            window_capacity,
            ..Default::default()
        }
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] if the node count or window
    /// capacity is zero, or the threshold is not a finite number.
    pub fn validate(&self) -> Result<()> {
        if self.node_count == 0 {
            return Err(GatewayError::InvalidConfig(
                "node_count must be at least 1".to_string(),
            ));
        }
        if self.window_capacity == 0 {
            return Err(GatewayError::InvalidConfig(
                "window_capacity must be at least 1".to_string(),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(GatewayError::InvalidConfig(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Wire protocol vocabulary
///
/// Tags and decision tokens are single space-free ASCII words. Defaults match
/// the field deployment the gateway was built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Inbound tag identifying a sensor reading
    pub report_tag: String,

    /// Outbound tag identifying an actuation command
    pub action_tag: String,

    /// Decision token for the open-equivalent action
    pub open_token: String,

    /// Decision token for the close-equivalent action
    pub close_token: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            report_tag: "SENSOR_INFO".to_string(),
            action_tag: "VALVE".to_string(),
            open_token: "OPENING_VALVE".to_string(),
            close_token: "CLOSING_VALVE".to_string(),
        }
    }
}

impl ProtocolConfig {
    /// Create a vocabulary with a custom inbound report tag
    pub fn with_report_tag(tag: impl Into<String>) -> Self {
        Self {
            report_tag: tag.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_default() {
        let config = GatewayConfig::default();
        assert_eq!(config.threshold, 20.0);
        assert_eq!(config.window_capacity, 30);
        assert_eq!(config.node_count, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gateway_config_with_threshold() {
        let config = GatewayConfig::with_threshold(35.5);
        assert_eq!(config.threshold, 35.5);
        assert_eq!(config.window_capacity, 30);
    }

    #[test]
    fn test_gateway_config_with_window_capacity() {
        let config = GatewayConfig::with_window_capacity(5);
        assert_eq!(config.window_capacity, 5);
        assert_eq!(config.threshold, 20.0);
    }

    #[test]
    fn test_validate_rejects_zero_nodes() {
        let config = GatewayConfig {
            node_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GatewayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = GatewayConfig {
            window_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GatewayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let config = GatewayConfig {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GatewayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_protocol_config_default() {
        let proto = ProtocolConfig::default();
        assert_eq!(proto.report_tag, "SENSOR_INFO");
        assert_eq!(proto.action_tag, "VALVE");
    }

    #[test]
    fn test_protocol_config_with_report_tag() {
        let proto = ProtocolConfig::with_report_tag("SENSOR_VALUE");
        assert_eq!(proto.report_tag, "SENSOR_VALUE");
        assert_eq!(proto.action_tag, "VALVE");
    }
}
