// Flowgate - Telemetry-to-actuation gateway
// Copyright (c) 2025 Flowgate Project
//
// Licensed under AGPL-3.0. See LICENSE file for details.

//! Wire protocol: message types, parsing, and response encoding
//!
//! Inbound frames are whitespace-delimited token lists:
//!
//! ```text
//! <TAG> <major:int> <minor:int> <value:int>
//! ```
//!
//! Outbound frames carry the actuation decision:
//!
//! ```text
//! <ACTION_TAG> <major> <minor> <DECISION>
//! ```
//!
//! Parsing is a pure function of the frame text and the configured
//! vocabulary: it never touches gateway state, so parsing the same frame
//! twice yields the same result.

use std::fmt;

use crate::config::ProtocolConfig;
use crate::error::ParseError;

/// Address of a sensor/actuator endpoint
///
/// History is keyed by `major` only; `minor` distinguishes endpoints under
/// the same major id and is echoed back in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    /// Major node id (history key)
    pub major: u32,
    /// Minor node id
    pub minor: u32,
}

impl NodeAddress {
    /// Create a new node address
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A validated sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReport {
    /// Reporting endpoint
    pub addr: NodeAddress,
    /// Measured value
    pub value: i64,
}

/// Binary actuation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Window mean below the threshold
    Open,
    /// Window mean at or above the threshold
    Close,
}

/// Outcome of parsing one inbound frame
///
/// Unrecognized traffic is `Ignored` (expected, silent); a frame that claims
/// to be a report but fails validation is `Malformed` (logged, dropped).
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFrame {
    /// A well-formed sensor report
    Report(SensorReport),
    /// Unrecognized tag or too few tokens; not actionable
    Ignored,
    /// Recognized tag but invalid field content
    Malformed(ParseError),
}

/// Stateless codec for the configured wire vocabulary
#[derive(Debug, Clone)]
pub struct Codec {
    config: ProtocolConfig,
}

impl Codec {
    /// Create a codec for the given vocabulary
    pub fn new(config: ProtocolConfig) -> Self {
        Self { config }
    }

    /// Parse one inbound frame
    pub fn parse(&self, frame: &str) -> ParsedFrame {
        let tokens: Vec<&str> = frame.split_whitespace().collect();

        if tokens.len() < 4 || tokens[0] != self.config.report_tag {
            return ParsedFrame::Ignored;
        }

        let major = match parse_field("major", tokens[1]) {
            Ok(v) => v,
            Err(e) => return ParsedFrame::Malformed(e),
        };
        let minor = match parse_field("minor", tokens[2]) {
            Ok(v) => v,
            Err(e) => return ParsedFrame::Malformed(e),
        };
        let value = match tokens[3].parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                return ParsedFrame::Malformed(ParseError::NotInteger {
                    field: "value",
                    token: tokens[3].to_string(),
                })
            }
        };

        ParsedFrame::Report(SensorReport {
            addr: NodeAddress::new(major, minor),
            value,
        })
    }

    /// Encode an actuation response frame (without the trailing newline)
    ///
    /// Field order and the single-space delimiter are fixed by the downstream
    /// actuator parser.
    pub fn encode_response(&self, addr: NodeAddress, decision: Decision) -> String {
        let token = match decision {
            Decision::Open => &self.config.open_token,
            Decision::Close => &self.config.close_token,
        };
        format!(
            "{} {} {} {}",
            self.config.action_tag, addr.major, addr.minor, token
        )
    }

    /// Get the configured vocabulary
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }
}

fn parse_field(field: &'static str, token: &str) -> Result<u32, ParseError> {
    token.parse::<u32>().map_err(|_| ParseError::NotInteger {
        field,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> Codec {
        Codec::new(ProtocolConfig::default())
    }

    #[test]
    fn test_parse_valid_report() {
        let parsed = codec().parse("SENSOR_INFO 3 0 10");
        assert_eq!(
            parsed,
            ParsedFrame::Report(SensorReport {
                addr: NodeAddress::new(3, 0),
                value: 10,
            })
        );
    }

    #[test]
    fn test_parse_negative_measurement() {
        let parsed = codec().parse("SENSOR_INFO 7 2 -15");
        match parsed {
            ParsedFrame::Report(report) => assert_eq!(report.value, -15),
            other => panic!("expected report, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_tag_ignored() {
        assert_eq!(codec().parse("PING 1 2 3"), ParsedFrame::Ignored);
    }

    #[test]
    fn test_parse_short_frame_ignored() {
        assert_eq!(codec().parse("SENSOR_INFO 3 0"), ParsedFrame::Ignored);
        assert_eq!(codec().parse(""), ParsedFrame::Ignored);
    }

    #[test]
    fn test_parse_non_integer_value_malformed() {
        let parsed = codec().parse("SENSOR_INFO 3 0 abc");
        assert_eq!(
            parsed,
            ParsedFrame::Malformed(ParseError::NotInteger {
                field: "value",
                token: "abc".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_non_integer_address_malformed() {
        let parsed = codec().parse("SENSOR_INFO x 0 10");
        assert!(matches!(parsed, ParsedFrame::Malformed(_)));
    }

    #[test]
    fn test_parse_is_pure() {
        let c = codec();
        let frame = "SENSOR_INFO 5 1 42";
        assert_eq!(c.parse(frame), c.parse(frame));
    }

    #[test]
    fn test_parse_extra_tokens_tolerated() {
        // Fields are positional; trailing tokens beyond the fourth are
        // ignored.
        let parsed = codec().parse("SENSOR_INFO 3 0 10 extra");
        assert!(matches!(parsed, ParsedFrame::Report(_)));
    }

    #[test]
    fn test_encode_response_shape() {
        let frame = codec().encode_response(NodeAddress::new(3, 0), Decision::Open);
        assert_eq!(frame, "VALVE 3 0 OPENING_VALVE");

        let frame = codec().encode_response(NodeAddress::new(12, 7), Decision::Close);
        assert_eq!(frame, "VALVE 12 7 CLOSING_VALVE");
    }

    #[test]
    fn test_custom_vocabulary() {
        let config = ProtocolConfig {
            report_tag: "SENSOR_VALUE".to_string(),
            action_tag: "ACTION".to_string(),
            open_token: "OPEN".to_string(),
            close_token: "CLOSE".to_string(),
        };
        let codec = Codec::new(config);

        assert!(matches!(
            codec.parse("SENSOR_VALUE 3 0 10"),
            ParsedFrame::Report(_)
        ));
        assert_eq!(codec.parse("SENSOR_INFO 3 0 10"), ParsedFrame::Ignored);
        assert_eq!(
            codec.encode_response(NodeAddress::new(3, 0), Decision::Open),
            "ACTION 3 0 OPEN"
        );
    }
}
