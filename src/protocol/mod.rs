// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte transport and response decoding.
//!
//! The 8800 speaks a half-duplex ASCII protocol: one command goes out, one
//! response comes back. [`Transport`] is the seam between the chamber logic
//! and the socket, so tests can replace the socket with a scripted fake.
//!
//! - [`TcpTransport`]: the Ethernet interface of a real controller
//! - [`CommandResponse`]: a decoded, trimmed response body

mod tcp;

pub use tcp::TcpTransport;

use std::str::FromStr;

use crate::command::Mnemonic;
use crate::error::{ParseError, ProtocolError, TransportError};

/// A bidirectional byte channel to a controller.
///
/// Implementations own their timeouts: [`receive`](Transport::receive)
/// returns an empty buffer when nothing arrived in time instead of blocking
/// forever.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Writes all of `data`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the write fails or the transport is
    /// closed.
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Reads one response.
    ///
    /// Returns whatever arrived before the response ended, possibly nothing.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the read fails or the peer closed the
    /// connection.
    async fn receive(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Closes the transport. Closing twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if shutting down the socket fails.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Returns `true` until [`close`](Transport::close) is called or the
    /// peer disconnects.
    fn is_connected(&self) -> bool;
}

/// Response from a controller command.
///
/// Writes are acknowledged with `0`; queries answer with the value as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    body: String,
}

impl CommandResponse {
    /// Creates a response with the given body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Decodes the raw bytes received for `command`.
    ///
    /// Surrounding whitespace and line terminators are removed.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Malformed` for non-ASCII bytes and
    /// `ProtocolError::EmptyResponse` if nothing but whitespace arrived.
    ///
    /// # Examples
    ///
    /// ```
    /// use thermotron_lib::command::Mnemonic;
    /// use thermotron_lib::protocol::CommandResponse;
    ///
    /// let response = CommandResponse::decode(Mnemonic::Setpoint, b"21.50\r\n").unwrap();
    /// assert_eq!(response.body(), "21.50");
    /// assert!((response.as_f64().unwrap() - 21.5).abs() < 1e-9);
    ///
    /// assert!(CommandResponse::decode(Mnemonic::Setpoint, b"\r\n").is_err());
    /// ```
    pub fn decode(command: Mnemonic, bytes: &[u8]) -> Result<Self, ProtocolError> {
        if !bytes.is_ascii() {
            return Err(ProtocolError::Malformed(
                String::from_utf8_lossy(bytes).into_owned(),
            ));
        }
        let text = String::from_utf8_lossy(bytes);
        let body = text.trim();
        if body.is_empty() {
            return Err(ProtocolError::EmptyResponse {
                command: command.to_string(),
            });
        }
        Ok(Self::new(body))
    }

    /// Returns the response text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consumes the response and returns its text.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }

    /// Parses the response as a typed value.
    ///
    /// # Errors
    ///
    /// Returns the parse error of `T`.
    pub fn parse<T>(&self) -> Result<T, ParseError>
    where
        T: FromStr<Err = ParseError>,
    {
        self.body.parse()
    }

    /// Parses the response as a decimal number.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the body is not a number.
    pub fn as_f64(&self) -> Result<f64, ParseError> {
        self.body
            .parse()
            .map_err(|e: std::num::ParseFloatError| ParseError::invalid("number", e.to_string()))
    }

    /// Parses the response as an integer.
    ///
    /// Integral decimals such as `"1.0"` are accepted.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the body is not an integer.
    pub fn as_i64(&self) -> Result<i64, ParseError> {
        if let Ok(value) = self.body.parse::<i64>() {
            return Ok(value);
        }
        let value = self.as_f64()?;
        if value.fract() == 0.0 && value.abs() < 9.0e15 {
            #[allow(clippy::cast_possible_truncation)]
            let value = value as i64;
            Ok(value)
        } else {
            Err(ParseError::invalid(
                "integer",
                format!("{} is not an integer", self.body),
            ))
        }
    }
}

impl std::fmt::Display for CommandResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_trims_terminators() {
        let response = CommandResponse::decode(Mnemonic::Options, b"  019\r\n").unwrap();
        assert_eq!(response.body(), "019");
        assert_eq!(response.as_i64().unwrap(), 19);
    }

    #[test]
    fn decode_empty_is_protocol_error() {
        let err = CommandResponse::decode(Mnemonic::StopCode, b"").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::EmptyResponse {
                command: "SCOD".to_string()
            }
        );
    }

    #[test]
    fn decode_rejects_non_ascii() {
        let err = CommandResponse::decode(Mnemonic::ChannelName, &[0x41, 0xff]).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn as_f64_decimal() {
        let response = CommandResponse::new("-12.25");
        assert!((response.as_f64().unwrap() + 12.25).abs() < f64::EPSILON);
    }

    #[test]
    fn as_i64_accepts_integral_decimal() {
        assert_eq!(CommandResponse::new("1.0").as_i64().unwrap(), 1);
        assert!(CommandResponse::new("1.5").as_i64().is_err());
        assert!(CommandResponse::new("on").as_i64().is_err());
    }

    #[test]
    fn parse_typed_value() {
        let span: crate::types::TimeSpan = CommandResponse::new("00:45:10").parse().unwrap();
        assert_eq!(span.to_string(), "00:45:10");
    }
}
