// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `Thermotron` library.
//!
//! The hierarchy mirrors the four ways a chamber interaction can fail:
//! argument validation (before any I/O), session establishment, a broken
//! transport mid-session, and a response the controller should not have
//! sent. Response text that is well-formed but not of the expected shape
//! is reported as a [`ParseError`].

use std::io;
use std::time::Duration;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument was rejected before contacting the controller.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The controller answered with an empty or malformed response.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A response or configuration document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The session could not be established.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The transport failed while a session was open.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors related to argument validation.
///
/// These never leave the session in a bad state: nothing was sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric argument is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A floating point argument is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// The argument that was rejected.
        field: &'static str,
    },

    /// A text argument contains characters the wire format cannot carry.
    #[error("invalid {field}: {value:?}")]
    InvalidText {
        /// The argument that was rejected.
        field: &'static str,
        /// The offending text.
        value: String,
    },
}

/// Errors raised while establishing a session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The controller host name could not be resolved.
    #[error("could not resolve chamber host {host}")]
    HostNotFound {
        /// The host that failed to resolve.
        host: String,
    },

    /// The controller did not accept the connection in time.
    #[error("connection to {address} timed out after {} ms", timeout.as_millis())]
    ConnectionTimeout {
        /// The address being connected to.
        address: String,
        /// The configured connect timeout.
        timeout: Duration,
    },

    /// The controller actively refused the connection.
    #[error("connection to {address} refused")]
    ConnectionRefused {
        /// The address being connected to.
        address: String,
    },

    /// Any other socket-level failure during connect.
    #[error("connection failed: {0}")]
    Io(#[source] io::Error),
}

/// Errors raised by the transport of an open session.
///
/// After any of these the session must be closed and re-opened.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading or writing the socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The controller closed the connection.
    #[error("connection closed by peer")]
    Closed,

    /// The transport was already closed locally.
    #[error("transport is not connected")]
    NotConnected,

    /// A previous command failed at the transport level.
    #[error("session is broken, reconnect required")]
    SessionBroken,
}

/// Errors related to the content of a controller response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Nothing was received before the response timeout.
    #[error("empty response to {command}")]
    EmptyResponse {
        /// Mnemonic of the command that went unanswered.
        command: String,
    },

    /// The response contained non-ASCII bytes.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Errors related to parsing responses and configuration.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

impl ParseError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
