// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chamber connection settings.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Configuration for one chamber controller.
///
/// A simulated configuration never touches the network; host and port are
/// then only used as a label.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use thermotron_lib::ChamberConfig;
///
/// let config = ChamberConfig::new("192.168.1.50")
///     .with_description("Chamber 3")
///     .with_response_timeout(Duration::from_millis(500));
///
/// assert_eq!(config.port(), 8888);
/// assert_eq!(config.to_string(), "192.168.1.50:Chamber 3");
///
/// let offline = ChamberConfig::simulated("bench");
/// assert!(offline.is_simulated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChamberConfig {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    simulate: bool,
    #[serde(default = "default_connect_timeout", with = "millis")]
    connect_timeout: Duration,
    #[serde(default = "default_response_timeout", with = "millis")]
    response_timeout: Duration,
    #[serde(default = "default_settle_delay", with = "millis")]
    settle_delay: Duration,
}

const fn default_port() -> u16 {
    ChamberConfig::DEFAULT_PORT
}

const fn default_connect_timeout() -> Duration {
    ChamberConfig::DEFAULT_CONNECT_TIMEOUT
}

const fn default_response_timeout() -> Duration {
    ChamberConfig::DEFAULT_RESPONSE_TIMEOUT
}

const fn default_settle_delay() -> Duration {
    ChamberConfig::DEFAULT_SETTLE_DELAY
}

impl ChamberConfig {
    /// Default port of the controller's Ethernet interface.
    pub const DEFAULT_PORT: u16 = 8888;
    /// Default connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
    /// Default wait for the first byte of a response.
    pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);
    /// Default idle gap that ends an unterminated response.
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(10);

    /// Creates a configuration for a networked controller.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            description: None,
            simulate: false,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            response_timeout: Self::DEFAULT_RESPONSE_TIMEOUT,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
        }
    }

    /// Creates a configuration for a simulated controller.
    #[must_use]
    pub fn simulated(name: impl Into<String>) -> Self {
        Self::new(name).with_simulation(true)
    }

    /// Parses a configuration from JSON.
    ///
    /// Only `host` is required; every other field falls back to its default.
    /// Durations are given in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the document is not a valid
    /// configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use thermotron_lib::ChamberConfig;
    ///
    /// let config = ChamberConfig::from_json(
    ///     r#"{"host": "10.0.0.7", "port": 9000, "response_timeout": 250}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.port(), 9000);
    /// assert_eq!(config.response_timeout(), Duration::from_millis(250));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Enables or disables simulation.
    #[must_use]
    pub fn with_simulation(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets how long to wait for the first byte of a response.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Sets the idle gap after which a response without terminator is
    /// considered complete.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the description if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the controller is simulated.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.simulate
    }

    /// Returns the connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the response timeout.
    #[must_use]
    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    /// Returns the settle delay.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ChamberConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}:{description}", self.host),
            None => f.write_str(&self.host),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChamberConfig::new("chamber-1");
        assert_eq!(config.host(), "chamber-1");
        assert_eq!(config.port(), 8888);
        assert_eq!(config.description(), None);
        assert!(!config.is_simulated());
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
        assert_eq!(config.settle_delay(), Duration::from_millis(10));
        assert_eq!(config.address(), "chamber-1:8888");
    }

    #[test]
    fn display_without_description() {
        assert_eq!(ChamberConfig::new("10.1.1.4").to_string(), "10.1.1.4");
    }

    #[test]
    fn builder_chain() {
        let config = ChamberConfig::new("lab")
            .with_port(9000)
            .with_description("Humidity chamber")
            .with_connect_timeout(Duration::from_secs(3))
            .with_settle_delay(Duration::from_millis(50));
        assert_eq!(config.address(), "lab:9000");
        assert_eq!(config.to_string(), "lab:Humidity chamber");
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.settle_delay(), Duration::from_millis(50));
    }

    #[test]
    fn json_minimal() {
        let config = ChamberConfig::from_json(r#"{"host": "bench", "simulate": true}"#).unwrap();
        assert_eq!(config, ChamberConfig::simulated("bench"));
    }

    #[test]
    fn json_round_trip_keeps_durations() {
        let config = ChamberConfig::new("lab")
            .with_description("C2")
            .with_response_timeout(Duration::from_millis(750));
        let json = config.to_json().unwrap();
        assert!(json.contains("\"response_timeout\": 750"));
        assert_eq!(ChamberConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn json_missing_host_fails() {
        let err = ChamberConfig::from_json(r#"{"port": 1}"#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }
}
