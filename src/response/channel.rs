// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-channel response parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::response::parse_code;

/// Channel type reported by `CCNF`.
///
/// # Examples
///
/// ```
/// use thermotron_lib::response::ChannelType;
///
/// let kind: ChannelType = "2".parse().unwrap();
/// assert_eq!(kind, ChannelType::Thermocouple);
/// assert!(kind.is_used());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// Channel not used.
    Unused,
    /// Relative humidity from a wet bulb/dry bulb thermocouple pair.
    WetDryBulbHumidity,
    /// Temperature from a thermocouple.
    Thermocouple,
    /// Linear channel with a programmable range, such as altitude.
    Linear,
    /// 0-100 % relative humidity from a solid-state sensor.
    SolidStateHumidity,
    /// Product temperature control channel.
    ProductTemperature,
}

impl ChannelType {
    /// Returns the numeric code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns `false` for [`ChannelType::Unused`].
    #[must_use]
    pub const fn is_used(self) -> bool {
        !matches!(self, Self::Unused)
    }
}

impl TryFrom<u8> for ChannelType {
    type Error = ParseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::Unused,
            1 => Self::WetDryBulbHumidity,
            2 => Self::Thermocouple,
            3 => Self::Linear,
            4 => Self::SolidStateHumidity,
            5 => Self::ProductTemperature,
            other => {
                return Err(ParseError::invalid(
                    "channel type",
                    format!("unknown code {other}"),
                ));
            }
        })
    }
}

impl FromStr for ChannelType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(parse_code("channel type", s)?)
    }
}

/// Which side of the deviation band a channel alarm is on (`ALRM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviationAlarm {
    /// Below the low deviation limit.
    Low,
    /// Above the high deviation limit.
    High,
}

impl FromStr for DeviationAlarm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_code("deviation alarm", s)? {
            0 => Ok(Self::Low),
            1 => Ok(Self::High),
            other => Err(ParseError::invalid(
                "deviation alarm",
                format!("unknown code {other}"),
            )),
        }
    }
}

impl fmt::Display for DeviationAlarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::High => f.write_str("high"),
        }
    }
}

/// On and configured flags of channels 1-8, as reported by `CHST`.
///
/// The low byte holds one "on" bit per channel, the high byte one
/// "configured" bit per channel.
///
/// ```
/// use thermotron_lib::response::ChannelStatus;
///
/// let status: ChannelStatus = "769".parse().unwrap(); // 0x0301
/// assert!(status.is_on(1));
/// assert!(!status.is_on(2));
/// assert!(status.is_configured(2));
/// assert!(!status.is_configured(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelStatus(u16);

impl ChannelStatus {
    /// Creates a status from the raw word.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw word.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns whether `channel` (1-8) is on. Other channels are never on.
    #[must_use]
    pub const fn is_on(self, channel: u8) -> bool {
        matches!(channel, 1..=8) && self.0 & (1 << (channel - 1)) != 0
    }

    /// Returns whether `channel` (1-8) is configured.
    #[must_use]
    pub const fn is_configured(self, channel: u8) -> bool {
        matches!(channel, 1..=8) && self.0 & (1 << (channel + 7)) != 0
    }

    /// Returns the channels that are on.
    pub fn on_channels(self) -> impl Iterator<Item = u8> {
        (1..=8).filter(move |&ch| self.is_on(ch))
    }

    /// Returns the channels that are configured.
    pub fn configured_channels(self) -> impl Iterator<Item = u8> {
        (1..=8).filter(move |&ch| self.is_configured(ch))
    }
}

impl FromStr for ChannelStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|_| ParseError::invalid("channel status", s))
    }
}

/// What a process variable channel number refers to.
///
/// `PVAR` accepts channels 1-48, but only some of them exist.
///
/// ```
/// use thermotron_lib::response::ProcessChannel;
///
/// assert_eq!(ProcessChannel::classify(2), ProcessChannel::External(2));
/// assert_eq!(ProcessChannel::classify(13), ProcessChannel::Monitor(1));
/// assert_eq!(ProcessChannel::classify(10), ProcessChannel::Undefined);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessChannel {
    /// External process variable channel 1-4.
    External(u8),
    /// Internal process variable channel 5-8.
    Internal(u8),
    /// Monitor channel 1-16 (PVAR 13-28).
    Monitor(u8),
    /// System monitor channel 1-16 (PVAR 33-48). Channels 1-4 are the
    /// temperatures of refrigeration system 1.
    SystemMonitor(u8),
    /// A channel number the controller does not assign.
    Undefined,
}

impl ProcessChannel {
    /// Classifies a `PVAR` channel number.
    #[must_use]
    pub const fn classify(channel: u8) -> Self {
        match channel {
            1..=4 => Self::External(channel),
            5..=8 => Self::Internal(channel),
            13..=28 => Self::Monitor(channel - 12),
            33..=48 => Self::SystemMonitor(channel - 32),
            _ => Self::Undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_type_codes() {
        for code in 0..=5u8 {
            assert_eq!(ChannelType::try_from(code).unwrap().code(), code);
        }
        assert!("6".parse::<ChannelType>().is_err());
        assert!(!ChannelType::Unused.is_used());
    }

    #[test]
    fn deviation_alarm() {
        assert_eq!("0".parse::<DeviationAlarm>().unwrap(), DeviationAlarm::Low);
        assert_eq!("1".parse::<DeviationAlarm>().unwrap(), DeviationAlarm::High);
        assert!("2".parse::<DeviationAlarm>().is_err());
    }

    #[test]
    fn channel_status_lists() {
        let status = ChannelStatus::new(0b0000_0111_0000_0101);
        assert_eq!(status.on_channels().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(status.configured_channels().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!status.is_on(0));
        assert!(!status.is_configured(9));
    }

    #[test]
    fn channel_status_rejects_text() {
        assert!("on".parse::<ChannelStatus>().is_err());
    }

    #[test]
    fn process_channel_gaps() {
        assert_eq!(ProcessChannel::classify(8), ProcessChannel::Internal(8));
        assert_eq!(ProcessChannel::classify(12), ProcessChannel::Undefined);
        assert_eq!(ProcessChannel::classify(28), ProcessChannel::Monitor(16));
        assert_eq!(ProcessChannel::classify(33), ProcessChannel::SystemMonitor(1));
        assert_eq!(ProcessChannel::classify(48), ProcessChannel::SystemMonitor(16));
        assert_eq!(ProcessChannel::classify(49), ProcessChannel::Undefined);
        assert_eq!(ProcessChannel::classify(0), ProcessChannel::Undefined);
    }
}
