// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel and group addressing for 8800 commands.
//!
//! Every channel-addressed mnemonic accepts its own range of channel numbers.
//! The ranges are checked when a [`Channel`] is built, so a command holding
//! a `Channel` can always be sent.

use std::fmt;

use crate::error::ValueError;

/// The inclusive range of channel numbers a command accepts.
///
/// # Examples
///
/// ```
/// use thermotron_lib::types::ChannelRange;
///
/// assert!(ChannelRange::CONTROL.contains(4));
/// assert!(!ChannelRange::CONTROL.contains(5));
/// assert!(ChannelRange::PROCESS.contains(48));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelRange {
    min: u8,
    max: u8,
}

impl ChannelRange {
    /// Controlled channels: setpoint, deviation, manual ramp, final value.
    pub const CONTROL: Self = Self { min: 1, max: 4 };

    /// Process-variable channels: alarm status, throttle, channel configuration.
    pub const MONITOR: Self = Self { min: 1, max: 8 };

    /// Channels carrying an assigned name (process variables and monitors).
    pub const NAMED: Self = Self { min: 1, max: 28 };

    /// Every channel readable through `PVAR`.
    pub const PROCESS: Self = Self { min: 1, max: 48 };

    /// Returns the lowest accepted channel.
    #[must_use]
    pub const fn min(&self) -> u8 {
        self.min
    }

    /// Returns the highest accepted channel.
    #[must_use]
    pub const fn max(&self) -> u8 {
        self.max
    }

    /// Returns `true` if `channel` is accepted.
    #[must_use]
    pub const fn contains(&self, channel: u8) -> bool {
        channel >= self.min && channel <= self.max
    }

    fn check(self, value: u8) -> Result<u8, ValueError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(ValueError::OutOfRange {
                min: u16::from(self.min),
                max: u16::from(self.max),
                actual: u16::from(value),
            })
        }
    }
}

/// A channel number validated against a [`ChannelRange`].
///
/// # Examples
///
/// ```
/// use thermotron_lib::types::{Channel, ChannelRange};
///
/// let ch = Channel::new(2, ChannelRange::CONTROL).unwrap();
/// assert_eq!(ch.value(), 2);
///
/// assert!(Channel::new(0, ChannelRange::CONTROL).is_err());
/// assert!(Channel::new(9, ChannelRange::MONITOR).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(u8);

impl Channel {
    /// Creates a channel after checking it against `range`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the channel is not in `range`.
    pub fn new(channel: u8, range: ChannelRange) -> Result<Self, ValueError> {
        range.check(channel).map(Self)
    }

    /// Returns the channel number.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An auxiliary output group.
///
/// Group 1 drives auxiliaries 1-8, group 2 drives auxiliaries 9-16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxGroup {
    /// Auxiliaries 1 through 8.
    Low,
    /// Auxiliaries 9 through 16.
    High,
}

impl AuxGroup {
    /// Creates a group from its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` unless `group` is 1 or 2.
    pub fn new(group: u8) -> Result<Self, ValueError> {
        match group {
            1 => Ok(Self::Low),
            2 => Ok(Self::High),
            _ => Err(ValueError::OutOfRange {
                min: 1,
                max: 2,
                actual: u16::from(group),
            }),
        }
    }

    /// Returns the group number used on the wire.
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::High => 2,
        }
    }

    /// Returns the first auxiliary output of this group.
    #[must_use]
    pub const fn first_output(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::High => 9,
        }
    }
}

/// A controller parameter group (1-4).
///
/// # Examples
///
/// ```
/// use thermotron_lib::types::ParameterGroup;
///
/// assert_eq!(ParameterGroup::new(3).unwrap().value(), 3);
/// assert!(ParameterGroup::new(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterGroup(u8);

impl ParameterGroup {
    /// Parameter group 1.
    pub const FIRST: Self = Self(1);

    /// Highest parameter group number.
    pub const MAX: u8 = 4;

    /// Creates a parameter group.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` unless `group` is in 1-4.
    pub fn new(group: u8) -> Result<Self, ValueError> {
        if (1..=Self::MAX).contains(&group) {
            Ok(Self(group))
        } else {
            Err(ValueError::OutOfRange {
                min: 1,
                max: u16::from(Self::MAX),
                actual: u16::from(group),
            })
        }
    }

    /// Returns the group number.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ParameterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_range_bounds() {
        assert!(Channel::new(0, ChannelRange::CONTROL).is_err());
        for ch in 1..=4 {
            assert_eq!(Channel::new(ch, ChannelRange::CONTROL).unwrap().value(), ch);
        }
        assert!(Channel::new(5, ChannelRange::CONTROL).is_err());
    }

    #[test]
    fn out_of_range_reports_bounds() {
        let err = Channel::new(29, ChannelRange::NAMED).unwrap_err();
        assert_eq!(
            err,
            ValueError::OutOfRange {
                min: 1,
                max: 28,
                actual: 29,
            }
        );
    }

    #[test]
    fn process_range_covers_system_monitors() {
        assert!(Channel::new(48, ChannelRange::PROCESS).is_ok());
        assert!(Channel::new(49, ChannelRange::PROCESS).is_err());
    }

    #[test]
    fn aux_group_numbers() {
        assert_eq!(AuxGroup::new(1).unwrap(), AuxGroup::Low);
        assert_eq!(AuxGroup::new(2).unwrap().first_output(), 9);
        assert!(AuxGroup::new(0).is_err());
        assert!(AuxGroup::new(3).is_err());
    }

    #[test]
    fn parameter_group_bounds() {
        assert!(ParameterGroup::new(0).is_err());
        assert_eq!(ParameterGroup::new(4).unwrap().to_string(), "4");
    }
}
