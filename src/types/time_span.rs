// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hh:mm:ss` durations.
//!
//! The 8800 reports and accepts interval durations and the remaining time of
//! the current interval as `"hh:mm:ss"`, where hours are not limited to 23.
//!
//! ```
//! use std::time::Duration;
//! use thermotron_lib::types::TimeSpan;
//!
//! let span: TimeSpan = "01:30:00".parse().unwrap();
//! assert_eq!(span.as_duration(), Duration::from_secs(5400));
//! assert_eq!(span.to_string(), "01:30:00");
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ParseError, ValueError};

/// A whole-second duration rendered as `hh:mm:ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimeSpan {
    hours: u16,
    minutes: u8,
    seconds: u8,
}

impl TimeSpan {
    /// Longest span the controller accepts.
    pub const MAX_HOURS: u16 = 9999;

    /// Creates a span from its parts.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if minutes or seconds exceed 59, or
    /// hours exceed [`Self::MAX_HOURS`].
    pub fn new(hours: u16, minutes: u8, seconds: u8) -> Result<Self, ValueError> {
        if hours > Self::MAX_HOURS {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: Self::MAX_HOURS,
                actual: hours,
            });
        }
        for part in [minutes, seconds] {
            if part > 59 {
                return Err(ValueError::OutOfRange {
                    min: 0,
                    max: 59,
                    actual: u16::from(part),
                });
            }
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Creates a span from a [`Duration`], dropping sub-second precision.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the duration is longer than
    /// [`Self::MAX_HOURS`] hours.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_duration(duration: Duration) -> Result<Self, ValueError> {
        let total = duration.as_secs();
        let hours = total / 3600;
        if hours > u64::from(Self::MAX_HOURS) {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: Self::MAX_HOURS,
                actual: u16::MAX,
            });
        }
        // Safe: hours checked above, minutes and seconds are below 60
        Self::new(hours as u16, ((total % 3600) / 60) as u8, (total % 60) as u8)
    }

    /// Returns the span as a [`Duration`].
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(
            u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds),
        )
    }

    /// Returns the hours part.
    #[must_use]
    pub const fn hours(&self) -> u16 {
        self.hours
    }

    /// Returns the minutes part.
    #[must_use]
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Returns the seconds part.
    #[must_use]
    pub const fn seconds(&self) -> u8 {
        self.seconds
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl FromStr for TimeSpan {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(ParseError::invalid(
                "time span",
                format!("expected hh:mm:ss, got: {s}"),
            ));
        }

        let hours: u16 = parts[0]
            .parse()
            .map_err(|_| ParseError::invalid("time span", format!("invalid hours: {}", parts[0])))?;
        let minutes: u8 = parts[1].parse().map_err(|_| {
            ParseError::invalid("time span", format!("invalid minutes: {}", parts[1]))
        })?;
        let seconds: u8 = parts[2].parse().map_err(|_| {
            ParseError::invalid("time span", format!("invalid seconds: {}", parts[2]))
        })?;

        Self::new(hours, minutes, seconds).map_err(|e| ParseError::invalid("time span", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let span: TimeSpan = "12:05:09".parse().unwrap();
        assert_eq!(span.hours(), 12);
        assert_eq!(span.minutes(), 5);
        assert_eq!(span.seconds(), 9);
        assert_eq!(span.to_string(), "12:05:09");
    }

    #[test]
    fn hours_beyond_a_day() {
        let span: TimeSpan = "72:00:00".parse().unwrap();
        assert_eq!(span.as_duration(), Duration::from_secs(72 * 3600));
    }

    #[test]
    fn parse_with_whitespace() {
        let span: TimeSpan = " 00:00:05\r\n".parse().unwrap();
        assert_eq!(span.as_duration(), Duration::from_secs(5));
    }

    #[test]
    fn minutes_out_of_range() {
        let err = "01:60:00".parse::<TimeSpan>().unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn wrong_shape() {
        let err = "01:30".parse::<TimeSpan>().unwrap_err();
        assert!(err.to_string().contains("expected hh:mm:ss"));
        assert!("aa:00:00".parse::<TimeSpan>().is_err());
    }

    #[test]
    fn from_duration_splits_parts() {
        let span = TimeSpan::from_duration(Duration::from_secs(3 * 3600 + 61)).unwrap();
        assert_eq!(span.to_string(), "03:01:01");
        assert!(TimeSpan::from_duration(Duration::from_secs(10_000 * 3600)).is_err());
    }
}
