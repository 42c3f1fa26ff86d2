// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stop code response parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::response::parse_code;

/// Cause of the most recent transition to stop, as reported by `SCOD?`.
///
/// # Examples
///
/// ```
/// use thermotron_lib::response::StopCode;
///
/// let code: StopCode = "1".parse().unwrap();
/// assert!(code.is_running());
///
/// let code: StopCode = "3".parse().unwrap();
/// assert_eq!(code, StopCode::EndOfTest);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopCode {
    /// Cold boot power up; controller memory was initialized.
    ColdBoot,
    /// Currently running, not in stop.
    Running,
    /// The stop key was pressed.
    StopKey,
    /// The program or test ended.
    EndOfTest,
    /// An input defined as stop was activated.
    ExternalInput,
    /// The controller received `STOP` over the computer interface.
    ComputerInterface,
    /// A thermocouple or analog input is open.
    OpenInput,
    /// A process alarm setting was exceeded.
    ProcessAlarm,
    /// The system monitor tripped.
    SystemMonitorTrip,
    /// Power fail recovery was configured to stop.
    PowerFailRecovery,
    /// The Therm-Alarm tripped.
    ThermAlarmTrip,
}

impl StopCode {
    /// Returns the numeric code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` if the controller is not stopped.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns a short description of the stop cause.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ColdBoot => "cold boot power up",
            Self::Running => "running",
            Self::StopKey => "stop key pressed",
            Self::EndOfTest => "end of test",
            Self::ExternalInput => "external input",
            Self::ComputerInterface => "computer interface",
            Self::OpenInput => "open input",
            Self::ProcessAlarm => "process alarm",
            Self::SystemMonitorTrip => "system monitor trip",
            Self::PowerFailRecovery => "power fail recovery",
            Self::ThermAlarmTrip => "Therm-Alarm trip",
        }
    }
}

impl TryFrom<u8> for StopCode {
    type Error = ParseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::ColdBoot,
            1 => Self::Running,
            2 => Self::StopKey,
            3 => Self::EndOfTest,
            4 => Self::ExternalInput,
            5 => Self::ComputerInterface,
            6 => Self::OpenInput,
            7 => Self::ProcessAlarm,
            8 => Self::SystemMonitorTrip,
            9 => Self::PowerFailRecovery,
            10 => Self::ThermAlarmTrip,
            other => {
                return Err(ParseError::invalid(
                    "stop code",
                    format!("unknown code {other}"),
                ));
            }
        })
    }
}

impl FromStr for StopCode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(parse_code("stop code", s)?)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_codes_round_trip() {
        for code in 0..=10u8 {
            assert_eq!(StopCode::try_from(code).unwrap().code(), code);
        }
    }

    #[test]
    fn unknown_code() {
        assert!(StopCode::try_from(11).is_err());
        assert!("stopped".parse::<StopCode>().is_err());
    }

    #[test]
    fn only_running_is_running() {
        assert!(StopCode::Running.is_running());
        assert!(!StopCode::ComputerInterface.is_running());
        assert_eq!(StopCode::ComputerInterface.to_string(), "computer interface");
    }
}
