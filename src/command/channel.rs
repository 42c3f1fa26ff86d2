// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel-addressed commands.

use crate::command::{Command, Form, Mnemonic, Param, Request};
use crate::error::ValueError;
use crate::types::{Channel, ChannelRange};

/// A value loaded per control channel (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlVariable {
    /// Set point, in the channel's selected units (`SETP`).
    Setpoint,
    /// Deviation limit (`DEVN`).
    Deviation,
    /// Manual ramp in units per minute (`MRMP`).
    ManualRamp,
    /// Final value of the current interval (`FVAL`).
    FinalValue,
}

impl ControlVariable {
    /// Returns the mnemonic of this variable.
    #[must_use]
    pub const fn mnemonic(&self) -> Mnemonic {
        match self {
            Self::Setpoint => Mnemonic::Setpoint,
            Self::Deviation => Mnemonic::Deviation,
            Self::ManualRamp => Mnemonic::ManualRamp,
            Self::FinalValue => Mnemonic::FinalValue,
        }
    }

    const fn field(self) -> &'static str {
        match self {
            Self::Setpoint => "setpoint",
            Self::Deviation => "deviation",
            Self::ManualRamp => "manual ramp",
            Self::FinalValue => "final value",
        }
    }
}

/// Reads or loads a control value of channels 1-4.
///
/// # Examples
///
/// ```
/// use thermotron_lib::command::{Command, ControlCommand, ControlVariable, Request};
///
/// let ramp = ControlCommand::new(ControlVariable::ManualRamp, 1, Request::Write(3.0)).unwrap();
/// assert_eq!(ramp.to_wire(), "MRMP1,3\r");
///
/// let dev = ControlCommand::new(ControlVariable::Deviation, 4, Request::Query).unwrap();
/// assert_eq!(dev.to_wire(), "DEVN4?\r");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlCommand {
    variable: ControlVariable,
    channel: Channel,
    request: Request<f64>,
}

impl ControlCommand {
    /// Creates a control command.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for channels outside 1-4, or
    /// `ValueError::NotFinite` when writing NaN or an infinity.
    pub fn new(
        variable: ControlVariable,
        channel: u8,
        request: Request<f64>,
    ) -> Result<Self, ValueError> {
        let channel = Channel::new(channel, ChannelRange::CONTROL)?;
        if let Request::Write(value) = request
            && !value.is_finite()
        {
            return Err(ValueError::NotFinite {
                field: variable.field(),
            });
        }
        Ok(Self {
            variable,
            channel,
            request,
        })
    }

    /// Returns the controlled variable.
    #[must_use]
    pub const fn variable(&self) -> ControlVariable {
        self.variable
    }

    /// Returns the channel.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the request.
    #[must_use]
    pub const fn request(&self) -> Request<f64> {
        self.request
    }
}

impl Command for ControlCommand {
    fn mnemonic(&self) -> Mnemonic {
        self.variable.mnemonic()
    }

    fn index(&self) -> Option<String> {
        Some(self.channel.to_string())
    }

    fn params(&self) -> Vec<Param> {
        match self.request {
            Request::Query => Vec::new(),
            Request::Write(value) => vec![Param::Float(value)],
        }
    }

    fn form(&self) -> Form {
        self.request.form()
    }
}

/// A read-only per-channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorKind {
    /// Deviation alarm status, channels 1-8 (`ALRM`).
    Alarm,
    /// Throttle percentage, channels 1-8 (`THTL`).
    Throttle,
    /// Channel type code, channels 1-8 (`CCNF`).
    ChannelConfig,
    /// Assigned channel name, channels 1-28 (`CNAM`).
    ChannelName,
    /// Current value, channels 1-48 (`PVAR`).
    ProcessVariable,
}

impl MonitorKind {
    /// Returns the mnemonic of this query.
    #[must_use]
    pub const fn mnemonic(&self) -> Mnemonic {
        match self {
            Self::Alarm => Mnemonic::Alarm,
            Self::Throttle => Mnemonic::Throttle,
            Self::ChannelConfig => Mnemonic::ChannelConfig,
            Self::ChannelName => Mnemonic::ChannelName,
            Self::ProcessVariable => Mnemonic::ProcessVariable,
        }
    }

    /// Returns the channels this query accepts.
    #[must_use]
    pub const fn range(&self) -> ChannelRange {
        match self {
            Self::Alarm | Self::Throttle | Self::ChannelConfig => ChannelRange::MONITOR,
            Self::ChannelName => ChannelRange::NAMED,
            Self::ProcessVariable => ChannelRange::PROCESS,
        }
    }
}

/// Reads a per-channel monitor value.
///
/// # Examples
///
/// ```
/// use thermotron_lib::command::{Command, MonitorKind, MonitorQuery};
///
/// let pv = MonitorQuery::new(MonitorKind::ProcessVariable, 33).unwrap();
/// assert_eq!(pv.to_wire(), "PVAR33?\r");
///
/// assert!(MonitorQuery::new(MonitorKind::Alarm, 9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorQuery {
    kind: MonitorKind,
    channel: Channel,
}

impl MonitorQuery {
    /// Creates a monitor query.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the channel is outside the range
    /// of `kind`.
    pub fn new(kind: MonitorKind, channel: u8) -> Result<Self, ValueError> {
        Ok(Self {
            kind,
            channel: Channel::new(channel, kind.range())?,
        })
    }

    /// Returns the queried value.
    #[must_use]
    pub const fn kind(&self) -> MonitorKind {
        self.kind
    }

    /// Returns the channel.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }
}

impl Command for MonitorQuery {
    fn mnemonic(&self) -> Mnemonic {
        self.kind.mnemonic()
    }

    fn index(&self) -> Option<String> {
        Some(self.channel.to_string())
    }

    fn form(&self) -> Form {
        Form::Query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setpoint_write() {
        let cmd = ControlCommand::new(ControlVariable::Setpoint, 2, Request::Write(21.5)).unwrap();
        assert_eq!(cmd.to_wire(), "SETP2,21.5\r");
    }

    #[test]
    fn final_value_query() {
        let cmd = ControlCommand::new(ControlVariable::FinalValue, 3, Request::Query).unwrap();
        assert_eq!(cmd.to_wire(), "FVAL3?\r");
    }

    #[test]
    fn control_channel_out_of_range() {
        for channel in [0, 5, 255] {
            assert!(ControlCommand::new(ControlVariable::Deviation, channel, Request::Query).is_err());
        }
    }

    #[test]
    fn control_rejects_nan() {
        let err = ControlCommand::new(ControlVariable::Setpoint, 1, Request::Write(f64::NAN))
            .unwrap_err();
        assert_eq!(err, ValueError::NotFinite { field: "setpoint" });
    }

    #[test]
    fn monitor_ranges() {
        assert!(MonitorQuery::new(MonitorKind::Throttle, 8).is_ok());
        assert!(MonitorQuery::new(MonitorKind::Throttle, 9).is_err());
        assert!(MonitorQuery::new(MonitorKind::ChannelName, 28).is_ok());
        assert!(MonitorQuery::new(MonitorKind::ChannelName, 29).is_err());
        assert!(MonitorQuery::new(MonitorKind::ProcessVariable, 0).is_err());
    }

    #[test]
    fn monitor_wire() {
        let cmd = MonitorQuery::new(MonitorKind::ChannelConfig, 2).unwrap();
        assert_eq!(cmd.to_wire(), "CCNF2?\r");
        let cmd = MonitorQuery::new(MonitorKind::Alarm, 3).unwrap();
        assert_eq!(cmd.to_wire(), "ALRM3?\r");
    }
}
