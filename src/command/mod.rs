// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 8800 command definitions.
//!
//! This module provides typed representations of the controller's ASCII
//! commands. Every command type validates its arguments when it is built,
//! so encoding never fails.
//!
//! # Available Commands
//!
//! | Command Type | Mnemonics | Purpose |
//! |-------------|-----------|---------|
//! | [`ControlCommand`] | SETP, DEVN, MRMP, FVAL | Read or load control values of channels 1-4 |
//! | [`MonitorQuery`] | ALRM, THTL, CCNF, CNAM, PVAR | Read per-channel monitor values |
//! | [`StatusQuery`] | SCOD, CHST, IDEN, VRSN | Read controller-wide status |
//! | [`ModeCommand`] | HOLD, RESM, RUNM, STOP | Change the run mode |
//! | [`AuxCommand`] | AUXE | Read or set an auxiliary output group |
//! | [`LightCommand`] | LGHT | Read or switch the chamber light |
//! | [`OptionsCommand`] | OPTN | Read or write the options register |
//! | [`ParameterGroupCommand`] | PRMG | Read or select the parameter group |
//! | [`LoopsLeftCommand`] | LLFT | Read or edit the loop counter |
//! | [`TimeLeftCommand`] | TLFT | Read or edit the interval time left |
//! | [`IntervalCommand`] | INTV | Read or load a program interval |
//! | [`ProgramCommand`] | PROG | Select or create a program |
//!
//! # Command Structure
//!
//! Each command consists of:
//! - A four letter mnemonic (e.g. `SETP`)
//! - An optional index written directly after it (e.g. `SETP2`)
//! - Zero or more comma separated parameters (e.g. `SETP2,21.5`)
//! - A trailing `?` for queries
//! - A carriage return terminator
//!
//! # Examples
//!
//! ```
//! use thermotron_lib::command::{Command, ControlCommand, ControlVariable, Request};
//!
//! let write = ControlCommand::new(ControlVariable::Setpoint, 2, Request::Write(21.5)).unwrap();
//! assert_eq!(write.to_wire(), "SETP2,21.5\r");
//!
//! let query = ControlCommand::new(ControlVariable::Setpoint, 2, Request::Query).unwrap();
//! assert_eq!(query.to_wire(), "SETP2?\r");
//!
//! // Channel 5 is not a control channel.
//! assert!(ControlCommand::new(ControlVariable::Setpoint, 5, Request::Query).is_err());
//! ```

mod channel;
mod outputs;
mod program;
mod run;

pub use channel::{ControlCommand, ControlVariable, MonitorKind, MonitorQuery};
pub use outputs::{AuxCommand, LightCommand, OptionsCommand};
pub use program::{IntervalCommand, IntervalRequest, ProgramCommand, ProgramId, ProgramRequest};
pub use run::{
    LoopsLeftCommand, ModeCommand, ParameterGroupCommand, StatusKind, StatusQuery,
    TimeLeftCommand,
};

use std::fmt;

/// Terminator appended to every command.
pub const TERMINATOR: char = '\r';

/// The four letter code identifying a controller register or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    /// `ALRM`: deviation alarm status.
    Alarm,
    /// `AUXE`: auxiliary output group.
    AuxGroup,
    /// `CCNF`: channel configuration.
    ChannelConfig,
    /// `CHST`: channel on and configured status.
    ChannelStatus,
    /// `CNAM`: channel name.
    ChannelName,
    /// `DEVN`: deviation.
    Deviation,
    /// `FVAL`: interval final value.
    FinalValue,
    /// `HOLD`: hold the running program.
    Hold,
    /// `IDEN`: device identification.
    Identify,
    /// `INTV`: program interval.
    Interval,
    /// `LGHT`: chamber light.
    Light,
    /// `LLFT`: loops left.
    LoopsLeft,
    /// `MRMP`: manual ramp.
    ManualRamp,
    /// `OPTN`: options register.
    Options,
    /// `PRMG`: parameter group.
    ParameterGroup,
    /// `PROG`: program name and interval count.
    Program,
    /// `PVAR`: process variable.
    ProcessVariable,
    /// `RESM`: resume from hold.
    Resume,
    /// `RUNM`: run manual mode.
    RunManual,
    /// `SCOD`: stop code.
    StopCode,
    /// `SETP`: setpoint.
    Setpoint,
    /// `STOP`: stop.
    Stop,
    /// `THTL`: throttle.
    Throttle,
    /// `TLFT`: interval time left.
    TimeLeft,
    /// `VRSN`: display software version.
    Version,
}

impl Mnemonic {
    /// Returns the wire form of the mnemonic.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alarm => "ALRM",
            Self::AuxGroup => "AUXE",
            Self::ChannelConfig => "CCNF",
            Self::ChannelStatus => "CHST",
            Self::ChannelName => "CNAM",
            Self::Deviation => "DEVN",
            Self::FinalValue => "FVAL",
            Self::Hold => "HOLD",
            Self::Identify => "IDEN",
            Self::Interval => "INTV",
            Self::Light => "LGHT",
            Self::LoopsLeft => "LLFT",
            Self::ManualRamp => "MRMP",
            Self::Options => "OPTN",
            Self::ParameterGroup => "PRMG",
            Self::Program => "PROG",
            Self::ProcessVariable => "PVAR",
            Self::Resume => "RESM",
            Self::RunManual => "RUNM",
            Self::StopCode => "SCOD",
            Self::Setpoint => "SETP",
            Self::Stop => "STOP",
            Self::Throttle => "THTL",
            Self::TimeLeft => "TLFT",
            Self::Version => "VRSN",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a command reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    /// Ask the controller for a value (`?` suffix).
    Query,
    /// Load a value or trigger an action.
    Write,
}

/// A single comma separated command parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Integer parameter.
    Int(i64),
    /// Decimal parameter.
    Float(f64),
    /// Text parameter, sent verbatim.
    Text(String),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<u8> for Param {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for Param {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Selects between reading a register and loading a new value into it.
///
/// # Examples
///
/// ```
/// use thermotron_lib::command::Request;
///
/// let read: Request<f64> = Request::Query;
/// assert!(read.is_query());
///
/// let write = Request::Write(30.0);
/// assert_eq!(write.value(), Some(&30.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request<T> {
    /// Read the current value.
    Query,
    /// Load a new value.
    Write(T),
}

impl<T> Request<T> {
    /// Returns `true` for [`Request::Query`].
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Query)
    }

    /// Returns the value to write, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Query => None,
            Self::Write(value) => Some(value),
        }
    }

    /// Returns the wire form of the request.
    #[must_use]
    pub const fn form(&self) -> Form {
        match self {
            Self::Query => Form::Query,
            Self::Write(_) => Form::Write,
        }
    }

    /// Converts the written value, keeping queries as they are.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Request<U>, E> {
        match self {
            Self::Query => Ok(Request::Query),
            Self::Write(value) => f(value).map(Request::Write),
        }
    }
}

/// Builds the wire string of a command.
///
/// # Examples
///
/// ```
/// use thermotron_lib::command::{encode, Form, Mnemonic, Param};
///
/// let wire = encode(Mnemonic::Setpoint, Some("2"), &[Param::Float(21.5)], Form::Write);
/// assert_eq!(wire, "SETP2,21.5\r");
///
/// assert_eq!(encode(Mnemonic::StopCode, None, &[], Form::Query), "SCOD?\r");
/// ```
#[must_use]
pub fn encode(mnemonic: Mnemonic, index: Option<&str>, params: &[Param], form: Form) -> String {
    let mut wire = String::with_capacity(16);
    wire.push_str(mnemonic.as_str());
    if let Some(index) = index {
        wire.push_str(index);
    }
    for param in params {
        wire.push(',');
        wire.push_str(&param.to_string());
    }
    if form == Form::Query {
        wire.push('?');
    }
    wire.push(TERMINATOR);
    wire
}

/// A command that can be sent to an 8800 controller.
pub trait Command {
    /// Returns the command mnemonic.
    fn mnemonic(&self) -> Mnemonic;

    /// Returns the index written right after the mnemonic, if any.
    ///
    /// Usually a channel or group number; `OPTN`, `LLFT` and `TLFT` carry
    /// their written value here.
    fn index(&self) -> Option<String> {
        None
    }

    /// Returns the comma separated parameters.
    fn params(&self) -> Vec<Param> {
        Vec::new()
    }

    /// Returns whether the command reads or writes.
    fn form(&self) -> Form;

    /// Returns the full wire string, terminator included.
    fn to_wire(&self) -> String {
        encode(
            self.mnemonic(),
            self.index().as_deref(),
            &self.params(),
            self.form(),
        )
    }
}

/// Any command of the catalog.
///
/// This is what the chamber backends dispatch on.
#[derive(Debug, Clone, PartialEq)]
pub enum ChamberCommand {
    /// Control value of channels 1-4.
    Control(ControlCommand),
    /// Per-channel monitor query.
    Monitor(MonitorQuery),
    /// Controller-wide status query.
    Status(StatusQuery),
    /// Run mode change.
    Mode(ModeCommand),
    /// Auxiliary output group.
    Aux(AuxCommand),
    /// Chamber light.
    Light(LightCommand),
    /// Options register.
    Options(OptionsCommand),
    /// Parameter group.
    ParameterGroup(ParameterGroupCommand),
    /// Loop counter.
    LoopsLeft(LoopsLeftCommand),
    /// Interval time left.
    TimeLeft(TimeLeftCommand),
    /// Program interval.
    Interval(IntervalCommand),
    /// Program selection.
    Program(ProgramCommand),
}

impl ChamberCommand {
    fn inner(&self) -> &dyn Command {
        match self {
            Self::Control(c) => c,
            Self::Monitor(c) => c,
            Self::Status(c) => c,
            Self::Mode(c) => c,
            Self::Aux(c) => c,
            Self::Light(c) => c,
            Self::Options(c) => c,
            Self::ParameterGroup(c) => c,
            Self::LoopsLeft(c) => c,
            Self::TimeLeft(c) => c,
            Self::Interval(c) => c,
            Self::Program(c) => c,
        }
    }
}

impl Command for ChamberCommand {
    fn mnemonic(&self) -> Mnemonic {
        self.inner().mnemonic()
    }

    fn index(&self) -> Option<String> {
        self.inner().index()
    }

    fn params(&self) -> Vec<Param> {
        self.inner().params()
    }

    fn form(&self) -> Form {
        self.inner().form()
    }
}

macro_rules! impl_from_command {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for ChamberCommand {
                fn from(command: $ty) -> Self {
                    Self::$variant(command)
                }
            }
        )*
    };
}

impl_from_command!(
    Control(ControlCommand),
    Monitor(MonitorQuery),
    Status(StatusQuery),
    Mode(ModeCommand),
    Aux(AuxCommand),
    Light(LightCommand),
    Options(OptionsCommand),
    ParameterGroup(ParameterGroupCommand),
    LoopsLeft(LoopsLeftCommand),
    TimeLeft(TimeLeftCommand),
    Interval(IntervalCommand),
    Program(ProgramCommand),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_write_with_index() {
        let wire = encode(Mnemonic::Setpoint, Some("2"), &[Param::Float(21.5)], Form::Write);
        assert_eq!(wire, "SETP2,21.5\r");
    }

    #[test]
    fn encode_is_deterministic() {
        let a = encode(Mnemonic::Setpoint, Some("2"), &[Param::Float(21.5)], Form::Write);
        let b = encode(Mnemonic::Setpoint, Some("2"), &[Param::Float(21.5)], Form::Write);
        assert_eq!(a, b);
    }

    #[test]
    fn encode_query_without_index() {
        assert_eq!(encode(Mnemonic::Options, None, &[], Form::Query), "OPTN?\r");
    }

    #[test]
    fn encode_action() {
        assert_eq!(encode(Mnemonic::Hold, None, &[], Form::Write), "HOLD\r");
    }

    #[test]
    fn encode_params_without_index() {
        let wire = encode(Mnemonic::ParameterGroup, None, &[Param::Int(2)], Form::Write);
        assert_eq!(wire, "PRMG,2\r");
    }

    #[test]
    fn param_display() {
        assert_eq!(Param::Float(30.0).to_string(), "30");
        assert_eq!(Param::Float(-2.25).to_string(), "-2.25");
        assert_eq!(Param::from(true).to_string(), "1");
        assert_eq!(Param::Text("01:00:00".to_string()).to_string(), "01:00:00");
    }

    #[test]
    fn request_try_map() {
        let mapped: Result<Request<u8>, ()> = Request::Write(3u16).try_map(|v| Ok(v as u8));
        assert_eq!(mapped, Ok(Request::Write(3)));
        let query: Result<Request<u8>, ()> = Request::<u16>::Query.try_map(|_| Err(()));
        assert_eq!(query, Ok(Request::Query));
    }

    #[test]
    fn mnemonics_are_four_letters() {
        let all = [
            Mnemonic::Alarm,
            Mnemonic::AuxGroup,
            Mnemonic::ChannelConfig,
            Mnemonic::ChannelStatus,
            Mnemonic::ChannelName,
            Mnemonic::Deviation,
            Mnemonic::FinalValue,
            Mnemonic::Hold,
            Mnemonic::Identify,
            Mnemonic::Interval,
            Mnemonic::Light,
            Mnemonic::LoopsLeft,
            Mnemonic::ManualRamp,
            Mnemonic::Options,
            Mnemonic::ParameterGroup,
            Mnemonic::Program,
            Mnemonic::ProcessVariable,
            Mnemonic::Resume,
            Mnemonic::RunManual,
            Mnemonic::StopCode,
            Mnemonic::Setpoint,
            Mnemonic::Stop,
            Mnemonic::Throttle,
            Mnemonic::TimeLeft,
            Mnemonic::Version,
        ];
        for m in all {
            assert_eq!(m.as_str().len(), 4, "{m:?}");
            assert!(m.as_str().chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn chamber_command_delegates() {
        let cmd: ChamberCommand = ModeCommand::RunManual.into();
        assert_eq!(cmd.mnemonic(), Mnemonic::RunManual);
        assert_eq!(cmd.to_wire(), "RUNM\r");
    }
}
