// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run mode, status and running-interval commands.

use crate::command::{Command, Form, Mnemonic, Param, Request};
use crate::types::{ParameterGroup, TimeSpan};

/// Changes the controller run mode.
///
/// # Examples
///
/// ```
/// use thermotron_lib::command::{Command, ModeCommand};
///
/// assert_eq!(ModeCommand::Hold.to_wire(), "HOLD\r");
/// assert_eq!(ModeCommand::RunManual.to_wire(), "RUNM\r");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeCommand {
    /// Place a running program or test in hold.
    Hold,
    /// Return a held program or test to run mode.
    Resume,
    /// Place a stopped controller in run manual mode.
    RunManual,
    /// Stop the controller.
    Stop,
}

impl Command for ModeCommand {
    fn mnemonic(&self) -> Mnemonic {
        match self {
            Self::Hold => Mnemonic::Hold,
            Self::Resume => Mnemonic::Resume,
            Self::RunManual => Mnemonic::RunManual,
            Self::Stop => Mnemonic::Stop,
        }
    }

    fn form(&self) -> Form {
        Form::Write
    }
}

/// A controller-wide read-only value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Cause of the last transition to stop (`SCOD`).
    StopCode,
    /// Channel on and configured bits (`CHST`).
    ChannelStatus,
    /// Device identification (`IDEN`).
    Identify,
    /// Display software version (`VRSN`).
    Version,
}

/// Reads a controller-wide status value.
///
/// ```
/// use thermotron_lib::command::{Command, StatusKind, StatusQuery};
///
/// assert_eq!(StatusQuery(StatusKind::StopCode).to_wire(), "SCOD?\r");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusQuery(pub StatusKind);

impl Command for StatusQuery {
    fn mnemonic(&self) -> Mnemonic {
        match self.0 {
            StatusKind::StopCode => Mnemonic::StopCode,
            StatusKind::ChannelStatus => Mnemonic::ChannelStatus,
            StatusKind::Identify => Mnemonic::Identify,
            StatusKind::Version => Mnemonic::Version,
        }
    }

    fn form(&self) -> Form {
        Form::Query
    }
}

/// Reads or selects the parameter group used in manual mode.
///
/// The group is sent as a parameter, not as an index: `PRMG,2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterGroupCommand(pub Request<ParameterGroup>);

impl Command for ParameterGroupCommand {
    fn mnemonic(&self) -> Mnemonic {
        Mnemonic::ParameterGroup
    }

    fn params(&self) -> Vec<Param> {
        match self.0 {
            Request::Query => Vec::new(),
            Request::Write(group) => vec![Param::from(group.value())],
        }
    }

    fn form(&self) -> Form {
        self.0.form()
    }
}

/// Reads or edits the loops left of the current loop.
///
/// ```
/// use thermotron_lib::command::{Command, LoopsLeftCommand, Request};
///
/// assert_eq!(LoopsLeftCommand(Request::Write(5)).to_wire(), "LLFT5\r");
/// assert_eq!(LoopsLeftCommand(Request::Query).to_wire(), "LLFT?\r");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopsLeftCommand(pub Request<u16>);

impl Command for LoopsLeftCommand {
    fn mnemonic(&self) -> Mnemonic {
        Mnemonic::LoopsLeft
    }

    fn index(&self) -> Option<String> {
        self.0.value().map(ToString::to_string)
    }

    fn form(&self) -> Form {
        self.0.form()
    }
}

/// Reads or edits the time left in the current interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeLeftCommand(pub Request<TimeSpan>);

impl Command for TimeLeftCommand {
    fn mnemonic(&self) -> Mnemonic {
        Mnemonic::TimeLeft
    }

    fn index(&self) -> Option<String> {
        self.0.value().map(ToString::to_string)
    }

    fn form(&self) -> Form {
        self.0.form()
    }
}
