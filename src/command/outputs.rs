// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auxiliary outputs, chamber light and options register.

use crate::command::{Command, Form, Mnemonic, Param, Request};
use crate::error::ValueError;
use crate::types::{AuxGroup, AuxMask, ChamberOptions};

/// Reads or sets the outputs of an auxiliary group.
///
/// Writing changes the auxiliaries for run manual mode and edit from hold
/// operations.
///
/// # Examples
///
/// ```
/// use thermotron_lib::command::{AuxCommand, Command, Request};
/// use thermotron_lib::types::AuxMask;
///
/// let set = AuxCommand::new(1, Request::Write(AuxMask::parse("10110000").unwrap())).unwrap();
/// assert_eq!(set.to_wire(), "AUXE1,13\r");
///
/// let get = AuxCommand::new(2, Request::Query).unwrap();
/// assert_eq!(get.to_wire(), "AUXE2?\r");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuxCommand {
    group: AuxGroup,
    request: Request<AuxMask>,
}

impl AuxCommand {
    /// Creates an auxiliary group command.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` unless `group` is 1 or 2.
    pub fn new(group: u8, request: Request<AuxMask>) -> Result<Self, ValueError> {
        Ok(Self {
            group: AuxGroup::new(group)?,
            request,
        })
    }

    /// Returns the group.
    #[must_use]
    pub const fn group(&self) -> AuxGroup {
        self.group
    }

    /// Returns the request.
    #[must_use]
    pub const fn request(&self) -> Request<AuxMask> {
        self.request
    }
}

impl Command for AuxCommand {
    fn mnemonic(&self) -> Mnemonic {
        Mnemonic::AuxGroup
    }

    fn index(&self) -> Option<String> {
        Some(self.group.value().to_string())
    }

    fn params(&self) -> Vec<Param> {
        match self.request {
            Request::Query => Vec::new(),
            Request::Write(mask) => vec![Param::from(mask.bits())],
        }
    }

    fn form(&self) -> Form {
        self.request.form()
    }
}

/// Reads or switches the chamber light.
///
/// ```
/// use thermotron_lib::command::{Command, LightCommand};
///
/// assert_eq!(LightCommand::Set(true).to_wire(), "LGHT1\r");
/// assert_eq!(LightCommand::Query.to_wire(), "LGHT?\r");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightCommand {
    /// Read the light status.
    Query,
    /// Switch the light on (`true`) or off.
    Set(bool),
}

impl Command for LightCommand {
    fn mnemonic(&self) -> Mnemonic {
        Mnemonic::Light
    }

    fn index(&self) -> Option<String> {
        match self {
            Self::Query => None,
            Self::Set(on) => Some(u8::from(*on).to_string()),
        }
    }

    fn form(&self) -> Form {
        match self {
            Self::Query => Form::Query,
            Self::Set(_) => Form::Write,
        }
    }
}

/// Reads or writes the options register.
///
/// In manual mode a write temporarily changes the active options. The
/// value is written zero-padded to three digits.
///
/// ```
/// use thermotron_lib::command::{Command, OptionsCommand, Request};
/// use thermotron_lib::types::ChamberOptions;
///
/// let cmd = OptionsCommand(Request::Write(ChamberOptions::new(19).unwrap()));
/// assert_eq!(cmd.to_wire(), "OPTN019\r");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionsCommand(pub Request<ChamberOptions>);

impl Command for OptionsCommand {
    fn mnemonic(&self) -> Mnemonic {
        Mnemonic::Options
    }

    fn index(&self) -> Option<String> {
        self.0.value().map(ChamberOptions::to_wire)
    }

    fn form(&self) -> Form {
        self.0.form()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aux_group_out_of_range() {
        assert!(AuxCommand::new(0, Request::Query).is_err());
        assert!(AuxCommand::new(3, Request::Write(AuxMask::ALL_OFF)).is_err());
    }

    #[test]
    fn light_off() {
        assert_eq!(LightCommand::Set(false).to_wire(), "LGHT0\r");
    }

    #[test]
    fn options_query_and_write() {
        assert_eq!(OptionsCommand(Request::Query).to_wire(), "OPTN?\r");
        let cmd = OptionsCommand(Request::Write(ChamberOptions::PRODUCT_TEMPERATURE_CONTROL));
        assert_eq!(cmd.to_wire(), "OPTN001\r");
    }
}
