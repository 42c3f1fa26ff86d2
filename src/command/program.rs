// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program loading commands.
//!
//! Loading a program by value is a `PROG` command naming the program and
//! its interval count, then one `INTV0` initialization record, then one
//! `INTVn` record per interval. Reading it back follows the same order with
//! queries.

use std::fmt;

use crate::command::{Command, Form, Mnemonic, Param};
use crate::error::ValueError;
use crate::types::{ProgramInit, ProgramStep};

/// What to do with a program interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalRequest {
    /// Read interval `n` (0 reads the initialization record).
    Query(u16),
    /// Send the initialization record (interval 0).
    Initialize(ProgramInit),
    /// Send program step `index` (1 or higher).
    Step {
        /// Interval number.
        index: u16,
        /// Interval contents.
        step: ProgramStep,
    },
}

/// Reads or loads one program interval.
///
/// # Examples
///
/// ```
/// use thermotron_lib::command::{Command, IntervalCommand, IntervalRequest};
/// use thermotron_lib::types::ProgramInit;
///
/// let query = IntervalCommand::new(IntervalRequest::Query(3)).unwrap();
/// assert_eq!(query.to_wire(), "INTV3?\r");
///
/// let init = IntervalCommand::new(IntervalRequest::Initialize(
///     ProgramInit::new([23.0, 45.0, 0.0, 0.0]).with_channels(3),
/// ))
/// .unwrap();
/// assert_eq!(init.to_wire(), "INTV0,23,45,0,0,3\r");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalCommand(IntervalRequest);

impl IntervalCommand {
    /// Number of fields following the index of a step record.
    pub const STEP_FIELDS: usize = 16;

    /// Number of fields of an initialization record, index included.
    pub const INIT_FIELDS: usize = 6;

    /// Creates an interval command.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for a step with index 0, or
    /// `ValueError::NotFinite` if a record holds NaN or an infinity.
    pub fn new(request: IntervalRequest) -> Result<Self, ValueError> {
        match &request {
            IntervalRequest::Query(_) => {}
            IntervalRequest::Initialize(init) => init.validate()?,
            IntervalRequest::Step { index, step } => {
                if *index == 0 {
                    return Err(ValueError::OutOfRange {
                        min: 1,
                        max: u16::MAX,
                        actual: 0,
                    });
                }
                step.validate()?;
            }
        }
        Ok(Self(request))
    }

    /// Returns the request.
    #[must_use]
    pub const fn request(&self) -> &IntervalRequest {
        &self.0
    }

    /// Returns the interval number.
    #[must_use]
    pub const fn interval(&self) -> u16 {
        match self.0 {
            IntervalRequest::Query(index) | IntervalRequest::Step { index, .. } => index,
            IntervalRequest::Initialize(_) => 0,
        }
    }
}

impl Command for IntervalCommand {
    fn mnemonic(&self) -> Mnemonic {
        Mnemonic::Interval
    }

    fn index(&self) -> Option<String> {
        Some(self.interval().to_string())
    }

    fn params(&self) -> Vec<Param> {
        match &self.0 {
            IntervalRequest::Query(_) => Vec::new(),
            IntervalRequest::Initialize(init) => {
                let mut params: Vec<Param> =
                    init.final_values.iter().copied().map(Param::from).collect();
                params.push(Param::from(init.channels));
                params
            }
            IntervalRequest::Step { step, .. } => {
                let mut params = Vec::with_capacity(Self::STEP_FIELDS);
                params.extend(step.final_values.iter().copied().map(Param::from));
                params.extend(step.deviations.iter().copied().map(Param::from));
                params.push(Param::Text(step.duration.to_string()));
                params.push(Param::from(step.parameter_group.value()));
                params.push(Param::from(step.loops));
                params.push(Param::from(step.nested));
                params.push(Param::from(step.aux[0].bits()));
                params.push(Param::from(step.aux[1].bits()));
                params.push(Param::from(step.display_status));
                params.push(Param::from(step.options.bits()));
                params
            }
        }
    }

    fn form(&self) -> Form {
        match self.0 {
            IntervalRequest::Query(_) => Form::Query,
            _ => Form::Write,
        }
    }
}

/// Identifies a stored program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProgramId {
    /// Program selected by name.
    Name(String),
    /// Program selected by number.
    Number(u16),
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// What to do with a stored program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProgramRequest {
    /// Select a program for retrieval; the controller answers with its
    /// name and interval count.
    Query(ProgramId),
    /// Create a program with the given name and number of intervals.
    Create {
        /// Program name.
        name: String,
        /// Number of intervals that will follow.
        intervals: u16,
    },
}

/// Selects or creates a stored program.
///
/// ```
/// use thermotron_lib::command::{Command, ProgramCommand, ProgramId, ProgramRequest};
///
/// let create = ProgramCommand::new(ProgramRequest::Create {
///     name: "SOAK".to_string(),
///     intervals: 4,
/// })
/// .unwrap();
/// assert_eq!(create.to_wire(), "PROGSOAK,4\r");
///
/// let query = ProgramCommand::new(ProgramRequest::Query(ProgramId::Number(3))).unwrap();
/// assert_eq!(query.to_wire(), "PROG3?\r");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramCommand(ProgramRequest);

impl ProgramCommand {
    /// Creates a program command.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidText` if a program name is empty or holds
    /// characters other than printable ASCII, or holds `,` or `?`.
    pub fn new(request: ProgramRequest) -> Result<Self, ValueError> {
        match &request {
            ProgramRequest::Query(ProgramId::Name(name)) | ProgramRequest::Create { name, .. } => {
                check_name(name)?;
            }
            ProgramRequest::Query(ProgramId::Number(_)) => {}
        }
        Ok(Self(request))
    }

    /// Returns the request.
    #[must_use]
    pub const fn request(&self) -> &ProgramRequest {
        &self.0
    }
}

fn check_name(name: &str) -> Result<(), ValueError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| (c.is_ascii_graphic() || c == ' ') && c != ',' && c != '?');
    if valid {
        Ok(())
    } else {
        Err(ValueError::InvalidText {
            field: "program name",
            value: name.to_string(),
        })
    }
}

impl Command for ProgramCommand {
    fn mnemonic(&self) -> Mnemonic {
        Mnemonic::Program
    }

    fn index(&self) -> Option<String> {
        Some(match &self.0 {
            ProgramRequest::Query(id) => id.to_string(),
            ProgramRequest::Create { name, .. } => name.clone(),
        })
    }

    fn params(&self) -> Vec<Param> {
        match &self.0 {
            ProgramRequest::Query(_) => Vec::new(),
            ProgramRequest::Create { intervals, .. } => vec![Param::from(*intervals)],
        }
    }

    fn form(&self) -> Form {
        match self.0 {
            ProgramRequest::Query(_) => Form::Query,
            ProgramRequest::Create { .. } => Form::Write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuxMask, ChamberOptions, ParameterGroup, TimeSpan};

    fn sample_step() -> ProgramStep {
        ProgramStep::new([85.0, 20.5, 0.0, 0.0], TimeSpan::new(1, 0, 0).unwrap())
            .with_deviations([2.0, 5.0, 0.0, 0.0])
            .with_parameter_group(ParameterGroup::new(2).unwrap())
            .with_loops(3)
            .nested()
            .with_aux(AuxMask::parse("10110000").unwrap(), AuxMask::new(1))
            .with_display_status(4)
            .with_options(ChamberOptions::HUMIDITY)
    }

    #[test]
    fn step_serializes_sixteen_fields() {
        let cmd = IntervalCommand::new(IntervalRequest::Step {
            index: 2,
            step: sample_step(),
        })
        .unwrap();
        assert_eq!(cmd.params().len(), IntervalCommand::STEP_FIELDS);
        assert_eq!(
            cmd.to_wire(),
            "INTV2,85,20.5,0,0,2,5,0,0,01:00:00,2,3,1,13,1,4,2\r"
        );
    }

    #[test]
    fn init_serializes_six_fields() {
        let cmd = IntervalCommand::new(IntervalRequest::Initialize(ProgramInit::new([
            23.0, 0.0, 0.0, 0.0,
        ])))
        .unwrap();
        let wire = cmd.to_wire();
        let body = wire.trim_end_matches('\r');
        assert_eq!(body.split(',').count(), IntervalCommand::INIT_FIELDS);
        assert_eq!(body, "INTV0,23,0,0,0,15");
    }

    #[test]
    fn step_zero_is_rejected() {
        let err = IntervalCommand::new(IntervalRequest::Step {
            index: 0,
            step: sample_step(),
        })
        .unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { actual: 0, .. }));
    }

    #[test]
    fn interval_zero_query() {
        let cmd = IntervalCommand::new(IntervalRequest::Query(0)).unwrap();
        assert_eq!(cmd.to_wire(), "INTV0?\r");
    }

    #[test]
    fn program_name_query() {
        let cmd =
            ProgramCommand::new(ProgramRequest::Query(ProgramId::Name("BURN IN".to_string())))
                .unwrap();
        assert_eq!(cmd.to_wire(), "PROGBURN IN?\r");
    }

    #[test]
    fn program_name_validation() {
        for name in ["", "A,B", "WHAT?", "TAB\tNAME", "CAFÉ"] {
            let result = ProgramCommand::new(ProgramRequest::Create {
                name: name.to_string(),
                intervals: 1,
            });
            assert!(result.is_err(), "{name:?} should be rejected");
        }
    }
}
