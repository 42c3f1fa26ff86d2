// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program interval records.
//!
//! A device-resident program is loaded as one initialization record
//! (interval 0) followed by one record per step. See
//! [`IntervalRequest`](crate::command::IntervalRequest) for how they are sent.

use crate::error::ValueError;
use crate::types::{AuxMask, ChamberOptions, ParameterGroup, TimeSpan};

/// The interval 0 record that initializes a program.
///
/// # Examples
///
/// ```
/// use thermotron_lib::types::ProgramInit;
///
/// let init = ProgramInit::new([23.0, 50.0, 0.0, 0.0]).with_channels(0b0011);
/// assert_eq!(init.channels, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramInit {
    /// Starting values of control channels 1-4.
    pub final_values: [f64; 4],
    /// Enable mask of the control channels, bit 0 for channel 1.
    pub channels: u8,
}

impl ProgramInit {
    /// Creates an initialization record with every channel enabled.
    #[must_use]
    pub const fn new(final_values: [f64; 4]) -> Self {
        Self {
            final_values,
            channels: 0b1111,
        }
    }

    /// Sets the channel enable mask.
    #[must_use]
    pub const fn with_channels(mut self, channels: u8) -> Self {
        self.channels = channels;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ValueError> {
        check_finite(&self.final_values, "final value")
    }
}

/// One step of a program.
///
/// # Examples
///
/// ```
/// use thermotron_lib::types::{AuxMask, ProgramStep, TimeSpan};
///
/// let step = ProgramStep::new([85.0, 0.0, 0.0, 0.0], TimeSpan::new(2, 0, 0).unwrap())
///     .with_deviations([2.0, 0.0, 0.0, 0.0])
///     .with_loops(3)
///     .with_aux(AuxMask::parse("10000000").unwrap(), AuxMask::ALL_OFF);
///
/// assert_eq!(step.loops, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramStep {
    /// Final values of control channels 1-4.
    pub final_values: [f64; 4],
    /// Allowed deviations of control channels 1-4.
    pub deviations: [f64; 4],
    /// Length of the step.
    pub duration: TimeSpan,
    /// Parameter group used while the step runs.
    pub parameter_group: ParameterGroup,
    /// Loop counter of the step.
    pub loops: u16,
    /// Whether the step is a nested interval.
    pub nested: bool,
    /// Auxiliary outputs 1-8 and 9-16.
    pub aux: [AuxMask; 2],
    /// Display status byte.
    pub display_status: u8,
    /// Chamber options active during the step.
    pub options: ChamberOptions,
}

impl ProgramStep {
    /// Creates a step with zero deviations, parameter group 1, no loops and
    /// every output off.
    #[must_use]
    pub fn new(final_values: [f64; 4], duration: TimeSpan) -> Self {
        Self {
            final_values,
            deviations: [0.0; 4],
            duration,
            parameter_group: ParameterGroup::FIRST,
            loops: 0,
            nested: false,
            aux: [AuxMask::ALL_OFF; 2],
            display_status: 0,
            options: ChamberOptions::NONE,
        }
    }

    /// Sets the deviation values.
    #[must_use]
    pub fn with_deviations(mut self, deviations: [f64; 4]) -> Self {
        self.deviations = deviations;
        self
    }

    /// Sets the parameter group.
    #[must_use]
    pub fn with_parameter_group(mut self, group: ParameterGroup) -> Self {
        self.parameter_group = group;
        self
    }

    /// Sets the loop counter.
    #[must_use]
    pub fn with_loops(mut self, loops: u16) -> Self {
        self.loops = loops;
        self
    }

    /// Marks the step as a nested interval.
    #[must_use]
    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    /// Sets both auxiliary groups.
    #[must_use]
    pub fn with_aux(mut self, low: AuxMask, high: AuxMask) -> Self {
        self.aux = [low, high];
        self
    }

    /// Sets the display status byte.
    #[must_use]
    pub fn with_display_status(mut self, status: u8) -> Self {
        self.display_status = status;
        self
    }

    /// Sets the chamber options.
    #[must_use]
    pub fn with_options(mut self, options: ChamberOptions) -> Self {
        self.options = options;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ValueError> {
        check_finite(&self.final_values, "final value")?;
        check_finite(&self.deviations, "deviation")
    }
}

fn check_finite(values: &[f64], field: &'static str) -> Result<(), ValueError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ValueError::NotFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_defaults() {
        let step = ProgramStep::new([1.0, 2.0, 3.0, 4.0], TimeSpan::default());
        assert_eq!(step.parameter_group.value(), 1);
        assert_eq!(step.aux, [AuxMask::ALL_OFF; 2]);
        assert!(!step.nested);
        assert!(step.validate().is_ok());
    }

    #[test]
    fn step_rejects_nan_deviation() {
        let step = ProgramStep::new([0.0; 4], TimeSpan::default())
            .with_deviations([0.0, f64::NAN, 0.0, 0.0]);
        assert_eq!(
            step.validate().unwrap_err(),
            ValueError::NotFinite { field: "deviation" }
        );
    }

    #[test]
    fn init_rejects_infinite_value() {
        let init = ProgramInit::new([f64::INFINITY, 0.0, 0.0, 0.0]);
        assert!(init.validate().is_err());
    }
}
