// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auxiliary output masks.
//!
//! An auxiliary group packs eight on/off outputs into one byte where bit 0
//! is the first output of the group. Written as a binary string, the output
//! order reads naturally from left to right (`"10000000"` turns on output 1),
//! which is the reverse of the usual most-significant-first notation.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ValueError};

/// The on/off states of the eight outputs of one auxiliary group.
///
/// # Examples
///
/// ```
/// use thermotron_lib::types::AuxMask;
///
/// // Outputs 1, 3 and 4 on, written left to right.
/// let mask = AuxMask::parse("10110000").unwrap();
/// assert_eq!(mask.bits(), 13);
/// assert!(mask.is_on(1));
/// assert!(!mask.is_on(2));
///
/// // Short strings are plain decimal register values.
/// assert_eq!(AuxMask::parse("13").unwrap().bits(), 13);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AuxMask(u8);

impl AuxMask {
    /// Every output off.
    pub const ALL_OFF: Self = Self(0);

    /// Strings longer than this are read as left-to-right output lists.
    const DECIMAL_MAX_LEN: usize = 3;

    /// Creates a mask from its raw register value.
    #[must_use]
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    /// Creates a mask from output states, first output first.
    #[must_use]
    pub fn from_outputs(outputs: [bool; 8]) -> Self {
        let bits = outputs
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .fold(0u8, |acc, (i, _)| acc | (1 << i));
        Self(bits)
    }

    /// Parses a mask from its textual form.
    ///
    /// Strings of up to three characters are decimal register values.
    /// Longer strings list output states from left to right using `0` and
    /// `1`, and may hold at most eight outputs.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidText` if the string is neither form, or
    /// `ValueError::OutOfRange` for a decimal value above 255.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let text = text.trim();
        let invalid = || ValueError::InvalidText {
            field: "auxiliary mask",
            value: text.to_string(),
        };

        if text.len() <= Self::DECIMAL_MAX_LEN {
            let value: u16 = text.parse().map_err(|_| invalid())?;
            return u8::try_from(value).map(Self).map_err(|_| ValueError::OutOfRange {
                min: 0,
                max: 255,
                actual: value,
            });
        }

        if text.len() > 8 {
            return Err(invalid());
        }
        let mut outputs = [false; 8];
        for (slot, c) in outputs.iter_mut().zip(text.chars()) {
            *slot = match c {
                '1' => true,
                '0' => false,
                _ => return Err(invalid()),
            };
        }
        Ok(Self::from_outputs(outputs))
    }

    /// Returns the raw register value.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `true` if the 1-based `output` of the group is on.
    ///
    /// Outputs outside 1-8 are reported as off.
    #[must_use]
    pub const fn is_on(&self, output: u8) -> bool {
        output >= 1 && output <= 8 && self.0 & (1 << (output - 1)) != 0
    }

    /// Returns the output states, first output first.
    #[must_use]
    pub fn outputs(&self) -> [bool; 8] {
        std::array::from_fn(|i| self.0 & (1 << i) != 0)
    }
}

impl fmt::Display for AuxMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AuxMask {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map_err(|e| ParseError::invalid("auxiliary mask", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_string_is_reversed() {
        assert_eq!(AuxMask::parse("10110000").unwrap().bits(), 13);
        assert_eq!(AuxMask::parse("00000001").unwrap().bits(), 128);
        assert_eq!(AuxMask::parse("1111").unwrap().bits(), 15);
    }

    #[test]
    fn short_strings_are_decimal() {
        assert_eq!(AuxMask::parse("101").unwrap().bits(), 101);
        assert_eq!(AuxMask::parse("0").unwrap().bits(), 0);
        assert!(AuxMask::parse("300").is_err());
    }

    #[test]
    fn rejects_bad_binary() {
        assert!(AuxMask::parse("10120000").is_err());
        assert!(AuxMask::parse("101100001").is_err());
        assert!(AuxMask::parse("").is_err());
    }

    #[test]
    fn outputs_round_through_bits() {
        let outputs = [true, false, true, true, false, false, false, false];
        let mask = AuxMask::from_outputs(outputs);
        assert_eq!(mask.bits(), 13);
        assert_eq!(mask.outputs(), outputs);
        assert!(mask.is_on(4));
        assert!(!mask.is_on(0));
        assert!(!mask.is_on(9));
    }
}
