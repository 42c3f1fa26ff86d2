// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The chamber options register.
//!
//! The 8800 exposes the enabled chamber subsystems as a single integer in
//! the range 0-1023 where every bit flags one option. A value of 49, for
//! example, means cascade refrigeration, purge and product temperature
//! control are enabled.
//!
//! Product temperature control and humidity cannot run together, and
//! neither can run with the altitude system, which the 8800 drives from
//! the purge bit. [`ChamberOptions::with_enabled`] clears the conflicting
//! bits in the same mask it sets the requested one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValueError};

/// A value of the options register.
///
/// # Examples
///
/// ```
/// use thermotron_lib::types::ChamberOptions;
///
/// let options = ChamberOptions::new(49).unwrap();
/// assert!(options.contains(ChamberOptions::PRODUCT_TEMPERATURE_CONTROL));
/// assert!(options.contains(ChamberOptions::PURGE));
/// assert!(!options.contains(ChamberOptions::HUMIDITY));
///
/// assert!(ChamberOptions::new(1024).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ChamberOptions(u16);

impl ChamberOptions {
    /// No option enabled.
    pub const NONE: Self = Self(0);
    /// Product temperature control (PTC).
    pub const PRODUCT_TEMPERATURE_CONTROL: Self = Self(1);
    /// Humidity system.
    pub const HUMIDITY: Self = Self(1 << 1);
    /// Low humidity system.
    pub const LOW_HUMIDITY: Self = Self(1 << 2);
    /// `GSoak`.
    pub const GSOAK: Self = Self(1 << 3);
    /// Purge.
    pub const PURGE: Self = Self(1 << 4);
    /// Cascade refrigeration (SE-Series chambers only).
    pub const CASCADE_REFRIGERATION: Self = Self(1 << 5);
    /// Power save mode (SE-Series chambers only).
    pub const POWER_SAVE: Self = Self(1 << 6);
    /// Single-stage refrigeration (SE-Series chambers only).
    pub const SINGLE_STAGE_REFRIGERATION: Self = Self(1 << 7);
    /// Rapid cycle operation, first bit (AST modules only).
    pub const RAPID_CYCLE_A: Self = Self(1 << 8);
    /// Rapid cycle operation, second bit (AST modules only).
    pub const RAPID_CYCLE_B: Self = Self(1 << 9);

    /// Largest register value.
    pub const MAX: u16 = 1023;

    /// Creates an options value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `bits` exceeds 1023.
    pub fn new(bits: u16) -> Result<Self, ValueError> {
        if bits > Self::MAX {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: Self::MAX,
                actual: bits,
            });
        }
        Ok(Self(bits))
    }

    /// Returns the raw register value.
    #[must_use]
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns a copy with the bits of `other` set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns a copy with the bits of `other` cleared.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Returns a copy with `option` enabled and its incompatible options cleared.
    ///
    /// # Examples
    ///
    /// ```
    /// use thermotron_lib::types::{ChamberOptions, ExclusiveOption};
    ///
    /// let options = ChamberOptions::new(0b10011).unwrap();
    /// let ptc = options.with_enabled(ExclusiveOption::ProductTemperatureControl);
    /// assert_eq!(ptc.bits(), 0b00001);
    /// ```
    #[must_use]
    pub const fn with_enabled(self, option: ExclusiveOption) -> Self {
        self.difference(option.conflicts()).union(option.flag())
    }

    /// Returns a copy with `option` disabled.
    #[must_use]
    pub const fn with_disabled(self, option: ExclusiveOption) -> Self {
        self.difference(option.flag())
    }

    /// Returns the three-digit zero-padded form used by `OPTN`.
    #[must_use]
    pub fn to_wire(&self) -> String {
        format!("{:03}", self.0)
    }
}

impl fmt::Display for ChamberOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for ChamberOptions {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChamberOptions> for u16 {
    fn from(value: ChamberOptions) -> Self {
        value.0
    }
}

impl FromStr for ChamberOptions {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits: u16 = s
            .trim()
            .parse()
            .map_err(|e| ParseError::invalid("options", format!("{s:?}: {e}")))?;
        Self::new(bits).map_err(|e| ParseError::invalid("options", e.to_string()))
    }
}

/// An option that excludes the others of its group when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusiveOption {
    /// Product temperature control.
    ProductTemperatureControl,
    /// Humidity system.
    Humidity,
}

impl ExclusiveOption {
    /// Returns the register bit of this option.
    #[must_use]
    pub const fn flag(&self) -> ChamberOptions {
        match self {
            Self::ProductTemperatureControl => ChamberOptions::PRODUCT_TEMPERATURE_CONTROL,
            Self::Humidity => ChamberOptions::HUMIDITY,
        }
    }

    /// Returns the bits that must be cleared when this option is enabled.
    ///
    /// Both options also clear [`ChamberOptions::PURGE`]: the 8800 drives
    /// altitude from bit 4, not from [`ChamberOptions::LOW_HUMIDITY`].
    #[must_use]
    pub const fn conflicts(&self) -> ChamberOptions {
        match self {
            Self::ProductTemperatureControl => {
                ChamberOptions(ChamberOptions::HUMIDITY.0 | ChamberOptions::PURGE.0)
            }
            Self::Humidity => ChamberOptions(
                ChamberOptions::PRODUCT_TEMPERATURE_CONTROL.0 | ChamberOptions::PURGE.0,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_upper_bound() {
        assert!(ChamberOptions::new(1023).is_ok());
        assert_eq!(
            ChamberOptions::new(1024).unwrap_err(),
            ValueError::OutOfRange {
                min: 0,
                max: 1023,
                actual: 1024,
            }
        );
    }

    #[test]
    fn wire_form_is_zero_padded() {
        assert_eq!(ChamberOptions::new(1).unwrap().to_wire(), "001");
        assert_eq!(ChamberOptions::new(49).unwrap().to_wire(), "049");
        assert_eq!(ChamberOptions::new(1023).unwrap().to_wire(), "1023");
    }

    #[test]
    fn conflict_masks() {
        assert_eq!(
            ExclusiveOption::ProductTemperatureControl.conflicts().bits(),
            18
        );
        assert_eq!(ExclusiveOption::Humidity.conflicts().bits(), 17);
    }

    #[test]
    fn enabling_clears_altitude_but_not_low_humidity() {
        let options = ChamberOptions::LOW_HUMIDITY.union(ChamberOptions::PURGE);
        let ptc = options.with_enabled(ExclusiveOption::ProductTemperatureControl);
        assert!(ptc.contains(ChamberOptions::LOW_HUMIDITY));
        assert!(!ptc.contains(ChamberOptions::PURGE));
        assert_eq!(ptc.bits(), 0b0101);
    }

    #[test]
    fn enabling_humidity_clears_ptc() {
        let options = ChamberOptions::new(0b0010_0001).unwrap();
        let humid = options.with_enabled(ExclusiveOption::Humidity);
        assert_eq!(humid.bits(), 0b0010_0010);
    }

    #[test]
    fn enabling_is_idempotent() {
        let once = ChamberOptions::NONE.with_enabled(ExclusiveOption::ProductTemperatureControl);
        let twice = once.with_enabled(ExclusiveOption::ProductTemperatureControl);
        assert_eq!(once, twice);
    }

    #[test]
    fn disabling_leaves_other_bits() {
        let options = ChamberOptions::new(0b0110_0010).unwrap();
        assert_eq!(
            options.with_disabled(ExclusiveOption::Humidity).bits(),
            0b0110_0000
        );
    }

    #[test]
    fn parse_from_response() {
        assert_eq!("019".parse::<ChamberOptions>().unwrap().bits(), 19);
        assert!("2048".parse::<ChamberOptions>().is_err());
        assert!("abc".parse::<ChamberOptions>().is_err());
    }

    #[test]
    fn serde_rejects_out_of_range() {
        let ok: ChamberOptions = serde_json::from_str("17").unwrap();
        assert_eq!(ok.bits(), 17);
        assert!(serde_json::from_str::<ChamberOptions>("4096").is_err());
    }
}
