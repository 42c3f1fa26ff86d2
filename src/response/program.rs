// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program selection response parsing.

use std::str::FromStr;

use crate::error::ParseError;

/// Name and length of a stored program, as answered to a `PROG` query.
///
/// ```
/// use thermotron_lib::response::ProgramInfo;
///
/// let info: ProgramInfo = "SOAK,4".parse().unwrap();
/// assert_eq!(info.name(), "SOAK");
/// assert_eq!(info.intervals(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramInfo {
    name: String,
    intervals: u16,
}

impl ProgramInfo {
    /// Returns the program name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of intervals.
    #[must_use]
    pub const fn intervals(&self) -> u16 {
        self.intervals
    }
}

impl FromStr for ProgramInfo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Names may not contain commas, so the last comma splits the fields.
        let (name, intervals) = s
            .trim()
            .rsplit_once(',')
            .ok_or_else(|| ParseError::UnexpectedFormat(format!("program info {s:?}")))?;
        let intervals = intervals
            .trim()
            .parse()
            .map_err(|_| ParseError::invalid("interval count", intervals))?;
        Ok(Self {
            name: name.trim().to_string(),
            intervals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_with_spaces() {
        let info: ProgramInfo = "BURN IN , 12".parse().unwrap();
        assert_eq!(info.name(), "BURN IN");
        assert_eq!(info.intervals(), 12);
    }

    #[test]
    fn missing_count() {
        assert!(matches!(
            "SOAK".parse::<ProgramInfo>(),
            Err(ParseError::UnexpectedFormat(_))
        ));
        assert!("SOAK,x".parse::<ProgramInfo>().is_err());
    }
}
