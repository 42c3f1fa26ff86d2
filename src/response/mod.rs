// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed decoding of controller responses.
//!
//! The controller answers most queries with a bare number. The types here
//! give the coded answers a meaning; all of them implement `FromStr` so they
//! work with [`CommandResponse::parse`](crate::protocol::CommandResponse::parse).
//!
//! ```
//! use thermotron_lib::protocol::CommandResponse;
//! use thermotron_lib::response::StopCode;
//!
//! let code: StopCode = CommandResponse::new("5").parse().unwrap();
//! assert_eq!(code, StopCode::ComputerInterface);
//! ```

mod channel;
mod program;
mod stop;

pub use channel::{ChannelStatus, ChannelType, DeviationAlarm, ProcessChannel};
pub use program::ProgramInfo;
pub use stop::StopCode;

use crate::error::ParseError;

/// Parses a small integer code, tolerating a `.0` suffix.
fn parse_code(field: &str, s: &str) -> Result<u8, ParseError> {
    let s = s.trim();
    let digits = s.strip_suffix(".0").unwrap_or(s);
    digits
        .parse()
        .map_err(|_| ParseError::invalid(field, format!("expected a code, got {s:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_code_variants() {
        assert_eq!(parse_code("x", " 3 ").unwrap(), 3);
        assert_eq!(parse_code("x", "3.0").unwrap(), 3);
        assert!(parse_code("x", "-1").is_err());
        assert!(parse_code("x", "").is_err());
    }
}
