// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for chamber commands.
//!
//! Each type checks its range at construction time, so a command built from
//! these types never carries an argument the controller would reject.
//!
//! # Types
//!
//! - [`Channel`] / [`ChannelRange`] - Channel numbers and the range each command accepts
//! - [`AuxGroup`] - Auxiliary output group (1 or 2)
//! - [`ParameterGroup`] - Controller parameter group (1-4)
//! - [`ChamberOptions`] - The options register (0-1023)
//! - [`AuxMask`] - Eight auxiliary output states
//! - [`TimeSpan`] - `hh:mm:ss` durations
//! - [`ProgramInit`] / [`ProgramStep`] - Program interval records

mod auxiliary;
mod channel;
mod options;
mod program;
mod time_span;

pub use auxiliary::AuxMask;
pub use channel::{AuxGroup, Channel, ChannelRange, ParameterGroup};
pub use options::{ChamberOptions, ExclusiveOption};
pub use program::{ProgramInit, ProgramStep};
pub use time_span::TimeSpan;
