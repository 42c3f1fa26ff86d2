// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Thermotron` Lib - A Rust library to drive Thermotron 8800 chamber
//! controllers.
//!
//! This library provides async APIs to read and load chamber values over the
//! controller's ASCII command protocol, plus a simulated controller that
//! answers the same API without any I/O.
//!
//! # Supported Features
//!
//! - **Manual control**: Set points, deviations, manual ramps, parameter groups
//! - **Run modes**: Run manual, hold, resume, stop
//! - **Monitoring**: Process variables, throttle, deviation alarms, stop codes
//! - **Options register**: Read-modify-write with mutually exclusive options
//! - **Programs**: Create programs and load intervals by value
//! - **Outputs**: Auxiliary groups and the chamber light
//!
//! # Quick Start
//!
//! ## Networked Controller
//!
//! ```no_run
//! use thermotron_lib::chamber::{ChamberControl, ChamberSession};
//! use thermotron_lib::command::Request;
//! use thermotron_lib::ChamberConfig;
//!
//! #[tokio::main]
//! async fn main() -> thermotron_lib::Result<()> {
//!     let config = ChamberConfig::new("192.168.1.50").with_description("Chamber 3");
//!     let session = ChamberSession::open(&config).await?;
//!
//!     session.setpoint(1, Request::Write(85.0)).await?;
//!     session.manual_ramp(1, Request::Write(2.0)).await?;
//!     session.run_manual().await?;
//!
//!     let temperature = session.process_variable(1).await?;
//!     println!("{config}: {temperature}");
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Simulated Controller
//!
//! ```
//! use thermotron_lib::chamber::{ChamberControl, ChamberSession};
//! use thermotron_lib::types::ExclusiveOption;
//! use thermotron_lib::ChamberConfig;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> thermotron_lib::Result<()> {
//!     let session = ChamberSession::open(&ChamberConfig::simulated("bench")).await?;
//!
//!     // Enabling product temperature control clears humidity.
//!     assert!(session.enable_option(ExclusiveOption::ProductTemperatureControl).await?);
//!     assert!(!session.enable_option(ExclusiveOption::ProductTemperatureControl).await?);
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! Commands and responses are logged with [`tracing`] at debug level. The
//! library never installs a subscriber.

pub mod chamber;
pub mod command;
pub mod config;
pub mod error;
pub mod protocol;
pub mod response;
pub mod types;

pub use chamber::{Chamber, ChamberControl, ChamberSession, LightRequest, SimulatedChamber};
pub use command::{ChamberCommand, Command, Request};
pub use config::ChamberConfig;
pub use error::{
    ConnectionError, Error, ParseError, ProtocolError, Result, TransportError, ValueError,
};
pub use protocol::{CommandResponse, TcpTransport, Transport};
pub use response::{ChannelStatus, ChannelType, DeviationAlarm, ProgramInfo, StopCode};
pub use types::{AuxMask, ChamberOptions, ExclusiveOption, ProgramInit, ProgramStep, TimeSpan};
