// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level chamber abstraction.
//!
//! [`ChamberControl`] exposes every controller operation as an async method.
//! Two backends implement it:
//!
//! - [`Chamber`]: talks to a controller through a [`Transport`](crate::protocol::Transport)
//! - [`SimulatedChamber`]: answers from an in-memory model, without any I/O
//!
//! [`ChamberSession`] picks one of them from a [`ChamberConfig`](crate::ChamberConfig).
//!
//! Every operation validates its arguments before anything is sent. An
//! out-of-range channel is reported as [`Error::Value`](crate::Error::Value)
//! and leaves the session untouched.
//!
//! ```
//! use thermotron_lib::chamber::{ChamberControl, SimulatedChamber};
//! use thermotron_lib::command::Request;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> thermotron_lib::Result<()> {
//! let chamber = SimulatedChamber::new();
//! chamber.setpoint(1, Request::Write(30.0)).await?;
//! chamber.run_manual().await?;
//!
//! let temperature = chamber.process_variable(1).await?;
//! assert!((temperature - 30.0).abs() < f64::EPSILON);
//!
//! assert!(chamber.setpoint(5, Request::Query).await.is_err());
//! # Ok(())
//! # }
//! ```

mod connected;
mod session;
mod simulated;

pub use connected::Chamber;
pub use session::ChamberSession;
pub use simulated::{SimulatedChamber, SimulatedState};

use crate::command::{
    AuxCommand, ChamberCommand, ControlCommand, ControlVariable, IntervalCommand,
    IntervalRequest, LightCommand, LoopsLeftCommand, ModeCommand, MonitorKind, MonitorQuery,
    OptionsCommand, ParameterGroupCommand, ProgramCommand, ProgramRequest, Request, StatusKind,
    StatusQuery, TimeLeftCommand,
};
use crate::error::{Result, ValueError};
use crate::protocol::CommandResponse;
use crate::response::{ChannelStatus, ChannelType, DeviationAlarm, StopCode};
use crate::types::{
    AuxMask, ChamberOptions, ExclusiveOption, ParameterGroup, ProgramInit, ProgramStep, TimeSpan,
};

/// What to do with the chamber light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightRequest {
    /// Read the light status.
    Query,
    /// Switch the light on (`true`) or off.
    Set(bool),
    /// Read the light status, then write the opposite.
    Toggle,
}

/// Outcome of an options register update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionsChange {
    /// Register value read from the controller.
    pub before: ChamberOptions,
    /// Register value after the edit.
    pub after: ChamberOptions,
}

impl OptionsChange {
    /// Returns `true` if the edit changed the register, meaning a write was
    /// issued.
    #[must_use]
    pub fn written(&self) -> bool {
        self.before != self.after
    }
}

/// The operations of an 8800 controller.
///
/// Implementors provide [`dispatch`](Self::dispatch) and
/// [`update_options`](Self::update_options); every other method builds a
/// validated command and dispatches it.
///
/// Methods taking a [`Request`] read the register for [`Request::Query`] and
/// load the given value for [`Request::Write`]. Writes answer `0`.
#[allow(async_fn_in_trait)]
pub trait ChamberControl {
    /// Sends one command and returns the controller's response.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the session is broken or the transport
    /// fails, and `Error::Protocol` if the response is empty or malformed.
    async fn dispatch(&self, command: ChamberCommand) -> Result<CommandResponse>;

    /// Reads the options register, applies `edit` and writes the result back
    /// if it differs, as one uninterrupted exchange.
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch), or `Error::Parse`
    /// if the register value cannot be read.
    async fn update_options<F>(&self, edit: F) -> Result<OptionsChange>
    where
        F: FnOnce(ChamberOptions) -> ChamberOptions;

    /// Reads the deviation alarm of monitor channel 1-8 (`ALRM`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-8, or any error of
    /// [`dispatch`](Self::dispatch) or response parsing.
    async fn alarm_status(&self, channel: u8) -> Result<DeviationAlarm> {
        let command = MonitorQuery::new(MonitorKind::Alarm, channel)?;
        Ok(self.dispatch(command.into()).await?.parse()?)
    }

    /// Reads or sets auxiliary group 1 or 2 (`AUXE`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` unless `group` is 1 or 2, or any error of
    /// [`dispatch`](Self::dispatch).
    async fn aux_group(&self, group: u8, request: Request<AuxMask>) -> Result<CommandResponse> {
        let command = AuxCommand::new(group, request)?;
        self.dispatch(command.into()).await
    }

    /// Reads the channel type of monitor channel 1-8 (`CCNF`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-8, or any error of
    /// [`dispatch`](Self::dispatch) or response parsing.
    async fn channel_config(&self, channel: u8) -> Result<ChannelType> {
        let command = MonitorQuery::new(MonitorKind::ChannelConfig, channel)?;
        Ok(self.dispatch(command.into()).await?.parse()?)
    }

    /// Reads the on and configured flags of channels 1-8 (`CHST`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch) or response
    /// parsing.
    async fn channel_status(&self) -> Result<ChannelStatus> {
        let command = StatusQuery(StatusKind::ChannelStatus);
        Ok(self.dispatch(command.into()).await?.parse()?)
    }

    /// Reads the name assigned to channel 1-28 (`CNAM`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-28, or any error of
    /// [`dispatch`](Self::dispatch).
    async fn channel_name(&self, channel: u8) -> Result<String> {
        let command = MonitorQuery::new(MonitorKind::ChannelName, channel)?;
        Ok(self.dispatch(command.into()).await?.into_body())
    }

    /// Reads or loads the deviation of control channel 1-4 (`DEVN`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-4 or non-finite values,
    /// or any error of [`dispatch`](Self::dispatch).
    async fn deviation(&self, channel: u8, request: Request<f64>) -> Result<CommandResponse> {
        let command = ControlCommand::new(ControlVariable::Deviation, channel, request)?;
        self.dispatch(command.into()).await
    }

    /// Reads or loads the final value of control channel 1-4 (`FVAL`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-4 or non-finite values,
    /// or any error of [`dispatch`](Self::dispatch).
    async fn final_value(&self, channel: u8, request: Request<f64>) -> Result<CommandResponse> {
        let command = ControlCommand::new(ControlVariable::FinalValue, channel, request)?;
        self.dispatch(command.into()).await
    }

    /// Places a running program or manual test in hold (`HOLD`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn hold(&self) -> Result<CommandResponse> {
        self.dispatch(ModeCommand::Hold.into()).await
    }

    /// Reads the device identification (`IDEN`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn identify(&self) -> Result<String> {
        let command = StatusQuery(StatusKind::Identify);
        Ok(self.dispatch(command.into()).await?.into_body())
    }

    /// Reads or loads one program interval (`INTV`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a step with index 0 or non-finite values,
    /// or any error of [`dispatch`](Self::dispatch).
    async fn program_interval(&self, request: IntervalRequest) -> Result<CommandResponse> {
        let command = IntervalCommand::new(request)?;
        self.dispatch(command.into()).await
    }

    /// Reads, switches or toggles the chamber light (`LGHT`).
    ///
    /// Returns the light status after the request. Toggling costs two
    /// exchanges: a query, then a write of the opposite value.
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch), or `Error::Parse`
    /// if the light status cannot be read.
    async fn light(&self, request: LightRequest) -> Result<bool> {
        match request {
            LightRequest::Query => {
                let response = self.dispatch(LightCommand::Query.into()).await?;
                Ok(response.as_i64()? != 0)
            }
            LightRequest::Set(on) => {
                self.dispatch(LightCommand::Set(on).into()).await?;
                Ok(on)
            }
            LightRequest::Toggle => {
                let response = self.dispatch(LightCommand::Query.into()).await?;
                let on = response.as_i64()? == 0;
                self.dispatch(LightCommand::Set(on).into()).await?;
                Ok(on)
            }
        }
    }

    /// Reads or edits the loops left of the current loop (`LLFT`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn loops_left(&self, request: Request<u16>) -> Result<CommandResponse> {
        self.dispatch(LoopsLeftCommand(request).into()).await
    }

    /// Reads or loads the manual ramp of control channel 1-4 (`MRMP`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-4 or non-finite values,
    /// or any error of [`dispatch`](Self::dispatch).
    async fn manual_ramp(&self, channel: u8, request: Request<f64>) -> Result<CommandResponse> {
        let command = ControlCommand::new(ControlVariable::ManualRamp, channel, request)?;
        self.dispatch(command.into()).await
    }

    /// Reads or writes the options register (`OPTN`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn options(&self, request: Request<ChamberOptions>) -> Result<CommandResponse> {
        self.dispatch(OptionsCommand(request).into()).await
    }

    /// Reads or selects the manual mode parameter group 1-4 (`PRMG`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for groups outside 1-4, or any error of
    /// [`dispatch`](Self::dispatch).
    async fn parameter_group(&self, request: Request<u8>) -> Result<CommandResponse> {
        let request = request.try_map(ParameterGroup::new)?;
        self.dispatch(ParameterGroupCommand(request).into()).await
    }

    /// Selects or creates a stored program (`PROG`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for invalid program names, or any error of
    /// [`dispatch`](Self::dispatch).
    async fn program(&self, request: ProgramRequest) -> Result<CommandResponse> {
        let command = ProgramCommand::new(request)?;
        self.dispatch(command.into()).await
    }

    /// Reads the current value of process channel 1-48 (`PVAR`).
    ///
    /// Not every number in that range is assigned; use
    /// [`ProcessChannel::classify`](crate::response::ProcessChannel::classify)
    /// to skip the gaps.
    ///
    /// ```
    /// use thermotron_lib::chamber::{ChamberControl, SimulatedChamber};
    /// use thermotron_lib::response::ProcessChannel;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> thermotron_lib::Result<()> {
    /// let chamber = SimulatedChamber::new();
    /// for channel in 1..=48 {
    ///     if let ProcessChannel::Monitor(n) = ProcessChannel::classify(channel) {
    ///         println!("monitor {n}: {}", chamber.process_variable(channel).await?);
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-48, or any error of
    /// [`dispatch`](Self::dispatch) or response parsing.
    async fn process_variable(&self, channel: u8) -> Result<f64> {
        let command = MonitorQuery::new(MonitorKind::ProcessVariable, channel)?;
        Ok(self.dispatch(command.into()).await?.as_f64()?)
    }

    /// Returns a held program or manual test to run (`RESM`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn resume(&self) -> Result<CommandResponse> {
        self.dispatch(ModeCommand::Resume.into()).await
    }

    /// Places a stopped controller in run manual mode (`RUNM`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn run_manual(&self) -> Result<CommandResponse> {
        self.dispatch(ModeCommand::RunManual.into()).await
    }

    /// Reads the cause of the last transition to stop (`SCOD`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch) or response
    /// parsing.
    async fn stop_code(&self) -> Result<StopCode> {
        let command = StatusQuery(StatusKind::StopCode);
        Ok(self.dispatch(command.into()).await?.parse()?)
    }

    /// Reads or loads the set point of control channel 1-4 (`SETP`).
    ///
    /// A new set point takes effect in run manual mode.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-4 or non-finite values,
    /// or any error of [`dispatch`](Self::dispatch).
    async fn setpoint(&self, channel: u8, request: Request<f64>) -> Result<CommandResponse> {
        let command = ControlCommand::new(ControlVariable::Setpoint, channel, request)?;
        self.dispatch(command.into()).await
    }

    /// Stops the controller (`STOP`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn stop(&self) -> Result<CommandResponse> {
        self.dispatch(ModeCommand::Stop.into()).await
    }

    /// Reads the throttle percentage of channel 1-8 (`THTL`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for channels outside 1-8, or any error of
    /// [`dispatch`](Self::dispatch) or response parsing.
    async fn throttle(&self, channel: u8) -> Result<f64> {
        let command = MonitorQuery::new(MonitorKind::Throttle, channel)?;
        Ok(self.dispatch(command.into()).await?.as_f64()?)
    }

    /// Reads or edits the time left in the current interval (`TLFT`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn time_left(&self, request: Request<TimeSpan>) -> Result<CommandResponse> {
        self.dispatch(TimeLeftCommand(request).into()).await
    }

    /// Reads the display software version (`VRSN`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`dispatch`](Self::dispatch).
    async fn version(&self) -> Result<String> {
        let command = StatusQuery(StatusKind::Version);
        Ok(self.dispatch(command.into()).await?.into_body())
    }

    /// Enables `option`, clearing the options it cannot run with.
    ///
    /// Returns `true` if the register changed and was written.
    ///
    /// # Errors
    ///
    /// Returns any error of [`update_options`](Self::update_options).
    async fn enable_option(&self, option: ExclusiveOption) -> Result<bool> {
        let change = self
            .update_options(|current| current.with_enabled(option))
            .await?;
        Ok(change.written())
    }

    /// Disables `option`.
    ///
    /// Returns `true` if the register changed and was written.
    ///
    /// # Errors
    ///
    /// Returns any error of [`update_options`](Self::update_options).
    async fn disable_option(&self, option: ExclusiveOption) -> Result<bool> {
        let change = self
            .update_options(|current| current.with_disabled(option))
            .await?;
        Ok(change.written())
    }

    /// Loads a complete program: the `PROG` header, the initialization
    /// record and one record per step.
    ///
    /// All records are validated before the first one is sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if any record is invalid or there are more
    /// steps than an interval index can address, or the first error of
    /// [`dispatch`](Self::dispatch).
    async fn load_program(
        &self,
        name: &str,
        init: ProgramInit,
        steps: &[ProgramStep],
    ) -> Result<()> {
        let count = u16::try_from(steps.len()).map_err(|_| ValueError::OutOfRange {
            min: 0,
            max: u16::MAX,
            actual: u16::MAX,
        })?;
        let mut commands: Vec<ChamberCommand> = Vec::with_capacity(steps.len() + 2);
        commands.push(
            ProgramCommand::new(ProgramRequest::Create {
                name: name.to_string(),
                intervals: count,
            })?
            .into(),
        );
        commands.push(IntervalCommand::new(IntervalRequest::Initialize(init))?.into());
        for (index, step) in (1..=count).zip(steps) {
            let step = IntervalRequest::Step { index, step: *step };
            commands.push(IntervalCommand::new(step)?.into());
        }

        for command in commands {
            self.dispatch(command).await?;
        }
        Ok(())
    }
}
