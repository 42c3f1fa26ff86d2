// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory chamber used when no controller is available.

use parking_lot::Mutex;

use crate::chamber::{ChamberControl, OptionsChange};
use crate::command::{
    ChamberCommand, ControlVariable, LightCommand, ModeCommand, MonitorKind, Request, StatusKind,
};
use crate::error::Result;
use crate::protocol::CommandResponse;
use crate::response::StopCode;
use crate::types::ChamberOptions;

const ACK: &str = "0";

/// State tracked by a [`SimulatedChamber`].
///
/// A set point or ramp written in simulation is only pending until
/// run manual mode is entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedState {
    /// Current chamber temperature.
    pub temperature: f64,
    /// Set point waiting for run manual mode.
    pub pending_temperature: Option<f64>,
    /// Current manual ramp.
    pub ramp: f64,
    /// Ramp waiting for run manual mode.
    pub pending_ramp: Option<f64>,
    /// Options register.
    pub options: ChamberOptions,
    /// Chamber light.
    pub light: bool,
}

impl Default for SimulatedState {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            pending_temperature: None,
            ramp: 3.0,
            pending_ramp: None,
            options: ChamberOptions::NONE,
            light: false,
        }
    }
}

/// A chamber that answers from memory and never performs I/O.
///
/// The model is shallow: it tracks temperature, ramp, options and light.
/// Queries without a counterpart in the model answer `0`, except the stop
/// code which reports a running controller.
///
/// # Examples
///
/// ```
/// use thermotron_lib::chamber::{ChamberControl, SimulatedChamber};
/// use thermotron_lib::command::Request;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> thermotron_lib::Result<()> {
/// let chamber = SimulatedChamber::new();
/// chamber.setpoint(1, Request::Write(30.0)).await?;
///
/// // Pending until run manual.
/// assert_eq!(chamber.setpoint(1, Request::Query).await?.as_f64()?, 25.0);
///
/// chamber.run_manual().await?;
/// assert_eq!(chamber.setpoint(1, Request::Query).await?.as_f64()?, 30.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SimulatedChamber {
    state: Mutex<SimulatedState>,
}

impl SimulatedChamber {
    /// Creates a simulated chamber at 25 degrees with a ramp of 3.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulated chamber starting from `state`.
    #[must_use]
    pub fn with_state(state: SimulatedState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Returns a snapshot of the simulated state.
    #[must_use]
    pub fn state(&self) -> SimulatedState {
        *self.state.lock()
    }

    fn answer(&self, command: &ChamberCommand) -> String {
        let mut state = self.state.lock();
        match command {
            ChamberCommand::Control(control) => match (control.variable(), control.request()) {
                (ControlVariable::Setpoint, Request::Write(value)) => {
                    tracing::debug!(setpoint = value, "simulated set point pending");
                    state.pending_temperature = Some(value);
                    ACK.to_string()
                }
                (ControlVariable::Setpoint, Request::Query) => state.temperature.to_string(),
                (ControlVariable::ManualRamp, Request::Write(value)) => {
                    tracing::debug!(ramp = value, "simulated ramp pending");
                    state.pending_ramp = Some(value);
                    ACK.to_string()
                }
                (ControlVariable::ManualRamp, Request::Query) => state.ramp.to_string(),
                _ => ACK.to_string(),
            },
            ChamberCommand::Monitor(query) if query.kind() == MonitorKind::ProcessVariable => {
                state.temperature.to_string()
            }
            ChamberCommand::Mode(ModeCommand::RunManual) => {
                if let Some(temperature) = state.pending_temperature.take() {
                    state.temperature = temperature;
                }
                if let Some(ramp) = state.pending_ramp.take() {
                    state.ramp = ramp;
                }
                tracing::debug!(
                    temperature = state.temperature,
                    ramp = state.ramp,
                    "simulated run manual"
                );
                ACK.to_string()
            }
            ChamberCommand::Status(status) if status.0 == StatusKind::StopCode => {
                StopCode::Running.code().to_string()
            }
            ChamberCommand::Options(options) => match options.0 {
                Request::Query => state.options.to_string(),
                Request::Write(value) => {
                    state.options = value;
                    ACK.to_string()
                }
            },
            ChamberCommand::Light(LightCommand::Query) => u8::from(state.light).to_string(),
            ChamberCommand::Light(LightCommand::Set(on)) => {
                state.light = *on;
                ACK.to_string()
            }
            _ => ACK.to_string(),
        }
    }
}

impl ChamberControl for SimulatedChamber {
    async fn dispatch(&self, command: ChamberCommand) -> Result<CommandResponse> {
        Ok(CommandResponse::new(self.answer(&command)))
    }

    async fn update_options<F>(&self, edit: F) -> Result<OptionsChange>
    where
        F: FnOnce(ChamberOptions) -> ChamberOptions,
    {
        let mut state = self.state.lock();
        let before = state.options;
        let after = edit(before);
        state.options = after;
        Ok(OptionsChange { before, after })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chamber::LightRequest;
    use crate::error::Error;
    use crate::response::{ChannelType, DeviationAlarm};
    use crate::types::ExclusiveOption;

    #[tokio::test]
    async fn setpoint_is_pending_until_run_manual() {
        let chamber = SimulatedChamber::new();
        chamber.setpoint(2, Request::Write(30.0)).await.unwrap();
        assert_eq!(chamber.process_variable(1).await.unwrap(), 25.0);
        assert_eq!(chamber.state().pending_temperature, Some(30.0));

        chamber.run_manual().await.unwrap();
        assert_eq!(chamber.process_variable(1).await.unwrap(), 30.0);
        assert_eq!(chamber.state().pending_temperature, None);
    }

    #[tokio::test]
    async fn run_manual_without_pending_keeps_values() {
        let chamber = SimulatedChamber::new();
        chamber.run_manual().await.unwrap();
        let state = chamber.state();
        assert_eq!(state.temperature, 25.0);
        assert_eq!(state.ramp, 3.0);
    }

    #[tokio::test]
    async fn ramp_commits_independently() {
        let chamber = SimulatedChamber::new();
        chamber.manual_ramp(1, Request::Write(5.5)).await.unwrap();
        let ramp = chamber.manual_ramp(1, Request::Query).await.unwrap();
        assert_eq!(ramp.as_f64().unwrap(), 3.0);

        chamber.run_manual().await.unwrap();
        let ramp = chamber.manual_ramp(1, Request::Query).await.unwrap();
        assert_eq!(ramp.as_f64().unwrap(), 5.5);
        assert_eq!(chamber.state().temperature, 25.0);
    }

    #[tokio::test]
    async fn fixed_answers() {
        let chamber = SimulatedChamber::new();
        assert_eq!(chamber.stop_code().await.unwrap(), StopCode::Running);
        assert_eq!(chamber.alarm_status(1).await.unwrap(), DeviationAlarm::Low);
        assert_eq!(chamber.channel_config(1).await.unwrap(), ChannelType::Unused);
        assert_eq!(chamber.throttle(3).await.unwrap(), 0.0);
        assert_eq!(chamber.hold().await.unwrap().body(), "0");
    }

    #[tokio::test]
    async fn validation_still_applies() {
        let chamber = SimulatedChamber::new();
        let err = chamber.setpoint(0, Request::Write(10.0)).await.unwrap_err();
        assert!(matches!(err, Error::Value(_)));
        assert!(chamber.process_variable(49).await.is_err());
        assert_eq!(chamber.state(), SimulatedState::default());
    }

    #[tokio::test]
    async fn light_toggles() {
        let chamber = SimulatedChamber::new();
        assert!(chamber.light(LightRequest::Toggle).await.unwrap());
        assert!(chamber.light(LightRequest::Query).await.unwrap());
        assert!(!chamber.light(LightRequest::Toggle).await.unwrap());
    }

    #[tokio::test]
    async fn exclusive_options() {
        let chamber = SimulatedChamber::with_state(SimulatedState {
            options: ChamberOptions::new(0b10011).unwrap(),
            ..SimulatedState::default()
        });
        assert!(
            chamber
                .enable_option(ExclusiveOption::ProductTemperatureControl)
                .await
                .unwrap()
        );
        assert_eq!(chamber.state().options.bits(), 0b00001);
        assert!(
            !chamber
                .enable_option(ExclusiveOption::ProductTemperatureControl)
                .await
                .unwrap()
        );
        assert!(
            chamber
                .disable_option(ExclusiveOption::ProductTemperatureControl)
                .await
                .unwrap()
        );
        assert_eq!(chamber.state().options, ChamberOptions::NONE);
    }
}
