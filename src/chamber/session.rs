// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backend selection from configuration.

use crate::chamber::{Chamber, ChamberControl, OptionsChange, SimulatedChamber};
use crate::command::ChamberCommand;
use crate::config::ChamberConfig;
use crate::error::Result;
use crate::protocol::{CommandResponse, TcpTransport};
use crate::types::ChamberOptions;

/// A chamber opened from a [`ChamberConfig`].
///
/// The backend is chosen once, when the session is opened: a simulated
/// configuration never touches the network.
///
/// # Examples
///
/// ```
/// use thermotron_lib::chamber::{ChamberControl, ChamberSession};
/// use thermotron_lib::ChamberConfig;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> thermotron_lib::Result<()> {
/// let session = ChamberSession::open(&ChamberConfig::simulated("bench")).await?;
/// assert!(session.is_simulated());
/// assert!(session.stop_code().await?.is_running());
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub enum ChamberSession {
    /// A controller reached over TCP.
    Connected(Chamber<TcpTransport>),
    /// An in-memory controller.
    Simulated(SimulatedChamber),
}

impl ChamberSession {
    /// Opens the chamber described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if a networked controller cannot be
    /// reached. Simulated sessions always open.
    pub async fn open(config: &ChamberConfig) -> Result<Self> {
        if config.is_simulated() {
            tracing::info!(chamber = %config, "opening simulated chamber");
            return Ok(Self::Simulated(SimulatedChamber::new()));
        }
        Ok(Self::Connected(Chamber::connect(config).await?))
    }

    /// Returns `true` for a simulated session.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }

    /// Closes the session. Closing twice, or closing a simulated session, is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if shutting down the connection fails.
    pub async fn close(&self) -> Result<()> {
        match self {
            Self::Connected(chamber) => chamber.close().await,
            Self::Simulated(_) => Ok(()),
        }
    }
}

impl ChamberControl for ChamberSession {
    async fn dispatch(&self, command: ChamberCommand) -> Result<CommandResponse> {
        match self {
            Self::Connected(chamber) => chamber.dispatch(command).await,
            Self::Simulated(chamber) => chamber.dispatch(command).await,
        }
    }

    async fn update_options<F>(&self, edit: F) -> Result<OptionsChange>
    where
        F: FnOnce(ChamberOptions) -> ChamberOptions,
    {
        match self {
            Self::Connected(chamber) => chamber.update_options(edit).await,
            Self::Simulated(chamber) => chamber.update_options(edit).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Request;
    use crate::error::{ConnectionError, Error};

    #[tokio::test]
    async fn simulated_session_never_connects() {
        // Port 1 on a reserved address would fail if it were ever dialed.
        let config = ChamberConfig::new("192.0.2.1")
            .with_port(1)
            .with_simulation(true);
        let session = ChamberSession::open(&config).await.unwrap();
        session.setpoint(1, Request::Write(40.0)).await.unwrap();
        session.run_manual().await.unwrap();
        assert_eq!(session.process_variable(2).await.unwrap(), 40.0);
    }

    #[tokio::test]
    async fn close_is_idempotent_for_simulation() {
        let session = ChamberSession::open(&ChamberConfig::simulated("bench"))
            .await
            .unwrap();
        session.close().await.unwrap();
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn connect_failure_surfaces_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ChamberConfig::new("127.0.0.1").with_port(port);
        let err = ChamberSession::open(&config).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::ConnectionRefused { .. })
        ));
    }
}
