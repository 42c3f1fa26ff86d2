// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chamber backed by a transport.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, MutexGuard};

use crate::chamber::{ChamberControl, OptionsChange};
use crate::command::{ChamberCommand, Command, OptionsCommand, Request};
use crate::config::ChamberConfig;
use crate::error::{Error, Result, TransportError};
use crate::protocol::{CommandResponse, TcpTransport, Transport};
use crate::types::ChamberOptions;

/// A connected 8800 controller.
///
/// Each command is written and its response read while holding the
/// transport lock, so a `Chamber` can be shared between tasks behind an
/// `Arc` without responses being attributed to the wrong command.
///
/// Once the transport fails the chamber is marked broken and every further
/// command fails with [`TransportError::SessionBroken`]; open a new session
/// to recover. Dropping a command future between its write and its response
/// (for example under `tokio::time::timeout`) also breaks the session, since
/// the unread response would otherwise answer the next command.
///
/// # Examples
///
/// ```no_run
/// use thermotron_lib::chamber::{Chamber, ChamberControl};
/// use thermotron_lib::command::Request;
/// use thermotron_lib::ChamberConfig;
///
/// # async fn example() -> thermotron_lib::Result<()> {
/// let chamber = Chamber::connect(&ChamberConfig::new("192.168.1.50")).await?;
/// chamber.setpoint(1, Request::Write(-40.0)).await?;
/// chamber.run_manual().await?;
/// println!("stop code: {}", chamber.stop_code().await?);
/// chamber.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Chamber<T: Transport> {
    transport: Mutex<T>,
    broken: AtomicBool,
    label: String,
}

impl Chamber<TcpTransport> {
    /// Connects to the controller described by `config`.
    ///
    /// The simulation flag of `config` is ignored; use
    /// [`ChamberSession::open`](crate::chamber::ChamberSession::open) to
    /// honor it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if the connection cannot be established.
    pub async fn connect(config: &ChamberConfig) -> Result<Self> {
        let transport = TcpTransport::connect(config).await?;
        Ok(Self::new(transport).with_label(config.to_string()))
    }
}

impl<T: Transport> Chamber<T> {
    /// Wraps an already open transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Mutex::new(transport),
            broken: AtomicBool::new(false),
            label: String::from("chamber"),
        }
    }

    /// Sets the name used in log messages.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the name used in log messages.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` after a transport failure.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Acquire)
    }

    /// Closes the transport. Closing twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if shutting down the transport fails.
    pub async fn close(&self) -> Result<()> {
        let mut transport = self.transport.lock().await;
        if transport.is_connected() {
            tracing::info!(chamber = %self.label, "closing chamber session");
        }
        transport.close().await?;
        Ok(())
    }

    /// Consumes the chamber and returns its transport.
    pub fn into_transport(self) -> T {
        self.transport.into_inner()
    }

    async fn lock(&self) -> Result<MutexGuard<'_, T>> {
        let transport = self.transport.lock().await;
        if self.is_broken() {
            return Err(TransportError::SessionBroken.into());
        }
        Ok(transport)
    }

    async fn exchange(
        &self,
        transport: &mut T,
        command: &ChamberCommand,
    ) -> Result<CommandResponse> {
        let wire = command.to_wire();
        tracing::debug!(chamber = %self.label, command = %wire.trim_end(), "sending command");

        let mut in_flight = InFlight::new(self);
        let raw = match transport.send(wire.as_bytes()).await {
            Ok(()) => transport.receive().await,
            Err(e) => Err(e),
        };
        in_flight.dismiss();
        let raw = raw.map_err(|e| self.mark_broken(e))?;

        let response = CommandResponse::decode(command.mnemonic(), &raw)?;
        tracing::debug!(
            chamber = %self.label,
            command = %command.mnemonic(),
            response = %response.body(),
            "received response"
        );
        Ok(response)
    }

    fn mark_broken(&self, error: TransportError) -> Error {
        tracing::warn!(chamber = %self.label, error = %error, "transport failed, session broken");
        self.broken.store(true, Ordering::Release);
        error.into()
    }
}

/// Breaks the session if dropped while an exchange is still running.
struct InFlight<'a> {
    broken: &'a AtomicBool,
    label: &'a str,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new<T: Transport>(chamber: &'a Chamber<T>) -> Self {
        Self {
            broken: &chamber.broken,
            label: &chamber.label,
            armed: true,
        }
    }

    fn dismiss(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(
                chamber = %self.label,
                "command abandoned before its response, session broken"
            );
            self.broken.store(true, Ordering::Release);
        }
    }
}

impl<T: Transport> ChamberControl for Chamber<T> {
    async fn dispatch(&self, command: ChamberCommand) -> Result<CommandResponse> {
        let mut transport = self.lock().await?;
        self.exchange(&mut transport, &command).await
    }

    async fn update_options<F>(&self, edit: F) -> Result<OptionsChange>
    where
        F: FnOnce(ChamberOptions) -> ChamberOptions,
    {
        let mut transport = self.lock().await?;
        let query = ChamberCommand::from(OptionsCommand(Request::Query));
        let before: ChamberOptions = self.exchange(&mut transport, &query).await?.parse()?;
        let after = edit(before);
        if after != before {
            tracing::debug!(chamber = %self.label, %before, %after, "updating options");
            let write = ChamberCommand::from(OptionsCommand(Request::Write(after)));
            self.exchange(&mut transport, &write).await?;
        }
        Ok(OptionsChange { before, after })
    }
}
