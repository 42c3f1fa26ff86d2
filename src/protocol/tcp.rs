// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP transport for the controller's Ethernet interface.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};

use crate::config::ChamberConfig;
use crate::error::{ConnectionError, TransportError};
use crate::protocol::Transport;

const READ_CHUNK: usize = 256;

/// A persistent TCP connection to an 8800 controller.
///
/// A response ends at the first carriage return or line feed, or when no
/// more bytes arrive within the settle delay. Bytes already waiting when a
/// command is sent belong to an earlier, timed out command and are
/// discarded.
///
/// # Examples
///
/// ```no_run
/// use thermotron_lib::ChamberConfig;
/// use thermotron_lib::protocol::{TcpTransport, Transport};
///
/// # async fn example() -> thermotron_lib::Result<()> {
/// let mut transport = TcpTransport::connect(&ChamberConfig::new("192.168.1.50")).await?;
/// transport.send(b"SCOD?\r").await?;
/// let response = transport.receive().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    peer: String,
    response_timeout: Duration,
    settle_delay: Duration,
}

impl TcpTransport {
    /// Connects to the controller described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::HostNotFound` if the host does not resolve,
    /// `ConnectionError::ConnectionTimeout` if the connect timeout elapses,
    /// `ConnectionError::ConnectionRefused` if nothing listens on the port,
    /// and `ConnectionError::Io` for any other socket failure.
    pub async fn connect(config: &ChamberConfig) -> Result<Self, ConnectionError> {
        let address = config.address();
        let addrs: Vec<_> = lookup_host((config.host(), config.port()))
            .await
            .map_err(|_| ConnectionError::HostNotFound {
                host: config.host().to_string(),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ConnectionError::HostNotFound {
                host: config.host().to_string(),
            });
        }

        let stream =
            match tokio::time::timeout(config.connect_timeout(), TcpStream::connect(&addrs[..]))
                .await
            {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => {
                    return Err(ConnectionError::ConnectionRefused { address });
                }
                Ok(Err(e)) => return Err(ConnectionError::Io(e)),
                Err(_) => {
                    return Err(ConnectionError::ConnectionTimeout {
                        address,
                        timeout: config.connect_timeout(),
                    });
                }
            };
        stream.set_nodelay(true).map_err(ConnectionError::Io)?;

        tracing::info!(address = %address, "connected to chamber");

        Ok(Self {
            stream: Some(stream),
            peer: address,
            response_timeout: config.response_timeout(),
            settle_delay: config.settle_delay(),
        })
    }

    /// Returns the `host:port` this transport connected to.
    #[must_use]
    pub fn peer(&self) -> &str {
        &self.peer
    }

    fn discard_stale(&mut self) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        let mut stale = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match stream.try_read(&mut chunk) {
                Ok(0) => {
                    tracing::warn!(peer = %self.peer, "chamber closed the connection");
                    self.stream = None;
                    return Err(TransportError::Closed);
                }
                Ok(n) => stale.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e.into()),
            }
        }
        if !stale.is_empty() {
            tracing::warn!(
                peer = %self.peer,
                discarded = %String::from_utf8_lossy(&stale).trim_end(),
                "discarding late response"
            );
        }
        Ok(())
    }
}

impl Transport for TcpTransport {
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.discard_stale()?;
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        let mut response = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        let mut wait = self.response_timeout;
        let mut peer_closed = false;

        loop {
            match tokio::time::timeout(wait, stream.read(&mut chunk)).await {
                Err(_) => break,
                Ok(Ok(0)) => {
                    peer_closed = true;
                    break;
                }
                Ok(Ok(n)) => {
                    response.extend_from_slice(&chunk[..n]);
                    if chunk[..n].iter().any(|b| matches!(b, b'\r' | b'\n')) {
                        break;
                    }
                    wait = self.settle_delay;
                }
                Ok(Err(e)) => return Err(e.into()),
            }
        }

        if peer_closed {
            tracing::warn!(peer = %self.peer, "chamber closed the connection");
            self.stream = None;
            if response.is_empty() {
                return Err(TransportError::Closed);
            }
        }
        Ok(response)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            tracing::info!(peer = %self.peer, "closing chamber connection");
            stream.shutdown().await?;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}
