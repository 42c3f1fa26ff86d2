// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a fake 8800 listening on a local TCP port.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thermotron_lib::chamber::{ChamberControl, ChamberSession, LightRequest};
use thermotron_lib::command::Request;
use thermotron_lib::error::{Error, ProtocolError, TransportError};
use thermotron_lib::response::StopCode;
use thermotron_lib::types::ExclusiveOption;
use thermotron_lib::ChamberConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Register state of the fake controller.
#[derive(Debug, Default)]
struct FakeRegisters {
    setpoint: f64,
    options: u16,
    light: u8,
    received: Vec<String>,
}

/// How the fake controller frames its answers.
#[derive(Debug, Clone, Copy)]
enum Framing {
    /// Terminate every answer with CR LF.
    Terminated,
    /// Send the bare value and rely on the client's settle delay.
    Bare,
}

fn answer(registers: &mut FakeRegisters, command: &str) -> String {
    registers.received.push(command.to_string());
    if command == "SETP1?" {
        return format!("{:.2}", registers.setpoint);
    }
    if let Some(value) = command.strip_prefix("SETP1,") {
        registers.setpoint = value.parse().unwrap_or_default();
        return "0".to_string();
    }
    if command == "OPTN?" {
        return registers.options.to_string();
    }
    if let Some(value) = command.strip_prefix("OPTN") {
        registers.options = value.parse().unwrap_or_default();
        return "0".to_string();
    }
    match command {
        "LGHT?" => registers.light.to_string(),
        "LGHT1" => {
            registers.light = 1;
            "0".to_string()
        }
        "LGHT0" => {
            registers.light = 0;
            "0".to_string()
        }
        "SCOD?" => "3".to_string(),
        "PVAR13?" => "-12.40".to_string(),
        _ => "0".to_string(),
    }
}

/// Starts a fake controller serving one connection.
async fn fake_chamber(framing: Framing) -> (ChamberConfig, Arc<Mutex<FakeRegisters>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let registers = Arc::new(Mutex::new(FakeRegisters::default()));
    let shared = Arc::clone(&registers);

    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = socket.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\r', &mut line).await.unwrap_or(0) == 0 {
                break;
            }
            let command = String::from_utf8_lossy(&line).trim_end().to_string();
            let mut reply = answer(&mut shared.lock(), &command);
            if let Framing::Terminated = framing {
                reply.push_str("\r\n");
            }
            if writer.write_all(reply.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    let config = ChamberConfig::new("127.0.0.1")
        .with_port(port)
        .with_description("fake 8800")
        .with_response_timeout(Duration::from_millis(500))
        .with_settle_delay(Duration::from_millis(30));
    (config, registers)
}

#[tokio::test]
async fn setpoint_round_trip() {
    let (config, registers) = fake_chamber(Framing::Terminated).await;
    let session = ChamberSession::open(&config).await.unwrap();
    assert!(!session.is_simulated());

    session.setpoint(1, Request::Write(21.5)).await.unwrap();
    let value = session.setpoint(1, Request::Query).await.unwrap();
    assert_eq!(value.body(), "21.50");
    assert!((value.as_f64().unwrap() - 21.5).abs() < 1e-9);

    assert_eq!(registers.lock().received, vec!["SETP1,21.5", "SETP1?"]);
    session.close().await.unwrap();
}

#[tokio::test]
async fn unterminated_answers_end_after_settle_delay() {
    let (config, _registers) = fake_chamber(Framing::Bare).await;
    let session = ChamberSession::open(&config).await.unwrap();

    assert_eq!(session.process_variable(13).await.unwrap(), -12.4);
    assert!(!session.stop_code().await.unwrap().is_running());
}

#[tokio::test]
async fn options_and_light_over_tcp() {
    let (config, registers) = fake_chamber(Framing::Terminated).await;
    registers.lock().options = 0b10011;
    let session = ChamberSession::open(&config).await.unwrap();

    assert!(
        session
            .enable_option(ExclusiveOption::ProductTemperatureControl)
            .await
            .unwrap()
    );
    assert!(
        !session
            .enable_option(ExclusiveOption::ProductTemperatureControl)
            .await
            .unwrap()
    );
    assert_eq!(registers.lock().options, 1);

    assert!(session.light(LightRequest::Toggle).await.unwrap());
    assert!(session.light(LightRequest::Query).await.unwrap());

    let received = registers.lock().received.clone();
    assert_eq!(
        received,
        vec!["OPTN?", "OPTN001", "OPTN?", "LGHT?", "LGHT1", "LGHT?"]
    );
}

#[tokio::test]
async fn closed_peer_breaks_the_session() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let config = ChamberConfig::new("127.0.0.1")
        .with_port(port)
        .with_response_timeout(Duration::from_millis(500));
    let session = ChamberSession::open(&config).await.unwrap();

    let first = session.stop_code().await.unwrap_err();
    assert!(matches!(first, Error::Transport(_)));

    let second = session.stop_code().await.unwrap_err();
    assert!(matches!(
        second,
        Error::Transport(TransportError::SessionBroken)
    ));
}

#[tokio::test]
async fn late_answer_is_not_taken_for_the_next_one() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = socket.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();

        reader.read_until(b'\r', &mut line).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        writer.write_all(b"85.00\r\n").await.unwrap();

        line.clear();
        reader.read_until(b'\r', &mut line).await.unwrap();
        assert_eq!(line, b"SCOD?\r");
        writer.write_all(b"3\r\n").await.unwrap();
    });

    let config = ChamberConfig::new("127.0.0.1")
        .with_port(port)
        .with_response_timeout(Duration::from_millis(100));
    let session = ChamberSession::open(&config).await.unwrap();

    let err = session.setpoint(1, Request::Query).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::EmptyResponse { .. })
    ));

    // Let the late setpoint answer land before the next command.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(session.stop_code().await.unwrap(), StopCode::EndOfTest);
}
