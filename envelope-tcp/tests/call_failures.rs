//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Failures before, during and after the exchange.

mod common;

use common::{
    client_for, closed_port, closing_listener, init_tracing, read_request, saturated_listener, silent_listener,
    Responder, ENDPOINT,
};
use envelope_tcp::codec::EmptyOutput;
use envelope_tcp::{
    Command, Endpoint, Session, SessionConfig, SessionOutcome, SessionState, StaticCredentials, TcpClient, TcpError,
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

const BIG_REQUEST: usize = 32 * 1024 * 1024;

#[derive(Serialize)]
struct Upload {
    #[serde(rename = "Data")]
    data: String,
}

impl Upload {
    fn of_size(size: usize) -> Self {
        Self { data: "a".repeat(size) }
    }
}

fn quick() -> SessionConfig {
    SessionConfig::default()
        .with_connect_timeout(Duration::from_millis(500))
        .with_send_timeout(Some(Duration::from_secs(2)))
        .with_receive_timeout(Some(Duration::from_millis(300)))
}

#[tokio::test]
async fn test_unregistered_endpoint() {
    init_tracing();
    let server = Responder::fixed("<Response><Result>OK</Result></Response>").await;
    let client = server.client();

    let result = client
        .execute::<EmptyOutput>(&Endpoint::named("bSocket"), Command::FetchUsers)
        .await;

    assert_eq!(result, Err(TcpError::ConfigurationError));
    assert_eq!(client.metrics().total_connections_opened(), 0);
}

#[tokio::test]
async fn test_port_out_of_range() {
    let client = TcpClient::builder(StaticCredentials::new("ORG-1", "AC-9")).build();

    for port in [-1, 65_536, 70_000] {
        let result = client
            .execute::<EmptyOutput>(&Endpoint::explicit("127.0.0.1", port), Command::FetchUsers)
            .await;
        assert_eq!(result, Err(TcpError::ConfigurationError), "port {port}");
    }
}

#[tokio::test]
async fn test_unresolvable_host() {
    let client = TcpClient::builder(StaticCredentials::new("ORG-1", "AC-9")).build();

    let result = client
        .execute::<EmptyOutput>(&Endpoint::explicit("no-such-host.invalid", 7001), Command::FetchUsers)
        .await;

    assert_eq!(result, Err(TcpError::AddressResolutionError));
    assert!(result.unwrap_err().is_recoverable());
}

#[tokio::test]
async fn test_connection_refused() {
    let client = client_for(closed_port().await, quick());

    let result = client
        .execute::<EmptyOutput>(&Endpoint::named(ENDPOINT), Command::FetchUsers)
        .await;

    assert_eq!(result, Err(TcpError::ConnectionError));
    assert_eq!(client.metrics().total_bytes_sent(), 0);
    assert_eq!(client.metrics().total_connections_opened(), 0);
}

#[tokio::test]
async fn test_connect_deadline() {
    init_tracing();
    let server = saturated_listener().await;
    let client = client_for(server.addr, quick().with_connect_timeout(Duration::from_millis(200)));
    let credentials = StaticCredentials::new("ORG-1", "AC-9");
    let mut session = Session::new(
        client.resolver(),
        &credentials,
        client.codec(),
        client.session_config(),
        client.metrics(),
    );

    let started = Instant::now();
    let result = session
        .run::<(), EmptyOutput>(&Endpoint::named(ENDPOINT), Command::FetchUsers, None)
        .await;

    assert_eq!(result, Err(TcpError::ConnectionError));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(
        session.history(),
        &[
            SessionState::Idle,
            SessionState::Resolving,
            SessionState::Connecting,
            SessionState::Closed(SessionOutcome::Failure)
        ]
    );
    assert_eq!(client.metrics().total_bytes_sent(), 0);
    assert_eq!(client.metrics().total_connections_opened(), 0);
}

#[tokio::test]
async fn test_send_deadline() {
    let client = client_for(
        silent_listener().await,
        quick().with_send_timeout(Some(Duration::from_millis(200))),
    );
    let upload = Upload::of_size(BIG_REQUEST);

    let result = client
        .call::<_, EmptyOutput>(&Endpoint::named(ENDPOINT), Command::UpdateUser, Some(&upload))
        .await;

    assert_eq!(result, Err(TcpError::TimeoutError));
    assert_eq!(client.metrics().total_timeouts(), 1);
    assert_eq!(client.metrics().total_bytes_sent(), 0);
    assert_eq!(client.metrics().active_connections(), 0);
}

#[tokio::test]
async fn test_send_to_closed_peer() {
    let client = client_for(
        closing_listener().await,
        quick().with_send_timeout(Some(Duration::from_secs(10))),
    );
    let upload = Upload::of_size(BIG_REQUEST);

    let result = client
        .call::<_, EmptyOutput>(&Endpoint::named(ENDPOINT), Command::UpdateUser, Some(&upload))
        .await;

    assert_eq!(result, Err(TcpError::SendRequestError));
    assert!(result.unwrap_err().is_recoverable());
    assert_eq!(client.metrics().total_transport_errors(), 1);
    assert_eq!(client.metrics().total_timeouts(), 0);
}

#[tokio::test]
async fn test_receive_deadline() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let client = client_for(addr, quick());
    let result = client
        .execute::<EmptyOutput>(&Endpoint::named(ENDPOINT), Command::FetchUsers)
        .await;

    assert_eq!(result, Err(TcpError::TimeoutError));
    assert!(client.metrics().total_bytes_sent() > 0);
    assert_eq!(client.metrics().total_timeouts(), 1);
    assert_eq!(client.metrics().active_connections(), 0);
}

#[tokio::test]
async fn test_empty_response() {
    let server = Responder::start(|_| Vec::new()).await;
    let client = client_for(server.addr, quick());

    let result = client
        .execute::<EmptyOutput>(&Endpoint::named(ENDPOINT), Command::FetchUsers)
        .await;

    assert_eq!(result, Err(TcpError::UnexpectedResponseFormatError));
}

#[tokio::test]
async fn test_oversized_response() {
    let server = Responder::start(|_| {
        let mut response = b"<Response><Result>OK</Result><Padding>".to_vec();
        response.extend(std::iter::repeat(b'x').take(8 * 1024));
        response.extend_from_slice(b"</Padding></Response>");
        response
    })
    .await;
    let client = client_for(server.addr, quick().with_max_response_size(1024));

    let result = client
        .execute::<EmptyOutput>(&Endpoint::named(ENDPOINT), Command::FetchUsers)
        .await;

    assert_eq!(result, Err(TcpError::UnexpectedResponseFormatError));
}

#[tokio::test]
async fn test_response_split_across_writes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut stream).await;
        for part in ["<Response><Res", "ult>OK</Result>", "</Response>"] {
            stream.write_all(part.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    });

    let client = client_for(addr, quick());
    let result = client
        .execute::<EmptyOutput>(&Endpoint::named(ENDPOINT), Command::FetchUsers)
        .await;

    assert_eq!(result, Ok(EmptyOutput {}));
}

#[tokio::test]
async fn test_connections_close_on_every_outcome() {
    let ok = Responder::fixed("<Response><Result>OK</Result></Response>").await;
    let rejected =
        Responder::fixed("<Response><Result>FAIL</Result><ErrorContents>BAD_COMMAND</ErrorContents></Response>").await;
    let garbled = Responder::fixed("not xml at all").await;
    let client = client_for(ok.addr, quick());

    for addr in [ok.addr, rejected.addr, garbled.addr] {
        let _ = client
            .execute::<EmptyOutput>(&Endpoint::from(addr), Command::FetchUsers)
            .await;
    }

    let metrics = client.metrics();
    assert_eq!(metrics.total_connections_opened(), 3);
    assert_eq!(metrics.total_connections_closed(), 3);
    assert_eq!(metrics.total_sessions_succeeded(), 1);
    assert_eq!(metrics.total_sessions_failed(), 2);
    assert_eq!(metrics.active_sessions(), 0);
}
