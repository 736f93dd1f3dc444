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

//! Loopback servers shared by the integration tests.

#![allow(dead_code)]

use envelope_tcp::{SessionConfig, StaticCredentials, StaticRegistry, TcpClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::mpsc;

/// Registry name the test clients use for the responder.
pub const ENDPOINT: &str = "aSocket";

/// Installs a test-friendly subscriber once; `RUST_LOG` controls output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Reads one request document from `stream`.
pub async fn read_request(stream: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut chunk = [0u8; 4096];
    while !request.ends_with(b"</Request>") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&request).into_owned()
}

/// Server answering every connection with `handler(request)` and then
/// closing it.
pub struct Responder {
    pub addr: SocketAddr,
    requests: mpsc::UnboundedReceiver<String>,
}

impl Responder {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Vec<u8> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (requests_tx, requests) = mpsc::unbounded_channel();
        let handler = Arc::new(handler);

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let handler = Arc::clone(&handler);
                let requests_tx = requests_tx.clone();
                tokio::spawn(async move {
                    let request = read_request(&mut stream).await;
                    let response = handler(&request);
                    let _ = requests_tx.send(request);
                    let _ = stream.write_all(&response).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self { addr, requests }
    }

    /// Answers every request with the same bytes.
    pub async fn fixed(response: &'static str) -> Self {
        Self::start(move |_| response.as_bytes().to_vec()).await
    }

    /// Returns the next request the server saw.
    pub async fn next_request(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(5), self.requests.recv())
            .await
            .unwrap()
            .unwrap()
    }

    /// Builds a client with this server registered as [`ENDPOINT`].
    pub fn client(&self) -> TcpClient {
        client_for(self.addr, SessionConfig::default())
    }
}

/// Builds a client with `addr` registered as [`ENDPOINT`].
pub fn client_for(addr: SocketAddr, config: SessionConfig) -> TcpClient {
    TcpClient::builder(StaticCredentials::new("ORG-1", "AC-9"))
        .with_registry(StaticRegistry::new().with_endpoint(ENDPOINT, addr.ip().to_string(), i32::from(addr.port())))
        .with_session_config(config)
        .build()
}

/// Returns an address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Listener whose accept queue is full, so new connections never complete.
///
/// The listener never accepts, and the queued connections stay open while
/// the value lives.
pub struct Saturated {
    pub addr: SocketAddr,
    _listener: TcpListener,
    _held: Vec<TcpStream>,
}

pub async fn saturated_listener() -> Saturated {
    let socket = TcpSocket::new_v4().unwrap();
    socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let listener = socket.listen(1).unwrap();
    let addr = listener.local_addr().unwrap();

    let mut held = Vec::new();
    for _ in 0..64 {
        match tokio::time::timeout(Duration::from_millis(100), TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => held.push(stream),
            _ => break,
        }
    }

    Saturated {
        addr,
        _listener: listener,
        _held: held,
    }
}

/// Server that accepts connections and never reads from them.
pub async fn silent_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// Server that closes every connection without reading it.
pub async fn closing_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    addr
}

/// Extracts the text of the first `<tag>` element in `xml`.
pub fn element<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = start + xml[start..].find(&close)?;
    Some(&xml[start..end])
}
