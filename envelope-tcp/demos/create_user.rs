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

//! # Create User Example
//!
//! Registers a user with a `REQ_CREATE_USER` call and shows how each
//! outcome is reported.
//!
//! By default a local responder is started on a loopback port. To call a
//! real server instead, set the configuration variables:
//!
//! ```bash
//! ENVELOPE_ORG_ID=ORG-1 ENVELOPE_AUTH_CODE=secret \
//! ENVELOPE_ENDPOINT_ASOCKET=10.0.0.5:7001 \
//! cargo run --example create_user
//! ```
//!
//! Set `RUST_LOG=envelope_tcp=debug` to watch the session state changes.

use envelope_tcp::codec::{base64_bytes, EmptyOutput};
use envelope_tcp::{ClientConfig, Command, Endpoint, TcpClient, TcpError};
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Input for `REQ_CREATE_USER`.
#[derive(Debug, Serialize)]
struct UserInfoInput {
    #[serde(rename = "UserCd")]
    user_code: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "CellPhoneNumber")]
    cell_phone_number: String,
    #[serde(rename = "Img", with = "base64_bytes")]
    image: Vec<u8>,
}

/// Starts a responder that accepts one `REQ_CREATE_USER` per user code and
/// rejects everything else.
async fn start_responder() -> std::io::Result<std::net::SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Ok((mut stream, peer)) = listener.accept().await {
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            while !request.ends_with(b"</Request>") {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let request = String::from_utf8_lossy(&request);
            println!("  [responder] {} bytes from {}", request.len(), peer);

            let response = if !request.contains("<ExecCommand>REQ_CREATE_USER</ExecCommand>") {
                "<Response><Result>FAIL</Result><ErrorContents>BAD_COMMAND</ErrorContents></Response>"
            } else if seen.iter().any(|code: &String| request.contains(code.as_str())) {
                "<Response><Result>FAIL</Result><ErrorContents>USER_EXISTS</ErrorContents></Response>"
            } else {
                if let Some(start) = request.find("<UserCd>") {
                    let rest = &request[start..];
                    if let Some(end) = rest.find("</UserCd>") {
                        seen.push(rest[..end + "</UserCd>".len()].to_string());
                    }
                }
                "<Response><Result>OK</Result></Response>"
            };
            let _ = stream.write_all(response.as_bytes()).await;
        }
    });

    Ok(addr)
}

fn report(label: &str, result: Result<EmptyOutput, TcpError>) {
    match result {
        Ok(_) => println!("{label}: ok"),
        Err(TcpError::CommandSpecificError(detail)) => println!("{label}: rejected ({detail})"),
        Err(e) => println!("{label}: {e} [kind={}, recoverable={}]", e.kind_name(), e.is_recoverable()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Create User Example ===\n");

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(_) => {
            let addr = start_responder().await?;
            println!("Using local responder on {addr}\n");
            ClientConfig::new("ORG-1", "secret").with_endpoint("asocket", addr.ip().to_string(), i32::from(addr.port()))
        }
    };
    let client = TcpClient::from_config(&config);
    let endpoint = Endpoint::named("asocket");

    let user = UserInfoInput {
        user_code: "U0001".to_string(),
        name: "Alice".to_string(),
        gender: "F".to_string(),
        cell_phone_number: "010-1234-5678".to_string(),
        image: b"\x89PNG\r\n\x1a\n".to_vec(),
    };

    report("create", client.call(&endpoint, Command::CreateUser, Some(&user)).await);
    report("create again", client.call(&endpoint, Command::CreateUser, Some(&user)).await);
    report("delete", client.call(&endpoint, Command::DeleteUser, Some(&user)).await);
    report("unknown endpoint", client.execute(&Endpoint::named("bsocket"), Command::FetchUsers).await);

    let metrics = client.metrics();
    println!(
        "\nsessions: {} ok / {} failed, bytes: {} sent / {} received",
        metrics.total_sessions_succeeded(),
        metrics.total_sessions_failed(),
        metrics.total_bytes_sent(),
        metrics.total_bytes_received()
    );

    Ok(())
}
