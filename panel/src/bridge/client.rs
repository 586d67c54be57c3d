//! Request/response side of the bridge: a batch of commands in, one text
//! output per command out, positionally aligned.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::command::Command;
use crate::core::prelude::*;
use crate::settings::PanelSettings;

#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Runs `commands` in order. On success the result holds exactly one
    /// output per command. A command that ran but printed nothing yields an
    /// empty string; a request that failed to run is an error.
    async fn run(
        &self,
        commands: &[Command],
    ) -> Result<Vec<String>, BridgeError>;
}

#[derive(Debug, Serialize)]
struct CommandRequest {
    commands: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    outputs: Vec<String>,
}

pub struct HttpCommandClient {
    client: reqwest::Client,
    url: String,
}

impl HttpCommandClient {
    pub fn new(settings: &PanelSettings) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::with_client(client, settings.command_url()))
    }

    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl CommandTransport for HttpCommandClient {
    async fn run(
        &self,
        commands: &[Command],
    ) -> Result<Vec<String>, BridgeError> {
        if commands.is_empty() {
            return Ok(Vec::new());
        }

        let request = CommandRequest {
            commands: commands.iter().map(Command::to_string).collect(),
        };
        debug!("-> {:?}", request.commands);

        let response =
            self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let response: CommandResponse = serde_json::from_slice(&body)?;
        trace!("<- {:?}", response.outputs);

        if response.outputs.len() != commands.len() {
            return Err(BridgeError::OutputMismatch {
                expected: commands.len(),
                actual: response.outputs.len(),
            });
        }

        Ok(response.outputs)
    }
}

#[cfg(test)]
pub mod client_tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves a single canned HTTP response and hands back the request text.
    /// The returned URL is the server root.
    pub async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    fn client(root: String) -> HttpCommandClient {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpCommandClient::with_client(client, format!("{}/command", root))
    }

    #[tokio::test]
    async fn test_outputs_are_aligned_with_commands() {
        let (url, server) =
            serve_once("200 OK", r#"{"outputs": ["", "1p\n"]}"#).await;

        let outputs = client(url)
            .run(&[
                Command::set_switch("cy.op", "1p"),
                Command::query_switch("cy.op"),
            ])
            .await
            .unwrap();

        assert_eq!(outputs, vec!["".to_string(), "1p\n".to_string()]);
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /command"));
        assert!(request.contains(r#""commands":["s cy.op 1p","s? cy.op"]"#));
    }

    #[tokio::test]
    async fn test_server_error_is_not_empty_output() {
        let (url, server) =
            serve_once("500 Internal Server Error", "{}").await;

        let result = client(url).run(&[Command::press_button("c")]).await;

        assert!(matches!(
            result,
            Err(BridgeError::Status { status: 500, .. })
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_misaligned_outputs_are_rejected() {
        let (url, server) = serve_once("200 OK", r#"{"outputs": []}"#).await;

        let result = client(url).run(&[Command::query_port("i.ci1")]).await;

        assert!(matches!(
            result,
            Err(BridgeError::OutputMismatch {
                expected: 1,
                actual: 0
            })
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_batch_skips_the_request() {
        let outputs = client("http://127.0.0.1:9".into())
            .run(&[])
            .await
            .unwrap();
        assert!(outputs.is_empty());
    }
}
