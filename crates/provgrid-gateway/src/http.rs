//! HTTP implementation of the push capability.
//!
//! Talks to the gateway's northbound API over a plain http1 connection per
//! push. Rollouts fan these out from short-lived workers, so there is no
//! connection pooling to manage.

use std::time::Duration;

use async_trait::async_trait;
use http_body_util::BodyExt;
use serde_json::Value;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};
use crate::push::{Gateway, PushResult};
use crate::response::rejected_lines;

/// Pushes configurations via the gateway's `POST /api/v1/device/{serial}/configure`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    /// Gateway address as `host:port`.
    address: String,
    /// Per-push timeout covering connect, request, and response.
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Override the per-push timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn send(&self, serial_number: &str, document: &Value) -> GatewayResult<PushResult> {
        let uri = format!(
            "http://{}/api/v1/device/{}/configure",
            self.address, serial_number
        );
        let payload = serde_json::json!({
            "serialNumber": serial_number,
            "configuration": document,
        });
        let body = serde_json::to_vec(&payload)
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let stream = tokio::net::TcpStream::connect(&self.address)
            .await
            .map_err(|e| GatewayError::Connect(e.to_string()))?;

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| GatewayError::Connect(e.to_string()))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = http::Request::builder()
            .method("POST")
            .uri(&uri)
            .header("host", &self.address)
            .header("content-type", "application/json")
            .header("user-agent", "provgrid-gateway/0.1")
            .body(http_body_util::Full::new(bytes::Bytes::from(body)))
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?
            .to_bytes();
        let response: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?
        };

        if !status.is_success() {
            debug!(%serial_number, %status, "gateway rejected configuration push");
            return Ok(PushResult::Rejected {
                lines: rejected_lines(&response),
            });
        }

        let lines = rejected_lines(&response);
        if lines.is_empty() {
            debug!(%serial_number, "configuration push accepted");
            Ok(PushResult::Accepted)
        } else {
            debug!(%serial_number, rejected = lines.len(), "configuration partially rejected");
            Ok(PushResult::Rejected { lines })
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn push(&self, serial_number: &str, document: &Value) -> GatewayResult<PushResult> {
        match tokio::time::timeout(self.timeout, self.send(serial_number, document)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(%serial_number, "gateway push timed out");
                Err(GatewayError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serve a single canned HTTP response on an ephemeral port.
    async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Drain the request headers (and whatever body arrived with them).
            let mut buf = vec![0u8; 8192];
            let mut seen = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
                if seen.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        });

        address
    }

    #[tokio::test]
    async fn accepted_on_clean_200() {
        let address = one_shot_server("HTTP/1.1 200 OK", r#"{"results":{"status":{"error":0}}}"#).await;
        let gateway = HttpGateway::new(address).with_timeout(Duration::from_secs(5));

        let result = gateway.push("aa0000000001", &json!({ "uuid": 1 })).await.unwrap();
        assert_eq!(result, PushResult::Accepted);
    }

    #[tokio::test]
    async fn rejected_lines_on_200_with_rejections() {
        let address = one_shot_server(
            "HTTP/1.1 200 OK",
            r#"{"results":{"status":{"error":1,"rejected":["radios.0.channel"]}}}"#,
        )
        .await;
        let gateway = HttpGateway::new(address).with_timeout(Duration::from_secs(5));

        let result = gateway.push("aa0000000001", &json!({ "uuid": 1 })).await.unwrap();
        assert_eq!(
            result,
            PushResult::Rejected {
                lines: vec!["radios.0.channel".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn rejected_on_non_2xx() {
        let address = one_shot_server("HTTP/1.1 400 Bad Request", r#"{}"#).await;
        let gateway = HttpGateway::new(address).with_timeout(Duration::from_secs(5));

        let result = gateway.push("aa0000000001", &json!({ "uuid": 1 })).await.unwrap();
        assert_eq!(result, PushResult::Rejected { lines: Vec::new() });
    }

    #[tokio::test]
    async fn connect_failure_is_an_error() {
        // Port 1 won't be listening.
        let gateway = HttpGateway::new("127.0.0.1:1").with_timeout(Duration::from_secs(1));

        let result = gateway.push("aa0000000001", &json!({ "uuid": 1 })).await;
        assert!(matches!(result, Err(GatewayError::Connect(_))));
    }
}
