// HTTP gateway to the irrigation device
use crate::application::device_gateway::DeviceGateway;
use crate::domain::command::CommandRequest;
use crate::domain::error::DashboardError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDeviceClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpDeviceClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build device HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn build_url(&self, request: &CommandRequest) -> String {
        let mut url = format!("{}/{}", self.base_url, request.endpoint);
        for (i, (key, value)) in request.params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    fn transport_error(&self, endpoint: &str, err: reqwest::Error) -> DashboardError {
        if err.is_timeout() {
            DashboardError::RequestTimedOut {
                endpoint: endpoint.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            // Drop the URL; it can carry the device password.
            DashboardError::SourceUnavailable {
                endpoint: endpoint.to_string(),
                reason: err.without_url().to_string(),
            }
        }
    }
}

#[async_trait]
impl DeviceGateway for HttpDeviceClient {
    async fn send(&self, request: &CommandRequest) -> Result<String, DashboardError> {
        let url = self.build_url(request);
        tracing::debug!(endpoint = %request.endpoint, params = request.params.len(), "Sending device request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&request.endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&request.endpoint, e))?;

        if !status.is_success() {
            tracing::warn!(endpoint = %request.endpoint, status = status.as_u16(), "Device rejected request");
            return Err(DashboardError::DeviceRejected {
                endpoint: request.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::DeviceCommand;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client() -> HttpDeviceClient {
        HttpDeviceClient::new("http://192.168.4.1/".to_string(), Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_build_url_without_params() {
        let request = CommandRequest::new("data.csv");
        assert_eq!(client().build_url(&request), "http://192.168.4.1/data.csv");
    }

    #[test]
    fn test_build_url_encodes_params_in_order() {
        let request = CommandRequest::new("setConfig")
            .with_param("moisture_threashold", "512")
            .with_param("password", "a b&c");
        assert_eq!(
            client().build_url(&request),
            "http://192.168.4.1/setConfig?moisture_threashold=512&password=a%20b%26c"
        );
    }

    #[test]
    fn test_build_url_for_command() {
        let request = DeviceCommand::ManualWatering.request("1234");
        assert_eq!(
            client().build_url(&request),
            "http://192.168.4.1/manualWatering?password=1234"
        );
    }

    /// Loopback address with nothing listening on it.
    async fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_unreachable_device_is_source_unavailable() {
        let client = HttpDeviceClient::new(closed_port().await, Duration::from_secs(2)).unwrap();

        let err = client
            .send(&DeviceCommand::Reboot.request("1234"))
            .await
            .unwrap_err();

        match err {
            DashboardError::SourceUnavailable { endpoint, reason } => {
                assert_eq!(endpoint, "reboot");
                assert!(!reason.contains("1234"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_silent_device_times_out() {
        // Accept the connection and never answer.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let client =
            HttpDeviceClient::new(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        let err = client
            .send(&CommandRequest::new("data.csv"))
            .await
            .unwrap_err();
        server.abort();

        assert_eq!(
            err,
            DashboardError::RequestTimedOut {
                endpoint: "data.csv".to_string(),
                timeout_ms: 200,
            }
        );
    }

    #[tokio::test]
    async fn test_error_status_is_device_rejected_with_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let body = "Invalid password";
            let reply = format!(
                "HTTP/1.1 401 Unauthorized\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
        });

        let client = HttpDeviceClient::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = client
            .send(&DeviceCommand::ManualWatering.request("0000"))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert_eq!(
            err,
            DashboardError::DeviceRejected {
                endpoint: "manualWatering".to_string(),
                status: 401,
                body: "Invalid password".to_string(),
            }
        );
    }
}
