use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::WebhookConfig;

/// Outbound notification sink. Delivery happens inline; the caller decides
/// what a failure means.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, payload: &Value) -> anyhow::Result<()>;
}

/// POSTs the payload as JSON to a fixed URL. Only transport errors and
/// timeouts fail delivery; any HTTP reply counts as delivered.
#[derive(Clone)]
pub struct WebhookNotifier {
    http: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(config: &WebhookConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build webhook client")?;
        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, payload: &Value) -> anyhow::Result<()> {
        let response = self
            .http
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("webhook POST {}", self.url))?;
        let status = response.status();
        if status.is_success() {
            debug!(url = %self.url, %status, "webhook delivered");
        } else {
            warn!(url = %self.url, %status, "webhook answered with non-success status");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Accepts one connection, captures the raw request and answers with `status_line`.
    async fn one_shot_server(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/webhook", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some((head, body)) = text.split_once("\r\n\r\n") {
                    let len = head
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if body.len() >= len {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let reply = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            socket.write_all(reply.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });
        (url, handle)
    }

    fn notifier(url: String) -> WebhookNotifier {
        WebhookNotifier::new(&WebhookConfig {
            url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_json_payload() {
        let (url, server) = one_shot_server("200 OK").await;
        let payload = serde_json::json!({"job_id": 7, "company": "Acme"});
        notifier(url).notify(&payload).await.expect("delivered");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /webhook"));
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(raw.contains(r#""company":"Acme""#));
    }

    #[tokio::test]
    async fn error_status_still_counts_as_delivered() {
        for status_line in ["404 Not Found", "503 Service Unavailable"] {
            let (url, server) = one_shot_server(status_line).await;
            let res = notifier(url).notify(&serde_json::json!({"job_id": 1})).await;
            assert!(res.is_ok(), "{status_line}: {res:?}");
            assert!(server.await.unwrap().contains(r#""job_id":1"#));
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/webhook", listener.local_addr().unwrap());
        drop(listener);
        assert!(notifier(url).notify(&serde_json::json!({})).await.is_err());
    }
}
