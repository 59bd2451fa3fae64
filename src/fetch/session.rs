use reqwest::header::COOKIE;
use reqwest::Client;

use super::retry::{Attempt, RetryPolicy, StatusClass};
use super::Fetcher;
use crate::config::Config;
use crate::error::{AncestryError, Result};
use serde_json::Value;

const SESSION_COOKIE: &str = "fssessionid";

/// Authenticated FamilySearch session
///
/// Holds the session cookie obtained at login and downloads JSON resources,
/// retrying transient failures at a fixed interval.
pub struct FsSession {
    client: Client,
    session_id: String,
    retry: RetryPolicy,
}

impl FsSession {
    /// Log in with a developer key and account credentials.
    ///
    /// Fails with `AncestryError::Auth` when the service does not hand out a
    /// session cookie.
    pub async fn login(config: &Config, key: &str, username: &str, password: &str) -> Result<Self> {
        let client = build_client(config)?;
        let url = format!("{}/login", config.familysearch.identity_url.trim_end_matches('/'));

        log::info!("Logging in to {} as {}", url, username);
        let response = client
            .post(&url)
            .form(&[("key", key), ("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AncestryError::Auth(format!("login failed with HTTP {}", status)));
        }

        let session_id = response
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| {
                AncestryError::Auth(format!("login response carried no {} cookie", SESSION_COOKIE))
            })?;

        log::debug!("Session established");
        Ok(Self {
            client,
            session_id,
            retry: RetryPolicy::fixed(config.retry_interval()),
        })
    }

    /// Reuse an existing session ID without logging in
    pub fn with_session_id(config: &Config, session_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            session_id: session_id.into(),
            retry: RetryPolicy::fixed(config.retry_interval()),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn attempt(&self, url: &str) -> Attempt {
        log::debug!("Downloading: {}", url);
        let response = match self
            .client
            .get(url)
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, self.session_id))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if RetryPolicy::is_transient_error(&e) => {
                return Attempt::Transient(format!("Network error: {}", e))
            }
            Err(e) => return Attempt::Failed(format!("Request error: {}", e)),
        };

        let status = response.status();
        log::debug!("Status code: {}", status.as_u16());

        match RetryPolicy::classify_status(status) {
            StatusClass::NoContent => Attempt::NoContent,
            StatusClass::Transient => Attempt::Transient(format!("HTTP {}", status)),
            StatusClass::Permanent => Attempt::Failed(format!("Unexpected status {}", status)),
            StatusClass::Success => {
                // A body cut off mid-stream is retried; only a complete but undecodable body fails.
                let body = match response.bytes().await {
                    Ok(body) => body,
                    Err(e) => return Attempt::Transient(format!("Body read error: {}", e)),
                };
                match serde_json::from_slice::<Value>(&body) {
                    Ok(value) => Attempt::Data(value),
                    Err(e) => Attempt::Failed(format!("Failed to parse response: {}", e)),
                }
            }
        }
    }
}

impl Fetcher for FsSession {
    async fn fetch_json(&self, url: &str) -> Option<Value> {
        self.retry.run(url, || self.attempt(url)).await
    }
}

fn build_client(config: &Config) -> Result<Client> {
    Ok(Client::builder().timeout(config.request_timeout()).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn flaky(State(hits): State<Arc<AtomicUsize>>) -> Response {
        if hits.fetch_add(1, Ordering::SeqCst) < 2 {
            StatusCode::BAD_GATEWAY.into_response()
        } else {
            Json(json!({"ok": true})).into_response()
        }
    }

    async fn echo_cookie(headers: HeaderMap) -> Json<Value> {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        Json(json!({ "cookie": cookie }))
    }

    async fn login() -> impl IntoResponse {
        ([(header::SET_COOKIE, "fssessionid=session-42; Path=/")], "ok")
    }

    /// Serve a stand-in for the remote service; returns its base URL and hit counter.
    async fn spawn_server() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/flaky.json", get(flaky))
            .route("/empty.json", get(|| async { StatusCode::NO_CONTENT }))
            .route("/broken.json", get(|| async { "not json" }))
            .route("/missing.json", get(|| async { StatusCode::NOT_FOUND }))
            .route("/echo.json", get(echo_cookie))
            .route("/identity/login", post(login))
            .route("/denied/login", post(|| async { StatusCode::UNAUTHORIZED }))
            .with_state(hits.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), hits)
    }

    /// Raw socket server whose first response promises more body than it sends
    /// before hanging up; later connections get the complete document.
    async fn spawn_truncating_server() -> (String, Arc<AtomicUsize>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = connections.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(read) => request.extend_from_slice(&buf[..read]),
                    }
                }
                let response = if n == 0 {
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"ok\": tr".to_string()
                } else {
                    let body = r#"{"ok": true}"#;
                    format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    )
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{}", addr), connections)
    }

    fn test_config(base: &str) -> Config {
        let mut config = Config::default();
        config.familysearch.identity_url = format!("{}/identity", base);
        config.familysearch.platform_url = base.to_string();
        config.retry.interval_ms = 5;
        config
    }

    #[tokio::test]
    async fn test_fetch_retries_bad_gateway() {
        let (base, hits) = spawn_server().await;
        let session = FsSession::with_session_id(&test_config(&base), "s").unwrap();
        let value = session.fetch_json(&format!("{}/flaky.json", base)).await;
        assert_eq!(value, Some(json!({"ok": true})));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_no_content() {
        let (base, _) = spawn_server().await;
        let session = FsSession::with_session_id(&test_config(&base), "s").unwrap();
        assert!(session.fetch_json(&format!("{}/empty.json", base)).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_malformed_is_no_data() {
        let (base, _) = spawn_server().await;
        let session = FsSession::with_session_id(&test_config(&base), "s").unwrap();
        assert!(session.fetch_json(&format!("{}/broken.json", base)).await.is_none());
        assert!(session.fetch_json(&format!("{}/missing.json", base)).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_retries_truncated_body() {
        let (base, connections) = spawn_truncating_server().await;
        let session = FsSession::with_session_id(&test_config(&base), "s").unwrap();
        let value = session.fetch_json(&format!("{}/person.json", base)).await;
        assert_eq!(value, Some(json!({"ok": true})));
        assert_eq!(connections.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_sends_session_cookie() {
        let (base, _) = spawn_server().await;
        let session = FsSession::with_session_id(&test_config(&base), "abc").unwrap();
        let value = session.fetch_json(&format!("{}/echo.json", base)).await.unwrap();
        assert_eq!(value["cookie"], "fssessionid=abc");
    }

    #[tokio::test]
    async fn test_login_reads_session_cookie() {
        let (base, _) = spawn_server().await;
        let session = FsSession::login(&test_config(&base), "KEY", "user", "secret")
            .await
            .unwrap();
        assert_eq!(session.session_id(), "session-42");
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let (base, _) = spawn_server().await;
        let mut config = test_config(&base);
        config.familysearch.identity_url = format!("{}/denied", base);
        let err = FsSession::login(&config, "KEY", "user", "wrong").await.err().unwrap();
        assert!(matches!(err, AncestryError::Auth(_)));
    }
}
