use reqwest::StatusCode;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Outcome of a single request attempt
#[derive(Debug)]
pub enum Attempt {
    Data(Value),
    NoContent,
    /// Worth repeating unchanged (connection trouble, 500/502)
    Transient(String),
    /// Will not get better by retrying
    Failed(String),
}

/// How an HTTP status is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    NoContent,
    Transient,
    Permanent,
}

/// Retry the identical request at a fixed interval, without an attempt cap.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    interval: Duration,
}

impl RetryPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn classify_status(status: StatusCode) -> StatusClass {
        match status {
            StatusCode::NO_CONTENT => StatusClass::NoContent,
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::BAD_GATEWAY => StatusClass::Transient,
            s if s.is_success() => StatusClass::Success,
            _ => StatusClass::Permanent,
        }
    }

    pub fn is_transient_error(err: &reqwest::Error) -> bool {
        err.is_connect() || err.is_timeout() || err.is_request()
    }

    /// Drive `attempt` until it yields data, no content, or a permanent failure.
    pub async fn run<F, Fut>(&self, url: &str, mut attempt: F) -> Option<Value>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Attempt>,
    {
        let mut retries = 0usize;
        loop {
            match attempt().await {
                Attempt::Data(value) => {
                    if retries > 0 {
                        log::debug!("{} succeeded after {} retries", url, retries);
                    }
                    return Some(value);
                }
                Attempt::NoContent => return None,
                Attempt::Transient(reason) => {
                    retries += 1;
                    log::warn!("Retry {} for {} after error: {}", retries, url, reason);
                    tokio::time::sleep(self.interval).await;
                }
                Attempt::Failed(reason) => {
                    log::warn!("Giving up on {}: {}", url, reason);
                    return None;
                }
            }
        }
    }
}
