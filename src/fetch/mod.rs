//! Remote fetcher: authenticated JSON downloads with a fixed-interval retry policy.

mod retry;
mod session;

#[cfg(test)]
pub(crate) mod canned;

pub use retry::{Attempt, RetryPolicy, StatusClass};
pub use session::FsSession;

use serde_json::Value;

/// "Fetch JSON by URL" capability consumed by the resolver.
///
/// Implementations absorb transient failures themselves. `None` means the
/// resource had no content, or its response was unusable and has been logged.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch_json(&self, url: &str) -> Option<Value>;
}

impl<T: Fetcher> Fetcher for &T {
    async fn fetch_json(&self, url: &str) -> Option<Value> {
        (**self).fetch_json(url).await
    }
}
