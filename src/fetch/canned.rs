//! In-memory fetcher serving canned JSON documents by URL.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use super::Fetcher;

#[derive(Default)]
pub(crate) struct CannedFetcher {
    responses: HashMap<String, Value>,
    calls: RefCell<Vec<String>>,
}

impl CannedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), body);
        self
    }

    /// Every URL requested so far, in order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn call_count(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|u| u.as_str() == url).count()
    }
}

impl Fetcher for CannedFetcher {
    async fn fetch_json(&self, url: &str) -> Option<Value> {
        self.calls.borrow_mut().push(url.to_string());
        self.responses.get(url).cloned()
    }
}
