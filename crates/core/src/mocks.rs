//! Mock vision client for testing without real API calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::traits::VisionClient;

/// Mock vision client returning a canned reply.
pub struct MockVisionClient {
    /// Reply to return.
    reply: String,
    /// Simulate failure.
    failure: Option<Error>,
    /// Number of analyze calls received.
    calls: AtomicUsize,
}

impl MockVisionClient {
    /// Create a mock that returns the given reply.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that fails every call with the given error.
    pub fn failing(error: Error) -> Self {
        Self {
            reply: String::new(),
            failure: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of analyze calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn analyze(&self, _image_base64: &str, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.reply.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_reply_and_counts_calls() {
        let mock = MockVisionClient::new("{}");
        assert_eq!(mock.call_count(), 0);

        let reply = mock.analyze("aW1n", "prompt").await.unwrap();
        assert_eq!(reply, "{}");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockVisionClient::failing(Error::rate_limited("slow down"));
        let err = mock.analyze("aW1n", "prompt").await.unwrap_err();
        assert!(matches!(err, Error::ExternalService { .. }));
    }
}
