//! Where feed bodies come from.

use async_trait::async_trait;
use pulse_http::{HttpClient, HttpError};

/// Fetch the raw body of one feed. A failure concerns that feed only.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, HttpError>;
}

#[async_trait]
impl FeedSource for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        self.get_text(url).await
    }
}
