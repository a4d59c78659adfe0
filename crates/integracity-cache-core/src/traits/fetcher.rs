//! Network fetch capability

use async_trait::async_trait;
use http::StatusCode;

use crate::{CacheError, RequestKey, Result};

/// Raw response of a GET request
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Final URL the request was sent to
    pub url: String,
    /// Unparsed body
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: StatusCode, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Fail with [`CacheError::Http`] unless the status is 2xx
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(CacheError::Http {
                status: self.status.as_u16(),
                url: self.url,
            })
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

/// Issues `GET path[?query]` for a request
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Send the request; transport failures are errors, any status is a response
    async fn fetch(&self, request: &RequestKey) -> Result<FetchResponse>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch(&self, request: &RequestKey) -> Result<FetchResponse> {
        (**self).fetch(request).await
    }
}
