//! `reqwest`-backed [`Fetcher`]

use async_trait::async_trait;
use http::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use url::Url;

use integracity_cache_core::{CacheError, FetchResponse, Fetcher, RequestKey, Result};

/// Resolve a request against `base`, appending its parameters as a query string
///
/// Absolute request paths are used as they are. Parameter values are
/// form-encoded here, unlike the cache key which keeps them verbatim.
pub fn build_url(base: &Url, request: &RequestKey) -> Result<Url> {
    let mut url = match Url::parse(request.path()) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(request.path())
            .map_err(|e| CacheError::InvalidUrl(format!("{}: {}", request.path(), e)))?,
        Err(e) => return Err(CacheError::InvalidUrl(format!("{}: {}", request.path(), e))),
    };

    if request.has_params() {
        url.query_pairs_mut().extend_pairs(request.query_pairs());
    }
    Ok(url)
}

/// Issues JSON GET requests against the dashboard API
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestFetcher {
    /// Create a fetcher resolving relative paths against `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| CacheError::InvalidUrl(format!("{base_url}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CacheError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Use a preconfigured client (proxies, TLS roots, timeouts)
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &RequestKey) -> Result<FetchResponse> {
        let url = build_url(&self.base_url, request)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| CacheError::Transport(e.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?;

        Ok(FetchResponse::new(status, url.as_str(), body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://siscor.example.rio/mapa/").unwrap()
    }

    #[test]
    fn test_relative_path_joins_origin() {
        let url = build_url(&base(), &RequestKey::new("/api/sirenes/")).unwrap();
        assert_eq!(url.as_str(), "https://siscor.example.rio/api/sirenes/");
    }

    #[test]
    fn test_query_string_from_params() {
        let key = RequestKey::new("/api/chuva/").param("b", 2).param("a", "x y");
        let url = build_url(&base(), &key).unwrap();
        assert_eq!(url.as_str(), "https://siscor.example.rio/api/chuva/?a=x+y&b=2");
    }

    #[test]
    fn test_absolute_path_is_kept() {
        let key = RequestKey::new("http://127.0.0.1:9000/api/waze/");
        let url = build_url(&base(), &key).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/api/waze/");
    }

    #[test]
    fn test_no_params_no_question_mark() {
        let url = build_url(&base(), &RequestKey::new("/api/brt/")).unwrap();
        assert!(url.query().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ReqwestFetcher::new("not a url"),
            Err(CacheError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let fetcher = ReqwestFetcher::new("http://127.0.0.1:1/").unwrap();
        let err = fetcher
            .fetch(&RequestKey::new("/api/sirenes/"))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Transport(_)));
    }
}
