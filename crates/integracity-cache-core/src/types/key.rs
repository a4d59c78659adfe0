//! Request signature used as cache key

use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// An API request identified by path and query parameters
///
/// Parameters are kept sorted by name, so the same path with the same
/// parameters always yields the same [`cache_key`](RequestKey::cache_key)
/// regardless of insertion order. Values are stored in their display form;
/// mappings that render identically are the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RequestKey {
    path: String,
    params: BTreeMap<String, String>,
}

impl RequestKey {
    /// Create a key for a path without parameters
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a query parameter; a repeated name replaces the earlier value
    pub fn param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    /// Add multiple parameters
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Request path, used for endpoint TTL resolution
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parameters in name order
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when the request carries query parameters
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Normalized signature: `path` or `path?a=1&b=2`
    pub fn cache_key(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

impl Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

impl From<&str> for RequestKey {
    fn from(path: &str) -> Self {
        RequestKey::new(path)
    }
}

impl From<String> for RequestKey {
    fn from(path: String) -> Self {
        RequestKey::new(path)
    }
}

impl From<&String> for RequestKey {
    fn from(path: &String) -> Self {
        RequestKey::new(path.clone())
    }
}

impl From<&RequestKey> for RequestKey {
    fn from(key: &RequestKey) -> Self {
        key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_only_key() {
        let key = RequestKey::new("/api/sirenes/");
        assert_eq!(key.cache_key(), "/api/sirenes/");
        assert!(!key.has_params());
    }

    #[test]
    fn test_params_sorted_by_name() {
        let a = RequestKey::new("/api/chuva/").param("b", 2).param("a", 1);
        let b = RequestKey::new("/api/chuva/").param("a", 1).param("b", 2);
        assert_eq!(a.cache_key(), "/api/chuva/?a=1&b=2");
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_values_are_not_escaped() {
        let key = RequestKey::new("/api/waze/").param("bbox", "a b&c");
        assert_eq!(key.cache_key(), "/api/waze/?bbox=a b&c");
    }

    #[test]
    fn test_identical_renderings_collide() {
        let numeric = RequestKey::new("/p").param("id", 7);
        let text = RequestKey::new("/p").param("id", "7");
        assert_eq!(numeric.cache_key(), text.cache_key());
    }

    #[test]
    fn test_bulk_params_and_display() {
        let key = RequestKey::from("/api/ocorrencias/").params([("status", "aberta"), ("area", "centro")]);
        assert_eq!(key.to_string(), "/api/ocorrencias/?area=centro&status=aberta");
        let pairs: Vec<_> = key.query_pairs().collect();
        assert_eq!(pairs, vec![("area", "centro"), ("status", "aberta")]);
    }
}
