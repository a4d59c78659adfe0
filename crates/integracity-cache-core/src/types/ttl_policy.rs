//! Per-endpoint TTL table

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One row of the endpoint TTL table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointTtl {
    /// Substring looked up in the request path
    pub pattern: String,
    /// Freshness window for matching paths
    #[serde(rename = "ttlMs", with = "crate::duration_ms")]
    pub ttl: Duration,
}

impl EndpointTtl {
    pub fn new(pattern: impl Into<String>, ttl: Duration) -> Self {
        Self {
            pattern: pattern.into(),
            ttl,
        }
    }
}

/// Ordered endpoint → TTL table
///
/// The first row whose pattern occurs in the path wins, so row order is the
/// tie-break between overlapping patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TtlPolicy {
    rules: Vec<EndpointTtl>,
}

impl TtlPolicy {
    /// Empty table: every path falls back to the default TTL
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule after the existing ones
    pub fn rule(mut self, pattern: impl Into<String>, ttl: Duration) -> Self {
        self.rules.push(EndpointTtl::new(pattern, ttl));
        self
    }

    /// Append a rule with TTL in seconds
    pub fn rule_secs(self, pattern: impl Into<String>, seconds: u64) -> Self {
        self.rule(pattern, Duration::from_secs(seconds))
    }

    /// TTL of the first rule matching `path`
    pub fn lookup(&self, path: &str) -> Option<Duration> {
        self.rules
            .iter()
            .find(|rule| path.contains(rule.pattern.as_str()))
            .map(|rule| rule.ttl)
    }

    /// TTL for `path`, or `fallback` when no rule matches
    pub fn resolve(&self, path: &str, fallback: Duration) -> Duration {
        self.lookup(path).unwrap_or(fallback)
    }

    pub fn rules(&self) -> &[EndpointTtl] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for TtlPolicy {
    /// The dashboard's endpoint table
    fn default() -> Self {
        Self::empty()
            .rule_secs("estagio-atual", 30)
            .rule_secs("cameras", 120)
            .rule_secs("sirenes", 60)
            .rule_secs("alertas", 30)
            .rule_secs("ocorrencias", 45)
            .rule_secs("chuva", 60)
            .rule_secs("ventos", 120)
            .rule_secs("pluviometros", 60)
            .rule_secs("transito-status", 60)
            .rule_secs("brt", 120)
            .rule_secs("metro", 120)
            .rule_secs("waze", 30)
            .rule_secs("escolas", 300)
            .rule_secs("hospitais", 300)
            .rule_secs("bens-tombados", 300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.len(), 15);
        assert_eq!(policy.lookup("/api/sirenes/x"), Some(Duration::from_secs(60)));
        assert_eq!(policy.lookup("/api/cameras/"), Some(Duration::from_secs(120)));
        assert_eq!(policy.lookup("/api/ocorrencias/?s=1"), Some(Duration::from_secs(45)));
        assert_eq!(policy.lookup("/api/bens-tombados/"), Some(Duration::from_secs(300)));
        assert_eq!(policy.lookup("/api/unknown/"), None);
    }

    #[test]
    fn test_first_match_wins() {
        // both "estagio-atual" and "alertas" occur; the earlier row decides
        let policy = TtlPolicy::default();
        assert_eq!(
            policy.lookup("/api/estagio-atual/alertas"),
            Some(Duration::from_secs(30))
        );

        let policy = TtlPolicy::empty().rule_secs("api", 5).rule_secs("api/waze", 99);
        assert_eq!(policy.lookup("/api/waze/"), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_resolve_fallback() {
        let policy = TtlPolicy::empty();
        assert!(policy.is_empty());
        assert_eq!(
            policy.resolve("/api/sirenes/", Duration::from_secs(60)),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_deserialize_rows() {
        let policy: TtlPolicy =
            serde_json::from_str(r#"[{"pattern":"waze","ttlMs":1500}]"#).unwrap();
        assert_eq!(policy.rules()[0], EndpointTtl::new("waze", Duration::from_millis(1500)));
    }
}
