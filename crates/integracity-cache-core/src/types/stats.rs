//! Cache statistics

use serde::Serialize;

/// Hit-rate rendering used before any lookup has happened
pub const NO_LOOKUPS_HIT_RATE: &str = "0%";

/// Snapshot of cache counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of fresh hits
    pub hits: u64,
    /// Number of misses, expired lookups included
    pub misses: u64,
    /// Number of entries removed by the expiry sweep
    pub expired: u64,
    /// `hits + misses`
    pub total: u64,
    /// Hit rate as a percentage with one decimal, e.g. `"40.0%"`
    pub hit_rate: String,
    /// Current number of entries
    pub cache_size: usize,
}

impl CacheStats {
    /// Build a snapshot, deriving `total` and `hit_rate`
    pub fn new(hits: u64, misses: u64, expired: u64, cache_size: usize) -> Self {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            NO_LOOKUPS_HIT_RATE.to_string()
        } else {
            // ties round up, e.g. 1/400 renders as 0.3%
            let percent = hits as f64 / total as f64 * 100.0;
            format!("{:.1}%", (percent * 10.0).round() / 10.0)
        };
        Self {
            hits,
            misses,
            expired,
            total,
            hit_rate,
            cache_size,
        }
    }

    /// Hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hits as f64 / self.total as f64
        }
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = CacheStats::default();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.hit_rate, "0%");
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_rate_rendering() {
        let stats = CacheStats::new(2, 3, 0, 4);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.hit_rate, "40.0%");
        assert!((stats.hit_ratio() - 0.4).abs() < f64::EPSILON);

        assert_eq!(CacheStats::new(1, 2, 0, 0).hit_rate, "33.3%");
        assert_eq!(CacheStats::new(5, 0, 0, 0).hit_rate, "100.0%");
        assert_eq!(CacheStats::new(0, 7, 0, 0).hit_rate, "0.0%");
    }

    #[test]
    fn test_hit_rate_ties_round_up() {
        assert_eq!(CacheStats::new(1, 399, 0, 0).hit_rate, "0.3%");
        assert_eq!(CacheStats::new(3, 397, 0, 0).hit_rate, "0.8%");
        assert_eq!(CacheStats::new(1, 7, 0, 0).hit_rate, "12.5%");
    }

    #[test]
    fn test_serializes_for_dashboards() {
        let json = serde_json::to_value(CacheStats::new(1, 1, 2, 3)).unwrap();
        assert_eq!(json["hitRate"], "50.0%");
        assert_eq!(json["cacheSize"], 3);
        assert_eq!(json["expired"], 2);
    }
}
