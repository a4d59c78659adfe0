use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;

use integracity_cache_core::{CacheError, Result};

type Shared = Result<serde_json::Value>;

/// Single-flight gate for concurrent fetches of the same key
#[derive(Clone, Default)]
pub struct Coalescer {
    // key -> sender of the leader's result
    inflight: Arc<DashMap<String, broadcast::Sender<Shared>>>,
}

/// Removes the in-flight slot even if the leader future is dropped mid-request
struct InflightGuard<'a> {
    map: &'a DashMap<String, broadcast::Sender<Shared>>,
    key: &'a str,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(self.key);
    }
}

impl Coalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a request in flight
    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    /// Run `f` for `key`, or wait for the run already in flight.
    ///
    /// Followers receive a clone of the leader's result.
    pub async fn do_request<F, Fut>(&self, key: &str, f: F) -> Shared
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Shared>,
    {
        // scope drops the DashMap shard lock before any await
        let action = {
            match self.inflight.entry(key.to_string()) {
                dashmap::mapref::entry::Entry::Occupied(o) => Ok(o.get().subscribe()),
                dashmap::mapref::entry::Entry::Vacant(v) => {
                    let (tx, _rx) = broadcast::channel(1);
                    v.insert(tx.clone());
                    Err(tx)
                }
            }
        };

        match action {
            Ok(mut rx) => match rx.recv().await {
                Ok(res) => res,
                Err(_) => Err(CacheError::Internal(format!(
                    "in-flight request for {key} was abandoned"
                ))),
            },
            Err(tx) => {
                let guard = InflightGuard {
                    map: &self.inflight,
                    key,
                };
                let result = f().await;
                drop(guard);

                if tx.receiver_count() > 0 {
                    let _ = tx.send(result.clone());
                }
                result
            }
        }
    }
}
