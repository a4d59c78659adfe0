use integracity_cache::prelude::*;
use integracity_cache::FetchResponse;
use serde_json::json;
use std::time::Duration;

/// Answers every request with a fixed payload
struct StaticFetcher;

#[async_trait::async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, request: &RequestKey) -> Result<FetchResponse> {
        let body = json!({"path": request.path(), "ok": true}).to_string();
        Ok(FetchResponse::new(http::StatusCode::OK, request.cache_key(), body))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let clock = ManualClock::new(0);
    let cache = ApiCache::builder(ApiCacheConfig::default().max_cache_size(3))
        .clock(clock.clone())
        .fetcher(StaticFetcher)
        .build()?;
    cache.start()?;

    // 1. endpoint TTLs
    for path in ["/api/waze/", "/api/sirenes/", "/api/escolas/"] {
        println!("{path} -> {:?}", cache.resolve_ttl(path));
    }

    // 2. set / get
    cache.set("/api/waze/", json!({"jams": 4}), None);
    println!("get waze: {:?}", cache.get("/api/waze/"));

    clock.advance(Duration::from_secs(31));
    println!("get waze after 31s: {:?}", cache.get("/api/waze/"));

    // 3. cached_fetch
    let first = cache.cached_fetch("/api/cameras/", FetchOptions::new()).await?;
    let second = cache.cached_fetch("/api/cameras/", FetchOptions::new()).await?;
    println!("cameras: first from_cache={}, second from_cache={}", first.from_cache, second.from_cache);

    // 4. LRU eviction at capacity 3
    for path in ["/api/a/", "/api/b/", "/api/c/", "/api/d/"] {
        cache.set(path, json!(path), None);
    }
    println!("size at capacity: {}", cache.len());

    // 5. invalidation
    println!("invalidated: {}", cache.invalidate("/api/"));

    println!("stats: {:?}", cache.stats());
    cache.stop();
    Ok(())
}
