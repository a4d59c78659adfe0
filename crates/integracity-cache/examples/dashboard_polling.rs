//! Warm the dashboard endpoints, then poll them through the cache.
//!
//! Point `INTEGRACITY_BASE_URL` at a running backend; without one every
//! fetch fails and the failures are logged.

use integracity_cache::prelude::*;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const DASHBOARD_ENDPOINTS: &[&str] = &[
    "/api/estagio-atual/",
    "/api/sirenes/",
    "/api/alertas/",
    "/api/ocorrencias/",
    "/api/cameras/",
    "/api/waze/",
];

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let base_url = std::env::var("INTEGRACITY_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000/".to_string());

    let config = ApiCacheConfig::with_base_url(base_url)
        .debug(true)
        .coalesce_fetches()
        .sweep_interval(Duration::from_secs(10));
    let cache = ApiCache::new(config)?;
    cache.start()?;

    println!("Prefetching {} endpoints...", DASHBOARD_ENDPOINTS.len());
    cache.prefetch(DASHBOARD_ENDPOINTS.iter().copied()).await;

    for round in 1..=3 {
        println!("\nPoll round {round}");
        for path in DASHBOARD_ENDPOINTS {
            match cache.cached_fetch(*path, FetchOptions::new()).await {
                Ok(outcome) => println!("   {path}: from_cache={}", outcome.from_cache),
                Err(e) => println!("   {path}: {e}"),
            }
        }

        // filtered query, cached under its own key
        let key = RequestKey::new("/api/ocorrencias/").param("status", "aberta");
        if let Err(e) = cache.cached_fetch(&key, FetchOptions::new()).await {
            println!("   {key}: {e}");
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    // operator asked for fresh siren data
    match cache
        .cached_fetch("/api/sirenes/", FetchOptions::new().bypass_cache())
        .await
    {
        Ok(outcome) => println!("\nRefreshed /api/sirenes/: {}", outcome.data),
        Err(e) => println!("\nRefresh of /api/sirenes/ failed: {e}"),
    }

    println!("\nStats: {:?}", cache.stats());
    cache.stop();
    Ok(())
}
