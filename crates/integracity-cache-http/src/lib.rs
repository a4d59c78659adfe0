//! integracity-cache-http: network side of the IntegraCity API cache

pub mod fetcher;

pub use fetcher::{ReqwestFetcher, build_url};
