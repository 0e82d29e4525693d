//! Shared utilities for integration testing.

use std::path::Path;
use std::time::Duration;

use form_relay::config::FormRelayConfig;
use form_relay::store::{FormStore, StoreRecord};

/// Configuration on fixed loopback ports with the bundled site and a scratch store.
pub fn test_config(http_port: u16, ingest_port: u16, store_dir: &Path) -> FormRelayConfig {
    let mut config = FormRelayConfig::default();
    config.http.bind_address = format!("127.0.0.1:{}", http_port);
    config.ingest.bind_address = format!("127.0.0.1:{}", ingest_port);
    config.relay.target_address = format!("127.0.0.1:{}", ingest_port);
    config.site.base_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/front-init").to_string();
    config.store.path = store_dir
        .join("storage")
        .join("data.json")
        .to_string_lossy()
        .into_owned();
    config
}

/// HTTP client that never reuses connections or consults proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll the store until it holds `expected` entries or the deadline passes.
pub async fn wait_for_entries(path: &str, expected: usize) -> StoreRecord {
    let store = FormStore::new(path);
    let mut record = StoreRecord::new();
    for _ in 0..200 {
        if let Ok(current) = store.load().await {
            record = current;
            if record.len() >= expected {
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    record
}
