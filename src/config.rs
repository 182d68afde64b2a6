use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub storage_path: String,
}

pub fn load() -> Result<Config> {
    load_from(|key| env::var(key).ok())
}

pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let api_base_url = lookup("LOTTO_API_BASE_URL")
        .unwrap_or_else(|| "http://localhost:8080/api".to_string())
        .trim_end_matches('/')
        .to_string();

    let timeout_ms = match lookup("LOTTO_API_TIMEOUT_MS") {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("LOTTO_API_TIMEOUT_MS is not a number: {raw}"))?,
        None => 10_000,
    };

    let storage_path =
        lookup("LOTTO_STORAGE_PATH").unwrap_or_else(|| "data/lotto_storage.db".to_string());

    Ok(Config {
        api_base_url,
        request_timeout: Duration::from_millis(timeout_ms),
        storage_path,
    })
}
