use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::{
    CatalogConfig, ControllerOptions, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SEARCH_DEBOUNCE, DUMMYJSON_URL, JSONPLACEHOLDER_URL,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub jsonplaceholder_url: String,
    pub dummyjson_url: String,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jsonplaceholder_url: JSONPLACEHOLDER_URL.into(),
            dummyjson_url: DUMMYJSON_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            jsonplaceholder_url: self.jsonplaceholder_url.clone(),
            dummyjson_url: self.dummyjson_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            page_size: self.page_size,
            search_debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    jsonplaceholder_url: Option<String>,
    dummyjson_url: Option<String>,
    page_size: Option<u32>,
    debounce_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `path` if it exists, then `APP__*` environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.jsonplaceholder_url {
        settings.jsonplaceholder_url = v;
    }
    if let Some(v) = file_cfg.dummyjson_url {
        settings.dummyjson_url = v;
    }
    if let Some(v) = file_cfg.page_size.filter(|v| *v > 0) {
        settings.page_size = v;
    }
    if let Some(v) = file_cfg.debounce_ms {
        settings.debounce_ms = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs.filter(|v| *v > 0) {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__JSONPLACEHOLDER_URL") {
        settings.jsonplaceholder_url = v;
    }
    if let Some(v) = lookup("APP__DUMMYJSON_URL") {
        settings.dummyjson_url = v;
    }
    if let Some(v) = lookup("APP__PAGE_SIZE").and_then(|v| parse_positive(&v)) {
        settings.page_size = v as u32;
    }
    if let Some(v) = lookup("APP__DEBOUNCE_MS").and_then(|v| v.trim().parse().ok()) {
        settings.debounce_ms = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS").and_then(|v| parse_positive(&v)) {
        settings.request_timeout_secs = v;
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0 && *v <= u64::from(u32::MAX))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
