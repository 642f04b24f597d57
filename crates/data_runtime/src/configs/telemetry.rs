//! Telemetry configuration loaded from data/config/telemetry.toml with env overrides.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryCfg {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
    /// Multi-line human-readable output (ignored when `json_logs` is set).
    pub pretty: Option<bool>,
}

impl Default for TelemetryCfg {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            json_logs: Some(false),
            pretty: Some(false),
        }
    }
}

impl TelemetryCfg {
    #[must_use]
    pub fn level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

pub fn load_default() -> Result<TelemetryCfg> {
    let mut cfg = match crate::loader::read_optional("config/telemetry.toml")? {
        Some(txt) => toml::from_str::<TelemetryCfg>(&txt).context("parse telemetry TOML")?,
        None => TelemetryCfg::default(),
    };
    // Env overrides
    if let Ok(lvl) = std::env::var("LOG_LEVEL") {
        cfg.log_level = Some(lvl);
    }
    if let Some(json) = std::env::var("JSON_LOGS").ok().and_then(|v| v.parse().ok()) {
        cfg.json_logs = Some(json);
    }
    Ok(cfg)
}
