use std::{collections::HashMap, fs, net::SocketAddr};

use anyhow::Context;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    /// Start from the built-in sample products instead of an empty catalog.
    pub seed_catalog: bool,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            seed_catalog: true,
            body_limit_bytes: 64 * 1024,
        }
    }
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `server.toml` table, then environment variables.
pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr") {
                    settings.server_bind = v.clone();
                }
                if let Some(v) = file_cfg.get("seed_catalog").and_then(|v| parse_bool(v)) {
                    settings.seed_catalog = v;
                }
                if let Some(v) = file_cfg
                    .get("body_limit_bytes")
                    .and_then(|v| v.parse::<usize>().ok())
                {
                    settings.body_limit_bytes = v;
                }
            }
            Err(error) => warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__SEED_CATALOG").and_then(|v| parse_bool(&v)) {
        settings.seed_catalog = v;
    }

    if let Some(v) = env("APP__BODY_LIMIT_BYTES").and_then(|v| v.parse::<usize>().ok()) {
        settings.body_limit_bytes = v;
    }

    settings
}

pub fn parse_bind_addr(raw: &str) -> anyhow::Result<SocketAddr> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid bind address '{raw}'"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
