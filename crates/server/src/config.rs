use std::{fs, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";
const HOSTED_BIND: &str = "0.0.0.0:5000";
pub const MAX_CHART_CACHE_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "bind_addr")]
    pub server_bind: String,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub chart_cache_ttl_seconds: u64,
    pub hosted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            data_dir: PathBuf::from("static/archivo"),
            static_dir: PathBuf::from("static"),
            chart_cache_ttl_seconds: 300,
            hosted: false,
        }
    }
}

impl Settings {
    pub fn chart_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.chart_cache_ttl_seconds)
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Layers `server.toml` contents and then environment overrides on top of
/// the defaults.
pub(crate) fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = match file_contents.map(toml::from_str::<Settings>) {
        Some(Ok(parsed)) => parsed,
        Some(Err(error)) => {
            warn!(%error, file = SETTINGS_FILE, "ignoring unparseable settings file");
            Settings::default()
        }
        None => Settings::default(),
    };

    if env("RENDER_ENV").as_deref() == Some("true") {
        settings.hosted = true;
        settings.server_bind = HOSTED_BIND.into();
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Some(v) = env("APP__STATIC_DIR") {
        settings.static_dir = PathBuf::from(v);
    }

    if let Some(v) = env("APP__CHART_CACHE_TTL_SECONDS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.chart_cache_ttl_seconds = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid APP__CHART_CACHE_TTL_SECONDS"),
        }
    }
    if settings.chart_cache_ttl_seconds > MAX_CHART_CACHE_TTL_SECONDS {
        warn!(
            requested = settings.chart_cache_ttl_seconds,
            max = MAX_CHART_CACHE_TTL_SECONDS,
            "chart cache ttl too large, clamping"
        );
        settings.chart_cache_ttl_seconds = MAX_CHART_CACHE_TTL_SECONDS;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
