// src/core/config.rs

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default for how long the local-address probe may take.
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 5_000;

/// Runtime settings, read from `config.toml` in the platform config directory.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Root of the local scanning backend, e.g. `http://127.0.0.1:8080`.
    /// When unset the backend strategy is skipped.
    pub backend_url: Option<String>,
    /// Sends every provider request to this URL instead of the catalog one.
    pub provider_gateway: Option<String>,
    pub request_timeout_secs: u64,
    pub discovery_timeout_ms: u64,
    /// Address the discovery socket "connects" to. No packet is sent; the OS
    /// just picks the interface it would route through.
    pub discovery_route: SocketAddr,
    /// Overrides where API keys are persisted.
    pub storage_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            provider_gateway: None,
            request_timeout_secs: 30,
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            discovery_route: SocketAddr::from(([8, 8, 8, 8], 80)),
            storage_path: None,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    /// Loads the file if present, then applies environment overrides and validates.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// [`AppConfig::load`] with environment lookups going through `lookup`.
    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
            info!(path = %path.display(), "Loaded configuration file.");
            Self::from_toml(&content)?
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults.");
            Self::default()
        };
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).wrap_err("Failed to parse TOML config")
    }

    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("VANGUARD_BACKEND_URL") {
            self.backend_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(secs) = lookup("VANGUARD_REQUEST_TIMEOUT") {
            self.request_timeout_secs = secs.parse().wrap_err("Invalid VANGUARD_REQUEST_TIMEOUT")?;
        }
        if let Some(ms) = lookup("VANGUARD_DISCOVERY_TIMEOUT_MS") {
            self.discovery_timeout_ms = ms.parse().wrap_err("Invalid VANGUARD_DISCOVERY_TIMEOUT_MS")?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(eyre!("request_timeout_secs must be greater than zero"));
        }
        if self.discovery_timeout_ms == 0 {
            return Err(eyre!("discovery_timeout_ms must be greater than zero"));
        }
        for (name, value) in [("backend_url", &self.backend_url), ("provider_gateway", &self.provider_gateway)] {
            if let Some(url) = value {
                let parsed = Url::parse(url).wrap_err_with(|| format!("Invalid {name}: {url}"))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(eyre!("{name} must use http or https, got {}", parsed.scheme()));
                }
            }
        }
        Ok(())
    }
}
