use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{model::Coordinates, units::Unit};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// Position reported by the terminal geolocator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeolocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeolocationConfig> for Coordinates {
    fn from(cfg: GeolocationConfig) -> Self {
        Coordinates {
            latitude: cfg.latitude,
            longitude: cfg.longitude,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// backend_url = "http://127.0.0.1:5000"
/// default_unit = "imperial"
/// quick_cities = ["London", "Tokyo"]
///
/// [geolocation]
/// latitude = 51.5072
/// longitude = -0.1276
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,

    /// Absent means the transport's own default.
    pub request_timeout_secs: Option<u64>,

    /// Unit a new session starts in. Toggling never writes this back.
    pub default_unit: Unit,

    pub quick_cities: Vec<String>,

    pub geolocation: Option<GeolocationConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: None,
            default_unit: Unit::Metric,
            quick_cities: ["London", "New York", "Tokyo", "Paris", "Sydney"]
                .into_iter()
                .map(String::from)
                .collect(),
            geolocation: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.backend_url)
            .with_context(|| format!("Invalid backend_url '{}'", self.backend_url))?;
        if self.request_timeout_secs == Some(0) {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn set_backend_url(&mut self, url: &str) -> Result<()> {
        let trimmed = url.trim().trim_end_matches('/');
        Url::parse(trimmed).with_context(|| format!("Invalid backend URL '{url}'"))?;
        self.backend_url = trimmed.to_string();
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Replace the quick-pick list, dropping blanks and duplicates but
    /// keeping the given order.
    pub fn set_quick_cities<I, S>(&mut self, cities: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        for city in cities {
            let city = city.as_ref().trim();
            if !city.is_empty() && !kept.iter().any(|c| c.eq_ignore_ascii_case(city)) {
                kept.push(city.to_string());
            }
        }
        self.quick_cities = kept;
    }

    pub fn geolocation_position(&self) -> Option<Coordinates> {
        self.geolocation.map(Coordinates::from)
    }
}
