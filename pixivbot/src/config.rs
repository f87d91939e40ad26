// ABOUTME: Configuration file loading, validation, and hierarchical merging for pixivbot
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use crate::constants::env;
use crate::relay::{
    BudgetEncoder, DeliveryMode, Fetcher, ImageRelay, ImageVariant, Transcoder, UploadKind,
};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default, deserialize_with = "validate_proxy_host")]
    pub proxy_host: Option<String>,
    #[serde(default)]
    pub upload: Option<UploadKind>,
    #[serde(default)]
    pub original: Option<bool>,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_dimension: Option<u32>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths.iter().map(|p| p.as_str()).collect::<Vec<_>>())
    }

    /// Load configuration from specific file paths in order of precedence
    pub fn load_from_paths(paths: &[&str]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            if !Path::new(path).exists() {
                continue;
            }
            // Apply in order - later paths override earlier ones
            match Self::load_from_file(path) {
                Ok(file_config) => config = config.merge(file_config),
                Err(e) => log::warn!("Skipping config file {}: {:#}", path, e),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get standard config file paths, lowest precedence first
    pub fn get_config_paths() -> Vec<String> {
        let mut paths = Vec::new();

        // 1. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir
                .join(".config")
                .join("pixivbot")
                .join("config.toml");
            paths.push(path.to_string_lossy().to_string());
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join("pixivbot")
                .join("config.toml");
            paths.push(path.to_string_lossy().to_string());
        }

        // 3. Project-specific config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(
                current_dir
                    .join("pixivbot.toml")
                    .to_string_lossy()
                    .to_string(),
            );
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            proxy_host: other.proxy_host.or(self.proxy_host),
            upload: other.upload.or(self.upload),
            original: other.original.or(self.original),
            referer: other.referer.or(self.referer),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            max_dimension: other.max_dimension.or(self.max_dimension),
        }
    }

    /// Overlay settings taken from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(proxy_host) = std::env::var(env::PROXY_HOST) {
            let proxy_host = proxy_host.trim();
            if !proxy_host.is_empty() {
                self.proxy_host = Some(proxy_host.to_string());
            }
        }
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == Some(0) {
            return Err(anyhow!("max_dimension must be greater than zero"));
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!(
                "timeout_secs must be greater than zero; omit it to disable the timeout"
            ));
        }
        if let Some(ref proxy_host) = self.proxy_host {
            check_proxy_host(proxy_host).map_err(anyhow::Error::msg)?;
        }
        if let Some(ref referer) = self.referer {
            url::Url::parse(referer).with_context(|| format!("Invalid referer '{}'", referer))?;
        }
        Ok(())
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        match self.proxy_host {
            Some(ref host) => DeliveryMode::proxied(host.clone()),
            None => DeliveryMode::Direct,
        }
    }

    pub fn variant(&self) -> ImageVariant {
        if self.original.unwrap_or(false) {
            ImageVariant::Original
        } else {
            ImageVariant::Small
        }
    }

    /// Build the relay every request will share.
    pub fn build_relay(&self) -> Result<ImageRelay> {
        let mut fetcher = Fetcher::with_timeout(self.timeout_secs.map(Duration::from_secs))
            .context("Failed to create image fetcher")?;
        if let Some(ref referer) = self.referer {
            fetcher = fetcher.with_referer(referer.clone());
        }

        let mut transcoder = Transcoder::with_encoder(BudgetEncoder::new());
        if let Some(max_dimension) = self.max_dimension {
            transcoder = transcoder.with_max_dimension(max_dimension);
        }

        Ok(ImageRelay::new(self.delivery_mode())?
            .with_upload(self.upload.unwrap_or_default())
            .with_variant(self.variant())
            .with_fetcher(fetcher)
            .with_transcoder(transcoder))
    }
}

// Proxy hosts replace only the host of image URLs, so reject anything with a scheme or path
fn check_proxy_host(host: &str) -> Result<(), String> {
    if host.trim().is_empty() || host.contains("://") || host.contains('/') {
        return Err(format!(
            "Invalid proxy_host '{}'. Expected a bare host such as 'i.pixiv.re' or 'localhost:8080'",
            host
        ));
    }
    Ok(())
}

fn validate_proxy_host<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    match value {
        Some(ref host) if host.trim().is_empty() => Ok(None),
        Some(host) => {
            check_proxy_host(&host).map_err(D::Error::custom)?;
            Ok(Some(host.trim().to_string()))
        }
        None => Ok(None),
    }
}
