use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::constants::{BROWSER_USER_AGENT, ratio, retry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub kodi: KodiConfig,

    pub autofit: AutofitConfig,

    pub scraper: ScraperConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    pub log_format: LogFormat,

    /// Number of tokio worker threads (default: 1)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            worker_threads: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KodiConfig {
    /// HTTP JSON-RPC endpoint used for queries and commands.
    pub rpc_url: String,

    /// TCP socket Kodi pushes player notifications on.
    pub event_addr: String,

    pub username: Option<String>,

    pub password: Option<String>,

    pub request_timeout_seconds: u64,

    pub reconnect_delay_seconds: u64,
}

impl Default for KodiConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8080/jsonrpc".to_string(),
            event_addr: "localhost:9090".to_string(),
            username: None,
            password: None,
            request_timeout_seconds: 5,
            reconnect_delay_seconds: 5,
        }
    }
}

impl KodiConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    #[must_use]
    pub const fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_seconds)
    }
}

/// Which player notification starts the adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartEvent {
    /// Nominal playback start; stream details may not be populated yet, so readiness is polled.
    Play,
    /// First frame rendered; stream details are already available.
    #[default]
    AvStart,
}

/// What to do when the content ratio cannot be scraped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// 2.39 for movies, 16:9 for everything else.
    #[default]
    CategoryDefaults,
    /// Leave the view mode alone.
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    #[default]
    Rpc,
    InfoLabels,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutofitConfig {
    pub enable_autofit: bool,

    /// Screen aspect ratio as entered by the user, e.g. "2.40".
    pub target_ar: String,

    pub start_event: StartEvent,

    pub fallback: FallbackPolicy,

    pub metadata_source: MetadataSource,

    pub readiness_attempts: u32,

    pub readiness_delay_ms: u64,
}

impl Default for AutofitConfig {
    fn default() -> Self {
        Self {
            enable_autofit: true,
            target_ar: format!("{:.2}", ratio::DEFAULT_SCREEN),
            start_event: StartEvent::default(),
            fallback: FallbackPolicy::default(),
            metadata_source: MetadataSource::default(),
            readiness_attempts: retry::READINESS_ATTEMPTS,
            readiness_delay_ms: u64::try_from(retry::READINESS_DELAY.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl AutofitConfig {
    /// Parses `target_ar`, falling back to 2.40 when it is not a usable landscape ratio.
    #[must_use]
    pub fn screen_ar(&self) -> f64 {
        match self.target_ar.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 1.0 => {
                info!("Using target screen AR from settings: {value}");
                value
            }
            _ => {
                warn!(
                    "Could not parse target AR setting {:?}. Falling back to default: {}",
                    self.target_ar,
                    ratio::DEFAULT_SCREEN
                );
                ratio::DEFAULT_SCREEN
            }
        }
    }

    #[must_use]
    pub const fn readiness_delay(&self) -> Duration {
        Duration::from_millis(self.readiness_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// GET the search page and follow the first movie link.
    #[default]
    HtmlSearch,
    /// POST to the quick-search endpoint and follow the first URL it returns.
    QuickSearch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,

    pub mode: SearchMode,

    pub country: String,

    /// The site blocks clients that do not look like a browser.
    pub user_agent: String,

    pub timeout_seconds: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.blu-ray.com".to_string(),
            mode: SearchMode::default(),
            country: "US".to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout_seconds: 10,
        }
    }
}

impl ScraperConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Loads from `path` when given, otherwise searches the default locations.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("autofit").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".autofit").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default config to `path` unless a file already exists there.
    pub fn create_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.kodi.rpc_url.trim().is_empty() {
            anyhow::bail!("Kodi RPC URL cannot be empty");
        }

        if self.kodi.event_addr.trim().is_empty() {
            anyhow::bail!("Kodi event address cannot be empty");
        }

        if self.kodi.request_timeout_seconds == 0 || self.scraper.timeout_seconds == 0 {
            anyhow::bail!("Request timeouts must be > 0");
        }

        if self.autofit.readiness_attempts == 0 {
            anyhow::bail!("Readiness attempts must be > 0");
        }

        url::Url::parse(&self.scraper.base_url)
            .with_context(|| format!("Invalid scraper base URL: {}", self.scraper.base_url))?;

        Ok(())
    }
}
