use super::estimate::{DEFAULT_PRECISION, MAX_PRECISION};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_PRICES_URL: &str = "https://interview.switcheo.com/prices.json";
pub const DEFAULT_ICON_BASE_URL: &str =
    "https://raw.githubusercontent.com/Switcheo/token-icons/main/tokens";

fn default_prices_url() -> String {
    DEFAULT_PRICES_URL.to_string()
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_icon_base_url() -> String {
    DEFAULT_ICON_BASE_URL.to_string()
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

fn default_submit_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PriceFeedConfig {
    #[serde(default = "default_prices_url")]
    pub url: String,
    /// Extra attempts after the first failed request.
    #[serde(default)]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PriceFeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        PriceFeedConfig {
            url: default_prices_url(),
            retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IconConfig {
    #[serde(default = "default_icon_base_url")]
    pub base_url: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            base_url: default_icon_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub prices: PriceFeedConfig,
    #[serde(default)]
    pub icons: IconConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Fractional digits shown for estimates.
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Latency of the simulated swap submission.
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            precision: default_precision(),
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "tokenswap", "tokenswap")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            bail!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            );
        }
        if self.providers.prices.url.trim().is_empty() {
            bail!("providers.prices.url must not be empty");
        }
        if self.providers.prices.timeout_secs == 0 {
            bail!("providers.prices.timeout_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  prices:
    url: "http://example.com/prices.json"
    retries: 2
    timeout_secs: 3
  icons:
    base_url: "http://example.com/icons"
precision: 6
submit_delay_ms: 0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.providers.prices.url, "http://example.com/prices.json");
        assert_eq!(config.providers.prices.retries, 2);
        assert_eq!(config.providers.prices.retry_delay_ms, 500);
        assert_eq!(config.providers.prices.timeout(), Duration::from_secs(3));
        assert_eq!(config.providers.icons.base_url, "http://example.com/icons");
        assert_eq!(config.precision, 6);
        assert_eq!(config.submit_delay(), Duration::ZERO);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.providers.prices.url, DEFAULT_PRICES_URL);
        assert_eq!(config.providers.prices.retries, 0);
        assert_eq!(config.providers.icons.base_url, DEFAULT_ICON_BASE_URL);
        assert_eq!(config.precision, 4);
        assert_eq!(config.submit_delay_ms, 2000);
    }

    #[test]
    fn test_load_from_path_rejects_bad_precision() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "precision: 20").unwrap();

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("precision"));
    }

    #[test]
    fn test_load_from_path_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "providers:\n  prices:\n    timeout_secs: 0").unwrap();

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(result.is_err());
    }
}
