use crate::error::{Result, ShipByError};
use crate::window::parse_timezone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// DEAR caps `saleList` pages at this many rows.
pub const MAX_PAGE_LIMIT: u32 = 1000;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Service configuration. Credentials are never stored here; they are read
/// from the environment by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the DEAR API, e.g. `https://inventory.dearsystems.com/ExternalApi/v2`.
    pub base_url: String,
    /// Only sales fulfilled from this location are listed.
    pub location_id: String,
    /// Sales from other channels are ignored.
    pub source_channel: String,
    /// IANA zone used to compute the "created since" calendar date.
    pub timezone: String,
    pub poll_interval_secs: u64,
    /// Pause between orders to stay under the API rate limit.
    pub order_delay_ms: u64,
    pub created_lookback_days: u32,
    pub updated_lookback_secs: u32,
    pub request_timeout_secs: u64,
    pub page_limit: u32,
    /// Liveness endpoint port.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            location_id: String::new(),
            source_channel: "Shopify".to_string(),
            timezone: "America/New_York".to_string(),
            poll_interval_secs: 300,
            order_delay_ms: 1000,
            created_lookback_days: 1,
            updated_lookback_secs: 300,
            request_timeout_secs: 30,
            page_limit: MAX_PAGE_LIMIT,
            port: 3000,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShipByError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn order_delay(&self) -> Duration {
        Duration::from_millis(self.order_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut error = |message: String| {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message,
            })
        };

        if self.base_url.trim().is_empty() {
            error("base_url is empty (set DEAR_BASE_URL)".to_string());
        } else if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            error(format!("base_url '{}' is not an http(s) URL", self.base_url));
        }
        if self.location_id.trim().is_empty() {
            error("location_id is empty (set ORDER_LOCATION_ID)".to_string());
        }
        if self.source_channel.trim().is_empty() {
            error("source_channel is empty".to_string());
        }
        if let Err(e) = self.tz() {
            error(e.to_string());
        }
        if self.poll_interval_secs == 0 {
            error("poll_interval_secs must be greater than zero".to_string());
        }
        if self.request_timeout_secs == 0 {
            error("request_timeout_secs must be greater than zero".to_string());
        }
        if self.page_limit == 0 || self.page_limit > MAX_PAGE_LIMIT {
            error(format!(
                "page_limit must be between 1 and {MAX_PAGE_LIMIT}, got {}",
                self.page_limit
            ));
        }

        if u64::from(self.updated_lookback_secs) < self.poll_interval_secs {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "updated_lookback_secs ({}) is shorter than poll_interval_secs ({}); \
                     sales updated between runs will be missed",
                    self.updated_lookback_secs, self.poll_interval_secs
                ),
            });
        }
        if self.order_delay_ms < 1000 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "order_delay_ms={} may exceed the API rate limit of 60 calls per minute",
                    self.order_delay_ms
                ),
            });
        }

        warnings
    }

    /// `true` when [`Config::validate`] reports at least one error.
    pub fn has_errors(&self) -> bool {
        self.validate().iter().any(|w| w.level == WarnLevel::Error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid() -> Config {
        Config {
            base_url: "https://inventory.dearsystems.com/ExternalApi/v2".into(),
            location_id: "loc-1".into(),
            ..Config::default()
        }
    }

    #[test]
    fn defaults_match_service_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.source_channel, "Shopify");
        assert_eq!(cfg.timezone, "America/New_York");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(300));
        assert_eq!(cfg.order_delay(), Duration::from_secs(1));
        assert_eq!(cfg.page_limit, 1000);
    }

    #[test]
    fn valid_config_has_no_warnings() {
        assert!(valid().validate().is_empty());
        assert!(!valid().has_errors());
    }

    #[test]
    fn default_config_is_missing_endpoint_and_location() {
        let warnings = Config::default().validate();
        let errors: Vec<_> = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .collect();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("base_url"));
        assert!(errors[1].message.contains("location_id"));
    }

    #[test]
    fn bad_timezone_and_page_limit_are_errors() {
        let cfg = Config {
            timezone: "Eastern".into(),
            page_limit: 5000,
            ..valid()
        };
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("Eastern")));
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("page_limit")));
    }

    #[test]
    fn short_lookback_is_a_warning_not_an_error() {
        let cfg = Config {
            updated_lookback_secs: 60,
            ..valid()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(!cfg.has_errors());
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shipby.yaml");
        let cfg = Config {
            source_channel: "Amazon".into(),
            port: 8080,
            ..valid()
        };
        cfg.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shipby.yaml");
        std::fs::write(&path, "location_id: abc\npoll_interval_secs: 60\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.location_id, "abc");
        assert_eq!(cfg.poll_interval_secs, 60);
        assert_eq!(cfg.source_channel, "Shopify");
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(&dir.path().join("nope.yaml")),
            Err(ShipByError::ConfigNotFound(_))
        ));
    }
}
