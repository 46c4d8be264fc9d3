use anyhow::{Context, Result};
use clap::Args;
use shipby_core::config::Config;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "shipby.yaml";

/// Environment overlays applied on top of the config file.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// DEAR API root URL
    #[arg(long, global = true, env = "DEAR_BASE_URL")]
    pub base_url: Option<String>,

    /// Fulfilment location whose sales are processed
    #[arg(long, global = true, env = "ORDER_LOCATION_ID")]
    pub location_id: Option<String>,

    /// Sales channel to process
    #[arg(long, global = true, env = "SOURCE_CHANNEL")]
    pub source_channel: Option<String>,

    /// IANA zone for the "created since" date
    #[arg(long, global = true, env = "SHIPBY_TIMEZONE")]
    pub timezone: Option<String>,

    /// Liveness endpoint port
    #[arg(long, global = true, env = "PORT")]
    pub port: Option<u16>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(v) = &self.base_url {
            config.base_url = v.clone();
        }
        if let Some(v) = &self.location_id {
            config.location_id = v.clone();
        }
        if let Some(v) = &self.source_channel {
            config.source_channel = v.clone();
        }
        if let Some(v) = &self.timezone {
            config.timezone = v.clone();
        }
        if let Some(v) = self.port {
            config.port = v;
        }
    }
}

/// Resolve which config file to read.
///
/// Priority:
/// 1. `--config` flag / `SHIPBY_CONFIG` env var (passed in as `explicit`)
/// 2. `./shipby.yaml` if it exists
/// 3. None (built-in defaults)
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

/// Load the config file (or defaults) and apply the environment overlays.
pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = match path {
        Some(p) => Config::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => Config::default(),
    };
    overrides.apply(&mut config);
    Ok(config)
}
