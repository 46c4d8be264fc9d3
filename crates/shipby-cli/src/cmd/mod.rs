pub mod config;
pub mod once;
pub mod reconcile;
pub mod run;

use anyhow::{bail, Context, Result};
use dear_client::{Credentials, DearClient};
use shipby_core::config::{Config, WarnLevel};

pub const CLIENT_ID_ENV: &str = "DEAR_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "DEAR_CLIENT_SECRET";

/// Log config warnings and refuse to start on errors.
pub fn ensure_valid(config: &Config) -> Result<()> {
    let mut errors = 0;
    for w in config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("{}", w.message),
            WarnLevel::Error => {
                tracing::error!("{}", w.message);
                eprintln!("[error] {}", w.message);
                errors += 1;
            }
        }
    }
    if errors > 0 {
        bail!("invalid configuration ({errors} error(s)); run `shipby config validate`");
    }
    Ok(())
}

pub fn credentials_from_env() -> Result<Credentials> {
    let read = |name: &str| -> Result<String> {
        let value = std::env::var(name).with_context(|| format!("{name} is not set"))?;
        if value.trim().is_empty() {
            bail!("{name} is empty");
        }
        Ok(value)
    };
    Ok(Credentials {
        account_id: read(CLIENT_ID_ENV)?,
        application_key: read(CLIENT_SECRET_ENV)?,
    })
}

pub fn build_client(config: &Config) -> Result<DearClient> {
    let credentials = credentials_from_env()?;
    let client = DearClient::new(&config.base_url, &credentials, config.request_timeout())
        .context("building DEAR client")?;
    Ok(client.with_page_limit(config.page_limit))
}
