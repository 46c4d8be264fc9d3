use crate::output::print_json;
use crate::settings::{self, ConfigOverrides, DEFAULT_CONFIG_FILE};
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use shipby_core::config::{Config, WarnLevel};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Subcommand definition
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a config file populated with defaults and environment overlays
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate the effective configuration and report warnings
    Validate,
    /// Print the effective configuration
    Show,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
    subcommand: ConfigSubcommand,
    json: bool,
) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Init { force } => init(path, overrides, force, json),
        ConfigSubcommand::Validate => validate(path, overrides, json),
        ConfigSubcommand::Show => show(path, overrides, json),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(path: Option<&Path>, overrides: &ConfigOverrides, force: bool, json: bool) -> Result<()> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if target.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }

    let mut config = Config::default();
    overrides.apply(&mut config);
    config
        .save(&target)
        .with_context(|| format!("writing {}", target.display()))?;

    if json {
        print_json(&serde_json::json!({ "path": target, "config": config }))?;
    } else {
        println!("Wrote {}", target.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(path: Option<&Path>, overrides: &ConfigOverrides, json: bool) -> Result<()> {
    let config = settings::load(path, overrides)?;
    let warnings = config.validate();

    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if config.has_errors() {
        bail!("config validation found errors");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(path: Option<&Path>, overrides: &ConfigOverrides, json: bool) -> Result<()> {
    let config = settings::load(path, overrides)?;
    if json {
        return print_json(&config);
    }
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}
