//! Handles settings for the application.
//!
//! Values are read, in increasing priority, from built-in defaults, the TOML
//! file (`autobooks.toml` unless `--config` says otherwise), `AUTOBOOKS__*`
//! environment variables and the global command line flags.
use std::path::PathBuf;

use config::{Config, Environment, File, Map};
use engine::{Database, Variant};
use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "autobooks.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for the workspace crates (`error` .. `trace`).
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub variant: Variant,
    pub database: Database,
    /// Export target when `export` is not given `--output`.
    pub export_path: Option<PathBuf>,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            database: Database::sqlite(engine::DEFAULT_DATABASE_PATH),
            export_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub storage: Storage,
}

pub fn load(args: &GlobalArgs) -> Result<Settings> {
    load_with_env(args, None)
}

/// Like [`load`], reading `AUTOBOOKS__*` variables from `env` instead of the
/// process environment when given.
fn load_with_env(args: &GlobalArgs, env: Option<Map<String, String>>) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let settings = Config::builder()
        .add_source(File::with_name(config_path).required(args.config.is_some()))
        .add_source(
            Environment::with_prefix("AUTOBOOKS")
                .separator("__")
                .source(env),
        )
        .build()?;
    let mut settings: Settings = settings.try_deserialize()?;

    if let Some(database) = &args.database {
        settings.storage.database = Database::sqlite(database);
    }
    if let Some(variant) = args.variant {
        settings.storage.variant = variant;
    }
    if let Some(level) = &args.log_level {
        settings.app.level = level.clone();
    }

    Ok(settings)
}
