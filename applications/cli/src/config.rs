/// CLI configuration
use crate::error::{CliError, Result};
use cadence_core::Catalog;
use cadence_playback::PlayerSetup;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bundled sample catalog, used when no catalog file is configured
const BUNDLED_CATALOG: &str = include_str!("../assets/catalog.json");

/// Default config file, read from the working directory when present
const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    /// Engine options, initial volume and repeat mode
    #[serde(default)]
    pub player: PlayerSetup,

    /// Catalog JSON file; the bundled sample catalog when unset
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `cadence.toml` in the
    /// working directory is read if present. Environment variables prefixed
    /// with `CADENCE_` override both, using `__` between nested keys
    /// (`CADENCE_PLAYER__INITIAL_VOLUME=0.8`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path)),
            None => settings
                .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Load the configured catalog, or the bundled one
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| {
                    CliError::CatalogRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                Ok(Catalog::from_json(&json)?)
            }
            None => Ok(Catalog::from_json(BUNDLED_CATALOG)?),
        }
    }
}
