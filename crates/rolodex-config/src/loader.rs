//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use rolodex_core::{RolodexError, RolodexResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loads [`AppConfig`] from layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: String,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    ///
    /// The environment name comes from `ROLODEX_ENVIRONMENT` and defaults
    /// to `development`.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        let environment =
            std::env::var("ROLODEX_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        Self {
            config_dir: config_dir.into(),
            environment,
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Overrides the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Loads and validates the configuration.
    ///
    /// Sources, later ones winning:
    /// 1. `default.toml`
    /// 2. `{environment}.toml`
    /// 3. `local.toml` (not committed to version control)
    /// 4. Environment variables such as `ROLODEX_SECURITY__JWT_SECRET`
    ///
    /// A `.env` file in the working directory is loaded into the process
    /// environment first.
    pub fn load(&self) -> RolodexResult<AppConfig> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        info!("Loading configuration for environment: {}", self.environment);

        let mut builder = Config::builder();

        for name in ["default", self.environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if Path::new(&path).exists() {
                debug!("Loading config file: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("ROLODEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error_to_rolodex_error)?;

        app_config.app.environment.clone_from(&self.environment);

        if let Err(errors) = ConfigValidator::validate(&app_config) {
            return Err(RolodexError::Configuration(format_validation_errors(&errors)));
        }

        if !app_config.redis.enabled {
            warn!("Redis is disabled; every user lookup will hit the database");
        }

        Ok(app_config)
    }
}

fn config_error_to_rolodex_error(err: ConfigError) -> RolodexError {
    RolodexError::Configuration(err.to_string())
}
