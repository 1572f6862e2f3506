use std::sync::LazyLock;

use config::Config;
use error_stack::ResultExt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading config file {0}")]
    ReadFailed(String),
    #[error("Failed to deserialize config file {0}")]
    InvalidField(String),
    #[error("Failed to read the service account file {0}")]
    ServiceAccountFile(String),
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub sheets: super::sheets_config::SheetsConfig,
}

impl AppConfig {
    /// Loads `path` (any extension the `config` crate knows, or none) into an [`AppConfig`].
    ///
    /// A field that fails to deserialize is reported by its dotted path.
    pub fn load(path: &str) -> error_stack::Result<AppConfig, ConfigError> {
        let value = Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .and_then(|config| config.try_deserialize::<serde_json::Value>())
            .change_context_lazy(|| ConfigError::ReadFailed(path.to_string()))?;

        serde_path_to_error::deserialize(value).map_err(|error| {
            let field = error.path().to_string();
            error_stack::Report::new(error.into_inner())
                .change_context(ConfigError::InvalidField(path.to_string()))
                .attach_printable(format!("Field path: {}", field))
        })
    }
}

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "Config".to_string())
}

pub static CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    let config_path = config_path();
    match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(report) => panic!("[CONFIG ERROR] {:?}", report),
    }
});
