use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;
use strum::{AsRefStr, EnumString};

const ENVIRONMENT_VARIABLE: &str = "APP_ENVIRONMENT";
const ENVIRONMENT_PREFIX: &str = "VESSEL_MAP";

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub environment: Environment,
    pub log_directive: String,
    pub channel_buffer_size: usize,
    pub searoutes: SearoutesSettings,
    pub map: MapSettings,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearoutesSettings {
    pub api_address: String,
    pub api_key: String,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub max_retries: u32,
}

/// Options handed to the map renderer when it is created.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub access_token: String,
    pub style: String,
    pub zoom: f64,
    pub track_resize: bool,
}

impl Settings {
    /// Reads `config/<environment>.yml`, where the environment is taken from
    /// `APP_ENVIRONMENT` (default `local`), and applies `VESSEL_MAP__*`
    /// environment overrides on top, e.g. `VESSEL_MAP__SEAROUTES__API_KEY`.
    pub fn new() -> Result<Self, ConfigError> {
        let environment = match std::env::var(ENVIRONMENT_VARIABLE) {
            Ok(v) => v.parse::<Environment>().map_err(|e| {
                ConfigError::Message(format!("invalid {ENVIRONMENT_VARIABLE} '{v}': {e}"))
            })?,
            Err(_) => Environment::Local,
        };

        let settings: Settings = Config::builder()
            .add_source(File::with_name(&format!("config/{}", environment.as_ref())).required(true))
            .add_source(
                config::Environment::with_prefix(ENVIRONMENT_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override("environment", format!("{environment:?}"))?
            .build()?
            .try_deserialize()?;

        if settings.channel_buffer_size == 0 {
            return Err(ConfigError::Message(
                "channel_buffer_size must be greater than zero".into(),
            ));
        }

        Ok(settings)
    }
}
