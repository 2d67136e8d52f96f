use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use seatplan_catalog::CabinLayout;
use seatplan_core::SessionSettings;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub unavailable_seats: usize,
    /// Fixed seed for the maintenance sampling, mostly for demos and tests.
    pub seed: Option<u64>,
    /// Custom cabin; the standard 30-row layout when absent.
    pub layout: Option<CabinLayout>,
}

impl SessionConfig {
    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            layout: self.layout.clone().unwrap_or_default(),
            unavailable_seats: self.unavailable_seats,
            seed: self.seed,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = defaults()?
            // Every file is optional, the built-in defaults are enough to boot
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(File::with_name("config/local").required(false))
            // Eg.. `SEATPLAN_SESSION__UNAVAILABLE_SEATS=0`
            .add_source(Environment::with_prefix("SEATPLAN").separator("__"))
            // Hosting platforms hand out the port as a bare PORT variable
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        s.try_deserialize()
    }

    /// Defaults overlaid with a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 10000)?
        .set_default("session.unavailable_seats", 8)
}
