//! # configs
//!
//! Process-wide settings, read once at startup and never mutated.
//! Values come from the environment (after an optional `.env` file); every
//! key has a default so the server starts with no configuration at all.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error reading settings: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Token-signing secret (`SECRETO`).
    pub secreto: SecretString,
    pub port: u16,
    pub bind_address: IpAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Served verbatim at `/public`; uploads land in its `img` subdirectory.
    pub public_dir: PathBuf,
    pub upload_limit_mb: u64,
    pub token_ttl_secs: i64,
    pub log_format: LogFormat,
}

impl Settings {
    /// Reads `.env` if present, then the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        if let Err(e) = dotenvy::dotenv() {
            if e.not_found() {
                debug!("No .env file found");
            } else {
                return Err(e.into());
            }
        }

        Self::from_environment(Environment::default())
    }

    /// Builds settings from `environment` layered over the defaults.
    pub fn from_environment(environment: Environment) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("secreto", "12345")?
            .set_default("port", 3000)?
            .set_default("bind_address", "0.0.0.0")?
            .set_default("database_url", "sqlite://gaceta.db")?
            .set_default("database_max_connections", 5)?
            .set_default("public_dir", "public")?
            .set_default("upload_limit_mb", 2)?
            .set_default("token_ttl_secs", 7200)?
            .set_default("log_format", "pretty")?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.public_dir.join("img")
    }
}
