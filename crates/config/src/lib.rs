use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "mentorlink.toml",
    "config/mentorlink.toml",
    "crates/config/mentorlink.toml",
    "../mentorlink.toml",
    "../config/mentorlink.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://mentorlink.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Where stored object paths (avatars) are resolved into public URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://127.0.0.1:7070/storage".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Capacity of each session's outbound event queue.
    pub session_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { session_buffer: 64 }
    }
}

/// Load the application configuration by combining defaults, an optional
/// config file, and environment overrides.
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default("database.url", defaults.database.url.clone())
        .unwrap()
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )
        .unwrap()
        .set_default(
            "storage.public_base_url",
            defaults.storage.public_base_url.clone(),
        )
        .unwrap()
        .set_default(
            "relay.session_buffer",
            i64::try_from(defaults.relay.session_buffer).unwrap_or(i64::MAX),
        )
        .unwrap();

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("MENTORLINK_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via MENTORLINK_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(config::Environment::with_prefix("MENTORLINK").separator("__"));

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
