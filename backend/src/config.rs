//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use thiserror::Error;

pub const DATABASE_NAME: &str = "todoDB";
pub const COLLECTION_NAME: &str = "todos";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no document store configured: set MONGO_URI (or REDIS_URL)")]
    MissingStoreUrl,

    #[error("invalid BIND_ADDR {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Which document store backs the todo collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Mongo { uri: String },
    Redis { url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store = match (non_empty("MONGO_URI"), non_empty("REDIS_URL")) {
            (Some(uri), _) => StoreConfig::Mongo { uri },
            (None, Some(url)) => StoreConfig::Redis { url },
            (None, None) => return Err(ConfigError::MissingStoreUrl),
        };

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_addr.clone(),
                source,
            })?;

        Ok(Self { store, bind_addr })
    }
}

impl StoreConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Mongo { .. } => "mongodb",
            StoreConfig::Redis { .. } => "redis",
        }
    }
}
