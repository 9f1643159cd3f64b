//! Service configuration.
//!
//! Everything comes from environment variables; unset or unparsable values
//! fall back to the defaults below.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::stock_manager::DEFAULT_ADJUST_RETRIES;

pub const ENV_BIND_ADDR: &str = "BEERSTOCK_BIND_ADDR";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_ADJUST_RETRIES: &str = "BEERSTOCK_ADJUST_RETRIES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to (default: "0.0.0.0:8080").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Postgres connection string. `None` selects the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Extra attempts for an increment/decrement that lost a race.
    #[serde(default = "default_adjust_retries")]
    pub adjust_retries: u32,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_adjust_retries() -> u32 {
    DEFAULT_ADJUST_RETRIES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: None,
            adjust_retries: default_adjust_retries(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_BIND_ADDR).filter(|v| !v.trim().is_empty()) {
            config.bind_addr = addr;
        }

        config.database_url = lookup(ENV_DATABASE_URL).filter(|v| !v.trim().is_empty());

        if let Some(raw) = lookup(ENV_ADJUST_RETRIES) {
            match raw.trim().parse::<u32>() {
                Ok(n) => config.adjust_retries = n,
                Err(_) => warn!(
                    value = %raw,
                    default = config.adjust_retries,
                    "{ENV_ADJUST_RETRIES} is not a valid count; using default"
                ),
            }
        }

        config
    }
}
