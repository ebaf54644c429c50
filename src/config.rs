//! Process-wide settings.
//!
//! Values come from the environment once, on first use of [`global`], and
//! are read-only afterwards.

use std::env;
use std::num::NonZeroUsize;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, Result};

/// Worker count for the multi-threaded arithmetic helpers.
pub const ARITHMETIC_THREADS_ENV: &str = "DETARRAY_ARITHMETIC_THREADS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arithmetic_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arithmetic_threads: std::thread::available_parallelism()
                .map_or(1, NonZeroUsize::get),
        }
    }
}

impl Config {
    /// Defaults overridden by whatever is set in the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(val) = lookup(ARITHMETIC_THREADS_ENV) {
            match Self::parse_threads(&val) {
                Ok(n) => config.arithmetic_threads = n,
                Err(e) => tracing::warn!(
                    error = %e,
                    default = config.arithmetic_threads,
                    "ignoring {ARITHMETIC_THREADS_ENV}"
                ),
            }
        }
        tracing::debug!(arithmetic_threads = config.arithmetic_threads, "config loaded");
        config
    }

    /// Parse a thread count; zero is rejected.
    pub fn parse_threads(val: &str) -> Result<usize> {
        match val.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ArrayError::InvalidConfig {
                key: ARITHMETIC_THREADS_ENV.to_string(),
                value: val.to_string(),
            }),
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// The process-wide configuration, loaded from the environment on first call.
pub fn global() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
