//! Engine configuration.
//!
//! Defaults reproduce the classic behaviour: a merge buffer of 100 tuples and
//! one freely scheduled task per map record and per reduce key.

use crate::error::{MapflowError, Result};
use serde::{Deserialize, Serialize};

/// Default capacity of every fan-in merge buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 100;

/// Environment variable overriding [`EngineConfig::buffer_capacity`].
pub const ENV_BUFFER_CAPACITY: &str = "MAPFLOW_BUFFER_CAPACITY";

/// Environment variable setting [`EngineConfig::max_concurrent_tasks`].
pub const ENV_MAX_CONCURRENT_TASKS: &str = "MAPFLOW_MAX_CONCURRENT_TASKS";

/// Configuration for a map/reduce engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of each merged output stream. Producers block once it is full.
    pub buffer_capacity: usize,
    /// Upper bound on map/reduce tasks running job code at the same time.
    ///
    /// `None` (the default) means unbounded: task count grows with the number
    /// of input records and distinct keys.
    pub max_concurrent_tasks: Option<usize>,
}

impl EngineConfig {
    /// Create a configuration with the default settings.
    pub fn new() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_concurrent_tasks: None,
        }
    }

    /// Set the merge buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Bound the number of concurrently executing map/reduce tasks.
    pub fn with_max_concurrent_tasks(mut self, limit: usize) -> Self {
        self.max_concurrent_tasks = Some(limit);
        self
    }

    /// Remove any concurrency bound.
    pub fn unbounded(mut self) -> Self {
        self.max_concurrent_tasks = None;
        self
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(MapflowError::invalid_config(
                "buffer_capacity must be greater than zero",
            ));
        }
        if self.max_concurrent_tasks == Some(0) {
            return Err(MapflowError::invalid_config(
                "max_concurrent_tasks must be greater than zero when set",
            ));
        }
        Ok(())
    }

    /// Build a configuration from `MAPFLOW_*` environment variables, falling
    /// back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(raw) = lookup(ENV_BUFFER_CAPACITY) {
            config.buffer_capacity = raw.trim().parse().map_err(|e| {
                MapflowError::invalid_config_with_source(
                    format!("{ENV_BUFFER_CAPACITY}={raw} is not a valid capacity"),
                    e,
                )
            })?;
        }

        if let Some(raw) = lookup(ENV_MAX_CONCURRENT_TASKS) {
            let limit: usize = raw.trim().parse().map_err(|e| {
                MapflowError::invalid_config_with_source(
                    format!("{ENV_MAX_CONCURRENT_TASKS}={raw} is not a valid task limit"),
                    e,
                )
            })?;
            config.max_concurrent_tasks = Some(limit);
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
