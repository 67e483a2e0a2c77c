// Copyright (c) The checkpoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration the host collaborator supplies to the checkpoint core.

use crate::errors::ConfigError;
use crate::runner::CollectBehavior;
use camino::Utf8PathBuf;
use std::env;

/// Environment variable naming the lap file's durable location. Required.
pub const LAP_OUT_ENV: &str = "LAP_OUT";

/// Environment variable selecting what happens to previously-passed cases at
/// collection time: `skip` or `deselect`. Optional, defaults to `deselect`.
pub const COLLECT_BEHAVIOR_ENV: &str = "COLLECT_BEHAVIOR";

/// Checkpoint settings for one run.
#[derive(Clone, Debug)]
pub struct CheckpointConfig {
    /// Durable location of the lap file.
    pub lap_out: Utf8PathBuf,

    /// Collection-time treatment of previously-passed cases.
    pub collect_behavior: CollectBehavior,
}

impl CheckpointConfig {
    /// Creates a config with the default collect behavior.
    pub fn new(lap_out: impl Into<Utf8PathBuf>) -> Self {
        Self {
            lap_out: lap_out.into(),
            collect_behavior: CollectBehavior::default(),
        }
    }

    /// Sets the collect behavior.
    pub fn with_collect_behavior(mut self, behavior: CollectBehavior) -> Self {
        self.collect_behavior = behavior;
        self
    }

    /// Reads the configuration from the environment: [`LAP_OUT_ENV`]
    /// (required) and [`COLLECT_BEHAVIOR_ENV`] (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A value that isn't valid Unicode is as unusable as a missing one.
        let lap_out = env::var(LAP_OUT_ENV).map_err(|_| ConfigError::LapOutNotSet)?;
        let mut config = Self::new(Utf8PathBuf::from(lap_out));
        if let Ok(value) = env::var(COLLECT_BEHAVIOR_ENV) {
            config.collect_behavior = value.parse().map_err(ConfigError::CollectBehavior)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = CheckpointConfig::new("target/lap.json");
        assert_eq!(config.collect_behavior, CollectBehavior::Deselect);
        assert_eq!(config.lap_out, Utf8PathBuf::from("target/lap.json"));

        let config = config.with_collect_behavior(CollectBehavior::Skip);
        assert_eq!(config.collect_behavior, CollectBehavior::Skip);
    }
}
