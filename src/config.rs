/*
 * Configuration Module
 *
 * TOML configuration for a simulation run. Every section is optional; anything
 * left out falls back to the values the demo harness uses (an 800x600 world of
 * 1000 boids).
 */

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{check_bounds, Result};
use crate::params::EngineParams;
use crate::rules::Rules;
use crate::universe::Universe;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub agent_count: usize,
    pub engine: EngineParams,
    /// Base rules; the demo derives per-preset speed and size from these.
    pub rules: Rules,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            agent_count: 1000,
            engine: EngineParams::default(),
            rules: Rules::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), agents = config.agent_count, "loaded simulation config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_bounds(self.world.width, self.world.height)?;
        self.engine.validate()
    }

    /// An empty universe with this config's bounds and engine parameters.
    pub fn build_universe(&self) -> Result<Universe> {
        Universe::with_params(self.world.width, self.world.height, self.engine)
    }
}
