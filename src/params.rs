/*
 * Engine Parameters Module
 *
 * This module defines the EngineParams struct: tuning knobs that change how a
 * tick is computed (threading, neighbor search strategy, grid sizing) without
 * changing what any individual boid wants to do. Per-boid behavior lives in
 * `Rules`.
 */

use serde::Deserialize;

use crate::error::{Result, UniverseError};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    // Performance settings
    pub parallel: bool,
    pub use_spatial_grid: bool,
    pub cell_size_factor: f32, // Multiplier for cell size relative to the smallest vision radius
    pub max_grid_dimension: usize,

    /// Personal-space radius as a fraction of each boid's vision radius.
    pub separation_fraction: f32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            parallel: true,
            use_spatial_grid: true,
            cell_size_factor: 1.0,
            max_grid_dimension: 512,
            separation_fraction: 1.0 / 3.0,
        }
    }
}

impl EngineParams {
    pub fn get_cell_size_factor_range() -> std::ops::RangeInclusive<f32> {
        0.05..=10.0
    }

    pub fn get_separation_fraction_range() -> std::ops::RangeInclusive<f32> {
        f32::EPSILON..=1.0
    }

    pub fn validate(&self) -> Result<()> {
        if !Self::get_cell_size_factor_range().contains(&self.cell_size_factor) {
            return Err(UniverseError::InvalidParameter {
                name: "cell_size_factor",
                value: self.cell_size_factor,
            });
        }
        if !Self::get_separation_fraction_range().contains(&self.separation_fraction) {
            return Err(UniverseError::InvalidParameter {
                name: "separation_fraction",
                value: self.separation_fraction,
            });
        }
        if self.max_grid_dimension == 0 {
            return Err(UniverseError::InvalidParameter {
                name: "max_grid_dimension",
                value: 0.0,
            });
        }
        Ok(())
    }
}
