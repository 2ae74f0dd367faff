/*
 * Boid Flocking Engine - Module Definitions
 *
 * This file defines the module structure for the flocking engine.
 * A Universe owns boids in a wrapping world and steps them one tick at a time;
 * rendering is left to the caller, which reads positions and headings back.
 */

// Re-export key components for easier access
pub use boid::{AgentView, Boid};
pub use config::SimulationConfig;
pub use debug::TickStats;
pub use error::{Result, UniverseError};
pub use flocking::SteeringTerms;
pub use glam::Vec2;
pub use params::EngineParams;
pub use rules::Rules;
pub use spatial_grid::{Neighbor, SpatialGrid};
pub use universe::Universe;

// Define modules
pub mod boid;
pub mod config;
pub mod debug;
pub mod error;
pub mod flocking;
pub mod params;
pub mod rules;
pub mod spatial_grid;
pub mod torus;
pub mod universe;
