/*
 * Universe Module
 *
 * The Universe owns the boids, the world bounds, the spatial grid and the
 * current attraction target, and advances them one tick at a time.
 *
 * A tick works from a start-of-tick snapshot:
 * - Positions and velocities are copied out and the grid is rebuilt from them
 * - Every boid queries the snapshot, steers, integrates and wraps
 * - Boids only write their own slot, so the step can run in parallel chunks
 */

use std::time::Instant;

use glam::Vec2;
use rayon::prelude::*;

use crate::boid::{AgentView, Boid};
use crate::debug::{StepTally, TickStats};
use crate::error::{check_bounds, Result, UniverseError};
use crate::flocking::{select_nearest, SteeringTerms};
use crate::params::EngineParams;
use crate::rules::Rules;
use crate::spatial_grid::{brute_force_query_into, Neighbor, SpatialGrid};

#[derive(Debug, Clone)]
pub struct Universe {
    width: f32,
    height: f32,
    agents: Vec<Boid>,
    spatial_grid: SpatialGrid,
    attraction_target: Option<Vec2>,
    params: EngineParams,
    tick_count: u64,
    last_tick: TickStats,
    // Set while the grid is degenerate so the warning fires once per episode
    single_cell_fallback: bool,
}

// Read-only view of the start-of-tick state shared by every boid's step.
struct StepContext<'a> {
    grid: Option<&'a SpatialGrid>,
    positions: &'a [Vec2],
    velocities: &'a [Vec2],
    width: f32,
    height: f32,
    attraction_target: Option<Vec2>,
    separation_fraction: f32,
}

impl StepContext<'_> {
    fn gather(&self, index: usize, radius: f32, out: &mut Vec<Neighbor>) {
        out.clear();
        let center = self.positions[index];
        match self.grid {
            Some(grid) => grid.query_into(center, radius, self.positions, Some(index), out),
            None => brute_force_query_into(
                center,
                radius,
                self.positions,
                self.width,
                self.height,
                Some(index),
                out,
            ),
        }
    }

    fn neighbors(&self, index: usize, rules: &Rules, out: &mut Vec<Neighbor>) -> usize {
        self.gather(index, rules.vision_radius, out);
        let found = out.len();
        select_nearest(out, rules.max_neighbors);
        found
    }

    fn advance(&self, index: usize, boid: &mut Boid, scratch: &mut Vec<Neighbor>, tally: &mut StepTally) {
        let found = self.neighbors(index, boid.rules(), scratch);
        let terms = SteeringTerms::compute(
            boid,
            scratch,
            self.velocities,
            self.attraction_target,
            self.separation_fraction,
        );
        let steering = terms.combine(boid.rules());

        boid.integrate(steering);
        boid.wrap_edges(self.width, self.height);
        tally.record(found, scratch.len());
    }
}

impl Universe {
    /// An empty world of the given size with default engine parameters.
    pub fn new(width: f32, height: f32) -> Result<Self> {
        Self::with_params(width, height, EngineParams::default())
    }

    pub fn with_params(width: f32, height: f32, params: EngineParams) -> Result<Self> {
        check_bounds(width, height)?;
        params.validate()?;
        tracing::info!(width, height, ?params, "creating universe");

        Ok(Self {
            width,
            height,
            agents: Vec::new(),
            spatial_grid: SpatialGrid::new(),
            attraction_target: None,
            params,
            tick_count: 0,
            last_tick: TickStats::default(),
            single_cell_fallback: false,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Swap engine parameters between ticks.
    pub fn set_params(&mut self, params: EngineParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn agents(&self) -> &[Boid] {
        &self.agents
    }

    /// Target used by the most recent tick.
    pub fn attraction_target(&self) -> Option<Vec2> {
        self.attraction_target
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_tick_stats(&self) -> &TickStats {
        &self.last_tick
    }

    /// Append a boid moving at full speed along `heading` (radians) and
    /// return its index. Indices are stable for the life of the universe.
    pub fn add_agent(&mut self, x: f32, y: f32, heading: f32, rules: Rules) -> usize {
        self.agents.push(Boid::new(Vec2::new(x, y), heading, rules));
        self.agents.len() - 1
    }

    pub fn get_agent(&self, index: usize) -> Result<AgentView> {
        self.agent(index).map(Boid::view)
    }

    pub fn agent(&self, index: usize) -> Result<&Boid> {
        self.agents.get(index).ok_or(UniverseError::IndexOutOfRange {
            index,
            len: self.agents.len(),
        })
    }

    /// Change the world bounds. With `reposition`, positions scale with the
    /// bounds; without it they stay put and the next tick wraps them back in.
    pub fn resize(&mut self, width: f32, height: f32, reposition: bool) -> Result<()> {
        check_bounds(width, height)?;
        tracing::debug!(
            from_width = self.width,
            from_height = self.height,
            width,
            height,
            reposition,
            "resizing universe"
        );

        if reposition {
            let scale = Vec2::new(width / self.width, height / self.height);
            for boid in &mut self.agents {
                boid.rescale(scale);
            }
        }

        self.width = width;
        self.height = height;
        Ok(())
    }

    // Grid cells track the shortest positive vision so a 3x3 block covers it.
    // A zero-radius query only reads its own cell and puts no bound on the size.
    // `None` when no boid has a usable radius.
    fn grid_cell_size(&self) -> Option<f32> {
        let min_vision = self
            .agents
            .iter()
            .map(|boid| boid.rules().vision_radius)
            .filter(|radius| *radius > 0.0 && radius.is_finite())
            .fold(f32::INFINITY, f32::min);
        let cell_size = min_vision * self.params.cell_size_factor;

        (cell_size.is_finite() && cell_size > 0.0).then_some(cell_size)
    }

    /// Advance the simulation by one step. `None` switches the attraction
    /// term off for every boid this tick.
    pub fn tick(&mut self, attraction_target: Option<Vec2>) {
        let started = Instant::now();
        self.attraction_target = attraction_target;

        let positions: Vec<Vec2> = self.agents.iter().map(Boid::position).collect();
        let velocities: Vec<Vec2> = self.agents.iter().map(Boid::velocity).collect();

        if self.params.use_spatial_grid {
            let cell_size = match self.grid_cell_size() {
                Some(cell_size) => {
                    self.single_cell_fallback = false;
                    cell_size
                }
                None => {
                    if !self.agents.is_empty() && !self.single_cell_fallback {
                        tracing::warn!("no boid has a positive vision radius, using a single grid cell");
                        self.single_cell_fallback = true;
                    }
                    self.width.max(self.height)
                }
            };
            self.spatial_grid.rebuild(
                &positions,
                self.width,
                self.height,
                cell_size,
                self.params.max_grid_dimension,
            );
        }

        let context = StepContext {
            grid: self.params.use_spatial_grid.then_some(&self.spatial_grid),
            positions: &positions,
            velocities: &velocities,
            width: self.width,
            height: self.height,
            attraction_target,
            separation_fraction: self.params.separation_fraction,
        };

        let tally = if self.params.parallel && !self.agents.is_empty() {
            // Process boids in chunks to keep synchronization overhead low
            let chunk_size = std::cmp::max(self.agents.len() / rayon::current_num_threads(), 1);

            self.agents
                .par_chunks_mut(chunk_size)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    let mut scratch = Vec::new();
                    let mut tally = StepTally::default();
                    for (offset, boid) in chunk.iter_mut().enumerate() {
                        context.advance(chunk_index * chunk_size + offset, boid, &mut scratch, &mut tally);
                    }
                    tally
                })
                .reduce(StepTally::default, StepTally::merge)
        } else {
            let mut scratch = Vec::new();
            let mut tally = StepTally::default();
            for (index, boid) in self.agents.iter_mut().enumerate() {
                context.advance(index, boid, &mut scratch, &mut tally);
            }
            tally
        };

        self.tick_count += 1;
        let (grid_columns, grid_rows) = if self.params.use_spatial_grid {
            self.spatial_grid.dimensions()
        } else {
            (0, 0)
        };
        self.last_tick = TickStats {
            tick: self.tick_count,
            agents: self.agents.len(),
            candidates: tally.candidates,
            neighbors_used: tally.neighbors_used,
            capped_agents: tally.capped_agents,
            grid_columns,
            grid_rows,
            duration: started.elapsed(),
        };
        tracing::trace!(stats = ?self.last_tick, "tick complete");
    }

    /// Indices of the neighbors boid `index` would steer by against the
    /// current positions, nearest first.
    pub fn neighbors_of(&self, index: usize) -> Result<Vec<usize>> {
        let rules = *self.agent(index)?.rules();
        let positions: Vec<Vec2> = self.agents.iter().map(Boid::position).collect();

        let mut grid = SpatialGrid::new();
        if self.params.use_spatial_grid {
            grid.rebuild(
                &positions,
                self.width,
                self.height,
                self.grid_cell_size().unwrap_or(self.width.max(self.height)),
                self.params.max_grid_dimension,
            );
        }

        let context = StepContext {
            grid: self.params.use_spatial_grid.then_some(&grid),
            positions: &positions,
            velocities: &[],
            width: self.width,
            height: self.height,
            attraction_target: None,
            separation_fraction: self.params.separation_fraction,
        };

        let mut neighbors = Vec::new();
        context.neighbors(index, &rules, &mut neighbors);
        Ok(neighbors.into_iter().map(|n| n.index).collect())
    }
}
