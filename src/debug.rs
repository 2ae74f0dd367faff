/*
 * Debug Information Module
 *
 * This module defines the TickStats struct with per-tick metrics:
 * - Number of boids stepped
 * - Neighbor candidates found vs. neighbors actually used
 * - How many boids hit their neighbor cap
 * - Grid shape and wall-clock time of the step
 */

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickStats {
    pub tick: u64,
    pub agents: usize,
    pub candidates: usize,
    pub neighbors_used: usize,
    pub capped_agents: usize,
    pub grid_columns: usize,
    pub grid_rows: usize,
    pub duration: Duration,
}

// Per-worker tally, merged after the parallel step
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StepTally {
    pub candidates: usize,
    pub neighbors_used: usize,
    pub capped_agents: usize,
}

impl StepTally {
    #[inline]
    pub fn record(&mut self, found: usize, used: usize) {
        self.candidates += found;
        self.neighbors_used += used;
        if found > used {
            self.capped_agents += 1;
        }
    }

    pub fn merge(mut self, other: StepTally) -> StepTally {
        self.candidates += other.candidates;
        self.neighbors_used += other.neighbors_used;
        self.capped_agents += other.capped_agents;
        self
    }
}

impl TickStats {
    pub fn average_neighbors(&self) -> f32 {
        if self.agents == 0 {
            0.0
        } else {
            self.neighbors_used as f32 / self.agents as f32
        }
    }
}
