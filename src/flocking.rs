/*
 * Flocking Module
 *
 * Steering for a single boid given its neighbors:
 * 1. Separation: push away from neighbors inside personal space, harder when closer
 * 2. Cohesion: pull toward the neighbors' centroid
 * 3. Alignment: match the neighbors' average velocity
 * 4. Attraction: pull toward an external point of interest, if any
 *
 * Neighbor offsets come from the spatial query and already take the short way
 * across the world seam, so every term here is seam-safe.
 */

use std::cmp::Ordering;

use glam::Vec2;

use crate::boid::Boid;
use crate::rules::Rules;
use crate::spatial_grid::Neighbor;

/// Distances below this are treated as this when weighting separation.
pub const SEPARATION_EPSILON: f32 = 1e-3;

// Nearest first, lower index first on equal distance.
#[inline]
fn nearest_first(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance_squared
        .total_cmp(&b.distance_squared)
        .then(a.index.cmp(&b.index))
}

/// Keep at most `max_neighbors`, choosing the nearest. The survivors end up
/// sorted nearest-first so the result does not depend on query order.
pub fn select_nearest(neighbors: &mut Vec<Neighbor>, max_neighbors: usize) {
    if neighbors.len() > max_neighbors && max_neighbors > 0 {
        neighbors.select_nth_unstable_by(max_neighbors - 1, nearest_first);
    }
    neighbors.truncate(max_neighbors);
    neighbors.sort_unstable_by(nearest_first);
}

/// The four unweighted steering contributions for one boid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringTerms {
    pub separation: Vec2,
    pub cohesion: Vec2,
    pub alignment: Vec2,
    pub attraction: Vec2,
}

impl SteeringTerms {
    /// `velocities` is the start-of-tick velocity snapshot indexed like the
    /// neighbor indices. An empty neighbor list leaves the flock terms zero.
    pub fn compute(
        boid: &Boid,
        neighbors: &[Neighbor],
        velocities: &[Vec2],
        attraction_target: Option<Vec2>,
        separation_fraction: f32,
    ) -> Self {
        let mut terms = Self::default();

        if !neighbors.is_empty() {
            let personal_space = boid.rules().vision_radius * separation_fraction;
            let personal_space_squared = personal_space * personal_space;

            let mut offset_sum = Vec2::ZERO;
            let mut velocity_sum = Vec2::ZERO;

            for neighbor in neighbors {
                offset_sum += neighbor.offset;
                velocity_sum += velocities[neighbor.index];

                if neighbor.distance_squared <= personal_space_squared {
                    // Unit vector away from the neighbor, scaled by 1/distance
                    let distance = neighbor.distance_squared.sqrt().max(SEPARATION_EPSILON);
                    terms.separation -= neighbor.offset / (distance * distance);
                }
            }

            let count = neighbors.len() as f32;
            // Offsets are relative to the boid, so their mean is centroid - position
            terms.cohesion = offset_sum / count;
            terms.alignment = velocity_sum / count - boid.velocity();
        }

        if let Some(target) = attraction_target {
            terms.attraction = (target - boid.position()).normalize_or_zero();
        }

        terms
    }

    /// Weighted sum using the boid's own rules.
    pub fn combine(&self, rules: &Rules) -> Vec2 {
        self.separation * rules.separation_weight
            + self.cohesion * rules.cohesion_weight
            + self.alignment * rules.alignment_weight
            + self.attraction * rules.attraction_weight
    }
}
