/*
 * Rules Module
 *
 * Immutable per-boid behavior parameters. Every boid runs the same steering
 * algorithm; `Rules` is the data that parameterizes it.
 */

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Hard cap on velocity magnitude after integration.
    pub max_speed: f32,
    /// Rendering hint only; boids are points to the engine.
    pub size: f32,
    pub vision_radius: f32,
    pub max_neighbors: usize,
    pub separation_weight: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
    pub attraction_weight: f32,
}

impl Rules {
    /// Fields in the harness order: speed, size, vision radius, neighbor cap,
    /// then the separation, cohesion, alignment and attraction weights.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_speed: f32,
        size: f32,
        vision_radius: f32,
        max_neighbors: usize,
        separation_weight: f32,
        cohesion_weight: f32,
        alignment_weight: f32,
        attraction_weight: f32,
    ) -> Self {
        Self {
            max_speed,
            size,
            vision_radius,
            max_neighbors,
            separation_weight,
            cohesion_weight,
            alignment_weight,
            attraction_weight,
        }
    }

    // Copy of these rules with a new top speed and body size
    pub fn with_speed_and_size(self, max_speed: f32, size: f32) -> Self {
        Self { max_speed, size, ..self }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(2.0, 1.0, 100.0, 3, 0.1, 0.005, 0.2, 0.001)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_argument_order() {
        let rules = Rules::new(2.0, 1.5, 80.0, 4, 0.1, 0.2, 0.3, 0.4);
        assert_eq!(rules.max_speed, 2.0);
        assert_eq!(rules.size, 1.5);
        assert_eq!(rules.vision_radius, 80.0);
        assert_eq!(rules.max_neighbors, 4);
        assert_eq!(rules.separation_weight, 0.1);
        assert_eq!(rules.cohesion_weight, 0.2);
        assert_eq!(rules.alignment_weight, 0.3);
        assert_eq!(rules.attraction_weight, 0.4);
    }

    #[test]
    fn speed_and_size_override_keeps_weights() {
        let base = Rules::default();
        let scaled = base.with_speed_and_size(4.0, 0.5);
        assert_eq!(scaled.max_speed, 4.0);
        assert_eq!(scaled.size, 0.5);
        assert_eq!(scaled.vision_radius, base.vision_radius);
        assert_eq!(scaled.alignment_weight, base.alignment_weight);
    }
}
