/*
 * Boid Module
 *
 * This module defines the Boid struct: the kinematic state of one agent plus
 * the Rules it flies by. Boids live in the Universe's agent list; the spatial
 * grid only ever refers to them by index.
 */

use glam::Vec2;

use crate::rules::Rules;
use crate::torus;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    position: Vec2,
    velocity: Vec2,
    heading: f32,
    rules: Rules,
}

/// Read-only snapshot handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub x: f32,
    pub y: f32,
    /// Radians, `atan2(vy, vx)`.
    pub heading: f32,
}

impl Boid {
    /// Starts at full speed along `heading`. The stored heading is the
    /// direction of that velocity, so it lands in `(-π, π]`; a boid with
    /// `max_speed = 0` keeps the angle it was given.
    pub fn new(position: Vec2, heading: f32, rules: Rules) -> Self {
        let velocity = Vec2::from_angle(heading) * rules.max_speed;
        let heading = if velocity != Vec2::ZERO {
            velocity.y.atan2(velocity.x)
        } else {
            heading
        };

        Self {
            position,
            velocity,
            heading,
            rules,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            x: self.position.x,
            y: self.position.y,
            heading: self.heading,
        }
    }

    // Apply one step of steering, cap the speed, then move.
    pub fn integrate(&mut self, steering: Vec2) {
        self.velocity = (self.velocity + steering).clamp_length_max(self.rules.max_speed);
        self.position += self.velocity;

        // A stationary boid keeps facing wherever it last faced
        if self.velocity != Vec2::ZERO {
            self.heading = self.velocity.y.atan2(self.velocity.x);
        }
    }

    // Wrap the boid around the world edges
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        self.position = torus::wrap_position(self.position, width, height);
    }

    // Keep relative placement when the world is rescaled
    pub fn rescale(&mut self, scale: Vec2) {
        self.position *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn new_boid_moves_at_max_speed_along_heading() {
        let boid = Boid::new(Vec2::new(10.0, 10.0), FRAC_PI_2, Rules::default());
        assert!(boid.velocity().x.abs() < 1e-6);
        assert!((boid.velocity().y - 2.0).abs() < 1e-6);
        assert!((boid.heading() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn new_heading_matches_velocity_direction() {
        // 5 rad points the same way as 5 - 2π
        let mut boid = Boid::new(Vec2::new(100.0, 100.0), 5.0, Rules::default());
        let expected = boid.velocity().y.atan2(boid.velocity().x);
        assert_eq!(boid.heading(), expected);
        assert!((boid.heading() - (5.0 - TAU)).abs() < 1e-5);

        // The first step must not jump by a full turn
        boid.integrate(Vec2::ZERO);
        assert!((boid.heading() - expected).abs() < 1e-6);
    }

    #[test]
    fn integrate_caps_speed() {
        let mut boid = Boid::new(Vec2::ZERO, 0.0, Rules::default());
        boid.integrate(Vec2::new(10.0, 10.0));
        assert!(boid.velocity().length() <= 2.0 + 1e-5);
        assert!((boid.heading() - boid.velocity().y.atan2(boid.velocity().x)).abs() < 1e-6);
    }

    #[test]
    fn zero_steering_moves_in_a_straight_line() {
        let mut boid = Boid::new(Vec2::new(400.0, 300.0), 0.0, Rules::default());
        boid.integrate(Vec2::ZERO);
        assert_eq!(boid.position(), Vec2::new(402.0, 300.0));
        assert_eq!(boid.heading(), 0.0);
    }

    #[test]
    fn stationary_boid_keeps_its_heading() {
        let rules = Rules::default().with_speed_and_size(0.0, 1.0);
        let mut boid = Boid::new(Vec2::ZERO, 1.25, rules);
        boid.integrate(Vec2::ZERO);
        assert_eq!(boid.heading(), 1.25);
        assert_eq!(boid.position(), Vec2::ZERO);
    }

    #[test]
    fn wrap_edges_folds_back_into_bounds() {
        let mut boid = Boid::new(Vec2::new(805.0, -5.0), 0.0, Rules::default());
        boid.wrap_edges(800.0, 600.0);
        assert_eq!(boid.position(), Vec2::new(5.0, 595.0));
    }

    #[test]
    fn view_exposes_position_and_heading() {
        let boid = Boid::new(Vec2::new(1.0, 2.0), 0.5, Rules::default());
        let view = boid.view();
        assert_eq!((view.x, view.y), (1.0, 2.0));
        assert_eq!(view.heading, boid.heading());
        assert!((view.heading - 0.5).abs() < 1e-6);
    }
}
