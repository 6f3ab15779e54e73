//! Plushies: bobbing pickups that grant the shield

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub age_ms: f32,
    /// Cosmetic vertical offset, recomputed from age
    pub bob: f32,
}

impl Collectible {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: COLLECTIBLE_RADIUS,
            age_ms: 0.0,
            bob: 0.0,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.age_ms += dt_ms;
        self.bob = (self.age_ms / 1000.0 * COLLECTIBLE_BOB_CYCLES * PI).sin()
            * COLLECTIBLE_BOB_AMPLITUDE;
    }
}

impl Circle for Collectible {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bob_follows_age() {
        let mut plushie = Collectible::new(1, Vec2::new(100.0, 100.0));
        plushie.update(200.0);
        // sin(0.2 * 2.5 * pi) = sin(pi / 2)
        assert!((plushie.bob - COLLECTIBLE_BOB_AMPLITUDE).abs() < 1e-4);
        plushie.update(200.0);
        assert!(plushie.bob.abs() < 1e-3);
        assert_eq!(plushie.age_ms, 400.0);
    }

    #[test]
    fn test_bob_does_not_move_hitbox() {
        let mut plushie = Collectible::new(1, Vec2::new(100.0, 100.0));
        plushie.update(123.0);
        assert_eq!(plushie.center(), Vec2::new(100.0, 100.0));
    }
}
