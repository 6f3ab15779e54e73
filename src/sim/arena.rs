//! The zoo enclosure: playfield bounds, trees and spawn placement
//!
//! The arena is the canvas rectangle minus a fence border on every side and
//! a UI bar across the top. Trees are laid out from the arena size, so a
//! resize rebuilds them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, distance, resolve_circle_overlap};
use crate::consts::*;

/// A tree: solid, immovable circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            radius,
        }
    }
}

impl Circle for Obstacle {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Cosmetic ground rock (renderer only, not solid)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    pub pos: Vec2,
    pub half_size: Vec2,
}

/// Inclusive axis-aligned clamp region for an entity's center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Clamp a point into the region.
    ///
    /// Written as max-then-min so a degenerate region (tiny arena) resolves
    /// to the max edge instead of panicking like `f32::clamp` would.
    #[inline]
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            pos.x.max(self.min.x).min(self.max.x),
            pos.y.max(self.min.y).min(self.max.y),
        )
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Rock placement as fractions of the inner area
const ROCK_SEEDS: [(f32, f32); 6] = [
    (0.25, 0.45),
    (0.75, 0.55),
    (0.5, 0.75),
    (0.5, 0.28),
    (0.18, 0.72),
    (0.82, 0.28),
];

/// Rocks are skipped if they would sit this close to a tree
const ROCK_TREE_CLEARANCE: f32 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Height of the UI bar covering the top of the canvas
    pub ui_inset: f32,
    pub obstacles: Vec<Obstacle>,
    pub rocks: Vec<Rock>,
}

impl Arena {
    pub fn new(width: f32, height: f32, ui_inset: f32) -> Self {
        let mut arena = Self {
            width,
            height,
            ui_inset,
            obstacles: Vec::new(),
            rocks: Vec::new(),
        };
        arena.rebuild();
        arena
    }

    /// Adopt a new canvas size and lay the trees out again
    pub fn resize(&mut self, width: f32, height: f32, ui_inset: f32) {
        self.width = width;
        self.height = height;
        self.ui_inset = ui_inset;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.obstacles = self.build_obstacles();
        self.rocks = self.build_rocks();
        log::info!(
            "Arena {}x{} (ui {}): {} trees, {} rocks",
            self.width,
            self.height,
            self.ui_inset,
            self.obstacles.len(),
            self.rocks.len()
        );
    }

    fn build_obstacles(&self) -> Vec<Obstacle> {
        let top = FENCE + self.ui_inset + 16.0;
        let bot = self.height - FENCE - 10.0;
        let lft = FENCE + 16.0;
        let rgt = self.width - FENCE - 16.0;
        let cx = self.width / 2.0;
        let cy = (top + bot) / 2.0;

        vec![
            // Corners
            Obstacle::new(lft + 55.0, top + 55.0, 30.0),
            Obstacle::new(rgt - 55.0, top + 55.0, 30.0),
            Obstacle::new(lft + 55.0, bot - 55.0, 30.0),
            Obstacle::new(rgt - 55.0, bot - 55.0, 30.0),
            // Mid-edges
            Obstacle::new(cx, top + 44.0, 24.0),
            Obstacle::new(cx, bot - 44.0, 24.0),
            Obstacle::new(lft + 60.0, cy, 22.0),
            Obstacle::new(rgt - 60.0, cy, 22.0),
        ]
    }

    fn build_rocks(&self) -> Vec<Rock> {
        let inner_w = self.width - 2.0 * FENCE;
        let inner_h = self.height - self.ui_inset - 2.0 * FENCE;
        ROCK_SEEDS
            .iter()
            .map(|&(rx, ry)| Vec2::new(FENCE + rx * inner_w, FENCE + self.ui_inset + ry * inner_h))
            .filter(|&pos| !self.in_obstacle(pos, ROCK_TREE_CLEARANCE))
            .map(|pos| Rock {
                pos,
                half_size: Vec2::new(10.0 + pos.x % 8.0, 7.0 + pos.y % 5.0),
            })
            .collect()
    }

    /// Where the player starts: horizontally centered, centered below the UI bar
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.width / 2.0,
            self.ui_inset + (self.height - self.ui_inset) / 2.0,
        )
    }

    /// Clamp region for an entity with the given wall padding and radius
    pub fn bounds_for(&self, wall_padding: f32, radius: f32) -> Bounds {
        let pad = wall_padding + radius;
        Bounds {
            min: Vec2::new(pad, pad + self.ui_inset),
            max: Vec2::new(self.width - pad, self.height - pad),
        }
    }

    /// True if `pos` lies within `clearance` of any tree's edge
    pub fn in_obstacle(&self, pos: Vec2, clearance: f32) -> bool {
        self.obstacles
            .iter()
            .any(|o| distance(pos, o.pos) < o.radius + clearance)
    }

    /// Push a circle out of every tree in turn (no re-clamping)
    pub fn resolve_obstacles(&self, pos: Vec2, radius: f32) -> Vec2 {
        self.obstacles.iter().fold(pos, |p, o| {
            resolve_circle_overlap(p, radius, o.pos, o.radius)
        })
    }

    /// Random point on one of the four spawn edges
    pub fn random_edge_point(&self, rng: &mut impl Rng) -> Vec2 {
        let pad = ENEMY_SPAWN_PAD;
        let ui = self.ui_inset;
        let span_x = self.width - 2.0 * pad;
        let span_y = self.height - ui - 2.0 * pad;
        let side = rng.random_range(0..4u8);
        let t: f32 = rng.random();
        match side {
            0 => Vec2::new(pad + t * span_x, pad + ui),
            1 => Vec2::new(self.width - pad, pad + ui + t * span_y),
            2 => Vec2::new(pad + t * span_x, self.height - pad),
            _ => Vec2::new(pad, pad + ui + t * span_y),
        }
    }

    /// Random point well inside the fence
    pub fn random_interior_point(&self, rng: &mut impl Rng) -> Vec2 {
        let pad = COLLECTIBLE_SPAWN_PAD;
        let ui = self.ui_inset;
        let tx: f32 = rng.random();
        let ty: f32 = rng.random();
        Vec2::new(
            pad + tx * (self.width - 2.0 * pad),
            pad + ui + ty * (self.height - ui - 2.0 * pad),
        )
    }

    /// Pick an enemy spawn point on the edges, away from the player
    pub fn enemy_spawn_point(&self, player: Option<Vec2>, rng: &mut impl Rng) -> Placement {
        place_with_retry(
            ENEMY_SPAWN_ATTEMPTS,
            || self.random_edge_point(rng),
            |pos| player.is_none_or(|p| distance(pos, p) >= ENEMY_SPAWN_SAFE_DISTANCE),
        )
    }

    /// Pick a collectible spawn point clear of the trees
    pub fn collectible_spawn_point(&self, rng: &mut impl Rng) -> Placement {
        place_with_retry(
            COLLECTIBLE_SPAWN_ATTEMPTS,
            || self.random_interior_point(rng),
            |pos| !self.in_obstacle(pos, COLLECTIBLE_OBSTACLE_CLEARANCE),
        )
    }
}

/// Outcome of a bounded-retry placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    /// Candidates drawn, always in `1..=max_attempts`
    pub attempts: u32,
    /// False when the last candidate was taken without passing the check
    pub accepted: bool,
}

/// Draw candidates until one passes `accept` or the budget runs out.
///
/// The final candidate is used unconditionally, so this never fails and
/// never loops past `max_attempts`.
pub fn place_with_retry(
    max_attempts: u32,
    mut candidate: impl FnMut() -> Vec2,
    mut accept: impl FnMut(Vec2) -> bool,
) -> Placement {
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;
    loop {
        let pos = candidate();
        attempts += 1;
        let accepted = accept(pos);
        if accepted || attempts >= max_attempts {
            if !accepted {
                log::debug!("Spawn placement fell back after {} attempts", attempts);
            }
            return Placement {
                pos,
                attempts,
                accepted,
            };
        }
    }
}
