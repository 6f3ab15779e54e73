//! The player: Punch, the little monkey you steer around the enclosure

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::collision::{Circle, overlaps, resolve_circle_overlap};
use crate::consts::*;
use crate::ms_to_secs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Sprite mirroring only
    pub facing_left: bool,
    /// Advances only while moving (drives the walk bob)
    pub anim_ms: f32,
    pub moving: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            facing_left: false,
            anim_ms: 0.0,
            moving: false,
        }
    }

    /// Move by one frame of `intent` (any magnitude, normalized here)
    pub fn update(&mut self, dt_ms: f32, intent: Vec2, arena: &Arena) {
        self.moving = intent.length() > PLAYER_MOVING_THRESHOLD;
        if self.moving {
            self.anim_ms += dt_ms;
            if intent.x < -PLAYER_FACING_DEADZONE {
                self.facing_left = true;
            } else if intent.x > PLAYER_FACING_DEADZONE {
                self.facing_left = false;
            }
        }

        self.vel = intent.normalize_or_zero() * PLAYER_SPEED;

        let bounds = arena.bounds_for(PLAYER_WALL_PADDING, self.radius);
        let mut next = bounds.clamp(self.pos + self.vel * ms_to_secs(dt_ms));

        // A tree must never shove the player through the fence
        for obstacle in &arena.obstacles {
            next = bounds.clamp(resolve_circle_overlap(
                next,
                self.radius,
                obstacle.pos,
                obstacle.radius,
            ));
        }

        self.pos = next;
    }

    pub fn overlaps(&self, other: &impl Circle) -> bool {
        overlaps(self, other)
    }

    /// Vertical walk bob for the renderer
    pub fn bob_offset(&self) -> f32 {
        if self.moving {
            (self.anim_ms / 120.0).sin() * 3.0
        } else {
            0.0
        }
    }
}

impl Circle for Player {
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
    use crate::sim::collision::distance;
    use proptest::prelude::*;

    fn arena() -> Arena {
        Arena::new(960.0, 640.0, DEFAULT_UI_INSET)
    }

    #[test]
    fn test_moves_at_fixed_speed_regardless_of_input_magnitude() {
        let arena = arena();
        let mut player = Player::new(arena.center());
        let start = player.pos;
        player.update(100.0, Vec2::new(0.3, 0.0), &arena);
        assert!((player.pos.x - start.x - 16.5).abs() < 1e-3);
        assert!((player.vel.length() - PLAYER_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_zero_input_stands_still() {
        let arena = arena();
        let mut player = Player::new(arena.center());
        let start = player.pos;
        player.update(16.0, Vec2::ZERO, &arena);
        assert_eq!(player.pos, start);
        assert_eq!(player.vel, Vec2::ZERO);
        assert!(!player.moving);
        assert_eq!(player.anim_ms, 0.0);
    }

    #[test]
    fn test_facing_ignores_small_horizontal_input() {
        let arena = arena();
        let mut player = Player::new(arena.center());
        player.update(16.0, Vec2::new(-1.0, 0.0), &arena);
        assert!(player.facing_left);
        // Mostly vertical with a hair of rightward drift: keep facing left
        player.update(16.0, Vec2::new(0.05, 1.0), &arena);
        assert!(player.facing_left);
        player.update(16.0, Vec2::new(0.5, 0.5), &arena);
        assert!(!player.facing_left);
    }

    #[test]
    fn test_stops_at_fence() {
        let arena = arena();
        let mut player = Player::new(Vec2::new(60.0, 400.0));
        for _ in 0..20 {
            player.update(50.0, Vec2::new(-1.0, 0.0), &arena);
        }
        assert!((player.pos.x - (PLAYER_WALL_PADDING + PLAYER_RADIUS)).abs() < 1e-3);
    }

    #[test]
    fn test_pushed_out_of_tree() {
        let arena = arena();
        let tree = arena.obstacles[6];
        // Start just right of the left mid-edge tree and walk into it
        let mut player = Player::new(tree.pos + Vec2::new(tree.radius + PLAYER_RADIUS + 2.0, 0.0));
        for _ in 0..10 {
            player.update(50.0, Vec2::new(-1.0, 0.0), &arena);
        }
        assert!(distance(player.pos, tree.pos) >= tree.radius + PLAYER_RADIUS - 1e-3);
    }

    #[test]
    fn test_bob_only_while_moving() {
        let arena = arena();
        let mut player = Player::new(arena.center());
        assert_eq!(player.bob_offset(), 0.0);
        player.update(200.0, Vec2::new(1.0, 0.0), &arena);
        assert!(player.bob_offset() != 0.0);
    }

    proptest! {
        #[test]
        fn player_stays_inside_fence(
            start_x in 0.0f32..960.0,
            start_y in 0.0f32..640.0,
            steps in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0, 0.0f32..50.0), 1..40),
        ) {
            let arena = arena();
            let bounds = arena.bounds_for(PLAYER_WALL_PADDING, PLAYER_RADIUS);
            let mut player = Player::new(Vec2::new(start_x, start_y));
            for (dx, dy, dt) in steps {
                player.update(dt, Vec2::new(dx, dy), &arena);
                prop_assert!(bounds.contains(player.pos), "{:?} escaped", player.pos);
            }
        }
    }
}
