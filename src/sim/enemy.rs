//! Enemies: big angry macaques
//!
//! Each macaque either chases the player (spreading out from its neighbours)
//! or, while the shield is up, flees with a wobbly wander. The mode is
//! re-derived from the shield flag every frame; only the wander heading is
//! carried between frames, and only while fleeing.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::collision::Circle;
use crate::consts::*;
use crate::ms_to_secs;

/// Wander heading used while fleeing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wander {
    pub angle: f32,
    /// Countdown to the next heading re-roll
    pub timer_ms: f32,
}

impl Wander {
    fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    fn advance(&mut self, dt_ms: f32, rng: &mut impl Rng) {
        self.timer_ms -= dt_ms;
        if self.timer_ms <= 0.0 {
            self.angle += (rng.random::<f32>() - 0.5) * 2.0 * WANDER_TURN;
            self.timer_ms = WANDER_MIN_MS + rng.random::<f32>() * WANDER_JITTER_MS;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Steering {
    Chasing,
    Fleeing(Wander),
}

impl Steering {
    /// Level-triggered mode switch on the shield flag
    fn sync(&mut self, shield_active: bool, rng: &mut impl Rng) {
        match (*self, shield_active) {
            (Steering::Chasing, true) => {
                *self = Steering::Fleeing(Wander {
                    angle: rng.random::<f32>() * TAU,
                    timer_ms: 0.0,
                });
            }
            (Steering::Fleeing(_), false) => *self = Steering::Chasing,
            _ => {}
        }
    }

    pub fn is_fleeing(&self) -> bool {
        matches!(self, Steering::Fleeing(_))
    }
}

/// What an enemy may read about the world while steering.
///
/// `neighbours` holds every enemy's position as of the start of the enemy
/// pass, so update order never biases separation.
#[derive(Debug, Clone, Copy)]
pub struct SteeringContext<'a> {
    pub player_pos: Vec2,
    pub shield_active: bool,
    pub neighbours: &'a [(u32, Vec2)],
    pub arena: &'a Arena,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Fixed at spawn
    pub speed: f32,
    pub facing_left: bool,
    pub anim_ms: f32,
    pub steering: Steering,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: ENEMY_RADIUS,
            speed,
            facing_left: false,
            anim_ms: 0.0,
            steering: Steering::Chasing,
        }
    }

    /// Spawn speed for a given wave: base + per-wave ramp + jitter
    pub fn speed_for_wave(wave: u32, rng: &mut impl Rng) -> f32 {
        ENEMY_BASE_SPEED
            + wave.saturating_sub(1) as f32 * ENEMY_SPEED_PER_WAVE
            + rng.random::<f32>() * ENEMY_SPEED_JITTER
    }

    pub fn update(&mut self, dt_ms: f32, ctx: &SteeringContext, rng: &mut impl Rng) {
        self.anim_ms += dt_ms;
        self.steering.sync(ctx.shield_active, rng);

        let to_player = ctx.player_pos - self.pos;
        self.vel = match &mut self.steering {
            Steering::Chasing => self.chase_velocity(to_player, ctx.neighbours),
            Steering::Fleeing(wander) => {
                wander.advance(dt_ms, rng);
                flee_velocity(to_player, wander, self.speed)
            }
        };

        if self.vel.x < -ENEMY_FACING_DEADZONE {
            self.facing_left = true;
        } else if self.vel.x > ENEMY_FACING_DEADZONE {
            self.facing_left = false;
        }

        // Unlike the player there is no re-clamp after the trees push back
        let bounds = ctx.arena.bounds_for(ENEMY_WALL_PADDING, self.radius);
        let next = bounds.clamp(self.pos + self.vel * ms_to_secs(dt_ms));
        self.pos = ctx.arena.resolve_obstacles(next, self.radius);
    }

    fn chase_velocity(&self, to_player: Vec2, neighbours: &[(u32, Vec2)]) -> Vec2 {
        let mut dir = to_player.normalize_or_zero();
        let range = self.radius * SEPARATION_RANGE;
        for &(id, pos) in neighbours {
            if id == self.id {
                continue;
            }
            let away = self.pos - pos;
            let d = away.length();
            if d < range && d > 0.0 {
                dir += away / d * SEPARATION_WEIGHT;
            }
        }
        dir.normalize_or_zero() * self.speed
    }

    /// Vertical idle bob for the renderer
    pub fn bob_offset(&self) -> f32 {
        (self.anim_ms / 130.0).sin() * 2.5
    }
}

/// Mostly away from the player, partly along the wander heading.
///
/// The blend is deliberately not renormalized.
fn flee_velocity(to_player: Vec2, wander: &Wander, speed: f32) -> Vec2 {
    let heading = wander.heading();
    let dist = to_player.length();
    let flee = if dist > 0.0 { -to_player / dist } else { heading };
    (flee * FLEE_WEIGHT + heading * WANDER_WEIGHT) * speed * FLEE_SPEED_FACTOR
}

impl Circle for Enemy {
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
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Arena {
        Arena::new(960.0, 640.0, DEFAULT_UI_INSET)
    }

    fn ctx<'a>(
        arena: &'a Arena,
        player_pos: Vec2,
        shield_active: bool,
        neighbours: &'a [(u32, Vec2)],
    ) -> SteeringContext<'a> {
        SteeringContext {
            player_pos,
            shield_active,
            neighbours,
            arena,
        }
    }

    #[test]
    fn test_chases_player() {
        let arena = arena();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::new(1, Vec2::new(300.0, 350.0), 60.0);
        let player = Vec2::new(500.0, 350.0);
        enemy.update(100.0, &ctx(&arena, player, false, &[]), &mut rng);
        assert!((enemy.vel - Vec2::new(60.0, 0.0)).length() < 1e-3);
        assert!((enemy.pos.x - 306.0).abs() < 1e-3);
        assert!(!enemy.facing_left);
    }

    #[test]
    fn test_separation_bends_chase() {
        let arena = arena();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::new(1, Vec2::new(300.0, 350.0), 60.0);
        // Neighbour right below: separation pushes upward
        let neighbours = [(1, enemy.pos), (2, Vec2::new(300.0, 380.0))];
        let player = Vec2::new(500.0, 350.0);
        enemy.update(16.0, &ctx(&arena, player, false, &neighbours), &mut rng);
        assert!(enemy.vel.y < 0.0);
        assert!((enemy.vel.length() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_far_neighbours_ignored() {
        let arena = arena();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::new(1, Vec2::new(300.0, 350.0), 60.0);
        let neighbours = [(2, Vec2::new(300.0, 350.0 + ENEMY_RADIUS * SEPARATION_RANGE + 1.0))];
        enemy.update(16.0, &ctx(&arena, Vec2::new(500.0, 350.0), false, &neighbours), &mut rng);
        assert!(enemy.vel.y.abs() < 1e-4);
    }

    #[test]
    fn test_flees_while_shielded() {
        let arena = arena();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut enemy = Enemy::new(1, Vec2::new(300.0, 350.0), 60.0);
        let player = Vec2::new(500.0, 350.0);
        enemy.update(16.0, &ctx(&arena, player, true, &[]), &mut rng);
        assert!(enemy.steering.is_fleeing());
        // 0.75 weight away from the player dominates any wander heading
        assert!(enemy.vel.x < 0.0);
        assert!(enemy.vel.length() <= 60.0 * FLEE_SPEED_FACTOR + 1e-3);
        assert!(enemy.facing_left);
    }

    #[test]
    fn test_mode_follows_shield_flag_each_frame() {
        let arena = arena();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut enemy = Enemy::new(1, Vec2::new(300.0, 350.0), 60.0);
        let player = Vec2::new(500.0, 350.0);
        enemy.update(16.0, &ctx(&arena, player, true, &[]), &mut rng);
        assert!(enemy.steering.is_fleeing());
        enemy.update(16.0, &ctx(&arena, player, false, &[]), &mut rng);
        assert_eq!(enemy.steering, Steering::Chasing);
        assert!(enemy.vel.x > 0.0);
    }

    #[test]
    fn test_wander_rerolls_within_limits() {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut wander = Wander {
            angle: 1.0,
            timer_ms: 0.0,
        };
        for _ in 0..100 {
            let before = wander.angle;
            wander.timer_ms = 0.0;
            wander.advance(16.0, &mut rng);
            assert!((wander.angle - before).abs() <= WANDER_TURN + 1e-5);
            assert!(wander.timer_ms >= WANDER_MIN_MS);
            assert!(wander.timer_ms <= WANDER_MIN_MS + WANDER_JITTER_MS);
        }
    }

    #[test]
    fn test_flee_on_top_of_player_uses_wander_heading() {
        let wander = Wander {
            angle: 0.0,
            timer_ms: 1000.0,
        };
        let vel = flee_velocity(Vec2::ZERO, &wander, 100.0);
        assert!((vel - Vec2::new(85.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_flee_blend_is_not_renormalized() {
        // Wander heading perpendicular to the flee direction
        let wander = Wander {
            angle: std::f32::consts::FRAC_PI_2,
            timer_ms: 1000.0,
        };
        let vel = flee_velocity(Vec2::new(10.0, 0.0), &wander, 100.0);
        assert!((vel.x + 0.75 * 85.0).abs() < 1e-3);
        assert!((vel.y - 0.25 * 85.0).abs() < 1e-3);
        assert!(vel.length() < 85.0);
    }

    #[test]
    fn test_speed_scales_with_wave() {
        let mut rng = Pcg32::seed_from_u64(2);
        for wave in 1..6 {
            let speed = Enemy::speed_for_wave(wave, &mut rng);
            let base = ENEMY_BASE_SPEED + (wave - 1) as f32 * ENEMY_SPEED_PER_WAVE;
            assert!(speed >= base && speed < base + ENEMY_SPEED_JITTER);
        }
    }

    #[test]
    fn test_enemy_pushed_out_of_tree() {
        let arena = arena();
        let tree = arena.obstacles[6];
        let mut rng = Pcg32::seed_from_u64(4);
        let mut enemy = Enemy::new(1, tree.pos + Vec2::new(tree.radius + ENEMY_RADIUS + 1.0, 0.0), 80.0);
        // Player on the far side of the tree
        let player = tree.pos - Vec2::new(200.0, 0.0);
        for _ in 0..10 {
            enemy.update(50.0, &ctx(&arena, player, false, &[]), &mut rng);
            assert!(
                (enemy.pos - tree.pos).length() >= tree.radius + ENEMY_RADIUS - 1e-3
            );
        }
    }

    #[test]
    fn test_facing_ignores_tiny_horizontal_velocity() {
        let arena = arena();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::new(1, Vec2::new(300.0, 350.0), 60.0);
        enemy.facing_left = true;
        // Player almost straight below: vel.x is about 0.3
        let player = Vec2::new(301.0, 550.0);
        enemy.update(16.0, &ctx(&arena, player, false, &[]), &mut rng);
        assert!(enemy.vel.x > 0.0 && enemy.vel.x < ENEMY_FACING_DEADZONE);
        assert!(enemy.facing_left);

        enemy.facing_left = false;
        enemy.pos = Vec2::new(300.0, 350.0);
        let player = Vec2::new(299.0, 550.0);
        enemy.update(16.0, &ctx(&arena, player, false, &[]), &mut rng);
        assert!(enemy.vel.x < 0.0 && enemy.vel.x > -ENEMY_FACING_DEADZONE);
        assert!(!enemy.facing_left);
    }

    #[test]
    fn test_tree_near_top_wall_can_push_enemy_out_of_bounds() {
        let arena = arena();
        let tree = arena.obstacles[4];
        let bounds = arena.bounds_for(ENEMY_WALL_PADDING, ENEMY_RADIUS);
        // Gap between the wall clamp and this tree is narrower than an enemy
        assert!(tree.pos.y - bounds.min.y < tree.radius + ENEMY_RADIUS);

        let mut rng = Pcg32::seed_from_u64(11);
        let mut enemy = Enemy::new(1, Vec2::new(tree.pos.x, bounds.min.y), 60.0);
        let player = Vec2::new(tree.pos.x, 500.0);
        enemy.update(16.0, &ctx(&arena, player, true, &[]), &mut rng);
        assert!(enemy.pos.y < bounds.min.y);
        assert!(!bounds.contains(enemy.pos));
        assert!((enemy.pos - tree.pos).length() >= tree.radius + ENEMY_RADIUS - 1e-3);
    }

    proptest! {
        #[test]
        fn stays_in_bounds_away_from_trees(
            x in 0.0f32..960.0,
            y in 0.0f32..640.0,
            px in 0.0f32..960.0,
            py in 0.0f32..640.0,
            shield in any::<bool>(),
            dt in 0.0f32..=MAX_FRAME_MS,
            seed in any::<u64>(),
        ) {
            let arena = arena();
            let bounds = arena.bounds_for(ENEMY_WALL_PADDING, ENEMY_RADIUS);
            let start = bounds.clamp(Vec2::new(x, y));
            // One frame moves at most speed * dt = 5 units here
            prop_assume!(!arena.in_obstacle(start, ENEMY_RADIUS + 6.0));

            let mut rng = Pcg32::seed_from_u64(seed);
            let mut enemy = Enemy::new(1, start, 100.0);
            enemy.update(dt, &ctx(&arena, Vec2::new(px, py), shield, &[]), &mut rng);
            prop_assert!(bounds.contains(enemy.pos));
        }
    }
}
