//! Session state and the types the simulation reports outward
//!
//! Everything the per-frame step mutates lives in [`GameState`]. Entities
//! never touch score, lives or timers; the tick interprets what they do.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::collectible::Collectible;
use super::enemy::Enemy;
use super::particles::Particles;
use super::player::Player;
use crate::consts::*;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation advances every frame
    Playing,
    /// Lives ran out; frozen while the last hit's feedback plays out
    Ending { remaining_ms: f32 },
    /// Game over has been reported
    GameOver,
}

/// Something that happened during a tick, for audio and presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShieldCollected { pos: Vec2 },
    ShieldExpired,
    Damaged { lives_left: u32 },
    WaveStarted { wave: u32, spawned: usize },
    CollectibleSpawned { pos: Vec2 },
    LivesExhausted { score: u64 },
    /// Raised by the session once the post-hit grace period has run out
    GameOver { score: u64 },
}

/// Per-frame countdowns and periodic accumulators (milliseconds)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    /// Shield time left; only meaningful while the shield is active
    pub shield_ms: f32,
    /// Post-damage grace period left
    pub invincible_ms: f32,
    pub shake_ms: f32,
    /// Time since the last collectible spawn tick
    pub collectible_ms: f32,
    /// Time since the last wave
    pub wave_ms: f32,
}

/// What the HUD shows, emitted once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub score: u64,
    pub lives: u32,
    pub wave: u32,
    pub elapsed_ms: u64,
    pub shield_active: bool,
    pub shield_remaining_ms: f32,
}

impl UiSnapshot {
    /// Elapsed time as `m:ss`
    pub fn clock(&self) -> String {
        let minutes = self.elapsed_ms / 60_000;
        let seconds = (self.elapsed_ms % 60_000) / 1000;
        format!("{}:{:02}", minutes, seconds)
    }

    /// Whole shield seconds left, rounded up
    pub fn shield_seconds(&self) -> u32 {
        (self.shield_remaining_ms / 1000.0).ceil().max(0.0) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the session RNG was created from
    pub seed: u64,
    pub arena: Arena,
    pub player: Player,
    /// Only grows, up to MAX_ENEMIES
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    /// Visual feedback (not gameplay-affecting)
    pub particles: Particles,
    /// Fractional; floored for display
    pub score: f64,
    pub lives: u32,
    pub wave: u32,
    pub elapsed_ms: f64,
    pub shield_active: bool,
    pub timers: Timers,
    pub phase: GamePhase,
    next_id: u32,
}

impl GameState {
    /// Fresh session: player at the center, initial enemies and one plushie
    pub fn new(seed: u64, arena: Arena, rng: &mut impl Rng) -> Self {
        let player = Player::new(arena.center());
        let mut state = Self {
            seed,
            arena,
            player,
            enemies: Vec::with_capacity(MAX_ENEMIES),
            collectibles: Vec::with_capacity(MAX_COLLECTIBLES),
            particles: Particles::new(),
            score: 0.0,
            lives: STARTING_LIVES,
            wave: 1,
            elapsed_ms: 0.0,
            shield_active: false,
            timers: Timers::default(),
            phase: GamePhase::Playing,
            next_id: 1,
        };

        for _ in 0..INITIAL_ENEMIES {
            state.spawn_enemy(rng);
        }
        state.spawn_collectible(rng);

        log::info!(
            "Session started (seed {}): {} enemies, {} plushies",
            seed,
            state.enemies.len(),
            state.collectibles.len()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an enemy on the arena edge at the current wave's speed
    pub fn spawn_enemy(&mut self, rng: &mut impl Rng) {
        let placement = self.arena.enemy_spawn_point(Some(self.player.pos), rng);
        let speed = Enemy::speed_for_wave(self.wave, rng);
        let id = self.next_entity_id();
        log::debug!(
            "Enemy {} at ({:.0}, {:.0}) speed {:.1} after {} tries",
            id,
            placement.pos.x,
            placement.pos.y,
            speed,
            placement.attempts
        );
        self.enemies.push(Enemy::new(id, placement.pos, speed));
    }

    /// Add a plushie somewhere clear of the trees
    pub fn spawn_collectible(&mut self, rng: &mut impl Rng) -> Vec2 {
        let placement = self.arena.collectible_spawn_point(rng);
        let id = self.next_entity_id();
        self.collectibles.push(Collectible::new(id, placement.pos));
        placement.pos
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn display_score(&self) -> u64 {
        self.score.floor() as u64
    }

    pub fn snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            score: self.display_score(),
            lives: self.lives,
            wave: self.wave,
            elapsed_ms: self.elapsed_ms as u64,
            shield_active: self.shield_active,
            shield_remaining_ms: self.timers.shield_ms,
        }
    }

    /// Invincibility blink: true on frames where the player sprite is skipped
    pub fn player_blinked_out(&self) -> bool {
        let t = self.timers.invincible_ms;
        t > 0.0 && (t / 130.0).floor() as i64 % 2 == 0
    }

    /// Screen shake amplitude in pixels (zero when not shaking)
    pub fn shake_magnitude(&self) -> f32 {
        if self.timers.shake_ms > 0.0 {
            (self.timers.shake_ms / 65.0).min(8.0)
        } else {
            0.0
        }
    }
}
