//! Save Punch - a single-screen arcade survival game
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, timers, spawning)
//! - `input`: Keyboard/joystick capture reduced to an intent vector
//! - `session`: Frame scheduling and the game-over handoff
//! - `leaderboard`: Score persistence and rank lookup
//! - `audio`: Sound cue routing and music lifecycle
//! - `settings`: User preferences

pub mod audio;
pub mod error;
pub mod input;
pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{LeaderboardError, NameError, SettingsError};
pub use session::{Session, SessionObserver};
pub use settings::Settings;

/// Game configuration constants
///
/// Durations are milliseconds, distances are world units (pixels),
/// speeds are units per second.
pub mod consts {
    /// Fence border width around the playfield
    pub const FENCE: f32 = 36.0;
    /// UI bar height used when the host does not report one
    pub const DEFAULT_UI_INSET: f32 = 52.0;

    /// Largest simulation step accepted from the scheduler
    pub const MAX_FRAME_MS: f32 = 50.0;
    /// Grace period between losing the last life and reporting game over
    pub const GAME_OVER_DELAY_MS: f32 = 600.0;

    /// Session rules
    pub const STARTING_LIVES: u32 = 3;
    pub const SCORE_PER_SECOND: f64 = 2.0;
    pub const PICKUP_SCORE: f64 = 50.0;
    pub const SHIELD_DURATION_MS: f32 = 12000.0;
    pub const INVINCIBLE_DURATION_MS: f32 = 2000.0;
    pub const SHAKE_DURATION_MS: f32 = 380.0;
    pub const COLLECTIBLE_INTERVAL_MS: f32 = 8000.0;
    pub const WAVE_INTERVAL_MS: f32 = 30000.0;
    pub const INITIAL_ENEMIES: usize = 3;
    pub const MAX_ENEMIES: usize = 12;
    pub const ENEMIES_PER_WAVE: usize = 2;
    pub const MAX_COLLECTIBLES: usize = 3;
    /// Extra gap kept between a shielded player and any enemy
    pub const SHIELD_CLEARANCE: f32 = 8.0;

    /// Player
    pub const PLAYER_RADIUS: f32 = 22.0;
    pub const PLAYER_SPEED: f32 = 165.0;
    pub const PLAYER_WALL_PADDING: f32 = 32.0;
    pub const PLAYER_MOVING_THRESHOLD: f32 = 0.05;
    pub const PLAYER_FACING_DEADZONE: f32 = 0.1;

    /// Enemy
    pub const ENEMY_RADIUS: f32 = 26.0;
    pub const ENEMY_WALL_PADDING: f32 = 34.0;
    pub const ENEMY_BASE_SPEED: f32 = 55.0;
    pub const ENEMY_SPEED_PER_WAVE: f32 = 10.0;
    pub const ENEMY_SPEED_JITTER: f32 = 18.0;
    pub const ENEMY_FACING_DEADZONE: f32 = 0.5;
    /// Neighbours closer than this multiple of the radius push each other apart
    pub const SEPARATION_RANGE: f32 = 2.4;
    pub const SEPARATION_WEIGHT: f32 = 0.35;
    pub const FLEE_WEIGHT: f32 = 0.75;
    pub const WANDER_WEIGHT: f32 = 0.25;
    pub const FLEE_SPEED_FACTOR: f32 = 0.85;
    /// Max wander heading change per re-roll (radians, either direction)
    pub const WANDER_TURN: f32 = 0.9;
    pub const WANDER_MIN_MS: f32 = 500.0;
    pub const WANDER_JITTER_MS: f32 = 700.0;

    /// Enemy spawning
    pub const ENEMY_SPAWN_PAD: f32 = FENCE + 22.0;
    pub const ENEMY_SPAWN_SAFE_DISTANCE: f32 = 200.0;
    pub const ENEMY_SPAWN_ATTEMPTS: u32 = 20;

    /// Collectible
    pub const COLLECTIBLE_RADIUS: f32 = 18.0;
    pub const COLLECTIBLE_BOB_CYCLES: f32 = 2.5;
    pub const COLLECTIBLE_BOB_AMPLITUDE: f32 = 5.0;
    pub const COLLECTIBLE_SPAWN_PAD: f32 = FENCE + 52.0;
    pub const COLLECTIBLE_OBSTACLE_CLEARANCE: f32 = 26.0;
    pub const COLLECTIBLE_SPAWN_ATTEMPTS: u32 = 40;

    /// Input
    pub const JOYSTICK_DEADZONE: f32 = 0.08;

    /// Feedback particles
    pub const PARTICLE_GRAVITY: f32 = 80.0;
    pub const BURST_MIN_SPEED: f32 = 60.0;
    pub const BURST_SPEED_JITTER: f32 = 100.0;
    pub const BURST_MIN_LIFE_MS: f32 = 600.0;
    pub const BURST_LIFE_JITTER_MS: f32 = 300.0;
    pub const PARTICLE_MAX_LIFE_MS: f32 = 900.0;
    pub const TEXT_LIFE_MS: f32 = 900.0;
    pub const TEXT_RISE_SPEED: f32 = 60.0;
}

/// Convert a millisecond step to seconds
#[inline]
pub fn ms_to_secs(dt_ms: f32) -> f32 {
    dt_ms / 1000.0
}
