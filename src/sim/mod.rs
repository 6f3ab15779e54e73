//! Deterministic simulation core
//!
//! All gameplay lives here. Given the same seed, inputs and frame times the
//! session plays out identically:
//! - Seeded RNG only, passed in by the caller
//! - Enemies steer from frame-start positions
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod collectible;
pub mod collision;
pub mod enemy;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;

pub use arena::{Arena, Bounds, Obstacle, Placement, Rock};
pub use collectible::Collectible;
pub use collision::{Circle, distance, overlaps, push_out, resolve_circle_overlap};
pub use enemy::{Enemy, Steering, SteeringContext, Wander};
pub use particles::{Color, Particles, Token, TokenKind, palette};
pub use player::Player;
pub use state::{GameEvent, GamePhase, GameState, Timers, UiSnapshot};
pub use tick::{TickInput, TickOutcome, tick};
