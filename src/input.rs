//! Input sampling: held movement keys plus the touch joystick
//!
//! Platform code feeds raw key codes and drag positions in; the simulation
//! only ever sees the [`TickInput`] produced by [`InputState::snapshot`].

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Knob travel of the on-screen joystick, in pixels
pub const KNOB_MAX: f32 = 38.0;

/// Movement keys, by their DOM `code` names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyA,
    KeyD,
    KeyW,
    KeyS,
}

impl MoveKey {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(MoveKey::ArrowLeft),
            "ArrowRight" => Some(MoveKey::ArrowRight),
            "ArrowUp" => Some(MoveKey::ArrowUp),
            "ArrowDown" => Some(MoveKey::ArrowDown),
            "KeyA" => Some(MoveKey::KeyA),
            "KeyD" => Some(MoveKey::KeyD),
            "KeyW" => Some(MoveKey::KeyW),
            "KeyS" => Some(MoveKey::KeyS),
            _ => None,
        }
    }
}

/// Joystick reading for a drag from the base center to `touch`.
///
/// Returns the unit direction fed to the game and the clamped knob offset
/// for drawing.
pub fn joystick_from_drag(origin: Vec2, touch: Vec2) -> (Vec2, Vec2) {
    let delta = touch - origin;
    let dir = delta.normalize_or_zero();
    let knob = dir * delta.length().min(KNOB_MAX);
    (dir, knob)
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<MoveKey>,
    joystick: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for keys that don't move the player
    pub fn key_down(&mut self, code: &str) -> bool {
        match MoveKey::from_code(code) {
            Some(key) => {
                self.held.insert(key);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = MoveKey::from_code(code) {
            self.held.remove(&key);
        }
    }

    pub fn set_joystick(&mut self, dir: Vec2) {
        self.joystick = dir;
    }

    /// Touch released
    pub fn release_joystick(&mut self) {
        self.joystick = Vec2::ZERO;
    }

    /// Window lost focus: nothing is held any more
    pub fn clear(&mut self) {
        self.held.clear();
        self.joystick = Vec2::ZERO;
    }

    /// Discrete keyboard axes, each in {-1, 0, 1}
    pub fn keyboard_axes(&self) -> Vec2 {
        let held = |a, b| self.held.contains(&a) || self.held.contains(&b);
        let mut axes = Vec2::ZERO;
        if held(MoveKey::ArrowLeft, MoveKey::KeyA) {
            axes.x -= 1.0;
        }
        if held(MoveKey::ArrowRight, MoveKey::KeyD) {
            axes.x += 1.0;
        }
        if held(MoveKey::ArrowUp, MoveKey::KeyW) {
            axes.y -= 1.0;
        }
        if held(MoveKey::ArrowDown, MoveKey::KeyS) {
            axes.y += 1.0;
        }
        axes
    }

    pub fn snapshot(&self) -> TickInput {
        TickInput {
            keyboard: self.keyboard_axes(),
            joystick: self.joystick,
        }
    }
}
