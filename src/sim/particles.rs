//! Fire-and-forget feedback: particle bursts and floating text
//!
//! Purely visual. Gameplay code emits tokens on events and never reads
//! them back.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::ms_to_secs;

/// 0xRRGGBB
pub type Color = u32;

/// Colours used by gameplay feedback
pub mod palette {
    use super::Color;

    pub const GOLD: Color = 0xFFD700;
    pub const SHIELD_ORANGE: Color = 0xFF8C00;
    pub const SHIELD_GONE_TEXT: Color = 0xFF6600;
    pub const HURT_RED: Color = 0xFF2222;
    pub const WAVE_RED: Color = 0xFF3333;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Physics dot; drawn at `size * alpha`
    Dot { size: f32 },
    Text { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub life_ms: f32,
    pub max_life_ms: f32,
    pub alpha: f32,
    pub kind: TokenKind,
}

impl Token {
    /// Draw radius for dots, `None` for text
    pub fn draw_size(&self) -> Option<f32> {
        match self.kind {
            TokenKind::Dot { size } => Some(size * self.alpha),
            TokenKind::Text { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Particles {
    tokens: Vec<Token>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Radial spray of `count` dots
    pub fn burst(&mut self, pos: Vec2, color: Color, count: usize, rng: &mut impl Rng) {
        self.tokens.reserve(count);
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32 + rng.random::<f32>() * 0.5;
            let speed = BURST_MIN_SPEED + rng.random::<f32>() * BURST_SPEED_JITTER;
            self.tokens.push(Token {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                color,
                life_ms: BURST_MIN_LIFE_MS + rng.random::<f32>() * BURST_LIFE_JITTER_MS,
                max_life_ms: PARTICLE_MAX_LIFE_MS,
                alpha: 1.0,
                kind: TokenKind::Dot {
                    size: 4.0 + rng.random::<f32>() * 5.0,
                },
            });
        }
    }

    /// One upward-drifting text label
    pub fn text(&mut self, pos: Vec2, message: impl Into<String>, color: Color) {
        self.tokens.push(Token {
            pos,
            vel: Vec2::new(0.0, -TEXT_RISE_SPEED),
            color,
            life_ms: TEXT_LIFE_MS,
            max_life_ms: TEXT_LIFE_MS,
            alpha: 1.0,
            kind: TokenKind::Text {
                message: message.into(),
            },
        });
    }

    /// Age, fade and move every token, dropping the expired ones.
    ///
    /// Gravity pulls text labels as well, which is what slows their rise.
    pub fn update(&mut self, dt_ms: f32) {
        let s = ms_to_secs(dt_ms);
        self.tokens.retain_mut(|t| {
            t.life_ms -= dt_ms;
            t.alpha = (t.life_ms / t.max_life_ms).max(0.0);
            t.pos += t.vel * s;
            t.vel.y += PARTICLE_GRAVITY * s;
            t.life_ms > 0.0
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_spawns_count_dots() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Particles::new();
        particles.burst(Vec2::ZERO, palette::GOLD, 14, &mut rng);
        assert_eq!(particles.len(), 14);
        for t in particles.iter() {
            let speed = t.vel.length();
            assert!(speed > BURST_MIN_SPEED - 1e-3);
            assert!(speed < BURST_MIN_SPEED + BURST_SPEED_JITTER + 1e-3);
            assert!((BURST_MIN_LIFE_MS..=PARTICLE_MAX_LIFE_MS).contains(&t.life_ms));
            assert!(t.draw_size().is_some());
        }
    }

    #[test]
    fn test_text_rises_then_expires() {
        let mut particles = Particles::new();
        particles.text(Vec2::new(0.0, 100.0), "OUCH!", palette::HURT_RED);
        particles.update(100.0);
        let token = particles.iter().next().cloned().unwrap();
        assert!(token.pos.y < 100.0);
        assert!((token.alpha - 800.0 / 900.0).abs() < 1e-5);
        assert_eq!(token.draw_size(), None);

        particles.update(800.0);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_gravity_bends_dots_downward() {
        let mut particles = Particles::new();
        particles.tokens.push(Token {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            color: palette::GOLD,
            life_ms: 900.0,
            max_life_ms: 900.0,
            alpha: 1.0,
            kind: TokenKind::Dot { size: 5.0 },
        });
        particles.update(500.0);
        particles.update(100.0);
        let t = particles.iter().next().unwrap();
        assert!(t.vel.y > 0.0 && t.pos.y > 0.0);
    }

    proptest! {
        #[test]
        fn alpha_never_increases(seed in any::<u64>(), steps in prop::collection::vec(0.0f32..50.0, 1..80)) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut particles = Particles::new();
            particles.burst(Vec2::ZERO, palette::GOLD, 8, &mut rng);
            particles.text(Vec2::ZERO, "+50", palette::GOLD);

            let mut last: Vec<f32> = particles.iter().map(|t| t.alpha).collect();
            for dt in steps {
                // Survivors keep their relative order
                let before: Vec<Token> = particles.iter().cloned().collect();
                particles.update(dt);
                let mut survivors = particles.iter();
                let mut next_alpha = Vec::new();
                for (prev, prev_alpha) in before.iter().zip(&last) {
                    if prev.life_ms - dt > 0.0 {
                        let t = survivors.next().unwrap();
                        prop_assert!(t.alpha <= *prev_alpha + 1e-6);
                        prop_assert!(t.life_ms > 0.0);
                        next_alpha.push(t.alpha);
                    }
                }
                prop_assert!(survivors.next().is_none());
                last = next_alpha;
            }
        }
    }
}
