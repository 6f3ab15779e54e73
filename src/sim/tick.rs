//! Per-frame simulation step
//!
//! The fixed order below is part of the game's behaviour: timers, spawns,
//! input, movement, shield push-back, pickups, damage, feedback.

use glam::Vec2;
use rand::Rng;

use super::collision::push_out;
use super::enemy::SteeringContext;
use super::particles::palette;
use super::state::{GameEvent, GamePhase, GameState, UiSnapshot};
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Discrete keyboard axes, each in {-1, 0, 1}
    pub keyboard: Vec2,
    /// Touch joystick vector, each axis in [-1, 1]
    pub joystick: Vec2,
}

impl TickInput {
    /// Movement intent: keyboard unless the joystick is out of its deadzone
    pub fn intent(&self) -> Vec2 {
        if self.joystick.x.abs() > JOYSTICK_DEADZONE || self.joystick.y.abs() > JOYSTICK_DEADZONE {
            self.joystick
        } else {
            self.keyboard
        }
    }
}

/// Everything a frame produced
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    pub snapshot: UiSnapshot,
}

/// Advance the session by one frame of `dt_ms` milliseconds.
///
/// Does nothing (and reports nothing) once the session has left `Playing`.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    dt_ms: f32,
    rng: &mut impl Rng,
) -> Option<TickOutcome> {
    if !state.is_running() {
        return None;
    }
    let mut events = Vec::new();

    // 1. Clock and passive score
    state.elapsed_ms += dt_ms as f64;
    state.score += dt_ms as f64 / 1000.0 * SCORE_PER_SECOND;

    // 2. Status timers
    tick_status_timers(state, dt_ms, rng, &mut events);

    // 3. Periodic spawns
    tick_spawn_timers(state, dt_ms, rng, &mut events);

    // 4. Input
    let intent = input.intent();

    // 5. Movement. Enemies steer from positions as they stood before the pass.
    state.player.update(dt_ms, intent, &state.arena);
    let neighbours: Vec<(u32, Vec2)> = state.enemies.iter().map(|e| (e.id, e.pos)).collect();
    let ctx = SteeringContext {
        player_pos: state.player.pos,
        shield_active: state.shield_active,
        neighbours: &neighbours,
        arena: &state.arena,
    };
    for enemy in &mut state.enemies {
        enemy.update(dt_ms, &ctx, rng);
    }

    // 6. Shield keeps enemies at arm's length
    if state.shield_active {
        let player = &state.player;
        for enemy in &mut state.enemies {
            let clearance = player.radius + enemy.radius + SHIELD_CLEARANCE;
            if let Some(pos) = push_out(enemy.pos, player.pos, clearance) {
                enemy.pos = pos;
            }
        }
    }

    // 7. Pickups
    collect_pickups(state, dt_ms, rng, &mut events);

    // 8. Contact damage, at most one hit per frame
    if !state.shield_active && state.timers.invincible_ms <= 0.0 {
        let hit = state.enemies.iter().any(|e| state.player.overlaps(e));
        if hit {
            take_damage(state, rng, &mut events);
        }
    }

    // 9. Feedback
    state.particles.update(dt_ms);

    // 10. HUD
    Some(TickOutcome {
        events,
        snapshot: state.snapshot(),
    })
}

fn tick_status_timers(
    state: &mut GameState,
    dt_ms: f32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    if state.shield_active {
        state.timers.shield_ms -= dt_ms;
        if state.timers.shield_ms <= 0.0 {
            state.shield_active = false;
            state.timers.shield_ms = 0.0;
            let pos = state.player.pos;
            state.particles.burst(pos, palette::SHIELD_ORANGE, 10, rng);
            state
                .particles
                .text(pos - Vec2::new(0.0, 30.0), "Shield gone!", palette::SHIELD_GONE_TEXT);
            log::info!("Shield expired");
            events.push(GameEvent::ShieldExpired);
        }
    }
    if state.timers.invincible_ms > 0.0 {
        state.timers.invincible_ms -= dt_ms;
    }
    if state.timers.shake_ms > 0.0 {
        state.timers.shake_ms -= dt_ms;
    }
}

fn tick_spawn_timers(
    state: &mut GameState,
    dt_ms: f32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    state.timers.collectible_ms += dt_ms;
    if state.timers.collectible_ms >= COLLECTIBLE_INTERVAL_MS {
        state.timers.collectible_ms = 0.0;
        if state.collectibles.len() < MAX_COLLECTIBLES {
            let pos = state.spawn_collectible(rng);
            events.push(GameEvent::CollectibleSpawned { pos });
        }
    }

    // Latches at the interval until there is room for more enemies
    state.timers.wave_ms += dt_ms;
    if state.timers.wave_ms >= WAVE_INTERVAL_MS && state.enemies.len() < MAX_ENEMIES {
        state.timers.wave_ms = 0.0;
        state.wave += 1;
        let room = MAX_ENEMIES - state.enemies.len();
        let spawned = ENEMIES_PER_WAVE.min(room);
        for _ in 0..spawned {
            state.spawn_enemy(rng);
        }
        let banner = Vec2::new(state.arena.width / 2.0, state.arena.ui_inset + 70.0);
        state
            .particles
            .text(banner, format!("WAVE {}!", state.wave), palette::WAVE_RED);
        log::info!(
            "Wave {}: +{} enemies ({} total)",
            state.wave,
            spawned,
            state.enemies.len()
        );
        events.push(GameEvent::WaveStarted {
            wave: state.wave,
            spawned,
        });
    }
}

fn collect_pickups(
    state: &mut GameState,
    dt_ms: f32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let player = &state.player;
    let mut collected = Vec::new();
    state.collectibles.retain_mut(|c| {
        c.update(dt_ms);
        if player.overlaps(&*c) {
            collected.push(c.pos);
            false
        } else {
            true
        }
    });

    for pos in collected {
        state.shield_active = true;
        state.timers.shield_ms = SHIELD_DURATION_MS;
        state.score += PICKUP_SCORE;
        state.particles.burst(pos, palette::GOLD, 14, rng);
        state
            .particles
            .text(pos - Vec2::new(0.0, 34.0), "+50", palette::GOLD);
        log::info!("Plushie collected, shield up for {} ms", SHIELD_DURATION_MS);
        events.push(GameEvent::ShieldCollected { pos });
    }
}

fn take_damage(state: &mut GameState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    state.timers.invincible_ms = INVINCIBLE_DURATION_MS;
    state.timers.shake_ms = SHAKE_DURATION_MS;

    let pos = state.player.pos;
    state.particles.burst(pos, palette::HURT_RED, 14, rng);
    state
        .particles
        .text(pos - Vec2::new(0.0, 34.0), "OUCH!", palette::HURT_RED);
    log::info!("Player hit, {} lives left", state.lives);
    events.push(GameEvent::Damaged {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::Ending {
            remaining_ms: GAME_OVER_DELAY_MS,
        };
        let score = state.display_score();
        log::info!("Out of lives at {} points", score);
        events.push(GameEvent::LivesExhausted { score });
    }
}
