//! Save Punch headless runner
//!
//! Plays one session with a simple autopilot at 60 Hz, then submits the
//! score to the local board. Useful for soak-testing the simulation.
//!
//! Usage: `save-punch [seed] [settings.json]`

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use glam::Vec2;

use save_punch::audio::{Audio, SilentAudio};
use save_punch::consts::*;
use save_punch::leaderboard::{
    DisabledScoreBoard, LocalScoreBoard, PendingSubmission, SubmitStatus, rank_message,
    status_line, submit_in_background,
};
use save_punch::sim::{GameEvent, GameState, TickInput, UiSnapshot};
use save_punch::{Session, SessionObserver, Settings};

const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 10;

struct Headless {
    audio: Audio<SilentAudio>,
    clock_s: f32,
    last_logged_second: u64,
    final_score: Option<u64>,
}

impl SessionObserver for Headless {
    fn on_events(&mut self, events: &[GameEvent]) {
        self.audio.on_events(events, self.clock_s);
        for event in events {
            log::debug!("{:?}", event);
        }
    }

    fn on_snapshot(&mut self, snapshot: &UiSnapshot) {
        self.audio.update(self.clock_s);
        let second = snapshot.elapsed_ms / 1000;
        if second >= self.last_logged_second + 10 {
            self.last_logged_second = second;
            log::info!(
                "[{}] score {} lives {} wave {}{}",
                snapshot.clock(),
                snapshot.score,
                snapshot.lives,
                snapshot.wave,
                if snapshot.shield_active {
                    format!(" shield {}s", snapshot.shield_seconds())
                } else {
                    String::new()
                }
            );
        }
    }

    fn on_game_over(&mut self, score: u64) {
        self.audio.stop_music();
        self.final_score = Some(score);
    }
}

/// Run from the nearest macaque; otherwise go get the nearest plushie
fn autopilot(state: &GameState) -> TickInput {
    let player = state.player.pos;
    let threat = state
        .enemies
        .iter()
        .map(|e| (e.pos, e.pos.distance(player)))
        .filter(|&(_, d)| d < 160.0)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let dir = match threat {
        Some((pos, _)) if !state.shield_active => (player - pos).normalize_or_zero(),
        _ => state
            .collectibles
            .iter()
            .min_by(|a, b| a.pos.distance(player).total_cmp(&b.pos.distance(player)))
            .map(|c| (c.pos - player).normalize_or_zero())
            .unwrap_or(Vec2::ZERO),
    };
    TickInput {
        keyboard: Vec2::ZERO,
        joystick: dir,
    }
}

fn wait_for(mut pending: PendingSubmission) -> SubmitStatus {
    loop {
        let status = pending.poll().clone();
        if status.is_finished() {
            return status;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let settings_path = args.next().unwrap_or_else(|| "save_punch_settings.json".to_string());
    let settings = Settings::load_or_default(Path::new(&settings_path));

    log::info!("Save Punch (headless) starting, seed {}", seed);

    let observer = Headless {
        audio: Audio::new(SilentAudio::default(), settings.muted),
        clock_s: 0.0,
        last_logged_second: 0,
        final_score: None,
    };
    let mut session = Session::new(seed, 960.0, 640.0, DEFAULT_UI_INSET, observer);
    session.observer_mut().audio.start_music(0.0);

    let mut frames = 0;
    while !session.is_over() && frames < MAX_FRAMES {
        let t = frames as f64 * FRAME_MS;
        session.observer_mut().clock_s = (t / 1000.0) as f32;
        let input = autopilot(session.state());
        session.frame(t, &input);
        frames += 1;
    }

    let snapshot = session.state().snapshot();
    let score = session.observer().final_score.unwrap_or(snapshot.score);
    log::info!(
        "Run finished after {} frames: score {}, wave {}, time {} ({} notes played)",
        frames,
        score,
        snapshot.wave,
        snapshot.clock(),
        session.observer().audio.sink().notes_scheduled
    );

    let name = if settings.player_name.is_empty() {
        "Autopilot"
    } else {
        settings.player_name.as_str()
    };
    let pending = match LocalScoreBoard::open(&settings.leaderboard_path) {
        Ok(board) => submit_in_background(Arc::new(Mutex::new(board)), name, score),
        Err(err) => {
            log::warn!("{}", err);
            submit_in_background(Arc::new(Mutex::new(DisabledScoreBoard)), name, score)
        }
    };

    let status = wait_for(pending);
    log::info!("{}", status_line(&status));
    if let SubmitStatus::Saved { rank: Some(rank) } = status {
        log::info!("{}", rank_message(rank));
    }
}
