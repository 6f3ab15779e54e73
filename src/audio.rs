//! Procedural audio: chiptune loop and event cues
//!
//! Everything is expressed as scheduled oscillator notes, so no sample files
//! are needed. A platform backend implements [`AudioSink`] to actually make
//! noise; [`SilentAudio`] stands in when there is none.

use crate::sim::GameEvent;

/// Master gain while the music is audible
pub const MASTER_GAIN: f32 = 0.18;
/// Seconds per loop step
pub const STEP_SECS: f32 = 0.22;
/// Steps in one pass of the loop
pub const LOOP_STEPS: usize = 32;
/// The next pass is queued this long before the current one ends
const LOOP_LEAD_SECS: f32 = 0.2;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One enveloped oscillator note (decays to silence over its duration)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    /// Start time on the backend clock, seconds
    pub start_s: f32,
    pub dur_s: f32,
    pub waveform: Waveform,
    pub gain: f32,
}

/// Platform audio output
pub trait AudioSink {
    fn schedule(&mut self, notes: &[Note]);
    fn set_master_gain(&mut self, gain: f32);
}

/// Backend that plays nothing; keeps a tally for diagnostics
#[derive(Debug, Clone, Default)]
pub struct SilentAudio {
    pub notes_scheduled: usize,
    pub master_gain: f32,
}

impl AudioSink for SilentAudio {
    fn schedule(&mut self, notes: &[Note]) {
        self.notes_scheduled += notes.len();
        log::trace!("{} notes scheduled (silent)", notes.len());
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain;
    }
}

/// Sound effects tied to game events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Plushie picked up, shield on
    Pickup,
    ShieldDown,
    Hurt,
    Wave,
    GameOver,
}

impl SoundCue {
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShieldCollected { .. } => Some(SoundCue::Pickup),
            GameEvent::ShieldExpired => Some(SoundCue::ShieldDown),
            GameEvent::Damaged { .. } => Some(SoundCue::Hurt),
            GameEvent::WaveStarted { .. } => Some(SoundCue::Wave),
            GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
            GameEvent::CollectibleSpawned { .. } | GameEvent::LivesExhausted { .. } => None,
        }
    }

    /// Notes for this cue starting at `t`
    pub fn notes(self, t: f32) -> Vec<Note> {
        let note = |freq: f32, offset: f32, dur_s: f32, waveform: Waveform, gain: f32| Note {
            freq,
            start_s: t + offset,
            dur_s,
            waveform,
            gain,
        };
        match self {
            // Rising two-tone chime
            SoundCue::Pickup => vec![
                note(784.0, 0.0, 0.08, Waveform::Square, 0.25),
                note(1047.0, 0.08, 0.12, Waveform::Square, 0.25),
            ],
            SoundCue::ShieldDown => vec![
                note(523.0, 0.0, 0.1, Waveform::Triangle, 0.2),
                note(392.0, 0.1, 0.16, Waveform::Triangle, 0.2),
            ],
            // Buzz over a thump
            SoundCue::Hurt => vec![
                note(180.0, 0.0, 0.15, Waveform::Sawtooth, 0.3),
                note(90.0, 0.0, 0.2, Waveform::Sine, 0.3),
            ],
            SoundCue::Wave => [523.0, 659.0, 784.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| note(f, i as f32 * 0.09, 0.09, Waveform::Square, 0.2))
                .collect(),
            SoundCue::GameOver => [392.0, 330.0, 262.0, 196.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| note(f, i as f32 * 0.18, 0.18, Waveform::Triangle, 0.25))
                .collect(),
        }
    }
}

/// One line of the loop: a pattern (0 = rest) and how it is voiced
struct Voice {
    pattern: [u16; LOOP_STEPS],
    waveform: Waveform,
    /// Fraction of the step the note sounds for
    length: f32,
    gain: f32,
}

const MELODY: Voice = Voice {
    pattern: [
        523, 587, 659, 523, 659, 784, 0, 0, //
        784, 880, 784, 659, 523, 0, 523, 0, //
        659, 523, 440, 494, 523, 440, 0, 440, //
        392, 440, 494, 523, 440, 392, 349, 0,
    ],
    waveform: Waveform::Square,
    length: 0.85,
    gain: 0.22,
};

const HARMONY: Voice = Voice {
    pattern: [
        261, 0, 329, 0, 329, 0, 392, 0, //
        392, 0, 440, 0, 261, 0, 261, 0, //
        329, 0, 220, 0, 261, 0, 220, 0, //
        196, 0, 247, 0, 220, 196, 174, 0,
    ],
    waveform: Waveform::Triangle,
    length: 0.75,
    gain: 0.12,
};

const BASS: Voice = Voice {
    pattern: [
        130, 0, 130, 0, 164, 0, 0, 0, //
        196, 0, 196, 0, 130, 0, 0, 0, //
        164, 0, 110, 0, 130, 0, 0, 0, //
        98, 0, 123, 0, 110, 0, 87, 0,
    ],
    waveform: Waveform::Sawtooth,
    length: 0.6,
    gain: 0.1,
};

/// Length of one pass of the loop, seconds
pub fn loop_secs() -> f32 {
    LOOP_STEPS as f32 * STEP_SECS
}

/// Every note of one pass of the loop starting at `t`
pub fn loop_notes(t: f32) -> Vec<Note> {
    [&MELODY, &HARMONY, &BASS]
        .into_iter()
        .flat_map(|voice| {
            voice
                .pattern
                .iter()
                .enumerate()
                .filter(|(_, f)| **f > 0)
                .map(move |(i, &f)| Note {
                    freq: f as f32,
                    start_s: t + i as f32 * STEP_SECS,
                    dur_s: STEP_SECS * voice.length,
                    waveform: voice.waveform,
                    gain: voice.gain,
                })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MusicState {
    Stopped,
    /// Next pass gets queued once the clock reaches `requeue_at`
    Playing { requeue_at: f32 },
}

/// Background music and cues on top of an [`AudioSink`]
pub struct Audio<S: AudioSink> {
    sink: S,
    state: MusicState,
    muted: bool,
}

impl<S: AudioSink> Audio<S> {
    pub fn new(mut sink: S, muted: bool) -> Self {
        sink.set_master_gain(if muted { 0.0 } else { MASTER_GAIN });
        Self {
            sink,
            state: MusicState::Stopped,
            muted,
        }
    }

    /// Start the loop; no-op if already playing or muted
    pub fn start_music(&mut self, now_s: f32) {
        if self.state == MusicState::Stopped && !self.muted {
            self.queue_loop(now_s);
        }
    }

    pub fn stop_music(&mut self) {
        self.state = MusicState::Stopped;
    }

    /// Call once per frame with the backend clock
    pub fn update(&mut self, now_s: f32) {
        if self.muted {
            return;
        }
        if let MusicState::Playing { requeue_at } = self.state {
            if now_s >= requeue_at {
                self.queue_loop(now_s);
            }
        }
    }

    /// Flip mute and return the new muted state. Unmuting restarts the loop.
    pub fn toggle_mute(&mut self, now_s: f32) -> bool {
        self.set_muted(!self.muted, now_s);
        self.muted
    }

    /// No-op when already in the requested state
    pub fn set_muted(&mut self, muted: bool, now_s: f32) {
        if muted == self.muted {
            return;
        }
        self.muted = muted;
        self.sink.set_master_gain(if muted { 0.0 } else { MASTER_GAIN });
        if !muted {
            self.queue_loop(now_s);
        }
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
    }

    pub fn play_cue(&mut self, cue: SoundCue, now_s: f32) {
        if !self.muted {
            self.sink.schedule(&cue.notes(now_s));
        }
    }

    /// Play whatever cues a frame's events call for
    pub fn on_events(&mut self, events: &[GameEvent], now_s: f32) {
        for cue in events.iter().filter_map(SoundCue::from_event) {
            self.play_cue(cue, now_s);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, MusicState::Playing { .. })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn queue_loop(&mut self, now_s: f32) {
        self.sink.schedule(&loop_notes(now_s));
        self.state = MusicState::Playing {
            requeue_at: now_s + loop_secs() - LOOP_LEAD_SECS,
        };
    }
}
