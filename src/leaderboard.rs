//! Score board
//!
//! Scores are submitted once a session ends. Submission and the follow-up
//! rank lookup run off the frame loop; the game only polls a handle for a
//! status line to show, and a failed save never touches the session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;
use crate::settings::validate_player_name;

/// How many entries the board screen lists
pub const DEFAULT_TOP_LIMIT: usize = 20;

/// A single score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u64,
    /// Unix timestamp (ms) when submitted
    pub created_at: u64,
}

/// A place scores are kept
pub trait ScoreBoard: Send {
    /// Record a score under a (trimmed) player name
    fn submit(&mut self, player_name: &str, score: u64) -> Result<(), LeaderboardError>;

    /// Best `limit` entries, highest first
    fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;

    /// 1-indexed rank a score holds: one more than the number of strictly
    /// better entries. `None` when the board can't tell.
    fn rank_of(&self, score: u64) -> Result<Option<usize>, LeaderboardError>;
}

/// JSON file backed board, kept sorted by score (descending)
#[derive(Debug, Clone)]
pub struct LocalScoreBoard {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl LocalScoreBoard {
    /// Open the board at `path`; a missing file is an empty board
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LeaderboardError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(json) => {
                let mut entries: Vec<ScoreEntry> =
                    serde_json::from_str(&json).map_err(|source| LeaderboardError::Format {
                        path: path.clone(),
                        source,
                    })?;
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                log::info!("Loaded {} scores from {}", entries.len(), path.display());
                entries
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No score board at {}, starting fresh", path.display());
                Vec::new()
            }
            Err(source) => return Err(LeaderboardError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        let json =
            serde_json::to_string_pretty(&self.entries).map_err(|source| LeaderboardError::Format {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, json).map_err(|source| LeaderboardError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreBoard for LocalScoreBoard {
    fn submit(&mut self, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        let player_name = validate_player_name(player_name)?;
        let entry = ScoreEntry {
            player_name,
            score,
            created_at: now_ms(),
        };

        // Ties go after existing entries
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        if let Err(err) = self.save() {
            self.entries.remove(pos);
            return Err(err);
        }
        log::info!("Score {} saved ({} entries)", score, self.entries.len());
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }

    fn rank_of(&self, score: u64) -> Result<Option<usize>, LeaderboardError> {
        let better = self.entries.iter().filter(|e| e.score > score).count();
        Ok(Some(better + 1))
    }
}

/// Stand-in when no board is configured: saves fail, ranks are unknown
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledScoreBoard;

impl ScoreBoard for DisabledScoreBoard {
    fn submit(&mut self, _player_name: &str, _score: u64) -> Result<(), LeaderboardError> {
        Err(LeaderboardError::Unavailable)
    }

    fn top(&self, _limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Err(LeaderboardError::Unavailable)
    }

    fn rank_of(&self, _score: u64) -> Result<Option<usize>, LeaderboardError> {
        Ok(None)
    }
}

/// Where a background submission stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Pending,
    /// Saved; rank is `None` when the lookup failed or is unsupported
    Saved { rank: Option<usize> },
    Failed(String),
}

impl SubmitStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, SubmitStatus::Pending)
    }
}

/// Handle to a submission running on a worker thread
#[derive(Debug)]
pub struct PendingSubmission {
    rx: Receiver<SubmitStatus>,
    status: SubmitStatus,
}

impl PendingSubmission {
    /// Non-blocking; call once per frame until finished
    pub fn poll(&mut self) -> &SubmitStatus {
        if !self.status.is_finished() {
            match self.rx.try_recv() {
                Ok(status) => self.status = status,
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.status = SubmitStatus::Failed(LeaderboardError::WorkerGone.to_string());
                }
            }
        }
        &self.status
    }

    /// Block until the worker reports
    pub fn wait(mut self) -> SubmitStatus {
        if !self.status.is_finished() {
            self.status = self
                .rx
                .recv()
                .unwrap_or_else(|_| SubmitStatus::Failed(LeaderboardError::WorkerGone.to_string()));
        }
        self.status
    }
}

/// Submit a score and look up its rank without blocking the caller
pub fn submit_in_background<B>(
    board: Arc<Mutex<B>>,
    player_name: impl Into<String>,
    score: u64,
) -> PendingSubmission
where
    B: ScoreBoard + 'static,
{
    let player_name = player_name.into();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let status = match submit_and_rank(&board, &player_name, score) {
            Ok(rank) => SubmitStatus::Saved { rank },
            Err(err) => {
                log::warn!("Score not saved: {}", err);
                SubmitStatus::Failed(err.to_string())
            }
        };
        // Receiver may already be gone (player left the screen)
        let _ = tx.send(status);
    });
    PendingSubmission {
        rx,
        status: SubmitStatus::Pending,
    }
}

fn submit_and_rank<B: ScoreBoard>(
    board: &Mutex<B>,
    player_name: &str,
    score: u64,
) -> Result<Option<usize>, LeaderboardError> {
    let mut board = board.lock().map_err(|_| LeaderboardError::Unavailable)?;
    board.submit(player_name, score)?;
    // A failed lookup still counts as saved
    Ok(board.rank_of(score).unwrap_or_else(|err| {
        log::warn!("Rank lookup failed: {}", err);
        None
    }))
}

/// Encouragement for the game-over screen
pub fn rank_message(rank: usize) -> String {
    match rank {
        1 => "You're #1 in the world!".to_string(),
        2..=3 => "Top 3 globally! Incredible!".to_string(),
        4..=10 => "Top 10 worldwide!".to_string(),
        11..=50 => format!("Global rank #{}, nice run!", rank),
        _ => format!("You'd rank #{} globally, keep going!", rank),
    }
}

/// User-facing save status
pub fn status_line(status: &SubmitStatus) -> String {
    match status {
        SubmitStatus::Pending => "Saving score to leaderboard...".to_string(),
        SubmitStatus::Saved { .. } => "Score saved to leaderboard!".to_string(),
        SubmitStatus::Failed(reason) => format!("Score not saved: {}", reason),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
