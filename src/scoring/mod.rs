//! Scores, accuracy and game sessions
//!
//! Formulas (t = seconds left, floored after scaling):
//!   bst insert / dfs graph / find bst = 50 + ⌊5t⌋
//!   tree builder level                = 100 + ⌊10t⌋
//!   traversal race                    = 100 + ⌊5t⌋
//!   pathfinder level                  = 50 + ⌊100·efficiency⌋ + ⌊2t⌋
//!   speed round answer                = 50 + ⌊t/10⌋·5
//!   endless quiz answer               = 100 + ⌊streak/3⌋·10
//!
//! Time is always an input; nothing here reads a clock.

use std::fmt;

use thiserror::Error;
use tracing::debug;

/// Lives at the start of a session.
pub const STARTING_LIVES: u32 = 3;

/// Rounds in a fixed-length game.
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Errors from session bookkeeping.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScoringError {
    /// Session already ended.
    #[error("session is over ({0})")]
    SessionOver(SessionState),
}

#[inline]
fn scaled(time_left: f64, factor: f64) -> u32 {
    // NaN and negative clocks score no bonus.
    let value = (time_left * factor).floor();
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value as u32
    }
}

/// Correct answer in BST insert, DFS order or find-the-BST.
pub fn graph_round_score(time_left: f64) -> u32 {
    50 + scaled(time_left, 5.0)
}

/// Completed tree builder level.
pub fn tree_builder_score(time_left: f64) -> u32 {
    100 + scaled(time_left, 10.0)
}

/// Correct traversal race submission.
pub fn traversal_race_score(time_left: f64) -> u32 {
    100 + scaled(time_left, 5.0)
}

/// Completed pathfinder level.
pub fn pathfinder_score(efficiency: f64, time_left: f64) -> u32 {
    50 + scaled(efficiency, 100.0) + scaled(time_left, 2.0)
}

/// Correct speed round answer.
pub fn speed_round_score(time_left: f64) -> u32 {
    50 + scaled(time_left / 10.0, 1.0) * 5
}

/// Correct endless quiz answer at the current streak.
pub fn endless_quiz_score(streak: u32) -> u32 {
    100 + (streak / 3) * 10
}

/// Rounded percentage of correct answers; `None` when nothing was answered.
pub fn accuracy(correct: u32, total: u32) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let percent = (f64::from(correct.min(total)) / f64::from(total) * 100.0).round();
    Some(percent as u8)
}

/// Game identifiers as stored with results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameType {
    /// Place a value in a BST.
    BstInsert,
    /// Grow a tree slot by slot.
    TreeBuilder,
    /// Reproduce a traversal order.
    TraversalRace,
    /// Click graph nodes in DFS order.
    DfsOrder,
    /// Pick the BST out of three trees.
    FindBst,
    /// Draw a path through a maze.
    Pathfinder,
    /// Timed quiz.
    SpeedRound,
    /// Quiz until lives run out.
    EndlessQuiz,
}

impl GameType {
    /// Stable storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            GameType::BstInsert => "bst-insert",
            GameType::TreeBuilder => "tree-builder",
            GameType::TraversalRace => "traversal-race",
            GameType::DfsOrder => "dfs-dfs-order",
            GameType::FindBst => "dfs-find-bst",
            GameType::Pathfinder => "pathfinder",
            GameType::SpeedRound => "speed-round",
            GameType::EndlessQuiz => "endless-quiz",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finished game as handed to persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameResult {
    /// Which game.
    pub game_type: GameType,
    /// Final score.
    pub score: u32,
    /// Percentage correct, when the game tracks answers.
    pub accuracy: Option<u8>,
    /// Seconds played, when the game tracks it.
    pub time_taken: Option<u32>,
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    /// Still running.
    Playing,
    /// Out of lives.
    Lost,
    /// Final round cleared.
    Won,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Playing => "playing",
            SessionState::Lost => "lost",
            SessionState::Won => "won",
        })
    }
}

/// Running score, lives and round counter of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    /// Points so far.
    pub score: u32,
    /// Lives left.
    pub lives: u32,
    /// Current round, starting at 1.
    pub round: u32,
    /// Last round before winning; `None` for endless games.
    pub max_rounds: Option<u32>,
    /// Consecutive correct answers.
    pub streak: u32,
    /// Answers recorded as correct.
    pub correct: u32,
    /// Answers recorded.
    pub answered: u32,
    state: SessionState,
}

impl Session {
    /// Fresh session: no points, three lives, round 1.
    pub fn start(max_rounds: Option<u32>) -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            round: 1,
            max_rounds,
            streak: 0,
            correct: 0,
            answered: 0,
            state: SessionState::Playing,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn ensure_playing(&self) -> Result<(), ScoringError> {
        match self.state {
            SessionState::Playing => Ok(()),
            over => Err(ScoringError::SessionOver(over)),
        }
    }

    /// Add points.
    pub fn award(&mut self, points: u32) -> Result<u32, ScoringError> {
        self.ensure_playing()?;
        self.score = self.score.saturating_add(points);
        Ok(self.score)
    }

    /// Track an answer for streak and accuracy.
    pub fn record_answer(&mut self, correct: bool) -> Result<(), ScoringError> {
        self.ensure_playing()?;
        self.answered += 1;
        if correct {
            self.correct += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        Ok(())
    }

    /// Lose a life; the session is lost at zero.
    pub fn lose_life(&mut self) -> Result<SessionState, ScoringError> {
        self.ensure_playing()?;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            debug!(score = self.score, round = self.round, "session lost");
            self.state = SessionState::Lost;
        }
        Ok(self.state)
    }

    /// Move past a cleared round; the session is won after the last one.
    pub fn advance(&mut self) -> Result<SessionState, ScoringError> {
        self.ensure_playing()?;
        match self.max_rounds {
            Some(max) if self.round >= max => {
                debug!(score = self.score, "session won");
                self.state = SessionState::Won;
            }
            _ => self.round += 1,
        }
        Ok(self.state)
    }

    /// Accuracy over recorded answers.
    pub fn accuracy(&self) -> Option<u8> {
        accuracy(self.correct, self.answered)
    }

    /// Snapshot for persistence.
    pub fn result(&self, game_type: GameType, time_taken: Option<u32>) -> GameResult {
        GameResult {
            game_type,
            score: self.score,
            accuracy: self.accuracy(),
            time_taken,
        }
    }
}
