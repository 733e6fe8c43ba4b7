//! Tank Math - A math quiz tank battle game
//!
//! Core modules:
//! - `quiz`: Arithmetic question generation and answer options
//! - `sim`: Battle state machine, round controller, timers
//! - `settings`: Operation selection and sub-modes
//! - `highscores`: Leaderboard
//!
//! Rendering, animation and audio live outside this crate. They consume the
//! [`sim::GameEvent`] stream and feed answers back into [`sim::RoundController`].

pub mod error;
pub mod highscores;
pub mod quiz;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, QuizError};
pub use highscores::HighScores;
pub use quiz::{AnswerOptions, Operator, Question};
pub use settings::{OperationConfig, Settings};

/// Game configuration constants
pub mod consts {
    /// Score for every correct answer
    pub const CORRECT_ANSWER_SCORE: u32 = 3;
    /// Quick answer bonus, multiplied by the current quick streak
    pub const QUICK_ANSWER_BONUS: u32 = 5;
    /// Answers faster than this (seconds) count as quick
    pub const QUICK_ANSWER_THRESHOLD_SECS: f32 = 5.0;
    /// Consecutive correct answers above this trigger the "big smart" cheer
    pub const BIG_SMART_STREAK: u32 = 3;
    /// Mistakes above this trigger the "big dummy" taunt
    pub const BIG_DUMMY_MISTAKES: u32 = 5;

    /// Player tank health
    pub const PLAYER_MAX_HEALTH: u32 = 5;
    /// Level 1 enemy health; each level adds one
    pub const ENEMY_BASE_HEALTH: u32 = 3;
    /// Enemy level at which Ultraman mode kicks in
    pub const ULTRAMAN_MODE_LEVEL: u32 = 6;

    /// Seconds per question at game start
    pub const DEFAULT_MAX_TIME_SECS: u32 = 9;
    /// Per-question time never drops below this
    pub const MIN_TIME_LIMIT_SECS: u32 = 2;

    /// Countdown resolution (1 Hz)
    pub const COUNTDOWN_TICK_MS: u64 = 1000;
    /// Answers are ignored for this long after a question appears
    pub const ANSWER_ENABLE_DELAY_MS: u64 = 1000;
    /// Pause between a resolved round and the next question
    pub const NEXT_ROUND_DELAY_MS: u64 = 1000;
    /// Settle time between an enemy exploding and the next one rolling in
    pub const ENEMY_SPAWN_DELAY_MS: u64 = 1000;

    /// Options offered per question
    pub const ANSWER_OPTION_COUNT: usize = 3;
    /// Largest value an answer option may take
    pub const MAX_OPTION_VALUE: u32 = 9999;
    /// Upper bound on rejection-sampling draws before giving up
    pub const MAX_SAMPLING_ATTEMPTS: u32 = 10_000;
}
