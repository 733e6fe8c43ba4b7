//! Outbound game events
//!
//! The core never draws anything. Every visible change is pushed as a
//! [`GameEvent`] for the presentation layer to render, animate or play.

use serde::Serialize;

use super::stats::GameSummary;
use crate::quiz::{AnswerOptions, Question};

/// Fire-and-forget notification for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum GameEvent {
    /// New question on screen, options still disabled
    QuestionDisplayed {
        question: Question,
        options: AnswerOptions,
        /// Same question as last round, asked again after a miss
        repeated: bool,
    },
    /// Options accept input from now on
    AnswersEnabled,
    /// Countdown moved; `remaining <= 3` is the final countdown
    CountdownTick { remaining: u32, max: u32 },
    /// Highlight the picked option against the right one
    AnswerFeedback { selected: u32, correct: u32 },
    /// Player tank shoots; report the impact back via `projectile_landed`
    PlayerFired,
    /// Enemy tank shoots the player
    EnemyFired,
    /// Quick answer bonus popup
    QuickBonus { answer_secs: f32, streak: u32 },
    /// More than three correct in a row
    BigSmart { streak: u32 },
    /// More than five mistakes this game
    BigDummy { mistakes: u32 },
    /// Non-lethal hit on a flawless run
    Fireworks,
    ScoreChanged {
        score: u32,
        total_correct: u32,
        mistakes: u32,
        quick_streak: u32,
        quick_answers: u32,
    },
    PlayerHealthChanged { current: u32, max: u32 },
    EnemyHealthChanged { current: u32, max: u32 },
    /// Enemy exploded; the next one arrives after a short settle delay
    EnemyDestroyed { level: u32 },
    EnemyLevelChanged { level: u32 },
    UltramanModeActivated,
    Paused,
    Resumed { remaining: u32 },
    GameOver { summary: GameSummary },
}
