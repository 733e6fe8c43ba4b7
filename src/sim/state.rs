//! Battle state and round history types
//!
//! Everything here is plain data. Mutation goes through [`super::Battle`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Where the battle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Rounds are being played
    InRound,
    /// Player tank destroyed, run over
    PlayerDefeated,
}

/// One resolved round, kept for end-of-game statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question_text: String,
    /// Seconds from question shown to answer (the full time limit on timeout)
    pub answer_secs: f32,
    pub was_correct: bool,
}

/// Counters for a single game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleState {
    pub player_health: u32,
    pub player_max_health: u32,
    pub enemy_health: u32,
    pub enemy_max_health: u32,
    /// 1-based enemy level
    pub enemy_level: u32,
    pub score: u32,
    pub mistakes: u32,
    /// Consecutive quick correct answers
    pub quick_streak: u32,
    /// Consecutive correct answers
    pub continue_correct: u32,
    pub total_correct: u32,
    /// Quick answers over the whole game, streak breaks included
    pub quick_answers: u32,
    /// Countdown length for the next round
    pub max_time_per_question: u32,
    pub game_ended: bool,
    pub phase: BattlePhase,
    /// Current enemy has exploded and the next one hasn't arrived yet
    pub enemy_destroyed: bool,
    /// Ultraman mode fired this game
    pub ultraman_mode: bool,
}

impl Default for BattleState {
    fn default() -> Self {
        Self {
            player_health: PLAYER_MAX_HEALTH,
            player_max_health: PLAYER_MAX_HEALTH,
            enemy_health: ENEMY_BASE_HEALTH,
            enemy_max_health: ENEMY_BASE_HEALTH,
            enemy_level: 1,
            score: 0,
            mistakes: 0,
            quick_streak: 0,
            continue_correct: 0,
            total_correct: 0,
            quick_answers: 0,
            max_time_per_question: DEFAULT_MAX_TIME_SECS,
            game_ended: false,
            phase: BattlePhase::InRound,
            enemy_destroyed: false,
            ultraman_mode: false,
        }
    }
}

/// Enemy health at a given level (3 at level 1, +1 per level)
pub fn enemy_health_for_level(level: u32) -> u32 {
    ENEMY_BASE_HEALTH + level.saturating_sub(1)
}
