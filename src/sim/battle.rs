//! Battle state machine
//!
//! Health, levels, score and streaks. Answers and hits come in, events go
//! out. No clocks: delayed steps (the enemy settle delay) are scheduled by
//! the round controller.

use super::event::GameEvent;
use super::state::{BattlePhase, BattleState, QuestionRecord, enemy_health_for_level};
use super::stats::GameSummary;
use crate::consts::*;

/// Result of a player projectile reaching the enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Enemy already down (or the game is over); nothing happened
    Ignored,
    /// Enemy lost health but survives
    Damaged,
    /// That was the last hit point
    Destroyed,
}

/// Owns the [`BattleState`] and the round history of one game
#[derive(Debug, Clone, Default)]
pub struct Battle {
    state: BattleState,
    records: Vec<QuestionRecord>,
}

impl Battle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == BattlePhase::PlayerDefeated
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary::new(&self.state, &self.records)
    }

    /// Back to a fresh game
    pub fn reset(&mut self) {
        self.state = BattleState::default();
        self.records.clear();
    }

    /// Correct answer given `answer_secs` after the question appeared.
    /// Returns `false` (and changes nothing) once the player is defeated.
    pub fn on_correct_answer(
        &mut self,
        question_text: &str,
        answer_secs: f32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.is_over() {
            log::warn!("Correct answer after game over ignored");
            return false;
        }

        let state = &mut self.state;
        state.total_correct += 1;
        state.score += CORRECT_ANSWER_SCORE;

        if answer_secs < QUICK_ANSWER_THRESHOLD_SECS {
            state.quick_streak += 1;
            state.quick_answers += 1;
            state.score += QUICK_ANSWER_BONUS * state.quick_streak;
            events.push(GameEvent::QuickBonus {
                answer_secs,
                streak: state.quick_streak,
            });
        } else {
            state.quick_streak = 0;
        }

        state.continue_correct += 1;
        let streak = state.continue_correct;

        self.records.push(QuestionRecord {
            question_text: question_text.to_string(),
            answer_secs,
            was_correct: true,
        });

        events.push(self.score_event());
        events.push(GameEvent::PlayerFired);
        if streak > BIG_SMART_STREAK {
            events.push(GameEvent::BigSmart { streak });
        }
        true
    }

    /// Wrong answer. Returns `false` once the player is defeated.
    pub fn on_wrong_answer(
        &mut self,
        question_text: &str,
        answer_secs: f32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.is_over() {
            log::warn!("Wrong answer after game over ignored");
            return false;
        }
        self.record_miss(question_text, answer_secs, events);
        true
    }

    /// Countdown ran out. Recorded with the round's full time limit, which
    /// can differ from `max_time_per_question` if an enemy spawned mid-round.
    pub fn on_timeout(
        &mut self,
        question_text: &str,
        limit_secs: u32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.is_over() {
            log::warn!("Timeout after game over ignored");
            return false;
        }
        self.record_miss(question_text, limit_secs as f32, events);
        true
    }

    fn record_miss(&mut self, question_text: &str, answer_secs: f32, events: &mut Vec<GameEvent>) {
        self.state.mistakes += 1;
        self.state.continue_correct = 0;
        self.state.quick_streak = 0;
        self.records.push(QuestionRecord {
            question_text: question_text.to_string(),
            answer_secs,
            was_correct: false,
        });
        events.push(self.score_event());

        if self.state.mistakes > BIG_DUMMY_MISTAKES {
            events.push(GameEvent::BigDummy {
                mistakes: self.state.mistakes,
            });
        }

        self.enemy_attack(events);
    }

    /// Enemy shoots: player loses one health, and the game ends at zero
    pub fn enemy_attack(&mut self, events: &mut Vec<GameEvent>) {
        if self.is_over() {
            return;
        }

        self.state.player_health = self.state.player_health.saturating_sub(1);
        events.push(GameEvent::EnemyFired);
        events.push(GameEvent::PlayerHealthChanged {
            current: self.state.player_health,
            max: self.state.player_max_health,
        });

        if self.state.player_health == 0 {
            self.state.phase = BattlePhase::PlayerDefeated;
            self.state.game_ended = true;
            log::info!(
                "Game over: score {}, {} correct, enemy level {}",
                self.state.score,
                self.state.total_correct,
                self.state.enemy_level
            );
            events.push(GameEvent::GameOver {
                summary: self.summary(),
            });
        }
    }

    /// Player projectile lands on the enemy
    pub fn on_enemy_hit(&mut self, events: &mut Vec<GameEvent>) -> HitOutcome {
        if self.is_over() || self.state.enemy_destroyed {
            return HitOutcome::Ignored;
        }

        self.state.enemy_health = self.state.enemy_health.saturating_sub(1);
        events.push(GameEvent::EnemyHealthChanged {
            current: self.state.enemy_health,
            max: self.state.enemy_max_health,
        });

        if self.state.enemy_health == 0 {
            self.destroy_enemy(events);
            return HitOutcome::Destroyed;
        }

        if self.state.mistakes == 0 {
            events.push(GameEvent::Fireworks);
        }
        HitOutcome::Damaged
    }

    /// Enemy explodes: player heals one point. The caller spawns the next
    /// enemy after [`ENEMY_SPAWN_DELAY_MS`].
    pub fn destroy_enemy(&mut self, events: &mut Vec<GameEvent>) {
        if self.state.enemy_destroyed {
            return;
        }
        self.state.enemy_destroyed = true;

        if self.state.player_health < self.state.player_max_health {
            self.state.player_health += 1;
            events.push(GameEvent::PlayerHealthChanged {
                current: self.state.player_health,
                max: self.state.player_max_health,
            });
        }

        log::info!("Enemy level {} destroyed", self.state.enemy_level);
        events.push(GameEvent::EnemyDestroyed {
            level: self.state.enemy_level,
        });
    }

    /// Next, tougher enemy. Also shortens the time limit.
    pub fn spawn_next_enemy(&mut self, events: &mut Vec<GameEvent>) {
        let state = &mut self.state;
        state.enemy_destroyed = false;
        state.enemy_level += 1;
        state.enemy_max_health = enemy_health_for_level(state.enemy_level);
        state.enemy_health = state.enemy_max_health;

        if state.max_time_per_question > MIN_TIME_LIMIT_SECS {
            state.max_time_per_question -= 1;
        }

        log::info!(
            "Enemy level {} spawned ({} hp, {}s per question)",
            state.enemy_level,
            state.enemy_max_health,
            state.max_time_per_question
        );
        events.push(GameEvent::EnemyLevelChanged {
            level: state.enemy_level,
        });
        events.push(GameEvent::EnemyHealthChanged {
            current: state.enemy_health,
            max: state.enemy_max_health,
        });

        if state.enemy_level >= ULTRAMAN_MODE_LEVEL && !state.ultraman_mode {
            state.ultraman_mode = true;
            log::info!("Ultraman mode activated");
            events.push(GameEvent::UltramanModeActivated);
        }
    }

    fn score_event(&self) -> GameEvent {
        GameEvent::ScoreChanged {
            score: self.state.score,
            total_correct: self.state.total_correct,
            mistakes: self.state.mistakes,
            quick_streak: self.state.quick_streak,
            quick_answers: self.state.quick_answers,
        }
    }
}
