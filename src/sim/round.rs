//! Round controller
//!
//! Sequences question → answer/timeout → next question on top of a
//! [`Battle`]. The host feeds elapsed time through [`RoundController::advance`]
//! and player input through [`RoundController::submit_answer`]; everything
//! visible comes back out of [`RoundController::drain_events`].
//!
//! A round's `locked` flag is the only guard against double resolution. It is
//! set before anything else happens on submit or timeout, and every timer the
//! round owns is cancelled at each transition (round start, pause, answer,
//! timeout, game over).

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::battle::{Battle, HitOutcome};
use super::event::GameEvent;
use super::state::{BattleState, QuestionRecord};
use super::stats::GameSummary;
use super::timers::{TimerKind, Timers};
use crate::consts::*;
use crate::error::{ConfigError, QuizError};
use crate::quiz::{self, AnswerOptions, Question};
use crate::settings::Settings;

/// One question on screen
#[derive(Debug, Clone)]
pub struct Round {
    pub question: Question,
    pub options: AnswerOptions,
    /// Time limit this round started with
    pub max_secs: u32,
    /// Whole seconds left on the countdown
    pub remaining_secs: u32,
    /// Input-disable window has passed
    pub answers_enabled: bool,
    /// Round resolved (answered or timed out)
    pub locked: bool,
    /// Resolved wrong or by timeout
    pub missed: bool,
    started_ms: u64,
    paused_ms: u64,
    paused_at: Option<u64>,
}

impl Round {
    /// Time since the question appeared, not counting pauses
    fn elapsed_secs(&self, now_ms: u64) -> f32 {
        let active = now_ms.saturating_sub(self.started_ms + self.paused_ms);
        active as f32 / 1000.0
    }
}

/// Drives one game from start to game over
#[derive(Debug, Clone)]
pub struct RoundController {
    settings: Settings,
    seed: u64,
    rng: Pcg32,
    battle: Battle,
    timers: Timers,
    round: Option<Round>,
    paused: bool,
    /// A next-round timer was cancelled by pause
    resume_next_round: bool,
    events: Vec<GameEvent>,
}

impl RoundController {
    /// Controller for a game with the given settings, seeded for
    /// reproducible questions. The operation set is fixed from here on.
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.operations.validate()?;
        Ok(Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            battle: Battle::new(),
            timers: Timers::new(),
            round: None,
            paused: false,
            resume_next_round: false,
            events: Vec::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn state(&self) -> &BattleState {
        self.battle.state()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        self.battle.records()
    }

    pub fn summary(&self) -> GameSummary {
        self.battle.summary()
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.battle.is_over()
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// (Re)start: fresh battle state, then the first round
    pub fn start_game(&mut self) -> Result<(), QuizError> {
        self.timers.cancel_all();
        self.battle.reset();
        self.round = None;
        self.paused = false;
        self.resume_next_round = false;
        log::info!("Game started (seed {})", self.seed);

        let state = self.battle.state();
        self.events.push(GameEvent::PlayerHealthChanged {
            current: state.player_health,
            max: state.player_max_health,
        });
        self.events.push(GameEvent::EnemyLevelChanged {
            level: state.enemy_level,
        });
        self.events.push(GameEvent::EnemyHealthChanged {
            current: state.enemy_health,
            max: state.enemy_max_health,
        });
        self.events.push(GameEvent::ScoreChanged {
            score: state.score,
            total_correct: state.total_correct,
            mistakes: state.mistakes,
            quick_streak: state.quick_streak,
            quick_answers: state.quick_answers,
        });

        self.start_round()
    }

    /// Same as [`Self::start_game`]; used from the game over screen
    pub fn retry(&mut self) -> Result<(), QuizError> {
        self.start_game()
    }

    /// Put the next question up. After a miss the same question comes back
    /// (with reshuffled options) when `repeat_missed` is on.
    pub fn start_round(&mut self) -> Result<(), QuizError> {
        if self.battle.is_over() {
            return Ok(());
        }
        self.timers.cancel_round();

        let repeat =
            self.settings.repeat_missed && self.round.as_ref().is_some_and(|r| r.missed);
        let question = match self.round.take() {
            Some(previous) if repeat => previous.question,
            _ => quiz::generate(&self.settings.operations, &mut self.rng)?,
        };
        let options = quiz::build_options(question.correct_answer, &mut self.rng)?;
        let max = self.battle.state().max_time_per_question;

        log::debug!(
            "Round: {} options {:?} ({}s)",
            question.display_text,
            options.values(),
            max
        );
        self.events.push(GameEvent::QuestionDisplayed {
            question: question.clone(),
            options,
            repeated: repeat,
        });
        self.events.push(GameEvent::CountdownTick {
            remaining: max,
            max,
        });

        self.round = Some(Round {
            question,
            options,
            max_secs: max,
            remaining_secs: max,
            answers_enabled: false,
            locked: false,
            missed: false,
            started_ms: self.timers.now_ms(),
            paused_ms: 0,
            paused_at: None,
        });
        self.timers.schedule(TimerKind::EnableAnswers, ANSWER_ENABLE_DELAY_MS);
        self.timers.schedule(TimerKind::Countdown, COUNTDOWN_TICK_MS);
        Ok(())
    }

    /// Player picked `value`. Returns whether the answer was taken; it is
    /// ignored while paused, before answers are enabled, after the round
    /// resolved, and after game over.
    pub fn submit_answer(&mut self, value: u32) -> bool {
        if self.paused || self.battle.is_over() {
            return false;
        }
        let now = self.timers.now_ms();
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        if round.locked || !round.answers_enabled {
            return false;
        }

        round.locked = true;
        self.timers.cancel_round();

        let answer_secs = round.elapsed_secs(now);
        let correct_answer = round.question.correct_answer;
        let correct = value == correct_answer && round.remaining_secs > 0;
        round.missed = !correct;
        let text = round.question.display_text.clone();

        self.events.push(GameEvent::AnswerFeedback {
            selected: value,
            correct: correct_answer,
        });
        if correct {
            self.battle
                .on_correct_answer(&text, answer_secs, &mut self.events);
        } else {
            self.battle.on_wrong_answer(&text, answer_secs, &mut self.events);
        }

        self.finish_round();
        true
    }

    /// Pick the option at a 0-based position
    pub fn select_option(&mut self, index: usize) -> bool {
        match self.round.as_ref().and_then(|r| r.options.get(index)) {
            Some(value) => self.submit_answer(value),
            None => false,
        }
    }

    /// Keyboard shortcut: keys 1-3 pick the matching option
    pub fn press_key(&mut self, key: char) -> bool {
        match key.to_digit(10) {
            Some(digit @ 1..=3) => self.select_option(digit as usize - 1),
            _ => false,
        }
    }

    /// The player's projectile reached the enemy
    pub fn projectile_landed(&mut self) -> HitOutcome {
        let outcome = self.battle.on_enemy_hit(&mut self.events);
        if outcome == HitOutcome::Destroyed {
            self.timers.schedule(TimerKind::EnemySpawn, ENEMY_SPAWN_DELAY_MS);
        }
        outcome
    }

    /// Suspend the countdown. Returns `false` if nothing was paused.
    pub fn pause(&mut self) -> bool {
        if self.paused || self.battle.is_over() || self.round.is_none() {
            return false;
        }
        self.paused = true;

        self.timers.cancel(TimerKind::Countdown);
        self.timers.cancel(TimerKind::EnableAnswers);
        self.resume_next_round = self.timers.cancel(TimerKind::NextRound);

        let now = self.timers.now_ms();
        if let Some(round) = self.round.as_mut() {
            round.paused_at = Some(now);
        }
        log::info!("Paused");
        self.events.push(GameEvent::Paused);
        true
    }

    /// Continue from the remaining whole seconds. Returns `false` if not
    /// paused.
    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;

        let now = self.timers.now_ms();
        let mut remaining = 0;
        if let Some(round) = self.round.as_mut() {
            if let Some(at) = round.paused_at.take() {
                round.paused_ms += now.saturating_sub(at);
            }
            remaining = round.remaining_secs;
            if !round.locked {
                self.timers.schedule(TimerKind::Countdown, COUNTDOWN_TICK_MS);
                if !round.answers_enabled {
                    self.timers
                        .schedule(TimerKind::EnableAnswers, ANSWER_ENABLE_DELAY_MS);
                }
            }
        }
        if std::mem::take(&mut self.resume_next_round) {
            self.timers.schedule(TimerKind::NextRound, NEXT_ROUND_DELAY_MS);
        }

        log::info!("Resumed with {}s left", remaining);
        self.events.push(GameEvent::Resumed { remaining });
        true
    }

    /// Pause or resume. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }

    /// Move the clock forward `dt_ms`, firing due timers in order
    pub fn advance(&mut self, dt_ms: u64) -> Result<(), QuizError> {
        let target = self.timers.now_ms().saturating_add(dt_ms);
        while let Some(kind) = self.timers.pop_due(target) {
            self.fire(kind)?;
        }
        self.timers.advance_to(target);
        Ok(())
    }

    fn fire(&mut self, kind: TimerKind) -> Result<(), QuizError> {
        match kind {
            TimerKind::EnableAnswers => {
                if let Some(round) = self.round.as_mut().filter(|r| !r.locked) {
                    round.answers_enabled = true;
                    self.events.push(GameEvent::AnswersEnabled);
                }
            }
            TimerKind::Countdown => self.countdown_tick(),
            TimerKind::NextRound => self.start_round()?,
            TimerKind::EnemySpawn => self.battle.spawn_next_enemy(&mut self.events),
        }
        Ok(())
    }

    fn countdown_tick(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.locked {
            return;
        }

        round.remaining_secs = round.remaining_secs.saturating_sub(1);
        self.events.push(GameEvent::CountdownTick {
            remaining: round.remaining_secs,
            max: round.max_secs,
        });
        if round.remaining_secs > 0 {
            self.timers.schedule(TimerKind::Countdown, COUNTDOWN_TICK_MS);
            return;
        }

        round.locked = true;
        round.missed = true;
        self.timers.cancel_round();
        let text = round.question.display_text.clone();
        let limit = round.max_secs;
        log::debug!("Timed out on {}", text);

        self.battle.on_timeout(&text, limit, &mut self.events);
        self.finish_round();
    }

    /// After a resolution: queue the next question, or shut down on defeat
    fn finish_round(&mut self) {
        if self.battle.is_over() {
            self.timers.cancel_all();
            self.resume_next_round = false;
        } else {
            self.timers.schedule(TimerKind::NextRound, NEXT_ROUND_DELAY_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Operator;
    use crate::settings::{AdditionMode, OperationConfig};
    use crate::sim::state::BattlePhase;

    fn simple_addition() -> Settings {
        let mut operations = OperationConfig::only(&[Operator::Add]);
        operations.addition_mode = AdditionMode::Simple;
        Settings {
            operations,
            repeat_missed: true,
        }
    }

    fn started(settings: Settings, seed: u64) -> RoundController {
        let mut game = RoundController::new(settings, seed).unwrap();
        game.start_game().unwrap();
        game
    }

    fn correct(game: &RoundController) -> u32 {
        game.current_round().unwrap().question.correct_answer
    }

    fn wrong(game: &RoundController) -> u32 {
        let round = game.current_round().unwrap();
        let answer = round.question.correct_answer;
        *round.options.values().iter().find(|&&v| v != answer).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_config() {
        let settings = Settings {
            operations: OperationConfig::only(&[]),
            repeat_missed: true,
        };
        assert_eq!(
            RoundController::new(settings, 1).err(),
            Some(ConfigError::NoOperationEnabled)
        );
    }

    #[test]
    fn test_start_shows_question_with_answers_disabled() {
        let mut game = started(simple_addition(), 1);
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::QuestionDisplayed { .. })));
        assert!(events.contains(&GameEvent::CountdownTick { remaining: 9, max: 9 }));

        let round = game.current_round().unwrap();
        assert!(!round.answers_enabled);
        assert!(round.options.contains(round.question.correct_answer));

        game.advance(500).unwrap();
        assert!(!game.submit_answer(correct(&game)));
        game.advance(500).unwrap();
        assert!(game.drain_events().contains(&GameEvent::AnswersEnabled));
        assert!(game.submit_answer(correct(&game)));
    }

    #[test]
    fn test_five_quick_correct_answers() {
        let mut game = started(simple_addition(), 42);
        for _ in 0..5 {
            game.advance(1500).unwrap();
            assert!(game.submit_answer(correct(&game)));
            game.advance(NEXT_ROUND_DELAY_MS).unwrap();
        }
        let state = game.state();
        assert_eq!(state.quick_streak, 5);
        assert_eq!(state.total_correct, 5);
        assert_eq!(state.score, 5 * CORRECT_ANSWER_SCORE + QUICK_ANSWER_BONUS * 15);
        assert!(game.records().iter().all(|r| (r.answer_secs - 1.5).abs() < 1e-6));
    }

    #[test]
    fn test_second_submission_is_ignored() {
        let mut game = started(simple_addition(), 2);
        game.advance(1000).unwrap();
        let answer = correct(&game);
        assert!(game.submit_answer(answer));
        assert!(!game.submit_answer(answer));
        assert!(!game.select_option(0));
        assert_eq!(game.state().total_correct, 1);
        assert_eq!(game.records().len(), 1);
    }

    #[test]
    fn test_next_round_follows_after_delay() {
        let mut game = started(simple_addition(), 3);
        game.advance(1000).unwrap();
        game.submit_answer(correct(&game));
        game.drain_events();

        game.advance(NEXT_ROUND_DELAY_MS - 1).unwrap();
        assert!(game.current_round().unwrap().locked);
        game.advance(1).unwrap();
        let round = game.current_round().unwrap();
        assert!(!round.locked);
        assert!(!round.answers_enabled);
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::QuestionDisplayed { repeated: false, .. })));
    }

    #[test]
    fn test_countdown_timeout() {
        let mut game = started(simple_addition(), 4);
        game.advance(8000).unwrap();
        assert_eq!(game.current_round().unwrap().remaining_secs, 1);
        assert_eq!(game.state().mistakes, 0);

        game.advance(1000).unwrap();
        assert!(game.current_round().unwrap().locked);
        assert_eq!(game.state().mistakes, 1);
        assert_eq!(game.state().player_health, PLAYER_MAX_HEALTH - 1);
        assert_eq!(game.records()[0].answer_secs, 9.0);

        // A click that loses the race to the timeout does nothing
        assert!(!game.submit_answer(correct(&game)));
        assert_eq!(game.state().total_correct, 0);
        assert!(game.timers().is_pending(TimerKind::NextRound));
    }

    #[test]
    fn test_missed_question_is_asked_again() {
        let mut game = started(simple_addition(), 5);
        game.advance(1000).unwrap();
        let text = game.current_round().unwrap().question.display_text.clone();
        game.submit_answer(wrong(&game));
        game.drain_events();

        game.advance(NEXT_ROUND_DELAY_MS).unwrap();
        assert_eq!(game.current_round().unwrap().question.display_text, text);
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::QuestionDisplayed { repeated: true, .. })));

        // Answered right this time: fresh question afterwards
        game.advance(1000).unwrap();
        game.submit_answer(correct(&game));
        game.advance(NEXT_ROUND_DELAY_MS).unwrap();
        assert!(!game.current_round().unwrap().missed);
    }

    #[test]
    fn test_five_misses_end_the_game() {
        let mut game = started(simple_addition(), 6);
        for _ in 0..5 {
            game.advance(1000).unwrap();
            assert!(game.submit_answer(wrong(&game)));
            game.advance(NEXT_ROUND_DELAY_MS).unwrap();
        }
        assert!(game.is_game_over());
        assert_eq!(game.state().phase, BattlePhase::PlayerDefeated);
        assert_eq!(game.state().player_health, 0);
        assert!(!game.timers().any_pending());

        let events = game.drain_events();
        let summary = events.iter().find_map(|e| match e {
            GameEvent::GameOver { summary } => Some(summary.clone()),
            _ => None,
        });
        let summary = summary.unwrap();
        assert_eq!(summary.mistakes, 5);
        assert_eq!(summary.wrong.len(), 5);

        // Nothing moves after game over
        game.advance(60_000).unwrap();
        assert!(!game.submit_answer(correct(&game)));
        assert!(!game.pause());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_pause_freezes_countdown_and_input() {
        let mut game = started(simple_addition(), 7);
        game.advance(2500).unwrap();
        assert_eq!(game.current_round().unwrap().remaining_secs, 7);

        assert!(game.pause());
        assert!(!game.pause());
        game.advance(30_000).unwrap();
        assert_eq!(game.current_round().unwrap().remaining_secs, 7);
        assert_eq!(game.state().mistakes, 0);
        assert!(!game.submit_answer(correct(&game)));

        assert!(game.resume());
        game.advance(999).unwrap();
        assert_eq!(game.current_round().unwrap().remaining_secs, 7);
        game.advance(1).unwrap();
        assert_eq!(game.current_round().unwrap().remaining_secs, 6);

        // Paused time is not answer time
        game.advance(500).unwrap();
        assert!(game.submit_answer(correct(&game)));
        assert!((game.records()[0].answer_secs - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_pause_inside_disable_window_rearms_enable() {
        let mut game = started(simple_addition(), 8);
        game.advance(400).unwrap();
        assert!(game.toggle_pause());
        game.advance(5000).unwrap();
        assert!(!game.current_round().unwrap().answers_enabled);

        assert!(!game.toggle_pause());
        game.advance(ANSWER_ENABLE_DELAY_MS).unwrap();
        assert!(game.current_round().unwrap().answers_enabled);
    }

    #[test]
    fn test_pause_between_rounds_holds_next_question() {
        let mut game = started(simple_addition(), 9);
        game.advance(1000).unwrap();
        game.submit_answer(correct(&game));
        game.pause();
        game.advance(10_000).unwrap();
        assert!(game.current_round().unwrap().locked);

        game.resume();
        game.advance(NEXT_ROUND_DELAY_MS).unwrap();
        assert!(!game.current_round().unwrap().locked);
    }

    #[test]
    fn test_restart_cancels_stale_enable_timer() {
        let mut game = started(simple_addition(), 10);
        game.advance(500).unwrap();
        game.start_game().unwrap();
        game.advance(500).unwrap();
        assert!(!game.current_round().unwrap().answers_enabled);
        game.advance(500).unwrap();
        assert!(game.current_round().unwrap().answers_enabled);
    }

    #[test]
    fn test_destroying_enemy_spawns_next_after_delay() {
        let mut game = started(simple_addition(), 11);
        for i in 0..3 {
            if i > 0 {
                game.advance(NEXT_ROUND_DELAY_MS).unwrap();
            }
            game.advance(1000).unwrap();
            assert!(game.submit_answer(correct(&game)));
            game.projectile_landed();
        }
        assert!(game.state().enemy_destroyed);
        assert_eq!(game.projectile_landed(), HitOutcome::Ignored);
        assert_eq!(game.state().enemy_level, 1);

        game.advance(ENEMY_SPAWN_DELAY_MS).unwrap();
        assert_eq!(game.state().enemy_level, 2);
        assert_eq!(game.state().enemy_max_health, 4);
        assert_eq!(game.state().enemy_health, 4);
    }

    #[test]
    fn test_timeout_keeps_limit_from_round_start() {
        let mut game = started(simple_addition(), 14);
        for i in 0..3 {
            if i > 0 {
                game.advance(NEXT_ROUND_DELAY_MS).unwrap();
            }
            game.advance(1000).unwrap();
            assert!(game.submit_answer(correct(&game)));
            if i < 2 {
                game.projectile_landed();
            }
        }
        // Last shell lands late, so the next enemy arrives mid-round
        game.advance(500).unwrap();
        assert_eq!(game.projectile_landed(), HitOutcome::Destroyed);
        game.advance(500).unwrap();
        assert_eq!(game.current_round().unwrap().max_secs, DEFAULT_MAX_TIME_SECS);
        game.drain_events();

        game.advance(DEFAULT_MAX_TIME_SECS as u64 * 1000).unwrap();
        assert_eq!(game.state().enemy_level, 2);
        assert_eq!(game.state().max_time_per_question, DEFAULT_MAX_TIME_SECS - 1);
        assert!(game.current_round().unwrap().locked);

        let last = game.records().last().unwrap();
        assert!(!last.was_correct);
        assert_eq!(last.answer_secs, DEFAULT_MAX_TIME_SECS as f32);
        assert!(game.drain_events().iter().all(|e| match e {
            GameEvent::CountdownTick { max, .. } => *max == DEFAULT_MAX_TIME_SECS,
            _ => true,
        }));

        game.advance(NEXT_ROUND_DELAY_MS).unwrap();
        assert_eq!(game.current_round().unwrap().max_secs, DEFAULT_MAX_TIME_SECS - 1);
    }

    #[test]
    fn test_huge_time_step_does_not_overflow() {
        let mut game = started(simple_addition(), 15);
        game.advance(10).unwrap();
        game.advance(u64::MAX).unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.now_ms(), u64::MAX);

        // The clock is pinned at its end; a new game must not spin
        game.start_game().unwrap();
        game.advance(u64::MAX).unwrap();
        assert!(!game.timers().any_pending());
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_keyboard_picks_option() {
        let mut game = started(simple_addition(), 12);
        game.advance(1000).unwrap();
        assert!(!game.press_key('4'));
        assert!(!game.press_key('a'));

        let position = {
            let round = game.current_round().unwrap();
            round.options.position(round.question.correct_answer).unwrap()
        };
        let key = char::from_digit(position as u32 + 1, 10).unwrap();
        assert!(game.press_key(key));
        assert_eq!(game.state().total_correct, 1);
    }

    #[test]
    fn test_same_seed_same_questions() {
        let mut a = started(Settings::default(), 99);
        let mut b = started(Settings::default(), 99);
        for _ in 0..10 {
            let qa = a.current_round().unwrap().question.clone();
            let qb = b.current_round().unwrap().question.clone();
            assert_eq!(qa, qb);
            assert_eq!(
                a.current_round().unwrap().options,
                b.current_round().unwrap().options
            );
            for game in [&mut a, &mut b] {
                game.advance(1000).unwrap();
                let answer = correct(game);
                game.submit_answer(answer);
                game.advance(NEXT_ROUND_DELAY_MS).unwrap();
            }
        }
    }

    #[test]
    fn test_retry_resets_everything() {
        let mut game = started(simple_addition(), 13);
        game.advance(1000).unwrap();
        game.submit_answer(wrong(&game));
        game.retry().unwrap();
        assert_eq!(game.state(), &BattleState::default());
        assert!(game.records().is_empty());
        assert!(!game.current_round().unwrap().locked);
    }
}
