//! Tank Math entry point
//!
//! The browser build is driven from JavaScript through `tank_math::web`. The
//! native binary is an autopilot: a simulated player answers questions with a
//! configurable accuracy and reaction time, which is handy for checking
//! difficulty curves and scoring without a UI.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use tank_math::settings::{
        AdditionMode, DivisionMode, MultiplicationMode, OperationConfig, SubtractionMode,
    };
    use tank_math::sim::{GameEvent, GameSummary, RoundController};
    use tank_math::{HighScores, Operator, QuizError, Settings};

    /// Simulation step
    const FRAME_MS: u64 = 100;

    #[derive(Parser, Debug)]
    #[command(name = "tank-math")]
    #[command(about = "Play Tank Math games with a simulated player and report the results")]
    pub struct Cli {
        /// Seed for the first game; later games use seed + 1, seed + 2, ...
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: u32,
        /// Operations to practice (add, sub, mul, div)
        #[arg(long, value_delimiter = ',', default_value = "add,sub")]
        ops: Vec<Operator>,
        #[arg(long, default_value = "carry")]
        addition_mode: AdditionMode,
        #[arg(long, default_value = "borrow")]
        subtraction_mode: SubtractionMode,
        #[arg(long, default_value = "single")]
        multiplication_mode: MultiplicationMode,
        #[arg(long, default_value = "two_one")]
        division_mode: DivisionMode,
        /// Don't ask a missed question again
        #[arg(long)]
        no_repeat: bool,
        /// Chance the simulated player picks the right option
        #[arg(long, default_value_t = 0.85)]
        accuracy: f64,
        /// Reaction time after answers are enabled
        #[arg(long, default_value_t = 2500)]
        answer_ms: u64,
        /// Stop a game after this many questions even if the player survives
        #[arg(long, default_value_t = 200)]
        max_rounds: u32,
        /// Print every question and answer
        #[arg(long)]
        verbose: bool,
    }

    impl Cli {
        fn settings(&self) -> Settings {
            let mut operations = OperationConfig::only(&self.ops);
            operations.addition_mode = self.addition_mode;
            operations.subtraction_mode = self.subtraction_mode;
            operations.multiplication_mode = self.multiplication_mode;
            operations.division_mode = self.division_mode;
            Settings {
                operations,
                repeat_missed: !self.no_repeat,
            }
        }
    }

    /// Plays one game to defeat or `max_rounds`
    struct Player {
        rng: Pcg32,
        accuracy: f64,
        answer_ms: u64,
        answer_at: Option<u64>,
        verbose: bool,
    }

    impl Player {
        fn new(cli: &Cli, seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed.wrapping_mul(31).wrapping_add(7)),
                accuracy: cli.accuracy.clamp(0.0, 1.0),
                answer_ms: cli.answer_ms,
                answer_at: None,
                verbose: cli.verbose,
            }
        }

        fn react(&mut self, game: &mut RoundController, event: &GameEvent) {
            match event {
                GameEvent::AnswersEnabled => {
                    self.answer_at = Some(game.now_ms() + self.answer_ms);
                }
                // Shells land instantly; there is no flight animation here
                GameEvent::PlayerFired => {
                    game.projectile_landed();
                }
                GameEvent::AnswerFeedback { selected, correct } if self.verbose => {
                    let text = game
                        .current_round()
                        .map(|r| r.question.display_text.clone())
                        .unwrap_or_default();
                    let mark = if selected == correct { "ok" } else { "MISS" };
                    println!("  {:<16} picked {:>5} (answer {:>5}) {}", text, selected, correct, mark);
                }
                GameEvent::CountdownTick { remaining: 0, .. } if self.verbose => {
                    println!("  timed out");
                }
                GameEvent::EnemyLevelChanged { level } if self.verbose && *level > 1 => {
                    println!("  -- enemy level {} --", level);
                }
                _ => {}
            }
        }

        fn maybe_answer(&mut self, game: &mut RoundController) {
            let Some(at) = self.answer_at else {
                return;
            };
            if game.now_ms() < at {
                return;
            }
            self.answer_at = None;

            let Some(round) = game.current_round() else {
                return;
            };
            let answer = round.question.correct_answer;
            let pick = if self.rng.random_bool(self.accuracy) {
                answer
            } else {
                let wrong: Vec<u32> = round
                    .options
                    .values()
                    .iter()
                    .copied()
                    .filter(|&v| v != answer)
                    .collect();
                wrong[self.rng.random_range(0..wrong.len())]
            };
            game.submit_answer(pick);
        }
    }

    fn play(cli: &Cli, seed: u64) -> Result<GameSummary, QuizError> {
        let mut game = RoundController::new(cli.settings(), seed)?;
        let mut player = Player::new(cli, seed);
        let mut rounds = 0;

        game.start_game()?;
        loop {
            for event in game.drain_events() {
                if let GameEvent::QuestionDisplayed { .. } = event {
                    rounds += 1;
                }
                player.react(&mut game, &event);
            }
            if game.is_game_over() || rounds > cli.max_rounds {
                break;
            }
            player.maybe_answer(&mut game);
            game.advance(FRAME_MS)?;
        }

        if !game.is_game_over() {
            log::info!("Stopped after {} rounds", cli.max_rounds);
        }
        Ok(game.summary())
    }

    fn print_summary(game: u32, seed: u64, summary: &GameSummary) {
        println!(
            "Game {} (seed {}): score {}, level {}, {} correct, {} mistakes, avg {:.2}s",
            game,
            seed,
            summary.score,
            summary.enemy_level,
            summary.total_correct,
            summary.mistakes,
            summary.average_secs
        );
        for record in &summary.slowest {
            println!("  slow: {} ({:.1}s)", record.question_text, record.answer_secs);
        }
        for record in &summary.wrong {
            println!("  wrong: {}", record.question_text);
        }
    }

    pub fn run(cli: Cli) -> Result<(), QuizError> {
        let mut high_scores = HighScores::load();
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or_default();

        for i in 0..cli.games {
            let seed = cli.seed.wrapping_add(i as u64);
            let summary = play(&cli, seed)?;
            print_summary(i + 1, seed, &summary);
            high_scores.add_score(&summary, now_ms + i as f64);
        }

        if !high_scores.is_empty() {
            println!("\nHigh scores:");
            for (rank, entry) in high_scores.entries.iter().enumerate() {
                println!(
                    "{:>2}. {:>6}  level {:>2}  {:>3} correct",
                    rank + 1,
                    entry.score,
                    entry.level,
                    entry.correct
                );
            }
        }
        high_scores.save();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Tank Math (native autopilot) starting...");

    let cli = autopilot::Cli::parse();
    if let Err(e) = autopilot::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is tank_math::web::wasm_start, this is just to satisfy the compiler
}
