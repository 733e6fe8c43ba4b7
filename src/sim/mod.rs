//! Battle simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Virtual millisecond clock, advanced only by the host
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod battle;
pub mod event;
pub mod round;
pub mod state;
pub mod stats;
pub mod timers;

pub use battle::{Battle, HitOutcome};
pub use event::GameEvent;
pub use round::{Round, RoundController};
pub use state::{BattlePhase, BattleState, QuestionRecord, enemy_health_for_level};
pub use stats::GameSummary;
pub use timers::{TimerKind, Timers};
