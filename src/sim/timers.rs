//! Named, cancellable scheduled tasks
//!
//! All delays run on a virtual millisecond clock advanced by the host. Each
//! [`TimerKind`] has one slot: scheduling replaces a pending deadline, and
//! cancelling is always safe. Nothing fires unless `pop_due` hands it out.

use serde::{Deserialize, Serialize};

/// The scheduled tasks the round controller owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Next enemy rolls in after the explosion settles
    EnemySpawn,
    /// End of the input-disable window
    EnableAnswers,
    /// 1 Hz countdown tick
    Countdown,
    /// Next question after a resolved round
    NextRound,
}

impl TimerKind {
    /// Firing order for equal deadlines
    pub const ALL: [TimerKind; 4] = [
        TimerKind::EnemySpawn,
        TimerKind::EnableAnswers,
        TimerKind::Countdown,
        TimerKind::NextRound,
    ];

    /// Timers that belong to the current round
    pub const ROUND: [TimerKind; 3] = [
        TimerKind::EnableAnswers,
        TimerKind::Countdown,
        TimerKind::NextRound,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Deadline table on a virtual clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    now_ms: u64,
    deadlines: [Option<u64>; 4],
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Arm `kind` to fire `delay_ms` from now, replacing any pending
    /// deadline. A deadline past the end of the clock never fires.
    pub fn schedule(&mut self, kind: TimerKind, delay_ms: u64) {
        self.deadlines[kind.slot()] = self.now_ms.checked_add(delay_ms);
    }

    /// Disarm `kind`. Returns whether it was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.deadlines[kind.slot()].take().is_some()
    }

    /// Disarm every per-round timer; the enemy spawn keeps running
    pub fn cancel_round(&mut self) {
        for kind in TimerKind::ROUND {
            self.cancel(kind);
        }
    }

    pub fn cancel_all(&mut self) {
        self.deadlines = [None; 4];
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.deadlines[kind.slot()].is_some()
    }

    pub fn any_pending(&self) -> bool {
        self.deadlines.iter().any(Option::is_some)
    }

    /// Milliseconds until `kind` fires
    pub fn remaining_ms(&self, kind: TimerKind) -> Option<u64> {
        self.deadlines[kind.slot()].map(|d| d.saturating_sub(self.now_ms))
    }

    /// Take the earliest timer due at or before `until_ms`, moving the clock
    /// to its deadline. Equal deadlines fire in [`TimerKind::ALL`] order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerKind> {
        let (kind, deadline) = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| self.deadlines[kind.slot()].map(|d| (kind, d)))
            .filter(|&(_, d)| d <= until_ms)
            .min_by_key(|&(kind, d)| (d, kind.slot()))?;

        self.deadlines[kind.slot()] = None;
        self.now_ms = self.now_ms.max(deadline);
        Some(kind)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timers = Timers::new();
        timers.schedule(TimerKind::NextRound, 1000);
        timers.schedule(TimerKind::EnableAnswers, 200);
        timers.schedule(TimerKind::Countdown, 1000);

        assert_eq!(timers.pop_due(2000), Some(TimerKind::EnableAnswers));
        assert_eq!(timers.now_ms(), 200);
        // Tie at 1000: countdown before next round
        assert_eq!(timers.pop_due(2000), Some(TimerKind::Countdown));
        assert_eq!(timers.pop_due(2000), Some(TimerKind::NextRound));
        assert_eq!(timers.pop_due(2000), None);
        assert_eq!(timers.now_ms(), 1000);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timers = Timers::new();
        timers.schedule(TimerKind::Countdown, 1000);
        assert_eq!(timers.pop_due(999), None);
        assert!(timers.is_pending(TimerKind::Countdown));
        timers.advance_to(999);
        assert_eq!(timers.remaining_ms(TimerKind::Countdown), Some(1));
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut timers = Timers::new();
        timers.schedule(TimerKind::EnableAnswers, 1000);
        timers.advance_to(500);
        timers.schedule(TimerKind::EnableAnswers, 1000);
        assert_eq!(timers.pop_due(1000), None);
        assert_eq!(timers.pop_due(1500), Some(TimerKind::EnableAnswers));
    }

    #[test]
    fn test_cancel_round_spares_enemy_spawn() {
        let mut timers = Timers::new();
        for kind in TimerKind::ALL {
            timers.schedule(kind, 100);
        }
        timers.cancel_round();
        assert!(timers.is_pending(TimerKind::EnemySpawn));
        assert!(!timers.is_pending(TimerKind::Countdown));
        assert!(!timers.is_pending(TimerKind::EnableAnswers));
        assert!(!timers.is_pending(TimerKind::NextRound));

        assert!(timers.cancel(TimerKind::EnemySpawn));
        assert!(!timers.cancel(TimerKind::EnemySpawn));
        assert!(!timers.any_pending());
    }

    #[test]
    fn test_deadline_past_clock_end_is_dropped() {
        let mut timers = Timers::new();
        timers.advance_to(u64::MAX - 10);
        timers.schedule(TimerKind::Countdown, 1000);
        assert!(!timers.is_pending(TimerKind::Countdown));
        timers.schedule(TimerKind::NextRound, 10);
        assert_eq!(timers.pop_due(u64::MAX), Some(TimerKind::NextRound));
        assert_eq!(timers.now_ms(), u64::MAX);
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::new();
        for kind in TimerKind::ALL {
            timers.schedule(kind, 10);
        }
        timers.cancel_all();
        assert_eq!(timers.pop_due(u64::MAX), None);
    }
}
