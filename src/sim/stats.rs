//! End-of-game statistics

use serde::{Deserialize, Serialize};

use super::state::{BattleState, QuestionRecord};

/// How many of the slowest rounds the summary lists
pub const SLOWEST_COUNT: usize = 3;

/// Game over screen contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: u32,
    pub total_correct: u32,
    pub mistakes: u32,
    /// Answers under the quick threshold, whether or not a streak held
    pub quick_answers: u32,
    pub enemy_level: u32,
    /// Mean answer time over every round, 0 with no rounds
    pub average_secs: f32,
    /// Slowest rounds, slowest first
    pub slowest: Vec<QuestionRecord>,
    /// Every missed round in play order
    pub wrong: Vec<QuestionRecord>,
}

impl GameSummary {
    pub fn new(state: &BattleState, records: &[QuestionRecord]) -> Self {
        Self {
            score: state.score,
            total_correct: state.total_correct,
            mistakes: state.mistakes,
            quick_answers: state.quick_answers,
            enemy_level: state.enemy_level,
            average_secs: average_time(records),
            slowest: slowest(records, SLOWEST_COUNT),
            wrong: wrong(records),
        }
    }
}

pub fn average_time(records: &[QuestionRecord]) -> f32 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f32 = records.iter().map(|r| r.answer_secs).sum();
    total / records.len() as f32
}

/// Up to `count` records by descending answer time; ties keep play order
pub fn slowest(records: &[QuestionRecord], count: usize) -> Vec<QuestionRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.answer_secs.total_cmp(&a.answer_secs));
    sorted.truncate(count);
    sorted
}

pub fn wrong(records: &[QuestionRecord]) -> Vec<QuestionRecord> {
    records.iter().filter(|r| !r.was_correct).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, secs: f32, correct: bool) -> QuestionRecord {
        QuestionRecord {
            question_text: text.to_string(),
            answer_secs: secs,
            was_correct: correct,
        }
    }

    #[test]
    fn test_empty_history() {
        let summary = GameSummary::new(&BattleState::default(), &[]);
        assert_eq!(summary.average_secs, 0.0);
        assert!(summary.slowest.is_empty());
        assert!(summary.wrong.is_empty());
    }

    #[test]
    fn test_summary_stats() {
        let records = vec![
            record("1 + 1 = ?", 2.0, true),
            record("2 + 2 = ?", 9.0, false),
            record("3 + 3 = ?", 4.0, true),
            record("4 + 4 = ?", 1.0, false),
            record("5 + 5 = ?", 4.0, true),
        ];
        let state = BattleState {
            quick_answers: 2,
            ..BattleState::default()
        };
        let summary = GameSummary::new(&state, &records);
        assert_eq!(summary.quick_answers, 2);

        assert!((summary.average_secs - 4.0).abs() < 1e-6);

        let slow: Vec<_> = summary.slowest.iter().map(|r| r.question_text.as_str()).collect();
        assert_eq!(slow, vec!["2 + 2 = ?", "3 + 3 = ?", "5 + 5 = ?"]);

        let wrong: Vec<_> = summary.wrong.iter().map(|r| r.question_text.as_str()).collect();
        assert_eq!(wrong, vec!["2 + 2 = ?", "4 + 4 = ?"]);
    }

    #[test]
    fn test_slowest_with_fewer_records() {
        let records = vec![record("a", 1.0, true), record("b", 3.0, true)];
        let slow = slowest(&records, SLOWEST_COUNT);
        assert_eq!(slow.len(), 2);
        assert_eq!(slow[0].question_text, "b");
    }
}
