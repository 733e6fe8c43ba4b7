//! High score leaderboard
//!
//! Persisted to LocalStorage, keeps the top 10 finished games.

use serde::{Deserialize, Serialize};

use crate::sim::GameSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Enemy level reached
    pub level: u32,
    /// Correct answers over the game
    pub correct: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "tank_math_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A zero score never qualifies
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished game. Returns the rank achieved, or None if it
    /// didn't make the board. Equal scores rank below earlier ones.
    pub fn add_score(&mut self, summary: &GameSummary, timestamp: f64) -> Option<usize> {
        let score = summary.score;
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level: summary.enemy_level,
            correct: summary.total_correct,
            timestamp,
        };

        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("High score {} at rank {}", score, rank);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding unreadable high scores: {}", e),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BattleState;

    fn summary(score: u32) -> GameSummary {
        let state = BattleState {
            score,
            total_correct: score / 3,
            enemy_level: 2,
            ..BattleState::default()
        };
        GameSummary::new(&state, &[])
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(&summary(0), 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(&summary(30), 1.0), Some(1));
        assert_eq!(scores.add_score(&summary(90), 2.0), Some(1));
        assert_eq!(scores.add_score(&summary(60), 3.0), Some(2));
        assert_eq!(scores.add_score(&summary(60), 4.0), Some(3));

        let order: Vec<_> = scores.entries.iter().map(|e| e.timestamp).collect();
        assert_eq!(order, vec![2.0, 3.0, 4.0, 1.0]);
        assert_eq!(scores.top_score(), Some(90));
        assert_eq!(scores.entries[0].level, 2);
        assert_eq!(scores.entries[0].correct, 30);
    }

    #[test]
    fn test_full_board_keeps_top_ten() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u32 {
            scores.add_score(&summary(i * 10), i as f64);
        }
        assert!(!scores.qualifies(10));
        assert_eq!(scores.potential_rank(15), Some(10));
        assert_eq!(scores.add_score(&summary(15), 0.0), Some(10));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut scores = HighScores::new();
        scores.add_score(&summary(42), 1234.0);
        let json = serde_json::to_string(&scores).unwrap();
        let loaded: HighScores = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.entries, scores.entries);
    }
}
