//! Answer option synthesis
//!
//! Wrong answers are built to look like the right one: off by a little, off
//! by ten, or with a different units digit.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{ANSWER_OPTION_COUNT, MAX_OPTION_VALUE, MAX_SAMPLING_ATTEMPTS};
use crate::error::QuizError;

/// Three distinct options in display order, exactly one of them correct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerOptions([u32; ANSWER_OPTION_COUNT]);

impl AnswerOptions {
    pub fn values(&self) -> &[u32; ANSWER_OPTION_COUNT] {
        &self.0
    }

    /// Option at a 0-based position
    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.0.contains(&value)
    }

    /// 0-based position of a value
    pub fn position(&self, value: u32) -> Option<usize> {
        self.0.iter().position(|&v| v == value)
    }
}

/// Build a shuffled option set around `correct`.
pub fn build_options<R: Rng>(correct: u32, rng: &mut R) -> Result<AnswerOptions, QuizError> {
    if correct > MAX_OPTION_VALUE {
        return Err(QuizError::AnswerOutOfRange(correct));
    }

    let mut values = [correct; ANSWER_OPTION_COUNT];
    let mut filled = 1;
    let mut attempts = 0;
    while filled < ANSWER_OPTION_COUNT {
        attempts += 1;
        if attempts > MAX_SAMPLING_ATTEMPTS {
            log::error!("No distractors found for {} after {} draws", correct, attempts - 1);
            return Err(QuizError::SamplingExhausted {
                what: "distractors",
                attempts: MAX_SAMPLING_ATTEMPTS,
            });
        }

        let candidate = distractor(correct, rng);
        let Ok(candidate) = u32::try_from(candidate) else {
            continue;
        };
        if candidate > MAX_OPTION_VALUE || values[..filled].contains(&candidate) {
            continue;
        }
        values[filled] = candidate;
        filled += 1;
    }

    values.shuffle(rng);
    Ok(AnswerOptions(values))
}

/// One candidate wrong answer. May be negative, out of range or equal to an
/// option already picked; the caller filters.
fn distractor<R: Rng>(correct: u32, rng: &mut R) -> i64 {
    let correct = i64::from(correct);
    let strategy: f64 = rng.random();

    if strategy < 0.2 {
        // Off by 1-3
        let diff: i64 = rng.random_range(1..=3);
        if rng.random_bool(0.5) {
            correct + diff
        } else {
            correct - diff
        }
    } else if strategy < 0.8 {
        // Off by ten
        if rng.random_bool(0.5) {
            correct + 10
        } else {
            correct - 10
        }
    } else {
        // Same tens, different units
        let units = correct % 10;
        let tens = correct / 10;
        let shift: i64 = rng.random_range(1..=9);
        tens * 10 + (units + shift) % 10
    }
}
