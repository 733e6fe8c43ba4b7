//! Question generation
//!
//! Pure functions over a caller-supplied RNG:
//! - `question`: arithmetic problems with carry/borrow/divisibility guarantees
//! - `options`: three-way answer sets with plausible distractors

pub mod options;
pub mod question;

pub use options::{AnswerOptions, build_options};
pub use question::{
    Operator, Question, addition_operands, division_operands, generate, multiplication_operands,
    subtraction_operands,
};

use rand::Rng;

use crate::consts::MAX_SAMPLING_ATTEMPTS;
use crate::error::QuizError;

/// Draw until `draw` yields a value, giving up after `MAX_SAMPLING_ATTEMPTS`.
///
/// Every constraint sampled this way has a healthy acceptance rate, so the
/// cap only trips if a constraint is changed into one that can't be met.
pub(crate) fn sample<R: Rng, T>(
    what: &'static str,
    rng: &mut R,
    mut draw: impl FnMut(&mut R) -> Option<T>,
) -> Result<T, QuizError> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        if let Some(value) = draw(rng) {
            return Ok(value);
        }
    }
    log::error!("Sampling {} exhausted {} attempts", what, MAX_SAMPLING_ATTEMPTS);
    Err(QuizError::SamplingExhausted {
        what,
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}
