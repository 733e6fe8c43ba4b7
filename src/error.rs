//! Error types
//!
//! Only configuration problems and exhausted sampling are errors. Late or
//! duplicate answers are part of normal play and are absorbed by the
//! round controller.

use crate::quiz::Operator;

/// Invalid game configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Every operation was disabled
    #[error("at least one operation must be enabled")]
    NoOperationEnabled,

    /// A sub-mode name did not parse
    #[error("unknown {kind} mode: {value:?}")]
    UnknownMode { kind: &'static str, value: String },

    /// An operation name did not parse
    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),
}

/// Question or option generation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A rejection-sampling loop hit its attempt cap
    #[error("sampling {what} gave up after {attempts} attempts")]
    SamplingExhausted { what: &'static str, attempts: u32 },

    /// Operands that don't evaluate to a whole, non-negative answer
    #[error("{a} {operator} {b} has no exact answer")]
    InexactOperands { operator: Operator, a: u32, b: u32 },

    /// Distractors only exist inside the option range
    #[error("answer {0} is outside the option range")]
    AnswerOutOfRange(u32),
}
