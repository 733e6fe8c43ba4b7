//! Arithmetic question generator
//!
//! Each operation has its own operand generator keyed by sub-mode. Carry and
//! borrow constraints are rejection-sampled; the "no carry"/"no borrow" modes
//! build digits directly.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sample;
use crate::error::{ConfigError, QuizError};
use crate::settings::{
    AdditionMode, DivisionMode, MultiplicationMode, OperationConfig, SubtractionMode,
};

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
        }
    }

    /// Symbol shown in the question text
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "×",
            Operator::Div => "÷",
        }
    }

    /// Exact evaluation. `None` on underflow, overflow, division by zero or
    /// a remainder.
    pub fn apply(&self, a: u32, b: u32) -> Option<u32> {
        match self {
            Operator::Add => a.checked_add(b),
            Operator::Sub => a.checked_sub(b),
            Operator::Mul => a.checked_mul(b),
            Operator::Div => {
                if b != 0 && a % b == 0 {
                    Some(a / b)
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" | "addition" | "+" => Ok(Operator::Add),
            "sub" | "subtraction" | "-" => Ok(Operator::Sub),
            "mul" | "multiplication" | "×" | "*" | "x" => Ok(Operator::Mul),
            "div" | "division" | "÷" | "/" => Ok(Operator::Div),
            _ => Err(ConfigError::UnknownOperation(s.to_string())),
        }
    }
}

/// One quiz problem. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub operand_a: u32,
    pub operand_b: u32,
    pub operator: Operator,
    /// e.g. `"37 + 45 = ?"`
    pub display_text: String,
    pub correct_answer: u32,
}

impl Question {
    /// Build a question from operands that evaluate exactly.
    ///
    /// Returns `None` for operands the quiz never asks about: negative
    /// differences, division by zero or with a remainder.
    pub fn new(operator: Operator, operand_a: u32, operand_b: u32) -> Option<Self> {
        let correct_answer = operator.apply(operand_a, operand_b)?;
        Some(Self {
            operand_a,
            operand_b,
            operator,
            display_text: format!("{} {} {} = ?", operand_a, operator.symbol(), operand_b),
            correct_answer,
        })
    }
}

/// Generate a question from one of the enabled operations, chosen uniformly.
pub fn generate<R: Rng>(config: &OperationConfig, rng: &mut R) -> Result<Question, QuizError> {
    let ops = config.enabled_operators();
    if ops.is_empty() {
        return Err(ConfigError::NoOperationEnabled.into());
    }
    let op = ops[rng.random_range(0..ops.len())];

    let (a, b) = match op {
        Operator::Add => addition_operands(config.addition_mode, rng)?,
        Operator::Sub => subtraction_operands(config.subtraction_mode, rng)?,
        Operator::Mul => multiplication_operands(config.multiplication_mode, rng),
        Operator::Div => division_operands(config.division_mode, rng),
    };

    let question =
        Question::new(op, a, b).ok_or(QuizError::InexactOperands { operator: op, a, b })?;
    log::debug!("Generated {} ({})", question.display_text, question.correct_answer);
    Ok(question)
}

/// Addends for the given mode
pub fn addition_operands<R: Rng>(
    mode: AdditionMode,
    rng: &mut R,
) -> Result<(u32, u32), QuizError> {
    let pair = match mode {
        AdditionMode::Simple => (rng.random_range(1..=9), rng.random_range(1..=9)),
        AdditionMode::Carry => sample("carry addition", rng, |rng| {
            let a: u32 = rng.random_range(10..=99);
            let b: u32 = rng.random_range(10..=99);
            (a % 10 + b % 10 >= 10).then_some((a, b))
        })?,
        AdditionMode::NoCarry => {
            // Units of `a` stop at 8 so `b` always has a non-zero unit to add
            let a_tens: u32 = rng.random_range(1..=9);
            let a_units: u32 = rng.random_range(0..=8);
            let b_tens: u32 = rng.random_range(0..=8);
            let b_units: u32 = rng.random_range(1..=9 - a_units);
            (a_tens * 10 + a_units, b_tens * 10 + b_units)
        }
        AdditionMode::Both => (rng.random_range(10..=99), rng.random_range(10..=99)),
    };
    Ok(pair)
}

/// Minuend and subtrahend for the given mode. The subtrahend is always
/// non-zero and smaller than the minuend.
pub fn subtraction_operands<R: Rng>(
    mode: SubtractionMode,
    rng: &mut R,
) -> Result<(u32, u32), QuizError> {
    let pair = match mode {
        SubtractionMode::Simple => {
            // 11..=18 minus a digit above the minuend's units: always borrows
            let a: u32 = rng.random_range(11..=18);
            let b: u32 = rng.random_range(a - 9..=9);
            (a, b)
        }
        SubtractionMode::Borrow => sample("borrow subtraction", rng, |rng| {
            let a: u32 = rng.random_range(10..=99);
            let b: u32 = rng.random_range(1..a);
            (a % 10 < b % 10).then_some((a, b))
        })?,
        SubtractionMode::NoBorrow => sample("no-borrow subtraction", rng, |rng| {
            let a_tens: u32 = rng.random_range(1..=9);
            let a_units: u32 = rng.random_range(0..=9);
            let b_tens: u32 = rng.random_range(0..=a_tens);
            let b_units: u32 = rng.random_range(0..=a_units);
            let (a, b) = (a_tens * 10 + a_units, b_tens * 10 + b_units);
            (b > 0 && b < a).then_some((a, b))
        })?,
        SubtractionMode::Both => {
            let a: u32 = rng.random_range(10..=99);
            (a, rng.random_range(1..a))
        }
    };
    Ok(pair)
}

/// Factors for the given mode
pub fn multiplication_operands<R: Rng>(mode: MultiplicationMode, rng: &mut R) -> (u32, u32) {
    match mode {
        MultiplicationMode::Single => (rng.random_range(2..=9), rng.random_range(2..=9)),
        MultiplicationMode::TwoOne => {
            let two_digit: u32 = rng.random_range(10..=99);
            let one_digit: u32 = rng.random_range(2..=9);
            if rng.random_bool(0.5) {
                (two_digit, one_digit)
            } else {
                (one_digit, two_digit)
            }
        }
        MultiplicationMode::Two => (rng.random_range(11..=99), rng.random_range(11..=99)),
        MultiplicationMode::Both => (rng.random_range(1..=99), rng.random_range(1..=99)),
    }
}

/// Dividend and divisor for the given mode. Built from divisor × quotient so
/// the division is always exact.
pub fn division_operands<R: Rng>(mode: DivisionMode, rng: &mut R) -> (u32, u32) {
    let (divisor, quotient) = match mode {
        DivisionMode::TwoOne => {
            let divisor: u32 = rng.random_range(2..=9);
            // Keep the dividend at two digits (2 × 4 would be 8)
            let q_min = 10u32.div_ceil(divisor).max(2);
            (divisor, rng.random_range(q_min..=9))
        }
        DivisionMode::ThreeOne => {
            let divisor: u32 = rng.random_range(2..=9);
            (divisor, three_digit_quotient(divisor, rng))
        }
        DivisionMode::ThreeTwo => {
            let divisor: u32 = rng.random_range(11..=99);
            (divisor, three_digit_quotient(divisor, rng))
        }
    };
    (divisor * quotient, divisor)
}

/// Quotient that puts `divisor × quotient` in 100..=999
fn three_digit_quotient<R: Rng>(divisor: u32, rng: &mut R) -> u32 {
    let q_min = 100u32.div_ceil(divisor);
    let q_max = 999 / divisor;
    rng.random_range(q_min..=q_max)
}
