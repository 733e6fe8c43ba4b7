//! Game settings and preferences
//!
//! Which operations appear in the quiz and how hard each one is. Read once at
//! game start; the running game treats it as immutable. Persisted in
//! LocalStorage on the web.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::quiz::Operator;

/// Addition difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdditionMode {
    /// Two single digits
    Simple,
    /// Two-digit operands whose units always carry
    #[default]
    Carry,
    /// Two-digit operands whose units never carry
    #[serde(rename = "nocarry")]
    NoCarry,
    /// Any two-digit operands
    Both,
}

impl AdditionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdditionMode::Simple => "simple",
            AdditionMode::Carry => "carry",
            AdditionMode::NoCarry => "nocarry",
            AdditionMode::Both => "both",
        }
    }
}

impl FromStr for AdditionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(AdditionMode::Simple),
            "carry" => Ok(AdditionMode::Carry),
            "nocarry" | "no_carry" => Ok(AdditionMode::NoCarry),
            "both" => Ok(AdditionMode::Both),
            _ => Err(ConfigError::UnknownMode {
                kind: "addition",
                value: s.to_string(),
            }),
        }
    }
}

/// Subtraction difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubtractionMode {
    /// Teens minus a single digit, always borrowing
    Simple,
    /// Two-digit minuend, units always borrow
    #[default]
    Borrow,
    /// Two-digit minuend, no digit ever borrows
    #[serde(rename = "noborrow")]
    NoBorrow,
    /// Any two-digit minuend
    Both,
}

impl SubtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtractionMode::Simple => "simple",
            SubtractionMode::Borrow => "borrow",
            SubtractionMode::NoBorrow => "noborrow",
            SubtractionMode::Both => "both",
        }
    }
}

impl FromStr for SubtractionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(SubtractionMode::Simple),
            "borrow" => Ok(SubtractionMode::Borrow),
            "noborrow" | "no_borrow" => Ok(SubtractionMode::NoBorrow),
            "both" => Ok(SubtractionMode::Both),
            _ => Err(ConfigError::UnknownMode {
                kind: "subtraction",
                value: s.to_string(),
            }),
        }
    }
}

/// Multiplication difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MultiplicationMode {
    /// Times tables, 2 through 9
    #[default]
    Single,
    /// Two digits by one digit
    TwoOne,
    /// Two digits by two digits (11 and up)
    Two,
    /// Anything from 1 to 99
    Both,
}

impl MultiplicationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MultiplicationMode::Single => "single",
            MultiplicationMode::TwoOne => "two_one",
            MultiplicationMode::Two => "two",
            MultiplicationMode::Both => "both",
        }
    }
}

impl FromStr for MultiplicationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(MultiplicationMode::Single),
            "two_one" => Ok(MultiplicationMode::TwoOne),
            "two" => Ok(MultiplicationMode::Two),
            "both" => Ok(MultiplicationMode::Both),
            _ => Err(ConfigError::UnknownMode {
                kind: "multiplication",
                value: s.to_string(),
            }),
        }
    }
}

/// Division difficulty (always exact)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DivisionMode {
    /// Two-digit dividend, one-digit divisor
    #[default]
    TwoOne,
    /// Three-digit dividend, one-digit divisor
    ThreeOne,
    /// Three-digit dividend, two-digit divisor
    ThreeTwo,
}

impl DivisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DivisionMode::TwoOne => "two_one",
            DivisionMode::ThreeOne => "three_one",
            DivisionMode::ThreeTwo => "three_two",
        }
    }
}

impl FromStr for DivisionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "two_one" => Ok(DivisionMode::TwoOne),
            "three_one" => Ok(DivisionMode::ThreeOne),
            "three_two" => Ok(DivisionMode::ThreeTwo),
            _ => Err(ConfigError::UnknownMode {
                kind: "division",
                value: s.to_string(),
            }),
        }
    }
}

/// Enabled operations plus per-operation sub-modes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationConfig {
    pub addition: bool,
    pub subtraction: bool,
    pub multiplication: bool,
    pub division: bool,

    pub addition_mode: AdditionMode,
    pub subtraction_mode: SubtractionMode,
    pub multiplication_mode: MultiplicationMode,
    pub division_mode: DivisionMode,
}

impl Default for OperationConfig {
    fn default() -> Self {
        Self {
            addition: true,
            subtraction: true,
            multiplication: false,
            division: false,

            addition_mode: AdditionMode::default(),
            subtraction_mode: SubtractionMode::default(),
            multiplication_mode: MultiplicationMode::default(),
            division_mode: DivisionMode::default(),
        }
    }
}

impl OperationConfig {
    /// Config with exactly the given operations enabled, default modes
    pub fn only(ops: &[Operator]) -> Self {
        let mut config = Self {
            addition: false,
            subtraction: false,
            ..Self::default()
        };
        for &op in ops {
            *config.flag_mut(op) = true;
        }
        config
    }

    pub fn is_enabled(&self, op: Operator) -> bool {
        match op {
            Operator::Add => self.addition,
            Operator::Sub => self.subtraction,
            Operator::Mul => self.multiplication,
            Operator::Div => self.division,
        }
    }

    fn flag_mut(&mut self, op: Operator) -> &mut bool {
        match op {
            Operator::Add => &mut self.addition,
            Operator::Sub => &mut self.subtraction,
            Operator::Mul => &mut self.multiplication,
            Operator::Div => &mut self.division,
        }
    }

    /// Enabled operations in fixed order (add, sub, mul, div)
    pub fn enabled_operators(&self) -> Vec<Operator> {
        Operator::ALL
            .into_iter()
            .filter(|&op| self.is_enabled(op))
            .collect()
    }

    /// Toggle an operation, never leaving the set empty.
    ///
    /// Disabling the last enabled operation re-enables addition (or
    /// subtraction, when addition is the one being switched off). Returns the
    /// operation that was switched back on, if any.
    pub fn set_enabled(&mut self, op: Operator, enabled: bool) -> Option<Operator> {
        *self.flag_mut(op) = enabled;
        if enabled || !self.enabled_operators().is_empty() {
            return None;
        }

        let fallback = if op == Operator::Add {
            Operator::Sub
        } else {
            Operator::Add
        };
        *self.flag_mut(fallback) = true;
        log::info!(
            "{} was the last enabled operation, re-enabling {}",
            op.as_str(),
            fallback.as_str()
        );
        Some(fallback)
    }

    /// Reject configs with no operation enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled_operators().is_empty() {
            return Err(ConfigError::NoOperationEnabled);
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Quiz operations and difficulty
    pub operations: OperationConfig,
    /// Ask a missed (wrong or timed out) question again with reshuffled options
    #[serde(default = "default_repeat_missed")]
    pub repeat_missed: bool,
}

fn default_repeat_missed() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            operations: OperationConfig::default(),
            repeat_missed: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "tank_math_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str::<Settings>(&json) {
                    if settings.operations.validate().is_ok() {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    log::warn!("Stored settings enable no operation, ignoring them");
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
