//! Training program position: level, phase and promotion.
//!
//! The pure transition rules live here. Persisting the result of a transition
//! is the job of `cohort-core`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Level
// ============================================================================

/// Ordinal stage of the training program.
///
/// Invariant: the wrapped value is always in `1..=3`. Out-of-range values are
/// rejected at the serde boundary, so a stored snapshot with `level: 7` fails
/// to deserialize instead of producing an invalid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("level must be between 1 and 3 (got {0})")]
pub struct LevelError(pub u8);

impl Level {
    pub const FIRST: Level = Level(1);
    pub const LAST: Level = Level(3);
    pub const ALL: [Level; 3] = [Level(1), Level(2), Level(3)];

    pub const fn new(value: u8) -> Result<Self, LevelError> {
        if value >= Self::FIRST.0 && value <= Self::LAST.0 {
            Ok(Self(value))
        } else {
            Err(LevelError(value))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position, for indexing per-level tables.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The following level, or `None` when this is the last one.
    #[must_use]
    pub const fn next(self) -> Option<Level> {
        if self.0 < Self::LAST.0 {
            Some(Level(self.0 + 1))
        } else {
            None
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Promotion
// ============================================================================

/// Cohort counter, incremented each time the program wraps from the last
/// level back to the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Promotion(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("promotion must be at least 1")]
pub struct PromotionError;

impl Promotion {
    pub const FIRST: Promotion = Promotion(1);

    pub const fn new(value: u32) -> Result<Self, PromotionError> {
        if value >= 1 {
            Ok(Self(value))
        } else {
            Err(PromotionError)
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Promotion {
        Promotion(self.0.saturating_add(1))
    }
}

impl TryFrom<u32> for Promotion {
    type Error = PromotionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Promotion> for u32 {
    fn from(promotion: Promotion) -> Self {
        promotion.0
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Phase
// ============================================================================

/// Sub-stage within a training level.
///
/// Phases rotate: `Material -> Evaluation -> Closed -> Material`. Nothing
/// terminates the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Material,
    Evaluation,
    Closed,
}

impl Phase {
    #[must_use]
    pub const fn next(self) -> Phase {
        match self {
            Phase::Material => Phase::Evaluation,
            Phase::Evaluation => Phase::Closed,
            Phase::Closed => Phase::Material,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Material => "MATERIAL",
            Phase::Evaluation => "EVALUATION",
            Phase::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ProgramState
// ============================================================================

/// Snapshot of where the training program currently stands.
///
/// `active` is carried through storage untouched. No transition reads or
/// writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramState {
    pub level: Level,
    pub phase: Phase,
    pub promotion: Promotion,
    pub active: bool,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self {
            level: Level::FIRST,
            phase: Phase::Material,
            promotion: Promotion::FIRST,
            active: true,
        }
    }
}

/// Outcome of [`ProgramState::advance_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelAdvance {
    pub level: Level,
    pub promotion: Promotion,
    /// True when the program wrapped from the last level and opened a new promotion.
    pub new_promotion: bool,
}

impl ProgramState {
    /// Rotate to the next phase and return it.
    pub fn advance_phase(&mut self) -> Phase {
        self.phase = self.phase.next();
        self.phase
    }

    /// Move to the next level, wrapping into a new promotion after the last one.
    ///
    /// No phase precondition: this is allowed mid-evaluation. The phase always
    /// restarts at `Material`.
    pub fn advance_level(&mut self) -> LevelAdvance {
        let new_promotion = match self.level.next() {
            Some(next) => {
                self.level = next;
                false
            }
            None => {
                self.level = Level::FIRST;
                self.promotion = self.promotion.next();
                true
            }
        };
        self.phase = Phase::Material;
        LevelAdvance {
            level: self.level,
            promotion: self.promotion,
            new_promotion,
        }
    }

    #[must_use]
    pub fn is_evaluating(&self) -> bool {
        self.phase == Phase::Evaluation
    }
}
