//! Per-level score caps and grade validation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Level;

pub const DEFAULT_MAX_SCORES: [u32; 3] = [15, 18, 20];

/// Maximum score a grade may carry at each level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxScoreTable([u32; 3]);

impl MaxScoreTable {
    #[must_use]
    pub const fn new(caps: [u32; 3]) -> Self {
        Self(caps)
    }

    #[must_use]
    pub const fn max_for(&self, level: Level) -> u32 {
        self.0[level.index()]
    }

    #[must_use]
    pub const fn as_array(&self) -> [u32; 3] {
        self.0
    }
}

impl Default for MaxScoreTable {
    fn default() -> Self {
        Self(DEFAULT_MAX_SCORES)
    }
}

/// Rejection reasons for a raw grade submission. Both are user-correctable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid format, expected Name_Lastname | score")]
    MalformedInput,
    #[error("Score exceeds maximum allowed ({max} at level {level})")]
    ScoreExceedsMaximum { level: Level, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::{Level, MaxScoreTable};

    #[test]
    fn default_caps_follow_levels() {
        let table = MaxScoreTable::default();
        let caps: Vec<u32> = Level::ALL.iter().map(|l| table.max_for(*l)).collect();
        assert_eq!(caps, vec![15, 18, 20]);
    }

    #[test]
    fn custom_caps_are_indexed_by_level() {
        let table = MaxScoreTable::new([10, 11, 12]);
        assert_eq!(table.max_for(Level::LAST), 12);
    }
}
