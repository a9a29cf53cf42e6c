//! Grade submission parsing.
//!
//! A submission reads `Name_Lastname | score`. Names are runs of ASCII or
//! Latin-1 letters joined by a single underscore; whitespace around the pipe
//! is ignored. The whole input must match.

use std::sync::LazyLock;

use regex::Regex;

use cohort_types::{Level, MaxScoreTable, ValidatedGrade, ValidationError};

static GRADE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-zÀ-ÿ]+_[A-Za-zÀ-ÿ]+)\s*\|\s*([0-9]+)$").expect("grade pattern is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreValidator {
    caps: MaxScoreTable,
}

impl ScoreValidator {
    #[must_use]
    pub const fn new(caps: MaxScoreTable) -> Self {
        Self { caps }
    }

    /// Parse `raw` and check the score against the cap for `level`.
    pub fn validate(&self, raw: &str, level: Level) -> Result<ValidatedGrade, ValidationError> {
        let captures = GRADE_PATTERN
            .captures(raw)
            .ok_or(ValidationError::MalformedInput)?;
        let max = self.caps.max_for(level);
        let exceeds = ValidationError::ScoreExceedsMaximum { level, max };

        // Digits too long for u32 are necessarily above any cap.
        let score: u32 = captures[2].parse().map_err(|_| exceeds.clone())?;
        if score > max {
            return Err(exceeds);
        }

        Ok(ValidatedGrade {
            name: captures[1].to_string(),
            score,
        })
    }
}
