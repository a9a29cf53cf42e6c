//! Core domain types for Cohort.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod grade;
mod program;
mod score;

pub use grade::{GradeRecord, ValidatedGrade};
pub use program::{
    Level, LevelAdvance, LevelError, Phase, ProgramState, Promotion, PromotionError,
};
pub use score::{DEFAULT_MAX_SCORES, MaxScoreTable, ValidationError};
