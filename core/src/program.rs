//! The training program as a whole: state machine, ledger, validator and audit
//! trail behind one owner.
//!
//! Every mutating operation follows the same order: compute, persist, then
//! append an audit line. Nothing is audited for an operation whose snapshot
//! could not be written.

use std::path::Path;

use thiserror::Error;

use cohort_types::{
    GradeRecord, Level, LevelAdvance, MaxScoreTable, Phase, ProgramState, Promotion,
    ValidationError,
};

use crate::{
    audit::AuditSink,
    ledger::{GradeLedger, LedgerError},
    state_machine::ProgramStateMachine,
    store::{JsonStore, PersistenceError},
    validator::ScoreValidator,
};

#[derive(Debug, Error)]
pub enum GradeError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub struct TrainingProgram {
    machine: ProgramStateMachine,
    ledger: GradeLedger,
    validator: ScoreValidator,
    audit: Box<dyn AuditSink>,
}

impl std::fmt::Debug for TrainingProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainingProgram")
            .field("machine", &self.machine)
            .field("ledger", &self.ledger)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl TrainingProgram {
    pub fn new(
        machine: ProgramStateMachine,
        ledger: GradeLedger,
        validator: ScoreValidator,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        Self {
            machine,
            ledger,
            validator,
            audit,
        }
    }

    /// Load both documents from disk; missing or corrupt ones start fresh.
    pub fn open(
        state_file: &Path,
        grades_file: &Path,
        caps: MaxScoreTable,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        Self::new(
            ProgramStateMachine::open(JsonStore::new(state_file)),
            GradeLedger::open(JsonStore::new(grades_file)),
            ScoreValidator::new(caps),
            audit,
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgramState {
        self.machine.snapshot()
    }

    #[must_use]
    pub fn ledger(&self) -> &GradeLedger {
        &self.ledger
    }

    /// Write a free-form line to the audit trail (startup, shutdown).
    pub fn audit(&mut self, message: &str) {
        self.audit.record(message);
    }

    pub fn advance_phase(&mut self) -> Result<Phase, PersistenceError> {
        let phase = self.machine.advance_phase()?;
        tracing::info!(%phase, "Phase advanced");
        self.audit.record(&format!("Phase changed to {phase}"));
        Ok(phase)
    }

    pub fn advance_level(&mut self) -> Result<LevelAdvance, PersistenceError> {
        let advance = self.machine.advance_level()?;
        tracing::info!(
            level = %advance.level,
            promotion = %advance.promotion,
            new_promotion = advance.new_promotion,
            "Level advanced"
        );
        self.audit
            .record(&format!("Advanced to level {}", advance.level));
        Ok(advance)
    }

    /// Return the program to its initial state and empty the ledger.
    ///
    /// The two documents are written one after the other; if the ledger write
    /// fails the state has already been reset.
    pub fn reset(&mut self) -> Result<(), PersistenceError> {
        self.machine.reset()?;
        self.ledger.clear()?;
        tracing::info!("Program reset");
        self.audit.record("Demo reset executed");
        Ok(())
    }

    /// Validate `raw` against the current level and append it to the ledger.
    ///
    /// The phase is checked before the input, so a malformed submission
    /// outside evaluation reports the phase.
    pub fn record_grade(
        &mut self,
        raw: &str,
        graded_by: &str,
        timestamp_ms: i64,
    ) -> Result<GradeRecord, GradeError> {
        let state = self.machine.snapshot();
        GradeLedger::ensure_open(&state)?;
        let grade = self.validator.validate(raw, state.level)?;

        let record = GradeRecord {
            trainee: grade.name,
            score: grade.score,
            level: state.level,
            promotion: state.promotion,
            graded_by: graded_by.to_string(),
            timestamp: timestamp_ms,
        };
        self.ledger.record(&state, record.clone())?;
        tracing::info!(
            trainee = %record.trainee,
            score = record.score,
            level = %record.level,
            "Grade recorded"
        );
        self.audit
            .record(&format!("Grade registered for {}", record.trainee));
        Ok(record)
    }

    #[must_use]
    pub fn summarize(&self, level: Level, promotion: Promotion) -> usize {
        self.ledger.summarize(level, promotion)
    }

    /// Count of grades for the level and promotion currently in progress.
    #[must_use]
    pub fn summarize_current(&self) -> usize {
        let state = self.machine.snapshot();
        self.ledger.summarize(state.level, state.promotion)
    }
}
