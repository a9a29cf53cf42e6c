use thiserror::Error;

use cohort_types::{GradeRecord, Level, Phase, ProgramState, Promotion};

use crate::store::{JsonStore, PersistenceError};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("The system is not in evaluation phase (current phase: {phase})")]
    NotInEvaluationPhase { phase: Phase },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Append-only, insertion-ordered record of evaluations.
#[derive(Debug)]
pub struct GradeLedger {
    entries: Vec<GradeRecord>,
    store: JsonStore<Vec<GradeRecord>>,
}

impl GradeLedger {
    pub fn open(store: JsonStore<Vec<GradeRecord>>) -> Self {
        let entries = store.load_or(Vec::new());
        tracing::info!(entries = entries.len(), "Grade ledger loaded");
        Self { entries, store }
    }

    /// Refuse unless the program is in its evaluation phase.
    pub fn ensure_open(state: &ProgramState) -> Result<(), LedgerError> {
        if state.is_evaluating() {
            Ok(())
        } else {
            Err(LedgerError::NotInEvaluationPhase { phase: state.phase })
        }
    }

    /// Append `entry` and persist the whole ledger.
    ///
    /// The phase guard lives here so that no caller can record outside
    /// evaluation. On a failed save the entry is dropped again.
    pub fn record(&mut self, state: &ProgramState, entry: GradeRecord) -> Result<(), LedgerError> {
        Self::ensure_open(state)?;
        self.entries.push(entry);
        if let Err(e) = self.store.save(&self.entries) {
            self.entries.pop();
            return Err(e.into());
        }
        Ok(())
    }

    /// Number of entries recorded for `level` within `promotion`.
    #[must_use]
    pub fn summarize(&self, level: Level, promotion: Promotion) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.belongs_to(level, promotion))
            .count()
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.save(&Vec::new())?;
        self.entries.clear();
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[GradeRecord] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
