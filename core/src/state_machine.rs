use cohort_types::{LevelAdvance, Phase, ProgramState};

use crate::store::{JsonStore, PersistenceError};

/// Owns the program position and writes it through on every transition.
///
/// Transitions are computed on a copy and only committed in memory once the
/// snapshot has been saved, so the working copy never runs ahead of storage.
#[derive(Debug)]
pub struct ProgramStateMachine {
    state: ProgramState,
    store: JsonStore<ProgramState>,
}

impl ProgramStateMachine {
    /// Load the stored snapshot, or start from the defaults.
    pub fn open(store: JsonStore<ProgramState>) -> Self {
        let state = store.load_or(ProgramState::default());
        tracing::info!(
            level = %state.level,
            phase = %state.phase,
            promotion = %state.promotion,
            "Program state loaded"
        );
        Self { state, store }
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgramState {
        self.state
    }

    pub fn advance_phase(&mut self) -> Result<Phase, PersistenceError> {
        let mut next = self.state;
        let phase = next.advance_phase();
        self.commit(next)?;
        Ok(phase)
    }

    pub fn advance_level(&mut self) -> Result<LevelAdvance, PersistenceError> {
        let mut next = self.state;
        let advance = next.advance_level();
        self.commit(next)?;
        Ok(advance)
    }

    pub fn reset(&mut self) -> Result<(), PersistenceError> {
        self.commit(ProgramState::default())
    }

    fn commit(&mut self, next: ProgramState) -> Result<(), PersistenceError> {
        self.store.save(&next)?;
        self.state = next;
        Ok(())
    }
}
