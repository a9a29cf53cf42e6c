//! Core domain logic for Cohort.
//!
//! The training program is a small state machine (level, phase, promotion)
//! plus an append-only ledger of grades. Both are held in memory and written
//! through to their own JSON document after every mutation.
//!
//! Nothing here knows about chat transports or command syntax; see
//! `cohort-engine` for that.

pub mod audit;
mod ledger;
mod program;
mod state_machine;
pub mod store;
mod validator;

pub use audit::{AuditSink, FileAuditTrail, MemoryAuditTrail};
pub use ledger::{GradeLedger, LedgerError};
pub use program::{GradeError, TrainingProgram};
pub use state_machine::ProgramStateMachine;
pub use store::{JsonStore, Loaded, PersistenceError};
pub use validator::ScoreValidator;
