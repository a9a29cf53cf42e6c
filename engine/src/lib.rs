//! Command engine for Cohort.
//!
//! Turns chat messages into training-program operations and formats the
//! replies. The chat transport itself lives outside this crate: it hands in
//! [`IncomingMessage`]s and sends back whatever [`Reply`] comes out.

mod commands;
mod dispatcher;
mod message;

pub use commands::{Command, CommandSpec, help_text};
pub use dispatcher::{Dispatcher, DispatcherSettings};
pub use message::{Embed, EmbedField, IncomingMessage, Reply};

pub use cohort_config::CohortConfig;
pub use cohort_core::{AuditSink, FileAuditTrail, MemoryAuditTrail, TrainingProgram};
