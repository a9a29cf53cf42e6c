//! Maps incoming messages to training-program operations.
//!
//! Handling is strictly sequential: the dispatcher owns the program and each
//! message runs to completion, persistence included, before the next one.
//! A transport that serves messages concurrently must put the dispatcher
//! behind a mutex.

use chrono::Utc;

use cohort_config::CohortConfig;
use cohort_core::{AuditSink, GradeError, LedgerError, PersistenceError, TrainingProgram};

use crate::{
    commands::{Command, help_text},
    message::{Embed, IncomingMessage, Reply},
};

/// Transport-facing knobs, resolved from [`CohortConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSettings {
    pub prefix: char,
    pub guild_id: Option<String>,
    pub restrict_mutations: bool,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            prefix: cohort_config::DEFAULT_PREFIX,
            guild_id: None,
            restrict_mutations: false,
        }
    }
}

impl From<&CohortConfig> for DispatcherSettings {
    fn from(config: &CohortConfig) -> Self {
        Self {
            prefix: config.prefix,
            guild_id: config.guild_id.clone(),
            restrict_mutations: config.restrict_mutations,
        }
    }
}

fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug)]
pub struct Dispatcher {
    program: TrainingProgram,
    settings: DispatcherSettings,
    clock: fn() -> i64,
}

impl Dispatcher {
    pub fn new(program: TrainingProgram, settings: DispatcherSettings) -> Self {
        Self {
            program,
            settings,
            clock: epoch_millis,
        }
    }

    /// Open the program from the configured storage paths.
    pub fn from_config(config: &CohortConfig, audit: Box<dyn AuditSink>) -> Self {
        let program = TrainingProgram::open(
            &config.storage.state_file,
            &config.storage.grades_file,
            config.max_scores,
            audit,
        );
        Self::new(program, DispatcherSettings::from(config))
    }

    /// Replace the grade timestamp source (epoch milliseconds).
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn program(&self) -> &TrainingProgram {
        &self.program
    }

    /// Record a startup line in the audit trail.
    pub fn announce_start(&mut self, transport: &str) {
        tracing::info!(transport, prefix = %self.settings.prefix, "Dispatcher ready");
        self.program.audit(&format!("Bot started ({transport})"));
    }

    /// The command text after the prefix, if this message is ours to handle.
    fn command_body<'m>(&self, message: &'m IncomingMessage) -> Option<&'m str> {
        if message.author_is_bot {
            return None;
        }
        if let Some(expected) = &self.settings.guild_id
            && message.guild_id.as_deref() != Some(expected.as_str())
        {
            return None;
        }
        message.content.strip_prefix(self.settings.prefix)
    }

    /// Handle one message. `None` means the message is ignored and nothing
    /// should be sent back.
    pub fn handle(&mut self, message: &IncomingMessage) -> Option<Reply> {
        let body = self.command_body(message)?;
        let command = Command::parse(body);
        tracing::debug!(author = %message.author_id, ?command, "Command received");

        if command.mutates() && self.settings.restrict_mutations && !message.is_instructor {
            let name = command.name().unwrap_or_default();
            tracing::info!(author = %message.author_id, ?command, "Command refused by access gate");
            self.program.audit(&format!(
                "Command {name} refused for {}: instructor only",
                message.author_id
            ));
            return Some(Reply::text(format!(
                "⛔ Only instructors can use {}{name}",
                self.settings.prefix
            )));
        }

        self.execute(command, &message.author_id)
    }

    /// Run an already-parsed command on behalf of `author_id`.
    ///
    /// Every executed command leaves one audit line: successful mutations are
    /// recorded by the program itself, everything else is recorded here.
    pub fn execute(&mut self, command: Command, author_id: &str) -> Option<Reply> {
        let reply = match command {
            Command::Status => {
                self.program.audit("Status requested");
                self.status()
            }
            Command::Phase => match self.program.advance_phase() {
                Ok(phase) => Reply::text(format!("🔄 Phase advanced to **{phase}**")),
                Err(e) => self.persistence_failure("phase", &e),
            },
            Command::Level => match self.program.advance_level() {
                Ok(advance) => Reply::text(format!(
                    "⏭️ Level updated\nLevel: {}\nPromotion: {}",
                    advance.level, advance.promotion
                )),
                Err(e) => self.persistence_failure("level", &e),
            },
            Command::Grade(raw) => {
                let now = (self.clock)();
                match self.program.record_grade(&raw, author_id, now) {
                    Ok(record) => Reply::text(format!(
                        "✅ **Grade recorded**\n{}: {}",
                        record.trainee, record.score
                    )),
                    Err(GradeError::Ledger(LedgerError::Persistence(e))) => {
                        self.persistence_failure("grade", &e)
                    }
                    Err(e) => {
                        self.program.audit(&format!("Grade refused: {e}"));
                        Reply::text(format!("❌ {e}"))
                    }
                }
            }
            Command::Summary => {
                let count = self.program.summarize_current();
                self.program.audit(&format!("Summary requested ({count})"));
                Reply::text(format!("📋 Registered evaluations: **{count}**"))
            }
            Command::ResetDemo => match self.program.reset() {
                Ok(()) => Reply::text("♻️ Demo system has been reset"),
                Err(e) => self.persistence_failure("reset-demo", &e),
            },
            Command::Help => {
                self.program.audit("Help requested");
                Reply::text(help_text(self.settings.prefix))
            }
            Command::Unknown(name) => {
                tracing::debug!(command = %name, "Ignoring unknown command");
                return None;
            }
            Command::Empty => return None,
        };
        Some(reply)
    }

    fn persistence_failure(&mut self, command: &str, err: &PersistenceError) -> Reply {
        tracing::error!(path = %err.path().display(), "Failed to persist program data: {err}");
        self.program.audit(&format!("Command {command} failed: {err}"));
        Reply::text(format!("❌ Could not save changes: {err}"))
    }

    fn status(&self) -> Reply {
        let state = self.program.snapshot();
        Reply::Embed(
            Embed::new("📊 Training System Status")
                .inline_field("Current Level", state.level)
                .inline_field("Phase", state.phase)
                .inline_field("Promotion", state.promotion)
                .footer(format!("Use {}help to list commands", self.settings.prefix)),
        )
    }
}
