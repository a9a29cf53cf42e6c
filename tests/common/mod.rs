//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use cohort_config::CohortConfig;
use cohort_engine::{Dispatcher, FileAuditTrail, IncomingMessage};

pub const GUILD: &str = "guild-1";
pub const INSTRUCTOR: &str = "instructor-1";

/// A bot wired to a throwaway data directory.
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub config: CohortConfig,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// Build from a TOML snippet; storage is always redirected into a temp dir.
    pub fn with_config(toml: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = CohortConfig::from_toml_str(toml, &dir.path().join("config.toml"))
            .expect("config")
            .with_data_dir(dir.path().join("data"));
        let dispatcher = open(&config);
        Self {
            dir,
            config,
            dispatcher,
        }
    }

    /// Drop the running dispatcher and start a new one from disk.
    pub fn restart(&mut self) {
        self.dispatcher = open(&self.config);
    }

    pub fn say(&mut self, content: &str) -> Option<String> {
        let msg = IncomingMessage::new(INSTRUCTOR, content)
            .in_guild(GUILD)
            .from_instructor();
        self.dispatcher.handle(&msg).map(|reply| reply.to_string())
    }

    pub fn say_as(&mut self, msg: IncomingMessage) -> Option<String> {
        self.dispatcher.handle(&msg).map(|reply| reply.to_string())
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.storage.data_dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.config.storage.state_file.clone()
    }

    pub fn grades_file(&self) -> PathBuf {
        self.config.storage.grades_file.clone()
    }

    pub fn audit_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.config.storage.audit_file)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn open(config: &CohortConfig) -> Dispatcher {
    let audit = FileAuditTrail::new(&config.storage.audit_file);
    Dispatcher::from_config(config, Box::new(audit))
}
