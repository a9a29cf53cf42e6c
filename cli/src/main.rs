//! Cohort CLI - binary entry point and console transport.
//!
//! ```text
//! main() -> CohortConfig::load() -> init_tracing() -> Dispatcher::from_config()
//!                                                          |
//!                                                          v
//!                                  stdin line -> IncomingMessage -> handle() -> stdout
//! ```
//!
//! Diagnostics go to a log file so they never interleave with replies on
//! stdout. The loop ends on EOF or Ctrl-C.

mod console;

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cohort_config::CohortConfig;
use cohort_engine::{Dispatcher, FileAuditTrail};

use crate::console::ConsoleSession;

/// Training cohort command bot (console transport)
#[derive(Debug, Parser)]
#[command(name = "cohort", version, about, long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to ~/.cohort/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the data directory holding state, grades and the audit trail
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Author id attached to every message
    #[arg(long, default_value = "console")]
    author: String,

    /// Guild id attached to every message (defaults to the configured guild)
    #[arg(long)]
    guild: Option<String>,

    /// Treat the console author as an instructor
    #[arg(long)]
    instructor: bool,
}

fn init_tracing(log_dir: &Path) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file(log_dir);

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No writable log file: stderr keeps stdout clean for replies.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
    for warning in init_warnings {
        tracing::warn!("{warning}");
    }
}

fn open_log_file(log_dir: &Path) -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let candidates = [
        log_dir.join("cohort.log"),
        PathBuf::from(".cohort").join("logs").join("cohort.log"),
    ];
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

async fn run_console(dispatcher: &mut Dispatcher, session: &ConsoleSession) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    tracing::info!("Console closed");
                    break;
                };
                if let Some(reply) = dispatcher.handle(&session.message(&line)) {
                    stdout.write_all(format!("{reply}\n").as_bytes()).await?;
                    stdout.flush().await?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CohortConfig::load(cli.config.as_deref())
        .with_context(|| "failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    init_tracing(&config.storage.log_dir());
    tracing::info!(
        state = %config.storage.state_file.display(),
        grades = %config.storage.grades_file.display(),
        "Storage configured"
    );

    let audit = FileAuditTrail::new(&config.storage.audit_file);
    let mut dispatcher = Dispatcher::from_config(&config, Box::new(audit));
    dispatcher.announce_start("console");

    let session = ConsoleSession {
        author_id: cli.author,
        guild_id: cli.guild.or_else(|| config.guild_id.clone()),
        is_instructor: cli.instructor,
    };

    run_console(&mut dispatcher, &session).await
}
