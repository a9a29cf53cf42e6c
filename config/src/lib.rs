//! Configuration for the Cohort bot.
//!
//! Raw TOML deserialization structs (all `Option`) stay private. [`CohortConfig::load`]
//! resolves them into a validated [`CohortConfig`] at the parse boundary, filling
//! in defaults for anything the file leaves out.
//!
//! ```toml
//! [bot]
//! prefix = "!"
//! guild_id = "${COHORT_GUILD}"
//!
//! [grading]
//! max_score = [15, 18, 20]
//!
//! [storage]
//! data_dir = "~/.cohort"
//! state_file = "state.json"
//! grades_file = "grades.json"
//! audit_file = "audit.log"
//!
//! [access]
//! restrict_mutations = false
//! ```

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use cohort_types::MaxScoreTable;

pub const DEFAULT_PREFIX: char = '!';
const DEFAULT_STATE_FILE: &str = "state.json";
const DEFAULT_GRADES_FILE: &str = "grades.json";
const DEFAULT_AUDIT_FILE: &str = "audit.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config at {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

// ============================================================================
// Raw TOML shape
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    bot: Option<RawBot>,
    grading: Option<RawGrading>,
    storage: Option<RawStorage>,
    access: Option<RawAccess>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBot {
    prefix: Option<String>,
    guild_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawGrading {
    max_score: Option<[u32; 3]>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStorage {
    data_dir: Option<String>,
    state_file: Option<String>,
    grades_file: Option<String>,
    audit_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAccess {
    #[serde(default)]
    restrict_mutations: bool,
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// Where each persisted document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub data_dir: PathBuf,
    pub state_file: PathBuf,
    pub grades_file: PathBuf,
    pub audit_file: PathBuf,
}

impl StoragePaths {
    /// Lay out the default file names under `data_dir`.
    #[must_use]
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            state_file: data_dir.join(DEFAULT_STATE_FILE),
            grades_file: data_dir.join(DEFAULT_GRADES_FILE),
            audit_file: data_dir.join(DEFAULT_AUDIT_FILE),
            data_dir,
        }
    }

    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortConfig {
    /// Single-character command prefix.
    pub prefix: char,
    /// Only messages from this guild are handled. `None` accepts any guild.
    pub guild_id: Option<String>,
    pub max_scores: MaxScoreTable,
    pub storage: StoragePaths,
    /// When set, state-changing commands require the instructor gate.
    pub restrict_mutations: bool,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX,
            guild_id: None,
            max_scores: MaxScoreTable::default(),
            storage: StoragePaths::in_dir(default_data_dir()),
            restrict_mutations: false,
        }
    }
}

impl CohortConfig {
    /// Load configuration from `path`, or from [`CohortConfig::path`] when `None`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.clone(),
                source,
            }
        })?;
        Self::from_toml_str(&content, &path)
    }

    /// Parse and resolve a TOML document. `path` is only used for error reporting
    /// and to anchor a relative `data_dir`.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::resolve(raw, path)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Replace the data directory, re-anchoring any file names that were left
    /// at their defaults.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let rebase = |file: &Path, old_dir: &Path| match file.strip_prefix(old_dir) {
            Ok(rel) => data_dir.join(rel),
            Err(_) => file.to_path_buf(),
        };
        let old = &self.storage.data_dir;
        self.storage = StoragePaths {
            state_file: rebase(&self.storage.state_file, old),
            grades_file: rebase(&self.storage.grades_file, old),
            audit_file: rebase(&self.storage.audit_file, old),
            data_dir,
        };
        self
    }

    fn resolve(raw: RawConfig, path: &Path) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let bot = raw.bot.unwrap_or_default();
        let prefix = match bot.prefix {
            Some(raw_prefix) => parse_prefix(&raw_prefix).ok_or_else(|| {
                invalid(format!(
                    "bot.prefix must be a single non-whitespace character (got {raw_prefix:?})"
                ))
            })?,
            None => DEFAULT_PREFIX,
        };
        let guild_id = bot
            .guild_id
            .map(|id| expand_env_vars(&id).trim().to_string())
            .filter(|id| !id.is_empty());

        let max_scores = raw
            .grading
            .and_then(|g| g.max_score)
            .map_or_else(MaxScoreTable::default, MaxScoreTable::new);

        let storage = raw.storage.unwrap_or_default();
        let data_dir = match storage.data_dir {
            Some(dir) => {
                let dir = expand_home(&expand_env_vars(&dir));
                if dir.is_relative() {
                    path.parent().unwrap_or_else(|| Path::new(".")).join(dir)
                } else {
                    dir
                }
            }
            None => default_data_dir(),
        };
        let file = |name: Option<String>, default: &str| -> Result<PathBuf, ConfigError> {
            let name = name.map_or_else(|| default.to_string(), |n| expand_env_vars(&n));
            if name.trim().is_empty() {
                return Err(invalid(format!("storage file name for {default} is empty")));
            }
            Ok(data_dir.join(expand_home(&name)))
        };
        let storage = StoragePaths {
            state_file: file(storage.state_file, DEFAULT_STATE_FILE)?,
            grades_file: file(storage.grades_file, DEFAULT_GRADES_FILE)?,
            audit_file: file(storage.audit_file, DEFAULT_AUDIT_FILE)?,
            data_dir,
        };

        Ok(Self {
            prefix,
            guild_id,
            max_scores,
            storage,
            restrict_mutations: raw.access.is_some_and(|a| a.restrict_mutations),
        })
    }
}

fn parse_prefix(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Some(c),
        _ => None,
    }
}

/// Replace `${VAR}` references with the variable's value (empty when unset).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }
    out.push_str(rest);

    out
}

fn expand_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(value)
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cohort").join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".cohort"), |home| home.join(".cohort"))
}
