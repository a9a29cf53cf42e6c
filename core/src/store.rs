//! Whole-document JSON persistence.
//!
//! Each entity lives in its own file. Loading never fails: a missing or
//! unreadable document is reported as [`Loaded::Missing`] or
//! [`Loaded::Corrupt`], and [`JsonStore::load_or`] turns both into the
//! caller's default. Saving overwrites the whole document atomically.

use std::{
    fmt, fs, io,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use cohort_utils::{AtomicWriteOptions, atomic_write_with_options, recover_bak_file};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl PersistenceError {
    pub fn path(&self) -> &Path {
        match self {
            PersistenceError::Serialize { path, .. } | PersistenceError::Write { path, .. } => path,
        }
    }
}

/// Result of reading a stored document.
#[derive(Debug, PartialEq, Eq)]
pub enum Loaded<T> {
    Found(T),
    Missing,
    /// The document exists but could not be read or did not match the schema.
    Corrupt(String),
}

pub struct JsonStore<T> {
    path: PathBuf,
    options: AtomicWriteOptions,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for JsonStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: AtomicWriteOptions::default(),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: AtomicWriteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn load(&self) -> Loaded<T> {
        recover_bak_file(&self.path);

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Loaded::Missing,
            Err(e) => return Loaded::Corrupt(e.to_string()),
        };
        match serde_json::from_str(&content) {
            Ok(value) => Loaded::Found(value),
            Err(e) => Loaded::Corrupt(e.to_string()),
        }
    }

    /// Load the document, falling back to `default` on any failure.
    pub fn load_or(&self, default: T) -> T {
        match self.load() {
            Loaded::Found(value) => value,
            Loaded::Missing => {
                tracing::debug!(path = %self.path.display(), "No stored document, starting fresh");
                default
            }
            Loaded::Corrupt(reason) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Stored document is unreadable, starting fresh: {reason}"
                );
                default
            }
        }
    }

    pub fn save(&self, value: &T) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(value).map_err(|source| {
            PersistenceError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        atomic_write_with_options(&self.path, &json, self.options).map_err(write_err)
    }
}
