//! Typed persistence for the two sides of the protocol.
//!
//! The traits are the seam: protocol logic only ever sees `load`/`save`, so
//! the flat files can move to a real key-value store without touching the
//! gate or the client session. Both file formats are rewritten whole on every
//! save — the client's sequence file on every pop, the server's expectation
//! file on every accept.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StoreError;
use crate::otp::Otp;

/// The client's ordered password sequence.
pub trait SequenceStore {
    /// Load the full sequence, in consumption order.
    fn load(&self) -> Result<Vec<Otp>, StoreError>;

    /// Replace the persisted sequence.
    fn save(&self, passwords: &[Otp]) -> Result<(), StoreError>;
}

/// The server's single expected token.
pub trait ExpectationStore {
    /// Load the current expectation.
    fn load(&self) -> Result<Otp, StoreError>;

    /// Replace the persisted expectation.
    fn save(&self, expected: &Otp) -> Result<(), StoreError>;
}

/// Writes the whole file to a sibling temp path, then renames it into place.
/// A crash mid-write leaves the old contents intact.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|source| StoreError::Write { path: path.to_owned(), source })
}

/// File-backed [`SequenceStore`]: a JSON array of token strings.
#[derive(Debug, Clone)]
pub struct FileSequenceStore {
    path: PathBuf,
}

impl FileSequenceStore {
    /// Create a store over the given file path. The file is not touched until
    /// the first `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SequenceStore for FileSequenceStore {
    fn load(&self) -> Result<Vec<Otp>, StoreError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|source| StoreError::Read { path: self.path.clone(), source })?;
        serde_json::from_str(&text)
            .map_err(|e| StoreError::Malformed { path: self.path.clone(), reason: e.to_string() })
    }

    fn save(&self, passwords: &[Otp]) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(passwords)
            .map_err(|e| StoreError::Malformed { path: self.path.clone(), reason: e.to_string() })?;
        write_atomic(&self.path, text.as_bytes())
    }
}

/// File-backed [`ExpectationStore`]: a single line holding the token.
#[derive(Debug, Clone)]
pub struct FileExpectationStore {
    path: PathBuf,
}

impl FileExpectationStore {
    /// Create a store over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExpectationStore for FileExpectationStore {
    fn load(&self) -> Result<Otp, StoreError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|source| StoreError::Read { path: self.path.clone(), source })?;
        let line = text.lines().next().unwrap_or("").trim_end_matches('\r');
        if line.is_empty() {
            return Err(StoreError::Malformed {
                path: self.path.clone(),
                reason: "expected a single token line".to_owned(),
            });
        }
        Ok(Otp::from(line))
    }

    fn save(&self, expected: &Otp) -> Result<(), StoreError> {
        write_atomic(&self.path, format!("{expected}\n").as_bytes())
    }
}

/// In-memory [`ExpectationStore`] for tests and embedding.
#[derive(Debug)]
pub struct MemoryExpectationStore {
    expected: Mutex<Otp>,
}

impl MemoryExpectationStore {
    /// Create a store holding the given initial expectation.
    pub fn new(expected: Otp) -> Self {
        Self { expected: Mutex::new(expected) }
    }
}

impl ExpectationStore for MemoryExpectationStore {
    fn load(&self) -> Result<Otp, StoreError> {
        Ok(self.expected.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, expected: &Otp) -> Result<(), StoreError> {
        *self.expected.lock().unwrap_or_else(PoisonError::into_inner) = expected.clone();
        Ok(())
    }
}
