//! Shared test utilities for daybook integration tests.
//!
//! - [`TestStore`]: a [`JsonStore`] over a fresh temporary directory that is
//!   removed when the value drops.
//! - [`ScriptedOracle`]: an [`Oracle`] that replays queued replies and
//!   failures and records every prompt it was given.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tempfile::TempDir;

use daybook_core::oracle::{Oracle, OracleError};
use daybook_store::{JsonStore, NoteMap, StoreConfig};

/// A store in its own temporary data directory.
pub struct TestStore {
    dir: TempDir,
    store: JsonStore,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store =
            JsonStore::open(&StoreConfig::new(dir.path())).expect("failed to open test store");
        Self { dir, store }
    }

    /// A store whose notes file already holds `notes`.
    pub fn with_notes(notes: &NoteMap) -> Self {
        let test_store = Self::new();
        test_store
            .store
            .save_notes(notes)
            .expect("failed to seed notes");
        test_store
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a [`NoteMap`] from `(date, [activities])` pairs.
pub fn note_map<const N: usize>(entries: [(&str, &[&str]); N]) -> NoteMap {
    entries
        .into_iter()
        .map(|(date, acts)| {
            (
                date.to_owned(),
                acts.iter().map(|a| (*a).to_owned()).collect(),
            )
        })
        .collect()
}

/// An oracle that answers from a script.
///
/// Each call pops the next scripted outcome; once the script is exhausted
/// every call fails with [`OracleError::Unavailable`].
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    script: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle whose first call returns `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::new().then_reply(reply)
    }

    /// An oracle that returns `reply` for the next `n` calls.
    pub fn repeating(reply: &str, n: usize) -> Self {
        (0..n).fold(Self::new(), |oracle, _| oracle.then_reply(reply))
    }

    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(reply.into()));
        self
    }

    /// Queue a request failure.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        lock(&self.script).push_back(Err(message.into()));
        self
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn calls(&self) -> usize {
        lock(&self.prompts).len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        lock(&self.prompts).push(prompt.to_owned());
        match lock(&self.script).pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(OracleError::Request(message)),
            None => Err(OracleError::Unavailable("script exhausted".to_owned())),
        }
    }
}
