//! Whole-file JSON persistence.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use tracing::{debug, error};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::models::{LabelMap, NoteMap};

/// Handle on the notes and labels files of one data directory.
///
/// Each read-modify-write cycle holds an in-process lock, so concurrent
/// requests inside one server do not interleave their writes. Separate
/// processes sharing a directory still race; the last write wins.
#[derive(Debug)]
pub struct JsonStore {
    notes_path: PathBuf,
    labels_path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    /// Open the store described by `config`, creating the data directory.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.data_dir).map_err(|source| StoreError::Io {
            path: config.data_dir.clone(),
            source,
        })?;
        Ok(Self {
            notes_path: config.notes_path(),
            labels_path: config.labels_path(),
            lock: Mutex::new(()),
        })
    }

    pub fn notes_path(&self) -> &Path {
        &self.notes_path
    }

    pub fn labels_path(&self) -> &Path {
        &self.labels_path
    }

    /// Read every note.
    pub fn load_notes(&self) -> Result<NoteMap, StoreError> {
        let _guard = self.guard();
        read_notes(&self.notes_path)
    }

    /// Replace the notes file with `notes`.
    pub fn save_notes(&self, notes: &NoteMap) -> Result<(), StoreError> {
        let _guard = self.guard();
        write_json(&self.notes_path, notes)
    }

    /// Read every label.
    pub fn load_labels(&self) -> Result<LabelMap, StoreError> {
        let _guard = self.guard();
        read_json(&self.labels_path)
    }

    /// Replace the labels file with `labels`.
    pub fn save_labels(&self, labels: &LabelMap) -> Result<(), StoreError> {
        let _guard = self.guard();
        write_json(&self.labels_path, labels)
    }

    /// Run `f` against the notes under the lock and save the result when
    /// `f` succeeds. Nothing is written when `f` fails.
    pub fn modify_notes<T>(
        &self,
        f: impl FnOnce(&mut NoteMap) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.guard();
        let mut notes = read_notes(&self.notes_path)?;
        let out = f(&mut notes)?;
        write_json(&self.notes_path, &notes)?;
        Ok(out)
    }

    /// Label counterpart of [`JsonStore::modify_notes`].
    pub fn modify_labels<T>(
        &self,
        f: impl FnOnce(&mut LabelMap) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.guard();
        let mut labels: LabelMap = read_json(&self.labels_path)?;
        let out = f(&mut labels)?;
        write_json(&self.labels_path, &labels)?;
        Ok(out)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One date's entry in `notes.json`. Older files wrap the list as
/// `{"activities": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredActivities {
    List(Vec<String>),
    Wrapped { activities: Vec<String> },
}

impl From<StoredActivities> for Vec<String> {
    fn from(entry: StoredActivities) -> Self {
        match entry {
            StoredActivities::List(activities) | StoredActivities::Wrapped { activities } => {
                activities
            }
        }
    }
}

fn read_notes(path: &Path) -> Result<NoteMap, StoreError> {
    let stored: BTreeMap<String, StoredActivities> = read_json(path)?;
    Ok(stored
        .into_iter()
        .map(|(date, entry)| (date, entry.into()))
        .collect())
}

/// Read a JSON file. A missing file is empty and so is a file that is not
/// valid JSON, which is logged. Valid JSON of the wrong shape is an error,
/// so the caller never writes over data it could not read.
fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file absent, starting empty");
            return Ok(T::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(value),
        Err(err) if err.classify() == Category::Data => {
            error!(path = %path.display(), error = %err, "store file has an unexpected shape");
            Err(StoreError::Malformed {
                path: path.to_path_buf(),
                source: err,
            })
        }
        Err(err) => {
            error!(
                path = %path.display(),
                error = %err,
                "failed to parse store file, starting with empty data"
            );
            Ok(T::default())
        }
    }
}

/// Write a JSON file by writing a sibling temp file and renaming it over
/// the target.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let contents = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
