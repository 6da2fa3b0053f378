//! Flat-file persistence for daybook.
//!
//! Notes and date labels live in two pretty-printed JSON files inside a data
//! directory. Every operation reads the whole file and writes the whole file
//! back; [`JsonStore`] serializes those cycles within one process.

pub mod calendar;
pub mod config;
pub mod error;
pub mod file;
pub mod models;
pub mod queries;

pub use config::StoreConfig;
pub use error::StoreError;
pub use file::JsonStore;
pub use models::{DateLabel, DeletionReport, LabelMap, NoteMap};
