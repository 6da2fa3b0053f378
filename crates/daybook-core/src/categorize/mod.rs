//! Activity categorization: study, exercise or rest, with an intensity.
//!
//! [`OracleCategorizer`] asks the oracle and parses a fixed reply format;
//! [`KeywordCategorizer`] matches keyword sets from the embedded preset
//! library. Compose them with [`crate::WithFallback`].

pub mod keywords;
pub mod oracle;
pub mod presets;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::oracle::OracleError;

pub use keywords::{KeywordCategorizer, determine_intensity_with, keyword_category};
pub use oracle::{OracleCategorizer, build_categorize_prompt, parse_category_reply};
pub use presets::{CategoryPreset, PresetLibrary, library};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Study,
    Exercise,
    Rest,
}

impl Category {
    /// Every category, in keyword-matching order.
    pub const ALL: [Category; 3] = [Category::Study, Category::Exercise, Category::Rest];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Exercise => "exercise",
            Self::Rest => "rest",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategorizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CategorizeError::UnknownCategory(s.to_owned()))
    }
}

/// Intensity score, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Clamp any integer score into range.
    pub fn clamped(value: u64) -> Self {
        Self(value.clamp(Self::MIN.into(), Self::MAX.into()) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryResult {
    pub category: Category,
    pub intensity: Intensity,
}

impl CategoryResult {
    pub fn new(category: Category, intensity: Intensity) -> Self {
        Self {
            category,
            intensity,
        }
    }
}

#[derive(Debug, Error)]
pub enum CategorizeError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("oracle reply did not contain a category and intensity")]
    Unrecognized { raw: String },

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Assigns a category and intensity to one activity.
#[async_trait]
pub trait Categorizer: Send + Sync {
    async fn categorize(&self, activity: &str) -> Result<CategoryResult, CategorizeError>;
}
