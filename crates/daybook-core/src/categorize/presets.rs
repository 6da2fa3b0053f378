//! Category preset library.
//!
//! Category descriptions, display attributes, intensity guidance and the
//! keyword sets used by every fallback heuristic are defined in
//! `categories.toml` and embedded in the binary at compile time.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::Category;

/// One row of a category's intensity guidance, e.g. `1-3: Light reading`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IntensityBand {
    pub low: u8,
    pub high: u8,
    pub description: String,
}

/// A category definition from the embedded library.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPreset {
    pub name: Category,
    /// What kinds of activity belong here. Shown to the oracle.
    pub description: String,
    /// Display color, `#rrggbb`.
    pub color: String,
    pub icon: String,
    pub bands: Vec<IntensityBand>,
    /// Fallback keywords (lowercase substrings).
    pub keywords: Vec<String>,
}

/// Words that pick the random intensity interval.
#[derive(Debug, Clone, Deserialize)]
pub struct IntensityWords {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

/// A named keyword set that is not an assignable category.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TrendSettings {
    order: Vec<String>,
}

/// Keywords marking a dated activity as a deadline worth counting down to.
#[derive(Debug, Clone, Deserialize)]
pub struct CountdownKeywords {
    pub activity_keywords: Vec<String>,
    pub label_keywords: Vec<String>,
}

/// Container for deserializing the embedded TOML file.
#[derive(Debug, Deserialize)]
pub struct PresetLibrary {
    pub intensity: IntensityWords,
    pub categories: Vec<CategoryPreset>,
    keyword_groups: Vec<KeywordGroup>,
    trends: TrendSettings,
    pub countdown: CountdownKeywords,
}

impl PresetLibrary {
    pub fn category(&self, category: Category) -> Option<&CategoryPreset> {
        self.categories.iter().find(|preset| preset.name == category)
    }

    /// Keywords of a category or keyword group, looked up by name.
    pub fn keywords(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|preset| preset.name.as_str() == name)
            .map(|preset| preset.keywords.as_slice())
            .or_else(|| {
                self.keyword_groups
                    .iter()
                    .find(|group| group.name == name)
                    .map(|group| group.keywords.as_slice())
            })
    }

    /// The trend report's groups, in matching order.
    pub fn trend_groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.trends
            .order
            .iter()
            .filter_map(|name| Some((name.as_str(), self.keywords(name)?)))
    }
}

/// The embedded category presets TOML.
static PRESETS_TOML: &str = include_str!("categories.toml");

static LIBRARY: LazyLock<PresetLibrary> = LazyLock::new(|| {
    toml::from_str(PRESETS_TOML).expect("embedded categories.toml is invalid")
});

/// The preset library, parsed on first use.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. A build that passed its tests
/// has a valid file.
pub fn library() -> &'static PresetLibrary {
    &LIBRARY
}

/// True when `text` (already lowercase) contains any of `keywords`.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_preset() {
        let lib = library();
        for category in Category::ALL {
            let preset = lib.category(category).unwrap();
            assert!(preset.color.starts_with('#'));
            assert_eq!(preset.bands.len(), 4);
            assert!(!preset.keywords.is_empty());
        }
    }

    #[test]
    fn categories_are_in_matching_order() {
        let names: Vec<Category> = library().categories.iter().map(|p| p.name).collect();
        assert_eq!(names, Category::ALL);
    }

    #[test]
    fn trend_groups_resolve_in_order() {
        let names: Vec<&str> = library().trend_groups().map(|(name, _)| name).collect();
        assert_eq!(names, ["study", "exercise", "work", "rest", "social"]);
    }

    #[test]
    fn keyword_lookup_covers_groups() {
        let lib = library();
        assert!(lib.keywords("work").unwrap().iter().any(|k| k == "meeting"));
        assert!(lib.keywords("study").unwrap().iter().any(|k| k == "homework"));
        assert!(lib.keywords("nope").is_none());
    }

    #[test]
    fn keywords_are_lowercase() {
        let lib = library();
        for (_, keywords) in lib.trend_groups() {
            for keyword in keywords {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }
}
