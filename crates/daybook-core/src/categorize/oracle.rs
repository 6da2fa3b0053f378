//! Oracle-backed categorization.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::oracle::Oracle;

use super::presets::library;
use super::{Categorizer, CategorizeError, Category, CategoryResult, Intensity};

static CATEGORY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Category:\s*(study|exercise|rest)").expect("category regex is valid")
});
static INTENSITY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Intensity:\s*(\d+)").expect("intensity regex is valid"));

/// Build the categorization prompt for one activity.
///
/// Lists every category with its description and intensity bands, then the
/// required `Category:` / `Intensity:` / `Reason:` reply format.
pub fn build_categorize_prompt(activity: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("Analyze this activity: \"{activity}\"\n\n"));
    prompt.push_str(
        "Categorize it into one of these categories and provide an intensity score (1-10):\n\n",
    );

    for (n, preset) in library().categories.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {}: {}\n",
            n + 1,
            preset.name.as_str().to_uppercase(),
            preset.description
        ));
        for band in &preset.bands {
            prompt.push_str(&format!(
                "   - Intensity {}-{}: {}\n",
                band.low, band.high, band.description
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Respond in this exact format:\n\
         Category: [study/exercise/rest]\n\
         Intensity: [1-10]\n\
         Reason: [brief explanation]\n",
    );
    prompt
}

/// Extract the category and intensity from an oracle reply.
///
/// Both lines must be present. Out-of-range intensities are clamped.
pub fn parse_category_reply(reply: &str) -> Option<CategoryResult> {
    let category: Category = CATEGORY_LINE.captures(reply)?[1].parse().ok()?;
    let digits = &INTENSITY_LINE.captures(reply)?[1];
    // Only overflow can fail here; such a score is above the maximum anyway.
    let score = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(CategoryResult::new(category, Intensity::clamped(score)))
}

/// Categorizes by asking an oracle.
#[derive(Debug, Clone)]
pub struct OracleCategorizer<O> {
    oracle: O,
}

impl<O: Oracle> OracleCategorizer<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl<O: Oracle> Categorizer for OracleCategorizer<O> {
    async fn categorize(&self, activity: &str) -> Result<CategoryResult, CategorizeError> {
        let reply = self
            .oracle
            .generate(&build_categorize_prompt(activity))
            .await?;
        let result = parse_category_reply(reply.trim())
            .ok_or_else(|| CategorizeError::Unrecognized { raw: reply.clone() })?;
        debug!(activity = %activity, category = %result.category, intensity = result.intensity.get(), "oracle categorized activity");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{DisabledOracle, OracleError};

    #[test]
    fn reply_with_overflowing_intensity_is_clamped() {
        let result =
            parse_category_reply("Category: exercise\nIntensity: 12\nReason: hard workout").unwrap();
        assert_eq!(result.category, Category::Exercise);
        assert_eq!(result.intensity.get(), 10);
    }

    #[test]
    fn reply_matching_is_case_insensitive() {
        let result = parse_category_reply("category: STUDY\nintensity: 0").unwrap();
        assert_eq!(result.category, Category::Study);
        assert_eq!(result.intensity.get(), 1);
    }

    #[test]
    fn huge_intensity_does_not_fail() {
        let result =
            parse_category_reply("Category: rest\nIntensity: 99999999999999999999999").unwrap();
        assert_eq!(result.intensity.get(), 10);
    }

    #[test]
    fn incomplete_reply_is_rejected() {
        assert!(parse_category_reply("Category: rest").is_none());
        assert!(parse_category_reply("Intensity: 4").is_none());
        assert!(parse_category_reply("Category: work\nIntensity: 4").is_none());
    }

    #[test]
    fn prompt_lists_categories_and_format() {
        let prompt = build_categorize_prompt("evening yoga");
        assert!(prompt.contains("\"evening yoga\""));
        assert!(prompt.contains("1. STUDY: Academic learning"));
        assert!(prompt.contains("2. EXERCISE:"));
        assert!(prompt.contains("3. REST:"));
        assert!(prompt.contains("   - Intensity 9-10: Marathon training, competitive sports"));
        assert!(prompt.contains("Category: [study/exercise/rest]"));
    }

    #[tokio::test]
    async fn oracle_failure_is_an_error() {
        let categorizer = OracleCategorizer::new(DisabledOracle::default());
        let err = categorizer.categorize("jog").await.unwrap_err();
        assert!(matches!(err, CategorizeError::Oracle(OracleError::Unavailable(_))));
    }
}
