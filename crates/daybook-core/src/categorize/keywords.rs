//! Keyword-based categorization, used when the oracle gives nothing usable.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::presets::{contains_any, library};
use super::{Categorizer, CategorizeError, Category, CategoryResult, Intensity};

/// Intensity given to activities that match no keyword set.
const UNMATCHED_INTENSITY: u8 = 3;

/// The first category whose keyword set matches, in preset order.
pub fn keyword_category(activity: &str) -> Option<Category> {
    let lowered = activity.to_lowercase();
    library()
        .categories
        .iter()
        .find(|preset| contains_any(&lowered, &preset.keywords))
        .map(|preset| preset.name)
}

/// Draw an intensity for `activity` from the interval its wording suggests.
///
/// High-effort words give 7..=10, routine words 4..=6, light words 1..=3,
/// and anything else 4..=6.
pub fn determine_intensity_with<R: Rng>(rng: &mut R, activity: &str) -> Intensity {
    let lowered = activity.to_lowercase();
    let words = &library().intensity;
    let range = if contains_any(&lowered, &words.high) {
        7..=10
    } else if contains_any(&lowered, &words.medium) {
        4..=6
    } else if contains_any(&lowered, &words.low) {
        1..=3
    } else {
        4..=6
    };
    Intensity::clamped(rng.random_range(range))
}

/// Categorizes by keyword match. Never fails.
///
/// Unmatched activities are `rest` with intensity 3. The RNG drawing
/// matched intensities can be seeded for reproducible output.
#[derive(Debug)]
pub struct KeywordCategorizer<R = StdRng> {
    rng: Mutex<R>,
}

impl KeywordCategorizer<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for KeywordCategorizer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng + Send> KeywordCategorizer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Synchronous form of [`Categorizer::categorize`].
    pub fn categorize_now(&self, activity: &str) -> CategoryResult {
        let Some(category) = keyword_category(activity) else {
            let intensity = Intensity::clamped(UNMATCHED_INTENSITY.into());
            return CategoryResult::new(Category::Rest, intensity);
        };
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        CategoryResult::new(category, determine_intensity_with(&mut *rng, activity))
    }
}

#[async_trait]
impl<R: Rng + Send> Categorizer for KeywordCategorizer<R> {
    async fn categorize(&self, activity: &str) -> Result<CategoryResult, CategorizeError> {
        Ok(self.categorize_now(activity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_wins_over_exercise() {
        // "reading" hits study; "walk" would hit exercise.
        assert_eq!(keyword_category("Reading on a walk"), Some(Category::Study));
    }

    #[test]
    fn keyword_matching_is_substring_and_case_insensitive() {
        assert_eq!(keyword_category("Light JOG"), Some(Category::Exercise));
        assert_eq!(keyword_category("afternoon nap"), Some(Category::Rest));
        assert_eq!(keyword_category("groceries"), None);
    }

    #[test]
    fn light_jog_is_low_intensity_exercise() {
        let categorizer = KeywordCategorizer::seeded(7);
        for _ in 0..50 {
            let result = categorizer.categorize_now("light jog");
            assert_eq!(result.category, Category::Exercise);
            assert!((1..=3).contains(&result.intensity.get()));
        }
    }

    #[test]
    fn unmatched_activity_is_rest_at_three() {
        let result = KeywordCategorizer::seeded(1).categorize_now("buy groceries");
        assert_eq!(result, CategoryResult::new(Category::Rest, Intensity::clamped(3)));
    }

    #[test]
    fn intensity_intervals_follow_wording() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let hard = determine_intensity_with(&mut rng, "Intense exam prep").get();
            assert!((7..=10).contains(&hard));
            let routine = determine_intensity_with(&mut rng, "daily reading").get();
            assert!((4..=6).contains(&routine));
            let plain = determine_intensity_with(&mut rng, "reading").get();
            assert!((4..=6).contains(&plain));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = KeywordCategorizer::seeded(9);
        let b = KeywordCategorizer::seeded(9);
        for activity in ["gym", "study", "nap", "hard run"] {
            assert_eq!(a.categorize_now(activity), b.categorize_now(activity));
        }
    }

    #[tokio::test]
    async fn async_path_never_fails() {
        let result = KeywordCategorizer::seeded(3).categorize("swim").await.unwrap();
        assert_eq!(result.category, Category::Exercise);
    }
}
