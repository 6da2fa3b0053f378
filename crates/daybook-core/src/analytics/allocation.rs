//! Time allocation across activity categories.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use daybook_store::NoteMap;

use crate::categorize::presets::{IntensityBand, library};
use crate::categorize::{Categorizer, CategorizeError, Category, CategoryResult, Intensity};
use crate::window::WeekWindow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedActivity {
    pub date: String,
    pub activity: String,
    pub category: Category,
    pub intensity: Intensity,
}

/// Display attributes of a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub description: String,
    pub color: String,
    pub icon: String,
    pub scale_range: [u8; 2],
    pub bands: Vec<IntensityBand>,
}

/// One chart row: a category with at least one activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: Category,
    pub count: usize,
    /// Share of all activities, one decimal.
    pub percentage: f64,
    /// One decimal.
    pub average_intensity: f64,
    pub color: String,
    pub icon: String,
    pub scale_range: [u8; 2],
    pub details: Vec<CategorizedActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeAllocation {
    pub total_activities: usize,
    /// Sorted by count, largest first.
    pub chart_data: Vec<CategorySlice>,
    /// Per-category counts for each window date that has notes.
    pub weekly_analysis: BTreeMap<String, BTreeMap<Category, usize>>,
    pub weekly_intensities: BTreeMap<String, BTreeMap<Category, Vec<Intensity>>>,
    pub activity_categories: BTreeMap<Category, CategoryInfo>,
}

/// Display attributes of every category, from the preset library.
pub fn category_info() -> BTreeMap<Category, CategoryInfo> {
    library()
        .categories
        .iter()
        .map(|preset| {
            let info = CategoryInfo {
                description: preset.description.clone(),
                color: preset.color.clone(),
                icon: preset.icon.clone(),
                scale_range: [Intensity::MIN, Intensity::MAX],
                bands: preset.bands.clone(),
            };
            (preset.name, info)
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn empty_counts<T: Default>() -> BTreeMap<Category, T> {
    Category::ALL.into_iter().map(|c| (c, T::default())).collect()
}

/// Categorize every stored activity and summarize the result.
///
/// Each activity is categorized exactly once, sequentially; the weekly view
/// reuses those results.
pub async fn analyze_time_allocation<C: Categorizer + ?Sized>(
    notes: &NoteMap,
    categorizer: &C,
    window: &WeekWindow,
) -> Result<TimeAllocation, CategorizeError> {
    let mut categorized: Vec<CategorizedActivity> = Vec::new();
    for (date, activities) in notes {
        for activity in activities {
            let CategoryResult {
                category,
                intensity,
            } = categorizer.categorize(activity).await?;
            categorized.push(CategorizedActivity {
                date: date.clone(),
                activity: activity.clone(),
                category,
                intensity,
            });
        }
    }
    let total_activities = categorized.len();
    info!(total = total_activities, "categorized activities");

    let mut weekly_analysis = BTreeMap::new();
    let mut weekly_intensities = BTreeMap::new();
    for date in window.dates().iter().filter(|d| notes.contains_key(*d)) {
        let mut counts: BTreeMap<Category, usize> = empty_counts();
        let mut intensities: BTreeMap<Category, Vec<Intensity>> = empty_counts();
        for item in categorized.iter().filter(|item| item.date == *date) {
            *counts.entry(item.category).or_default() += 1;
            intensities
                .entry(item.category)
                .or_default()
                .push(item.intensity);
        }
        weekly_analysis.insert(date.clone(), counts);
        weekly_intensities.insert(date.clone(), intensities);
    }

    let activity_categories = category_info();
    let mut chart_data = Vec::new();
    for (category, info) in &activity_categories {
        let details: Vec<CategorizedActivity> = categorized
            .iter()
            .filter(|item| item.category == *category)
            .cloned()
            .collect();
        if details.is_empty() {
            continue;
        }
        let count = details.len();
        let intensity_sum: u32 = details.iter().map(|d| u32::from(d.intensity.get())).sum();
        chart_data.push(CategorySlice {
            category: *category,
            count,
            percentage: round1(count as f64 / total_activities as f64 * 100.0),
            average_intensity: round1(f64::from(intensity_sum) / count as f64),
            color: info.color.clone(),
            icon: info.icon.clone(),
            scale_range: info.scale_range,
            details,
        });
    }
    chart_data.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(TimeAllocation {
        total_activities,
        chart_data,
        weekly_analysis,
        weekly_intensities,
        activity_categories,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::categorize::KeywordCategorizer;

    fn window() -> WeekWindow {
        WeekWindow::starting(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap())
    }

    #[tokio::test]
    async fn empty_calendar_has_no_chart_rows() {
        let categorizer = KeywordCategorizer::seeded(0);
        let report = analyze_time_allocation(&NoteMap::new(), &categorizer, &window())
            .await
            .unwrap();
        assert_eq!(report.total_activities, 0);
        assert!(report.chart_data.is_empty());
        assert!(report.weekly_analysis.is_empty());
        assert_eq!(report.activity_categories.len(), 3);
    }

    #[tokio::test]
    async fn chart_is_sorted_and_percentages_rounded() {
        let mut notes = NoteMap::new();
        notes.insert(
            "2025-02-03".into(),
            vec!["gym".into(), "swim".into(), "homework".into()],
        );
        notes.insert("2025-01-01".into(), vec!["nap".into()]);

        let categorizer = KeywordCategorizer::seeded(11);
        let report = analyze_time_allocation(&notes, &categorizer, &window())
            .await
            .unwrap();

        assert_eq!(report.total_activities, 4);
        let order: Vec<Category> = report.chart_data.iter().map(|s| s.category).collect();
        assert_eq!(order, [Category::Exercise, Category::Study, Category::Rest]);
        assert_eq!(report.chart_data[0].percentage, 50.0);
        assert_eq!(report.chart_data[0].details.len(), 2);
        assert_eq!(report.chart_data[1].percentage, 25.0);

        // Only window dates with notes appear in the weekly view.
        assert_eq!(report.weekly_analysis.len(), 1);
        let day = &report.weekly_analysis["2025-02-03"];
        assert_eq!(day[&Category::Exercise], 2);
        assert_eq!(day[&Category::Study], 1);
        assert_eq!(day[&Category::Rest], 0);
        assert_eq!(
            report.weekly_intensities["2025-02-03"][&Category::Exercise].len(),
            2
        );
    }

    #[tokio::test]
    async fn averages_are_within_scale() {
        let mut notes = NoteMap::new();
        notes.insert("2025-02-04".into(), vec!["intense run".into(), "light walk".into()]);
        let categorizer = KeywordCategorizer::seeded(2);
        let report = analyze_time_allocation(&notes, &categorizer, &window())
            .await
            .unwrap();
        let avg = report.chart_data[0].average_intensity;
        assert!((1.0..=10.0).contains(&avg));
    }

    #[test]
    fn rounding_to_one_decimal() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
    }
}
