//! Primary/fallback composition for planners and categorizers.

use async_trait::async_trait;
use tracing::warn;

use crate::categorize::{Categorizer, CategorizeError, CategoryResult};
use crate::plan::{PlanDraft, PlanError, Planner};

/// Runs `primary`; when it fails, logs the failure and runs `fallback`.
///
/// Works for any pair of [`Planner`]s or [`Categorizer`]s, so callers hold a
/// single value and never handle oracle failures themselves. The result is
/// only an error when the fallback fails too.
#[derive(Debug, Clone)]
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> WithFallback<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: Planner, F: Planner> Planner for WithFallback<P, F> {
    async fn plan(&self, goal: &str) -> Result<PlanDraft, PlanError> {
        let err = match self.primary.plan(goal).await {
            Ok(draft) => return Ok(draft),
            Err(err) => err,
        };
        warn!(error = %err, "primary planner failed, using fallback plan");

        let mut draft = self.fallback.plan(goal).await?;
        if draft.raw_response.is_none() {
            draft.raw_response = err.raw_response().map(str::to_owned);
        }
        Ok(draft)
    }
}

#[async_trait]
impl<P: Categorizer, F: Categorizer> Categorizer for WithFallback<P, F> {
    async fn categorize(&self, activity: &str) -> Result<CategoryResult, CategorizeError> {
        match self.primary.categorize(activity).await {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(activity = %activity, error = %err, "primary categorizer failed, using fallback");
                self.fallback.categorize(activity).await
            }
        }
    }
}
