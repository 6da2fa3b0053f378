//! The `Planner` trait and its two implementations.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::oracle::{Oracle, OracleError};

use super::parser::{DailyPlan, parse_plan};
use super::prompt::build_plan_prompt;
use super::template::fallback_plan;

/// Where the days of a [`PlanDraft`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Oracle,
    Fallback,
}

/// A labelled seven-day plan, not yet mapped onto dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDraft {
    pub source: PlanSource,
    /// The oracle's reply, when there was one (even if it was unusable).
    pub raw_response: Option<String>,
    pub days: DailyPlan,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("oracle reply contained no recognizable day labels")]
    Unparsable { raw: String },
}

impl PlanError {
    /// The reply that failed to parse, if the oracle answered at all.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::Unparsable { raw } => Some(raw),
            Self::Oracle(_) => None,
        }
    }
}

/// Turns a goal into a labelled weekly plan.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, goal: &str) -> Result<PlanDraft, PlanError>;
}

/// Asks an oracle for the plan and parses its reply.
///
/// A reply without any recognizable day line is an error carrying the raw
/// text, so a fallback can still report what the oracle said.
#[derive(Debug, Clone)]
pub struct OraclePlanner<O> {
    oracle: O,
}

impl<O: Oracle> OraclePlanner<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl<O: Oracle> Planner for OraclePlanner<O> {
    async fn plan(&self, goal: &str) -> Result<PlanDraft, PlanError> {
        let prompt = build_plan_prompt(goal);
        let reply = self.oracle.generate(&prompt).await?;
        let preview: String = reply.chars().take(300).collect();
        info!(oracle = self.oracle.name(), preview = %preview, "oracle plan reply received");

        let days = parse_plan(&reply);
        if days.is_empty() {
            return Err(PlanError::Unparsable { raw: reply });
        }
        Ok(PlanDraft {
            source: PlanSource::Oracle,
            raw_response: Some(reply),
            days,
        })
    }
}

/// Deterministic placeholder planner. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePlanner;

#[async_trait]
impl Planner for TemplatePlanner {
    async fn plan(&self, goal: &str) -> Result<PlanDraft, PlanError> {
        Ok(PlanDraft {
            source: PlanSource::Fallback,
            raw_response: None,
            days: fallback_plan(goal),
        })
    }
}
