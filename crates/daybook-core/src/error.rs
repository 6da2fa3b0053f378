//! Errors surfaced by the service-level operations.

use thiserror::Error;

use daybook_store::StoreError;

use crate::categorize::CategorizeError;
use crate::oracle::OracleError;
use crate::plan::PlanError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected before any oracle call or store access.
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Categorize(#[from] CategorizeError),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
