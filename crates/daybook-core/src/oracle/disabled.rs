use async_trait::async_trait;

use super::trait_def::{Oracle, OracleError};

/// An oracle that is never available.
///
/// Used when no API key is configured: plan generation and categorization
/// fall back immediately, and Q&A reports the reason.
#[derive(Debug, Clone)]
pub struct DisabledOracle {
    reason: String,
}

impl DisabledOracle {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for DisabledOracle {
    fn default() -> Self {
        Self::new("no oracle API key configured")
    }
}

#[async_trait]
impl Oracle for DisabledOracle {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, OracleError> {
        Err(OracleError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_unavailable() {
        let oracle = DisabledOracle::default();
        let err = oracle.generate("anything").await.unwrap_err();
        assert!(matches!(err, OracleError::Unavailable(_)));
        assert!(err.to_string().contains("no oracle API key"));
    }
}
