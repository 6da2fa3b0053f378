//! The `Oracle` trait -- a narrow text-in, text-out capability.

use async_trait::async_trait;
use thiserror::Error;

/// Failures of a single oracle call.
///
/// Callers treat every variant the same way ("oracle unavailable"); the
/// variants exist for logging.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle request failed: {0}")]
    Request(String),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle returned an empty completion")]
    EmptyCompletion,
}

/// A text-generation service: free-text prompt in, free-text completion out.
///
/// A call is a single attempt. Implementations apply their own timeout and
/// never retry.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Human-readable name for logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Produce a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;
}

#[async_trait]
impl<T: Oracle + ?Sized> Oracle for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        (**self).generate(prompt).await
    }
}

// Compile-time assertion: Oracle must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Oracle) {}
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct EchoOracle;

    #[async_trait]
    impl Oracle for EchoOracle {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
            Ok(prompt.to_owned())
        }
    }

    #[tokio::test]
    async fn oracle_is_usable_as_trait_object() {
        let oracle: Box<dyn Oracle> = Box::new(EchoOracle);
        assert_eq!(oracle.name(), "echo");
        assert_eq!(oracle.generate("hi").await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn arc_forwards_to_inner_oracle() {
        let oracle: Arc<dyn Oracle> = Arc::new(EchoOracle);
        assert_eq!(Oracle::name(&oracle), "echo");
        assert_eq!(oracle.generate("x").await.unwrap(), "x");
    }
}
