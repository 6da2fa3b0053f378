//! Text-generation oracle interface.
//!
//! The oracle is the only networked, nondeterministic dependency of the
//! pipeline. Everything that talks to it goes through the [`Oracle`] trait,
//! so tests substitute a scripted implementation and deployments without an
//! API key substitute [`DisabledOracle`].
//!
//! ```text
//! OraclePlanner / OracleCategorizer / assistant
//!     |
//!     v
//! &dyn Oracle --generate(prompt)--> Result<String, OracleError>
//!     |
//!     +-- GeminiOracle   (HTTP)
//!     +-- DisabledOracle (always unavailable)
//! ```

pub mod disabled;
pub mod gemini;
pub mod trait_def;

pub use disabled::DisabledOracle;
pub use gemini::{GeminiConfig, GeminiOracle};
pub use trait_def::{Oracle, OracleError};
