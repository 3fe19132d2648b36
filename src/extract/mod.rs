//! Schema-validated extraction
//!
//! Every stage that depends on the external generation service goes through
//! [`contract::extract`]: prompt dispatch, response-JSON recovery, schema
//! validation, drift repair, bounded retry, and a deterministic fallback.
//! The call never fails from the caller's perspective.

pub mod contract;
pub mod drift;
pub mod recover;

use thiserror::Error;

pub use contract::{extract, ExtractOptions};
pub use drift::{repair, Coercion, DriftRule};

/// Violations of an extraction output schema.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// The JSON did not deserialize into the expected shape at all
    #[error("malformed structure: {0}")]
    Shape(String),
}

/// Structural validation applied after typed deserialization.
///
/// Types used as extraction outputs implement this; the contract re-checks
/// fallback output against the same rules.
pub trait Validate {
    fn validate(&self) -> Result<(), SchemaError>;
}

/// Outcome of one extraction: a live service result or the deterministic
/// fallback. The pipeline unwraps this before results reach end callers, so
/// the distinction stays test-visible only.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Live(T),
    Fallback(T),
}

impl<T> Extracted<T> {
    pub fn into_inner(self) -> T {
        match self {
            Extracted::Live(value) | Extracted::Fallback(value) => value,
        }
    }

    pub fn get(&self) -> &T {
        match self {
            Extracted::Live(value) | Extracted::Fallback(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Extracted::Fallback(_))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Extracted::Live(_))
    }
}
