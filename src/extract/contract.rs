//! The extraction contract
//!
//! `extract` returns either a live, schema-valid result or a schema-valid
//! fallback result. Transport failures, parse failures, and validation
//! failures are logged as warnings and retried up to the bound; the failure
//! itself is never surfaced to the stage caller. This keeps the pipeline
//! live under service outage, missing credentials, or rate limiting while
//! still preferring live extraction quality when available.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::drift::{repair, DriftRule};
use super::recover::json_candidate;
use super::{Extracted, SchemaError, Validate};
use crate::llm::{GenerationClient, Prompt};

/// Knobs for one extraction call.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions<'a> {
    /// Attempts are `0..=max_retries`
    pub max_retries: u32,
    /// Drift-repair table applied when validation fails
    pub drift_rules: &'a [DriftRule],
}

impl Default for ExtractOptions<'_> {
    fn default() -> Self {
        Self {
            max_retries: 2,
            drift_rules: &[],
        }
    }
}

impl<'a> ExtractOptions<'a> {
    pub fn new(max_retries: u32, drift_rules: &'a [DriftRule]) -> Self {
        Self {
            max_retries,
            drift_rules,
        }
    }
}

/// Runs one schema-validated extraction. See module docs for the guarantees.
///
/// With no client configured this goes straight to the fallback producer
/// without touching the network. A fallback that fails its own schema check
/// is a programmer error and panics.
pub async fn extract<T, F>(
    client: Option<&dyn GenerationClient>,
    prompt: &Prompt,
    options: ExtractOptions<'_>,
    fallback: F,
) -> Extracted<T>
where
    T: DeserializeOwned + Validate,
    F: FnOnce() -> T,
{
    if let Some(client) = client {
        for attempt in 0..=options.max_retries {
            let text = match client.generate(prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("extraction attempt {} transport failure: {}", attempt, e);
                    continue;
                }
            };

            let candidate = json_candidate(&text);
            let mut value: Value = match serde_json::from_str(&candidate) {
                Ok(value) => value,
                Err(e) => {
                    warn!("extraction attempt {} returned unparseable JSON: {}", attempt, e);
                    continue;
                }
            };

            match typed::<T>(&value) {
                Ok(result) => {
                    debug!("extraction attempt {} validated", attempt);
                    return Extracted::Live(result);
                }
                Err(first_error) => {
                    if repair(&mut value, options.drift_rules) {
                        if let Ok(result) = typed::<T>(&value) {
                            debug!("extraction attempt {} validated after drift repair", attempt);
                            return Extracted::Live(result);
                        }
                    }
                    warn!(
                        "extraction attempt {} schema-invalid: {}",
                        attempt, first_error
                    );
                }
            }
        }
        warn!("extraction attempts exhausted, using deterministic fallback");
    } else {
        debug!("no generation service configured, using deterministic fallback");
    }

    let value = fallback();
    if let Err(e) = value.validate() {
        panic!("fallback producer yielded a schema-invalid value: {}", e);
    }
    Extracted::Fallback(value)
}

fn typed<T>(value: &Value) -> Result<T, SchemaError>
where
    T: DeserializeOwned + Validate,
{
    let result: T =
        serde_json::from_value(value.clone()).map_err(|e| SchemaError::Shape(e.to_string()))?;
    result.validate()?;
    Ok(result)
}
