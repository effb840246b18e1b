//! Run a YAML script of function calls against a fresh in-memory store.
//!
//! # Script format
//!
//! ```yaml
//! - function: shopify_configure
//!   args:
//!     shopDomain: demo.myshopify.com
//!     accessToken: shpat_demo
//! - function: shopify_create_product
//!   args: { title: Mug, price: 12, sku: MUG-1, quantity: 4 }
//! - function: sheets_export_inventory
//! ```
//!
//! `args` may be omitted; it is passed as `null`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stockline_core::{FunctionRegistry, InventoryStore};
use stockline_server::seed::{SeedData, SeedError};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while loading or running a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("Step {step} ({function}) failed: {message}")]
    StepFailed {
        step: usize,
        function: String,
        message: String,
    },
}

/// One function call in a script.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub function: String,
    #[serde(default)]
    pub args: Value,
}

/// Result of one step, as printed.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl StepOutcome {
    const fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Parse a script from YAML text. An empty document is an empty script.
///
/// # Errors
///
/// Returns `ScriptError::Yaml` if the text is not a list of steps.
pub fn parse(content: &str) -> Result<Vec<Step>, ScriptError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Run steps in order, stopping at the first failure unless `keep_going`.
///
/// Every step that ran has an outcome, including the failing one.
pub fn execute(registry: &mut FunctionRegistry, steps: &[Step], keep_going: bool) -> Vec<StepOutcome> {
    let mut outcomes = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let number = index + 1;
        let outcome = match registry.call(&step.function, &step.args) {
            Ok(result) => StepOutcome {
                step: number,
                function: step.function.clone(),
                result: Some(result),
                error: None,
                kind: None,
            },
            Err(e) => {
                warn!(step = number, function = %step.function, error = %e, "step failed");
                StepOutcome {
                    step: number,
                    function: step.function.clone(),
                    result: None,
                    error: Some(e.to_string()),
                    kind: Some(e.kind()),
                }
            }
        };

        let failed = outcome.failed();
        outcomes.push(outcome);
        if failed && !keep_going {
            break;
        }
    }

    outcomes
}

/// Load a script (and optional seed file), run it and print each outcome.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded, or if a step failed and
/// `keep_going` is off.
pub async fn run(script: &Path, seed: Option<&Path>, keep_going: bool) -> Result<(), ScriptError> {
    let content = tokio::fs::read_to_string(script)
        .await
        .map_err(|source| ScriptError::Io {
            path: script.display().to_string(),
            source,
        })?;
    let steps = parse(&content)?;
    info!(path = %script.display(), steps = steps.len(), "Loaded script");

    let store = InventoryStore::new();
    if let Some(seed) = seed {
        SeedData::from_file(seed).await?.apply(&store);
    }

    let mut registry = FunctionRegistry::new(store);
    let outcomes = execute(&mut registry, &steps, keep_going);
    for outcome in &outcomes {
        super::print_json(outcome);
    }

    if !keep_going
        && let Some(failed) = outcomes.iter().find(|o| o.failed())
    {
        return Err(ScriptError::StepFailed {
            step: failed.step,
            function: failed.function.clone(),
            message: failed.error.clone().unwrap_or_default(),
        });
    }

    info!(ran = outcomes.len(), "Script finished");
    Ok(())
}
