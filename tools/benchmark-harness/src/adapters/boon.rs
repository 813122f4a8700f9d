//! `boon` crate adapter
//!
//! Works from the serialized instance text: every check parses the bytes
//! first, so the measured cost includes decoding. Text that is not JSON cannot
//! be evaluated at all and is reported as an infrastructure error, never as an
//! invalid document. Schema violations arrive as a single `ValidationError`
//! whose `causes` form a tree; with [`ErrorLimit::All`] the leaves are
//! reported.

use crate::adapter::{InputForm, PreparedValidator, SetupError, ValidatorAdapter, Verdict};
use crate::config::{Draft, ErrorLimit, ValidatorConfig};
use crate::corpus::Instance;
use crate::fixture::SchemaFixture;
use boon::{Compiler, SchemaIndex, Schemas, ValidationError};
use serde_json::Value;

const ENGINE_VERSION: &str = "0.6";

/// Location the schema is registered under; never fetched
const SCHEMA_URL: &str = "https://schemabench.local/schema.json";

fn engine_draft(draft: Draft) -> boon::Draft {
    match draft {
        Draft::Draft4 => boon::Draft::V4,
        Draft::Draft6 => boon::Draft::V6,
        Draft::Draft7 => boon::Draft::V7,
        Draft::Draft201909 => boon::Draft::V2019_09,
        Draft::Draft202012 => boon::Draft::V2020_12,
    }
}

fn collect_leaves(error: &ValidationError<'_, '_>, out: &mut Vec<String>) {
    if error.causes.is_empty() {
        out.push(error.to_string());
        return;
    }
    for cause in &error.causes {
        collect_leaves(cause, out);
    }
}

/// Adapter for the `boon` crate
#[derive(Debug, Default)]
pub struct BoonAdapter;

impl BoonAdapter {
    pub fn new() -> Self {
        Self
    }
}

struct BoonValidator {
    schemas: Schemas,
    index: SchemaIndex,
    error_limit: ErrorLimit,
}

impl PreparedValidator for BoonValidator {
    fn check(&self, instance: &Instance) -> Verdict {
        let value: Value = match serde_json::from_slice(instance.bytes()) {
            Ok(value) => value,
            Err(e) => return Verdict::InfraError(format!("instance is not valid JSON: {e}")),
        };

        match self.schemas.validate(&value, self.index) {
            Ok(()) => Verdict::Valid,
            Err(error) => {
                let diagnostics = match self.error_limit {
                    ErrorLimit::First => vec![error.to_string()],
                    ErrorLimit::All => {
                        let mut leaves = Vec::new();
                        collect_leaves(&error, &mut leaves);
                        leaves
                    }
                };
                Verdict::Invalid(diagnostics)
            }
        }
    }
}

impl ValidatorAdapter for BoonAdapter {
    fn name(&self) -> &str {
        "boon"
    }

    fn version(&self) -> String {
        ENGINE_VERSION.to_string()
    }

    fn input(&self) -> InputForm {
        InputForm::Text
    }

    fn prepare<'s>(
        &self,
        schema: &'s SchemaFixture,
        config: &ValidatorConfig,
    ) -> Result<Box<dyn PreparedValidator + 's>, SetupError> {
        let mut compiler = Compiler::new();
        compiler.set_default_draft(engine_draft(config.draft));
        compiler
            .add_resource(SCHEMA_URL, schema.value().clone())
            .map_err(|e| SetupError::InvalidSchema(e.to_string()))?;

        let mut schemas = Schemas::new();
        let index = compiler
            .compile(SCHEMA_URL, &mut schemas)
            .map_err(|e| SetupError::InvalidSchema(e.to_string()))?;

        Ok(Box::new(BoonValidator {
            schemas,
            index,
            error_limit: config.error_limit,
        }))
    }
}
