//! `jsonschema` crate adapter
//!
//! Consumes pre-parsed values. With [`ErrorLimit::First`] it uses the engine's
//! boolean `is_valid` fast path; with [`ErrorLimit::All`] it walks
//! `iter_errors` and keeps every message.

use crate::adapter::{InputForm, PreparedValidator, SetupError, ValidatorAdapter, Verdict, parsed_value};
use crate::config::{Draft, ErrorLimit, ValidatorConfig};
use crate::corpus::Instance;
use crate::fixture::SchemaFixture;
use jsonschema::Validator;

const ENGINE_VERSION: &str = "0.28";

fn engine_draft(draft: Draft) -> jsonschema::Draft {
    match draft {
        Draft::Draft4 => jsonschema::Draft::Draft4,
        Draft::Draft6 => jsonschema::Draft::Draft6,
        Draft::Draft7 => jsonschema::Draft::Draft7,
        Draft::Draft201909 => jsonschema::Draft::Draft201909,
        Draft::Draft202012 => jsonschema::Draft::Draft202012,
    }
}

/// Adapter for the `jsonschema` crate
#[derive(Debug, Default)]
pub struct JsonSchemaAdapter;

impl JsonSchemaAdapter {
    pub fn new() -> Self {
        Self
    }
}

struct JsonSchemaValidator {
    validator: Validator,
    error_limit: ErrorLimit,
}

impl PreparedValidator for JsonSchemaValidator {
    fn check(&self, instance: &Instance) -> Verdict {
        let value = match parsed_value(instance) {
            Ok(value) => value,
            Err(verdict) => return verdict,
        };

        match self.error_limit {
            ErrorLimit::First => {
                if self.validator.is_valid(value) {
                    Verdict::Valid
                } else {
                    Verdict::Invalid(Vec::new())
                }
            }
            ErrorLimit::All => {
                let errors: Vec<String> = self
                    .validator
                    .iter_errors(value)
                    .map(|error| format!("{}: {}", error.instance_path, error))
                    .collect();

                if errors.is_empty() {
                    Verdict::Valid
                } else {
                    Verdict::Invalid(errors)
                }
            }
        }
    }
}

impl ValidatorAdapter for JsonSchemaAdapter {
    fn name(&self) -> &str {
        "jsonschema"
    }

    fn version(&self) -> String {
        ENGINE_VERSION.to_string()
    }

    fn input(&self) -> InputForm {
        InputForm::Value
    }

    fn prepare<'s>(
        &self,
        schema: &'s SchemaFixture,
        config: &ValidatorConfig,
    ) -> Result<Box<dyn PreparedValidator + 's>, SetupError> {
        let mut opts = jsonschema::options();
        opts.with_draft(engine_draft(config.draft));

        let validator = opts
            .build(schema.value())
            .map_err(|e| SetupError::InvalidSchema(e.to_string()))?;

        Ok(Box::new(JsonSchemaValidator {
            validator,
            error_limit: config.error_limit,
        }))
    }
}
