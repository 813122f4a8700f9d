//! `jsonschema_valid` crate adapter
//!
//! The engine returns `Err(ErrorIterator)` for failing documents and borrows
//! the schema for the lifetime of its `Config`, so handles from this adapter
//! live no longer than the fixture they were prepared from. Only drafts 4, 6
//! and 7 are implemented by the engine.

use crate::adapter::{InputForm, PreparedValidator, SetupError, ValidatorAdapter, Verdict, parsed_value};
use crate::config::{Draft, ErrorLimit, ValidatorConfig};
use crate::corpus::Instance;
use crate::fixture::SchemaFixture;
use jsonschema_valid::{Config, schemas};

const ENGINE_VERSION: &str = "0.5";

/// Adapter for the `jsonschema_valid` crate
#[derive(Debug, Default)]
pub struct JsonSchemaValidAdapter;

impl JsonSchemaValidAdapter {
    pub fn new() -> Self {
        Self
    }

    fn engine_draft(&self, draft: Draft) -> Result<schemas::Draft, SetupError> {
        match draft {
            Draft::Draft4 => Ok(schemas::Draft::Draft4),
            Draft::Draft6 => Ok(schemas::Draft::Draft6),
            Draft::Draft7 => Ok(schemas::Draft::Draft7),
            other => Err(SetupError::UnsupportedDraft {
                engine: self.name().to_string(),
                draft: other,
            }),
        }
    }
}

struct JsonSchemaValidValidator<'s> {
    config: Config<'s>,
    error_limit: ErrorLimit,
}

impl PreparedValidator for JsonSchemaValidValidator<'_> {
    fn check(&self, instance: &Instance) -> Verdict {
        let value = match parsed_value(instance) {
            Ok(value) => value,
            Err(verdict) => return verdict,
        };

        match jsonschema_valid::validate(&self.config, value) {
            Ok(()) => Verdict::Valid,
            Err(errors) => {
                let limit = match self.error_limit {
                    ErrorLimit::First => 1,
                    ErrorLimit::All => usize::MAX,
                };
                Verdict::Invalid(errors.take(limit).map(|e| e.to_string()).collect())
            }
        }
    }
}

impl ValidatorAdapter for JsonSchemaValidAdapter {
    fn name(&self) -> &str {
        "jsonschema_valid"
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
        let draft = self.engine_draft(config.draft)?;

        let engine_config =
            Config::from_schema(schema.value(), Some(draft)).map_err(|e| SetupError::InvalidSchema(e.to_string()))?;

        if let Err(errors) = engine_config.validate_schema() {
            let messages: Vec<String> = errors.map(|e| e.to_string()).collect();
            return Err(SetupError::InvalidSchema(messages.join("; ")));
        }

        Ok(Box::new(JsonSchemaValidValidator {
            config: engine_config,
            error_limit: config.error_limit,
        }))
    }
}
