//! Validator adapter protocol
//!
//! Every candidate engine signals failure its own way: a `bool`, a `Result`
//! carrying one error, an iterator of errors, or a panic. Adapters translate
//! all of these into one contract:
//!
//! - [`ValidatorAdapter::prepare`] compiles a schema into a
//!   [`PreparedValidator`] or fails with a [`SetupError`];
//! - [`PreparedValidator::check`] turns one instance into a [`Verdict`].
//!
//! A document that does not satisfy the schema is [`Verdict::Invalid`], an
//! ordinary outcome. An engine that could not finish evaluating is
//! [`Verdict::InfraError`]; the runner never counts it as `Invalid`.
//! Engine-specific error types stay inside the adapter modules.

use crate::config::{Draft, ValidatorConfig};
use crate::corpus::Instance;
use crate::fixture::SchemaFixture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Which form of an instance an engine consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputForm {
    /// Serialized text, parsed by the adapter on every check
    Text,
    /// Pre-parsed `serde_json::Value`
    Value,
}

/// Messages an engine produced for a failing document
pub type Diagnostics = Vec<String>;

/// Normalized outcome of validating one instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// The document does not satisfy the schema
    Invalid(Diagnostics),
    /// The engine could not complete evaluation
    InfraError(String),
}

impl Verdict {
    /// Collapse to a boolean; `None` for infrastructure errors
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Verdict::Valid => Some(true),
            Verdict::Invalid(_) => Some(false),
            Verdict::InfraError(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn diagnostics(&self) -> &[String] {
        match self {
            Verdict::Invalid(diagnostics) => diagnostics,
            _ => &[],
        }
    }
}

/// Failure to turn a schema into a usable validator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The engine rejected the schema document
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The engine does not implement the requested draft
    #[error("{engine} does not support {draft}")]
    UnsupportedDraft { engine: String, draft: Draft },

    /// The engine panicked while compiling
    #[error("engine panicked during prepare: {0}")]
    Panicked(String),
}

/// Compiled, engine-specific validator state
///
/// A handle may borrow the schema it was prepared from. It belongs to one
/// benchmark case and is dropped when that case ends.
pub trait PreparedValidator {
    /// Evaluate one instance
    fn check(&self, instance: &Instance) -> Verdict;
}

/// Bridge between one validation engine and the benchmark runner
pub trait ValidatorAdapter {
    /// Unique adapter name (used in case names and on the command line)
    fn name(&self) -> &str;

    /// Version of the underlying engine
    fn version(&self) -> String;

    /// Instance form the engine consumes
    fn input(&self) -> InputForm;

    /// Compile `schema` for repeated checks
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the engine cannot use the schema; this only
    /// aborts the pairing of this schema with this adapter.
    fn prepare<'s>(
        &self,
        schema: &'s SchemaFixture,
        config: &ValidatorConfig,
    ) -> Result<Box<dyn PreparedValidator + 's>, SetupError>;
}

/// Render a panic payload as text
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `prepare`, turning an engine panic into [`SetupError::Panicked`]
pub fn guarded_prepare<'s>(
    adapter: &dyn ValidatorAdapter,
    schema: &'s SchemaFixture,
    config: &ValidatorConfig,
) -> Result<Box<dyn PreparedValidator + 's>, SetupError> {
    match panic::catch_unwind(AssertUnwindSafe(|| adapter.prepare(schema, config))) {
        Ok(result) => result,
        Err(payload) => Err(SetupError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Parsed form of `instance` for value-consuming engines
///
/// # Errors
///
/// Returns the [`Verdict::InfraError`] to report when the instance text never
/// parsed, so no engine can mistake the `Null` placeholder for a document.
pub fn parsed_value(instance: &Instance) -> Result<&Value, Verdict> {
    match instance.parse_error() {
        Some(detail) => Err(Verdict::InfraError(format!("instance is not valid JSON: {detail}"))),
        None => Ok(instance.value()),
    }
}

/// Run `check`, turning an engine panic into [`Verdict::InfraError`]
///
/// Instances without a parsed form are reported as infrastructure errors
/// before the engine is called.
pub fn guarded_check(handle: &dyn PreparedValidator, instance: &Instance) -> Verdict {
    if let Err(verdict) = parsed_value(instance) {
        return verdict;
    }

    match panic::catch_unwind(AssertUnwindSafe(|| handle.check(instance))) {
        Ok(verdict) => verdict,
        Err(payload) => Verdict::InfraError(format!("engine panicked: {}", panic_message(payload.as_ref()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct PanickingValidator;

    impl PreparedValidator for PanickingValidator {
        fn check(&self, _instance: &Instance) -> Verdict {
            panic!("boom at depth 3");
        }
    }

    struct PanickingAdapter;

    impl ValidatorAdapter for PanickingAdapter {
        fn name(&self) -> &str {
            "panicking"
        }

        fn version(&self) -> String {
            "0.0.0".to_string()
        }

        fn input(&self) -> InputForm {
            InputForm::Value
        }

        fn prepare<'s>(
            &self,
            _schema: &'s SchemaFixture,
            _config: &ValidatorConfig,
        ) -> Result<Box<dyn PreparedValidator + 's>, SetupError> {
            panic!("{} cannot compile", self.name());
        }
    }

    struct CountingValidator {
        calls: std::cell::Cell<usize>,
    }

    impl PreparedValidator for CountingValidator {
        fn check(&self, _instance: &Instance) -> Verdict {
            self.calls.set(self.calls.get() + 1);
            Verdict::Invalid(vec![])
        }
    }

    #[test]
    fn test_parsed_value_rejects_unparsed_text() {
        let verdict = parsed_value(&Instance::raw("[1, 2", false)).unwrap_err();
        assert!(matches!(verdict, Verdict::InfraError(ref detail) if detail.contains("not valid JSON")));

        let instance = Instance::new(json!({"event": "x"}), true);
        assert_eq!(parsed_value(&instance).unwrap(), &json!({"event": "x"}));
    }

    #[test]
    fn test_guarded_check_skips_engine_for_unparsed_text() {
        let handle = CountingValidator {
            calls: std::cell::Cell::new(0),
        };

        let verdict = guarded_check(&handle, &Instance::raw("{\"event\": ", false));
        assert!(matches!(verdict, Verdict::InfraError(_)));
        assert_eq!(handle.calls.get(), 0);

        guarded_check(&handle, &Instance::new(json!({}), false));
        assert_eq!(handle.calls.get(), 1);
    }

    #[test]
    fn test_verdict_collapse() {
        assert_eq!(Verdict::Valid.as_bool(), Some(true));
        assert_eq!(Verdict::Invalid(vec![]).as_bool(), Some(false));
        assert_eq!(Verdict::InfraError("x".to_string()).as_bool(), None);
        assert!(!Verdict::InfraError("x".to_string()).is_valid());
    }

    #[test]
    fn test_diagnostics_only_on_invalid() {
        let verdict = Verdict::Invalid(vec!["\"xxx\" is not of type \"number\"".to_string()]);
        assert_eq!(verdict.diagnostics().len(), 1);
        assert!(Verdict::Valid.diagnostics().is_empty());
    }

    #[test]
    fn test_guarded_check_contains_panic() {
        let instance = Instance::new(json!({}), true);
        let verdict = guarded_check(&PanickingValidator, &instance);
        match verdict {
            Verdict::InfraError(detail) => assert!(detail.contains("boom at depth 3")),
            other => panic!("expected InfraError, got {other:?}"),
        }
    }

    #[test]
    fn test_guarded_prepare_contains_panic() {
        let schema = SchemaFixture::realistic();
        let result = guarded_prepare(&PanickingAdapter, &schema, &ValidatorConfig::default());
        match result {
            Err(SetupError::Panicked(message)) => assert_eq!(message, "panicking cannot compile"),
            Err(other) => panic!("expected Panicked, got {other:?}"),
            Ok(_) => panic!("expected setup failure"),
        }
    }

    #[test]
    fn test_unsupported_draft_message() {
        let err = SetupError::UnsupportedDraft {
            engine: "jsonschema_valid".to_string(),
            draft: Draft::Draft202012,
        };
        assert_eq!(err.to_string(), "jsonschema_valid does not support 2020-12");
    }
}
