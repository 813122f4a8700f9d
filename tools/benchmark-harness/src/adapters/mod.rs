//! Validation engine adapters
//!
//! One module per candidate engine. Each implements
//! [`ValidatorAdapter`](crate::adapter::ValidatorAdapter) and keeps the
//! engine's own error types private.

pub mod boon;
pub mod jsonschema;
pub mod jsonschema_valid;

pub use self::boon::BoonAdapter;
pub use self::jsonschema::JsonSchemaAdapter;
pub use self::jsonschema_valid::JsonSchemaValidAdapter;
