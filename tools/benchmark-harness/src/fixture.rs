//! Schema fixtures
//!
//! A [`SchemaFixture`] keeps a JSON Schema in both forms engines consume: the
//! raw serialized text and the parsed `serde_json::Value`. It is built once per
//! benchmark suite and only read afterwards.
//!
//! The built-in [`SchemaFixture::realistic`] schema describes an analytics
//! "Order Completed" event:
//!
//! ```json
//! {
//!   "event": "Order Completed",
//!   "userId": "foobar",
//!   "properties": {
//!     "products": [{ "id": "xxx", "variant": "xxx", "quantity": 5, "price": 3.14 }],
//!     "coupon": "asdf",
//!     "total": 42
//!   }
//! }
//! ```

use crate::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Name of the built-in schema
pub const REALISTIC_SCHEMA_NAME: &str = "realistic";

/// Schema the instance generator is built around
pub const REALISTIC_SCHEMA: &str = r#"{
    "type": "object",
    "required": ["event", "userId", "properties"],
    "properties": {
        "event": {
            "type": "string"
        },
        "userId": {
            "type": "string"
        },
        "properties": {
            "type": "object",
            "required": ["products", "coupon", "total"],
            "properties": {
                "products": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["id", "variant", "quantity", "price"],
                        "properties": {
                            "id": {
                                "type": "string"
                            },
                            "variant": {
                                "type": "string"
                            },
                            "quantity": {
                                "type": "integer"
                            },
                            "price": {
                                "type": "number"
                            }
                        }
                    }
                },
                "coupon": {
                    "type": "string"
                },
                "total": {
                    "type": "number"
                }
            }
        }
    }
}"#;

/// A schema available as text and as a parsed value
#[derive(Debug, Clone)]
pub struct SchemaFixture {
    name: String,
    text: String,
    value: Value,
}

impl SchemaFixture {
    /// Parse a schema from its serialized text
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] if the text is not JSON or the document
    /// is neither an object nor a boolean schema.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let text = text.into();

        let value: Value = serde_json::from_str(&text).map_err(|e| Error::InvalidSchema {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        if !(value.is_object() || value.is_boolean()) {
            return Err(Error::InvalidSchema {
                name,
                reason: "schema must be a JSON object or boolean".to_string(),
            });
        }

        Ok(Self { name, text, value })
    }

    /// Load a schema from a JSON file; the file stem becomes the schema name
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::SchemaNotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(Error::Io)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_text(name, text)
    }

    /// The built-in "Order Completed" event schema
    pub fn realistic() -> Self {
        match Self::from_text(REALISTIC_SCHEMA_NAME, REALISTIC_SCHEMA) {
            Ok(fixture) => fixture,
            Err(e) => panic!("built-in schema is malformed: {e}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw serialized schema, exactly as supplied
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed schema document
    pub fn value(&self) -> &Value {
        &self.value
    }
}
