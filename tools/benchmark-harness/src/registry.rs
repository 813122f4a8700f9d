//! Adapter registry
//!
//! Keeps adapters in registration order so runs and reports are ordered the
//! same way every time.

use crate::adapter::ValidatorAdapter;
use crate::adapters::{BoonAdapter, JsonSchemaAdapter, JsonSchemaValidAdapter};
use crate::{Error, Result};
use std::sync::Arc;

/// Named collection of validator adapters
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn ValidatorAdapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { adapters: Vec::new() }
    }

    /// Registry holding every engine this crate ships an adapter for
    pub fn with_default_adapters() -> Self {
        let adapters: Vec<Arc<dyn ValidatorAdapter>> = vec![
            Arc::new(JsonSchemaAdapter::new()) as Arc<dyn ValidatorAdapter>,
            Arc::new(BoonAdapter::new()) as Arc<dyn ValidatorAdapter>,
            Arc::new(JsonSchemaValidAdapter::new()) as Arc<dyn ValidatorAdapter>,
        ];
        Self { adapters }
    }

    /// Register an adapter
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAdapter`] if the name is already taken
    pub fn register(&mut self, adapter: Arc<dyn ValidatorAdapter>) -> Result<()> {
        if self.get(adapter.name()).is_some() {
            return Err(Error::DuplicateAdapter(adapter.name().to_string()));
        }

        tracing::debug!(adapter = adapter.name(), version = %adapter.version(), "registered adapter");
        self.adapters.push(adapter);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ValidatorAdapter>> {
        self.adapters.iter().find(|a| a.name() == name).cloned()
    }

    /// Adapter names in registration order
    pub fn adapter_names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name().to_string()).collect()
    }

    /// Resolve names to adapters; an empty selection means all of them
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdapterNotFound`] for the first unknown name
    pub fn select(&self, names: &[String]) -> Result<Vec<Arc<dyn ValidatorAdapter>>> {
        if names.is_empty() {
            return Ok(self.adapters.clone());
        }

        names
            .iter()
            .map(|name| self.get(name).ok_or_else(|| Error::AdapterNotFound(name.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
