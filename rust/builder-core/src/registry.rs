// rust/builder-core/src/registry.rs

//! Name-keyed table of dataset builder factories.
//!
//! The registry is an ordinary value owned by whoever assembles the run;
//! there is no process-wide instance.

use std::collections::BTreeMap;

use crate::builder::{DatasetBuilder, Vqa2Builder};
use crate::error::{BuilderError, Result};

/// Creates a fresh, unloaded builder.
pub type BuilderFactory = Box<dyn Fn() -> Box<dyn DatasetBuilder> + Send + Sync>;

#[derive(Default)]
pub struct BuilderRegistry {
    factories: BTreeMap<String, BuilderFactory>,
}

impl BuilderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in builders (`"vqa2"`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Vqa2Builder::NAME, || -> Box<dyn DatasetBuilder> {
            Box::new(Vqa2Builder::new())
        });
        registry
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn DatasetBuilder> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            tracing::warn!("Replacing dataset builder registered as '{}'", name);
        }
        self
    }

    /// Creates a new builder registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBuilder` if nothing is registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn DatasetBuilder>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| BuilderError::unknown_builder(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
