//! Compiled-in transformations addressable by `module` and `attribute`.

use std::{
    collections::BTreeMap,
    sync::{Arc, LazyLock},
};

use crate::{error::LoadCause, samples, transformation::Transformation};

/// A shared, resolved transformation.
pub type TransformationRef = Arc<dyn Transformation>;

/// Maps module names to their named transformations.
#[derive(Clone, Default)]
pub struct Registry {
    modules: BTreeMap<String, BTreeMap<String, TransformationRef>>,
}

/// Registry holding the built-in sample transformations.
pub static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::with_builtins);

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in samples registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        samples::register(&mut registry);
        registry
    }

    /// Registers `transformation` as `module:attribute`, replacing any previous entry.
    pub fn register<T>(&mut self, module: &str, attribute: &str, transformation: T) -> &mut Self
    where
        T: Transformation + 'static,
    {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(attribute.to_string(), Arc::new(transformation));
        self
    }

    /// Looks up the transformation registered as `module:attribute`.
    ///
    /// Fails with [`LoadCause::ModuleNotFound`] when nothing was registered
    /// under `module`, and with [`LoadCause::AttributeNotFound`] when the
    /// module exists but lacks `attribute`.
    ///
    /// # Example
    ///
    /// ```
    /// use repodata_transform::Registry;
    ///
    /// let registry = Registry::with_builtins();
    /// assert!(registry.resolve("samples", "hotfix").is_ok());
    /// assert!(registry.resolve("samples", "missing").is_err());
    /// ```
    pub fn resolve(&self, module: &str, attribute: &str) -> Result<TransformationRef, LoadCause> {
        let entries = self
            .modules
            .get(module)
            .ok_or_else(|| LoadCause::ModuleNotFound(module.to_string()))?;

        entries.get(attribute).cloned().ok_or_else(|| {
            LoadCause::AttributeNotFound {
                module: module.to_string(),
                attribute: attribute.to_string(),
            }
        })
    }

    /// Lists every registered reference as `module:attribute`, sorted.
    pub fn references(&self) -> Vec<String> {
        self.modules
            .iter()
            .flat_map(|(module, entries)| {
                entries
                    .keys()
                    .map(move |attribute| format!("{module}:{attribute}"))
            })
            .collect()
    }
}
