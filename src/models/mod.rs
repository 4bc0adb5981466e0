//! Built-in lineshape models and a registry to look them up by name.
//!
//! There is no process-wide registry: callers build a [`ModelRegistry`] and
//! register what they need. [`ModelRegistry::with_lineshapes`] pre-registers
//! the builtin peak models under their lineshape names.

mod peak;

pub use peak::{
    gaussian_area_model, gaussian_model, lorentzian_area_model, lorentzian_model,
    pearson7_area_model, pearson7_model, pseudo_voigt_area_model, pseudo_voigt_model,
};

use crate::error::{PeakFitError, Result};
use crate::model::Model;
use std::collections::BTreeMap;

/// Name → [`Model`] lookup table.
///
/// # Examples
///
/// ```
/// use peakfit_rs::models::ModelRegistry;
///
/// let registry = ModelRegistry::with_lineshapes();
/// assert!(registry.contains("gauss"));
/// assert_eq!(registry.get("pvoigt").unwrap().param_names().len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Model>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the builtin peak models.
    pub fn with_lineshapes() -> Self {
        let mut registry = Self::new();
        for model in [
            gaussian_model(),
            gaussian_area_model(),
            lorentzian_model(),
            lorentzian_area_model(),
            pseudo_voigt_model(),
            pseudo_voigt_area_model(),
            pearson7_model(),
            pearson7_area_model(),
        ] {
            let name = model.name().to_string();
            registry.models.insert(name, model);
        }
        registry
    }

    /// Register a model; fails with `InvalidInput` if the name is taken.
    pub fn register(&mut self, name: &str, model: Model) -> Result<()> {
        if self.models.contains_key(name) {
            return Err(PeakFitError::InvalidInput(format!(
                "A model named '{}' is already registered",
                name
            )));
        }
        self.models.insert(name.to_string(), model);
        Ok(())
    }

    /// Look up a model.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Remove a model.
    pub fn remove(&mut self, name: &str) -> Option<Model> {
        self.models.remove(name)
    }

    /// Whether a model is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
