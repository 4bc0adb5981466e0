//! Ordered parameter collections
//!
//! [`ParameterSet`] keeps parameters in insertion order. For a set produced by
//! a model this is the declaration order of the function signature, and it is
//! the order in which varying parameters receive their slots in the optimizer's
//! flat vector.

use crate::parameters::parameter::{Parameter, ParameterError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Caller-supplied replacement for one parameter of a model
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    /// Replace the value only; bounds and `vary` are kept and the value is clamped
    Value(f64),

    /// Replace the whole entry; the parameter is renamed to the override key
    Spec(Parameter),
}

impl From<f64> for Override {
    fn from(value: f64) -> Self {
        Override::Value(value)
    }
}

impl From<Parameter> for Override {
    fn from(param: Parameter) -> Self {
        Override::Spec(param)
    }
}

/// An ordered name → [`Parameter`] map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Parameter>", into = "Vec<Parameter>")]
pub struct ParameterSet {
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
}

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter at the end of the set
    ///
    /// Fails with `DuplicateParameter` if the name is taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use peakfit_rs::parameters::{Parameter, ParameterSet};
    ///
    /// let mut params = ParameterSet::new();
    /// params.add(Parameter::new("amp", 5.0)).unwrap();
    /// params.add(Parameter::new("cen", 2.0)).unwrap();
    /// assert_eq!(params.names(), vec!["amp", "cen"]);
    /// assert!(params.add(Parameter::new("amp", 1.0)).is_err());
    /// ```
    pub fn add(&mut self, param: Parameter) -> Result<(), ParameterError> {
        if self.index.contains_key(param.name()) {
            return Err(ParameterError::DuplicateParameter {
                name: param.name().to_string(),
            });
        }

        self.index.insert(param.name().to_string(), self.params.len());
        self.params.push(param);
        Ok(())
    }

    /// Build from parameters whose names are already known to be distinct
    pub(crate) fn from_distinct(params: Vec<Parameter>) -> Self {
        let index = params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name().to_string(), i))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(index.len(), params.len());
        Self { params, index }
    }

    /// Add an unbounded varying parameter
    pub fn add_param(&mut self, name: &str, value: f64) -> Result<(), ParameterError> {
        self.add(Parameter::new(name, value))
    }

    /// Add a bounded varying parameter
    pub fn add_param_with_bounds(
        &mut self,
        name: &str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ParameterError> {
        self.add(Parameter::with_bounds(name, value, min, max)?)
    }

    /// Get a parameter by name
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| &self.params[i])
    }

    /// Get a mutable reference to a parameter by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.params[i]),
            None => None,
        }
    }

    /// Whether a parameter with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Remove a parameter, preserving the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        let position = self.index.remove(name)?;
        let param = self.params.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(param)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter names in order
    pub fn names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name().to_string()).collect()
    }

    /// Iterate over the parameters in order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Drop the standard error of every parameter
    pub fn clear_stderr(&mut self) {
        for param in self.params.iter_mut() {
            param.set_stderr(None);
        }
    }

    /// Parameters the optimizer will move, in order
    pub fn varying(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| p.is_free()).collect()
    }

    /// Parameters held constant, in order
    ///
    /// Includes parameters flagged as varying whose bounds have collapsed to a
    /// single point.
    pub fn fixed(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| !p.is_free()).collect()
    }

    /// Ordered `(name, value)` pairs; unset values read as `NaN`
    pub fn values(&self) -> Vec<(String, f64)> {
        self.params
            .iter()
            .map(|p| (p.name().to_string(), p.value()))
            .collect()
    }

    /// Replace known entries with the parameters of `other`
    ///
    /// Every parameter in `other` must already exist in `self`; otherwise the
    /// merge fails with `UnknownParameter` before anything is changed.
    pub fn merge(&mut self, other: &ParameterSet) -> Result<(), ParameterError> {
        if let Some(unknown) = other.iter().find(|p| !self.contains(p.name())) {
            return Err(ParameterError::UnknownParameter {
                name: unknown.name().to_string(),
            });
        }

        for param in other.iter() {
            if let Some(slot) = self.get_mut(param.name()) {
                *slot = param.clone();
            }
        }
        Ok(())
    }

    /// Apply keyword overrides on top of a set of defaults
    ///
    /// # Arguments
    ///
    /// * `defaults` - The set to start from
    /// * `overrides` - `(name, override)` pairs applied in order
    ///
    /// # Returns
    ///
    /// A new set, or `UnknownParameter` if an override names a parameter not
    /// present in `defaults`.
    ///
    /// # Examples
    ///
    /// ```
    /// use peakfit_rs::parameters::{Override, Parameter, ParameterSet};
    ///
    /// let mut defaults = ParameterSet::new();
    /// defaults.add_param_with_bounds("cen", 0.0, -1.0, 1.0).unwrap();
    /// defaults.add_param("wid", 1.0).unwrap();
    ///
    /// let merged = ParameterSet::merge_overrides(
    ///     &defaults,
    ///     &[
    ///         ("cen".to_string(), Override::Value(5.0)),
    ///         ("wid".to_string(), Override::Spec(Parameter::fixed("ignored", 3.0))),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// // bounds survive a bare value, which is clamped
    /// assert_eq!(merged.get("cen").unwrap().value(), 1.0);
    /// // a full spec replaces the entry under the override key
    /// assert!(!merged.get("wid").unwrap().vary());
    /// ```
    pub fn merge_overrides(
        defaults: &ParameterSet,
        overrides: &[(String, Override)],
    ) -> Result<ParameterSet, ParameterError> {
        let mut merged = defaults.clone();

        for (name, entry) in overrides {
            let slot = merged
                .get_mut(name)
                .ok_or_else(|| ParameterError::UnknownParameter { name: name.clone() })?;

            match entry {
                Override::Value(value) => slot.set_value(*value),
                Override::Spec(param) => {
                    let mut param = param.clone();
                    param.set_name(name);
                    *slot = param;
                }
            }
        }

        Ok(merged)
    }

    /// Whether every required name is present
    pub fn is_complete<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|name| self.contains(name.as_ref()))
    }

    /// Save parameters to a JSON file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use peakfit_rs::parameters::ParameterSet;
    ///
    /// let mut params = ParameterSet::new();
    /// params.add_param("amp", 7.0).unwrap();
    /// params.save_json("params.json").unwrap();
    /// ```
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SerializationError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Serialize the set to a JSON string
    pub fn to_json(&self) -> Result<String, SerializationError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    /// Load a set from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SerializationError> {
        let reader = BufReader::new(File::open(path)?);
        let params = serde_json::from_reader(reader)?;
        Ok(params)
    }

    /// Load a set from a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use peakfit_rs::parameters::ParameterSet;
    ///
    /// let json = r#"[
    ///   {"name": "amp", "value": 7.0, "vary": true, "bounds": {"min": 0.0, "max": null}},
    ///   {"name": "cen", "value": 1.3, "vary": false, "bounds": {"min": null, "max": null}}
    /// ]"#;
    ///
    /// let params = ParameterSet::from_json(json).unwrap();
    /// assert_eq!(params.names(), vec!["amp", "cen"]);
    /// assert!(!params.get("cen").unwrap().vary());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        let params = serde_json::from_str(json)?;
        Ok(params)
    }
}

impl TryFrom<Vec<Parameter>> for ParameterSet {
    type Error = ParameterError;

    fn try_from(params: Vec<Parameter>) -> Result<Self, Self::Error> {
        let mut set = ParameterSet::new();
        for mut param in params {
            // stored values may predate a bounds edit
            if param.has_value() {
                param.set_value(param.value());
            }
            set.add(param)?;
        }
        Ok(set)
    }
}

impl From<ParameterSet> for Vec<Parameter> {
    fn from(set: ParameterSet) -> Self {
        set.params
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Error that can occur during serialization/deserialization
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, and also invalid bounds or duplicate names in the data
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
