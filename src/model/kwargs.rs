//! Keyword arguments of a fit or evaluation call.

use crate::parameters::{Override, Parameter};
use ndarray::Array1;

/// A single keyword argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum KwargValue {
    /// Data for an independent variable
    Array(Array1<f64>),
    /// Initial guess or full specification for a parameter
    Override(Override),
}

/// Ordered keyword arguments.
///
/// Entries are classified when the call is made: names declared as independent
/// variables must carry arrays, every other name must carry an override.
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use peakfit_rs::model::Kwargs;
/// use peakfit_rs::parameters::Parameter;
///
/// let kwargs = Kwargs::new()
///     .var("x", Array1::linspace(-10.0, 10.0, 100))
///     .value("amp", 5.0)
///     .spec("cen", Parameter::new("cen", 2.0).with_min(1.3).unwrap());
/// assert_eq!(kwargs.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kwargs {
    entries: Vec<(String, KwargValue)>,
}

impl Kwargs {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an independent variable.
    pub fn var(mut self, name: &str, data: Array1<f64>) -> Self {
        self.insert(name, KwargValue::Array(data));
        self
    }

    /// Add a bare initial value for a parameter.
    pub fn value(mut self, name: &str, value: f64) -> Self {
        self.insert(name, KwargValue::Override(Override::Value(value)));
        self
    }

    /// Add a full parameter specification.
    pub fn spec(mut self, name: &str, param: Parameter) -> Self {
        self.insert(name, KwargValue::Override(Override::Spec(param)));
        self
    }

    /// Add an entry; a later entry with the same name wins.
    pub fn insert(&mut self, name: &str, value: KwargValue) {
        self.entries.retain(|(n, _)| n != name);
        self.entries.push((name.to_string(), value));
    }

    /// Remove an entry.
    pub fn remove(&mut self, name: &str) -> Option<KwargValue> {
        let position = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Option<&KwargValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KwargValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
