//! Declared function signatures and the arguments passed at evaluation time.

use crate::error::{PeakFitError, Result};
use crate::parameters::ParameterError;
use ndarray::Array1;

/// One argument of a model function.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Argument name
    pub name: String,
    /// Default value, if the function declares one
    pub default: Option<f64>,
}

/// Ordered argument list of a model function.
///
/// The signature stands in for runtime introspection: it lists every argument
/// the function reads, independent variables and parameters alike, in
/// declaration order.
///
/// # Examples
///
/// ```
/// use peakfit_rs::model::Signature;
///
/// let sig = Signature::new()
///     .arg("x")
///     .arg("amp")
///     .arg("cen")
///     .arg_with_default("wid", 1.0);
///
/// assert_eq!(sig.names(), vec!["x", "amp", "cen", "wid"]);
/// assert_eq!(sig.get("wid").unwrap().default, Some(1.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    args: Vec<Argument>,
}

impl Signature {
    /// Create an empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signature with the given argument names and no defaults.
    pub fn from_names(names: &[&str]) -> Self {
        names.iter().fold(Self::new(), |sig, name| sig.arg(name))
    }

    /// Append an argument without a default.
    pub fn arg(mut self, name: &str) -> Self {
        self.args.push(Argument {
            name: name.to_string(),
            default: None,
        });
        self
    }

    /// Append an argument with a default.
    pub fn arg_with_default(mut self, name: &str, default: f64) -> Self {
        self.args.push(Argument {
            name: name.to_string(),
            default: Some(default),
        });
        self
    }

    /// Set the default of an existing argument.
    pub fn with_default(mut self, name: &str, default: f64) -> Result<Self> {
        self.set_default(name, default)?;
        Ok(self)
    }

    pub(crate) fn set_default(&mut self, name: &str, default: f64) -> Result<()> {
        let arg = self
            .args
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| ParameterError::UnknownParameter {
                name: name.to_string(),
            })?;
        arg.default = Some(default);
        Ok(())
    }

    /// Argument names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.args.iter().map(|a| a.name.clone()).collect()
    }

    /// Look up an argument by name.
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.name == name)
    }

    /// Whether the signature has an argument with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over the arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether the signature has no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// First argument name that occurs more than once.
    pub(crate) fn duplicate(&self) -> Option<&str> {
        self.args
            .iter()
            .enumerate()
            .find(|(i, a)| self.args[..*i].iter().any(|b| b.name == a.name))
            .map(|(_, a)| a.name.as_str())
    }
}

/// Named values handed to a model function on each evaluation.
#[derive(Debug, Clone)]
pub struct Arguments<'a> {
    params: Vec<(&'a str, f64)>,
    vars: Vec<(&'a str, &'a Array1<f64>)>,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(params: Vec<(&'a str, f64)>, vars: Vec<(&'a str, &'a Array1<f64>)>) -> Self {
        Self { params, vars }
    }

    /// Value of a parameter.
    pub fn param(&self, name: &str) -> Result<f64> {
        self.params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| PeakFitError::MissingParameter(name.to_string()))
    }

    /// An independent variable.
    pub fn var(&self, name: &str) -> Result<&'a Array1<f64>> {
        self.vars
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| PeakFitError::MissingIndependentVariable(name.to_string()))
    }

    /// All parameter values in order.
    pub fn params(&self) -> &[(&'a str, f64)] {
        &self.params
    }
}
