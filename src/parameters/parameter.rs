//! Parameter definition and implementation
//!
//! A [`Parameter`] is a named scalar with optional bounds and a flag saying
//! whether the optimizer may move it. Values are kept inside the bounds at all
//! times: constructing or setting a value outside `[min, max]` clamps it to the
//! nearest bound rather than failing.

use crate::parameters::bounds::{Bounds, BoundsError, BoundsTransform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Bounds error: {0}")]
    Bounds(#[from] BoundsError),

    #[error("Parameter '{name}' has no default value")]
    MissingDefault { name: String },

    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error("Parameter '{name}' already exists")]
    DuplicateParameter { name: String },
}

/// A named, boundable, fixable model parameter
///
/// The value may be *unset* when the parameter was derived from a function
/// argument that has no default. An unset value reads as `NaN` through
/// [`value`](Parameter::value); use [`try_value`](Parameter::try_value) to get
/// an error instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter
    name: String,

    /// Current value, `None` while unset
    value: Option<f64>,

    /// Whether this parameter can be varied during optimization
    vary: bool,

    /// Minimum and maximum bounds for the parameter value
    bounds: Bounds,

    /// Standard error of the parameter (set after fitting)
    #[serde(default)]
    stderr: Option<f64>,
}

impl Parameter {
    /// Create a new, unbounded, varying parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use peakfit_rs::parameters::parameter::Parameter;
    ///
    /// let param = Parameter::new("amp", 10.0);
    /// assert_eq!(param.name(), "amp");
    /// assert_eq!(param.value(), 10.0);
    /// assert!(param.vary());
    /// ```
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value),
            vary: true,
            bounds: Bounds::default(),
            stderr: None,
        }
    }

    /// Create a new varying parameter with bounds
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter
    /// * `value` - Initial value, clamped into `[min, max]`
    /// * `min` - Minimum allowed value
    /// * `max` - Maximum allowed value
    ///
    /// # Returns
    ///
    /// The parameter, or `ParameterError::Bounds` if `min > max`.
    ///
    /// # Examples
    ///
    /// ```
    /// use peakfit_rs::parameters::parameter::Parameter;
    ///
    /// let param = Parameter::with_bounds("cen", 2.0, 1.3, f64::INFINITY).unwrap();
    /// assert_eq!(param.min(), 1.3);
    ///
    /// // Out-of-range values are clamped, not rejected
    /// let param = Parameter::with_bounds("cen", 0.5, 1.3, f64::INFINITY).unwrap();
    /// assert_eq!(param.value(), 1.3);
    /// ```
    pub fn with_bounds(name: &str, value: f64, min: f64, max: f64) -> Result<Self, ParameterError> {
        let bounds = Bounds::new(min, max)?;

        Ok(Self {
            name: name.to_string(),
            value: Some(bounds.clamp(value)),
            vary: true,
            bounds,
            stderr: None,
        })
    }

    /// Create a parameter held fixed at `value`
    pub fn fixed(name: &str, value: f64) -> Self {
        Self {
            vary: false,
            ..Self::new(name, value)
        }
    }

    /// Create a varying, unbounded parameter with no value
    pub fn unset(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
            vary: true,
            bounds: Bounds::default(),
            stderr: None,
        }
    }

    /// Set the lower bound, keeping the upper one
    pub fn with_min(mut self, min: f64) -> Result<Self, ParameterError> {
        self.set_min(min)?;
        Ok(self)
    }

    /// Set the upper bound, keeping the lower one
    pub fn with_max(mut self, max: f64) -> Result<Self, ParameterError> {
        self.set_max(max)?;
        Ok(self)
    }

    /// Set whether the parameter varies
    pub fn with_vary(mut self, vary: bool) -> Self {
        self.vary = vary;
        self
    }

    /// Get the name of the parameter
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the parameter
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the current value, `NaN` when unset
    pub fn value(&self) -> f64 {
        self.value.unwrap_or(f64::NAN)
    }

    /// Get the current value, failing with `MissingDefault` when unset
    pub fn try_value(&self) -> Result<f64, ParameterError> {
        self.value.ok_or_else(|| ParameterError::MissingDefault {
            name: self.name.clone(),
        })
    }

    /// Whether a value has been assigned
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Set the value, clamping it into the bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use peakfit_rs::parameters::parameter::Parameter;
    ///
    /// let mut param = Parameter::with_bounds("wid", 1.0, 0.0, 5.0).unwrap();
    /// param.set_value(7.5);
    /// assert_eq!(param.value(), 5.0);
    /// ```
    pub fn set_value(&mut self, value: f64) {
        self.value = Some(self.bounds.clamp(value));
    }

    /// Whether this parameter is varied during optimization
    pub fn vary(&self) -> bool {
        self.vary
    }

    /// Set whether this parameter is varied during optimization
    pub fn set_vary(&mut self, vary: bool) {
        self.vary = vary;
    }

    /// Minimum bound
    pub fn min(&self) -> f64 {
        self.bounds.min()
    }

    /// Maximum bound
    pub fn max(&self) -> f64 {
        self.bounds.max()
    }

    /// Set both bounds and re-clamp the current value
    ///
    /// Fails with `ParameterError::Bounds` if `min > max`, leaving the
    /// parameter untouched.
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<(), ParameterError> {
        self.bounds = Bounds::new(min, max)?;
        if let Some(value) = self.value {
            self.value = Some(self.bounds.clamp(value));
        }
        Ok(())
    }

    /// Set the lower bound
    pub fn set_min(&mut self, min: f64) -> Result<(), ParameterError> {
        self.set_bounds(min, self.bounds.max())
    }

    /// Set the upper bound
    pub fn set_max(&mut self, max: f64) -> Result<(), ParameterError> {
        self.set_bounds(self.bounds.min(), max)
    }

    /// Get the bounds
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Standard error from the last fit, if any
    pub fn stderr(&self) -> Option<f64> {
        self.stderr
    }

    /// Set the standard error
    pub fn set_stderr(&mut self, stderr: Option<f64>) {
        self.stderr = stderr;
    }

    /// Whether the optimizer actually moves this parameter
    ///
    /// A parameter with `min == max` has nowhere to go and counts as fixed.
    pub fn is_free(&self) -> bool {
        self.vary && !self.bounds.is_degenerate()
    }

    /// Transform for the bounds of this parameter
    pub fn bounds_transform(&self) -> BoundsTransform {
        BoundsTransform::new(self.bounds)
    }

    /// Current value mapped into the optimizer's unconstrained space
    pub fn to_internal(&self) -> Result<f64, ParameterError> {
        let value = self.try_value()?;
        Ok(self.bounds_transform().to_internal(value)?)
    }

    /// Physical value for an internal optimizer value
    pub fn from_internal(&self, internal_value: f64) -> f64 {
        self.bounds_transform().to_external(internal_value)
    }
}
