//! Parameter bounds and the bounds transform
//!
//! This module holds the pure functions that map a physically bounded parameter
//! value onto the unconstrained real line the optimizer searches, and back.
//!
//! Three monotonic bijections are used:
//!
//! - unbounded: identity
//! - one finite bound: exponential, `x = min + exp(y)` or `x = max - exp(y)`
//! - two finite bounds: tangent, `x = min + (max - min) * (atan(y) / pi + 1/2)`
//!
//! A value sitting exactly on a finite bound maps to the signed infinity of the
//! internal space, and the infinities map back onto the bound.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::f64::{INFINITY, NEG_INFINITY};
use thiserror::Error;

/// Relative distance from a bound at which the optimizer is started when a
/// guess sits exactly on that bound.
const BOUNDARY_OFFSET: f64 = 1e-10;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must not be greater than max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Infinite parameter value is not allowed")]
    InfiniteValue,
}

/// Represents the bounds constraints on a parameter
///
/// Always satisfies `min <= max` with neither side NaN; the only way in is
/// through the validating constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min: f64,
    max: f64,
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Bounds", 2)?;

        // JSON has no infinity, an open side is written as null
        let min = if self.min.is_finite() { Some(self.min) } else { None };
        let max = if self.max.is_finite() { Some(self.max) } else { None };
        state.serialize_field("min", &min)?;
        state.serialize_field("max", &max)?;

        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BoundsHelper {
            #[serde(default)]
            min: Option<f64>,

            #[serde(default)]
            max: Option<f64>,
        }

        let helper = BoundsHelper::deserialize(deserializer)?;

        Bounds::new(
            helper.min.unwrap_or(NEG_INFINITY),
            helper.max.unwrap_or(INFINITY),
        )
        .map_err(serde::de::Error::custom)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: NEG_INFINITY,
            max: INFINITY,
        }
    }
}

impl Bounds {
    /// Create a new bounds constraint with min and max values
    ///
    /// `min == max` is accepted: the parameter is then pinned to that value.
    ///
    /// # Examples
    ///
    /// ```
    /// use peakfit_rs::parameters::bounds::Bounds;
    ///
    /// let bounds = Bounds::new(0.0, 10.0).unwrap();
    /// assert_eq!(bounds.min(), 0.0);
    /// assert_eq!(bounds.max(), 10.0);
    /// assert!(Bounds::new(10.0, 0.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        // NaN compares false against everything, reject it explicitly
        if min > max || min.is_nan() || max.is_nan() {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// Create an unbounded constraint (negative infinity to positive infinity)
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Create a bounds constraint with only a minimum value
    ///
    /// Fails for NaN or `+inf`.
    pub fn min_only(min: f64) -> Result<Self, BoundsError> {
        if min == INFINITY {
            return Err(BoundsError::InvalidBounds { min, max: INFINITY });
        }
        Self::new(min, INFINITY)
    }

    /// Create a bounds constraint with only a maximum value
    ///
    /// Fails for NaN or `-inf`.
    pub fn max_only(max: f64) -> Result<Self, BoundsError> {
        if max == NEG_INFINITY {
            return Err(BoundsError::InvalidBounds { min: NEG_INFINITY, max });
        }
        Self::new(NEG_INFINITY, max)
    }

    /// Lower bound, `-inf` when open
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound, `+inf` when open
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Check if a value is within the bounds (inclusive)
    pub fn is_within_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check if the bounds are finite (both min and max are finite)
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check if the parameter is bounded from below
    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    /// Check if the parameter is bounded from above
    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    /// Check if the interval has collapsed to a single point
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Clamp a value to be within the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Maps parameter values between the bounded (external) space and the
/// unconstrained (internal) space seen by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsTransform {
    bounds: Bounds,
}

impl BoundsTransform {
    /// Create a new bounds transform
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// The bounds this transform maps onto
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Transform an internal (unconstrained) value to an external value
    ///
    /// The result always lies within the bounds. `±inf` map onto the
    /// corresponding bound.
    pub fn to_external(&self, internal_value: f64) -> f64 {
        let Bounds { min, max } = self.bounds;

        let external = match (self.bounds.has_lower_bound(), self.bounds.has_upper_bound()) {
            (false, false) => internal_value,
            (true, false) => min + internal_value.exp(),
            (false, true) => max - internal_value.exp(),
            (true, true) => {
                if self.bounds.is_degenerate() {
                    return min;
                }
                let fraction = internal_value.atan() / PI + 0.5;
                min + (max - min) * fraction
            }
        };

        // Rounding in the two-sided map can overshoot max by an ulp
        if self.bounds.has_lower_bound() || self.bounds.has_upper_bound() {
            self.bounds.clamp(external)
        } else {
            external
        }
    }

    /// Transform an external parameter value to an internal value
    ///
    /// Values outside the bounds are clamped first. A value on a finite bound
    /// maps to the matching signed infinity; a degenerate interval maps to 0.
    pub fn to_internal(&self, external_value: f64) -> Result<f64, BoundsError> {
        if !external_value.is_finite() {
            return Err(BoundsError::InfiniteValue);
        }

        let Bounds { min, max } = self.bounds;
        let value = self.bounds.clamp(external_value);

        let internal = match (self.bounds.has_lower_bound(), self.bounds.has_upper_bound()) {
            (false, false) => value,
            // ln(0) is -inf, which is the wanted image of the bound
            (true, false) => (value - min).ln(),
            (false, true) => (max - value).ln(),
            (true, true) => {
                if self.bounds.is_degenerate() {
                    return Ok(0.0);
                }
                if value == min {
                    NEG_INFINITY
                } else if value == max {
                    INFINITY
                } else {
                    let fraction = (value - min) / (max - min);
                    (PI * (fraction - 0.5)).tan()
                }
            }
        };

        Ok(internal)
    }

    /// Internal starting point for the optimizer
    ///
    /// Same as [`to_internal`](Self::to_internal), except that a value on a
    /// finite bound is moved a relative `1e-10` inside the interval so the
    /// starting point is finite.
    pub fn seed(&self, external_value: f64) -> Result<f64, BoundsError> {
        let internal = self.to_internal(external_value)?;
        if internal.is_finite() {
            return Ok(internal);
        }

        let Bounds { min, max } = self.bounds;
        let nudged = if internal < 0.0 {
            // sitting on the lower bound, or on max for an upper-only bound
            if self.bounds.has_lower_bound() {
                min + Self::offset(min, max)
            } else {
                max - Self::offset(max, max)
            }
        } else {
            max - Self::offset(min, max)
        };

        self.to_internal(nudged)
    }

    /// Derivative of the external value with respect to the internal value
    pub fn derivative(&self, internal_value: f64) -> f64 {
        let Bounds { min, max } = self.bounds;
        match (self.bounds.has_lower_bound(), self.bounds.has_upper_bound()) {
            (false, false) => 1.0,
            (true, false) => internal_value.exp(),
            (false, true) => -internal_value.exp(),
            (true, true) => (max - min) / (PI * (1.0 + internal_value * internal_value)),
        }
    }

    fn offset(a: f64, b: f64) -> f64 {
        let scale = if a.is_finite() && b.is_finite() && a != b {
            (b - a).abs()
        } else {
            [a, b]
                .into_iter()
                .filter(|v| v.is_finite())
                .fold(1.0, |acc: f64, v| acc.max(v.abs()))
        };
        scale * BOUNDARY_OFFSET
    }
}
