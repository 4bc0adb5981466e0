//! # Parameter System
//!
//! Named, boundable, fixable parameters and the transform that lets an
//! unconstrained optimizer work with them.
//!
//! ## Core Components
//!
//! - [`Parameter`]: a named value with bounds and a `vary` flag
//! - [`ParameterSet`]: an ordered collection with keyword-style overrides
//! - [`Bounds`] and [`BoundsTransform`]: map bounded values to and from the
//!   optimizer's unconstrained space
//!
//! ## Example Usage
//!
//! ```rust
//! use peakfit_rs::parameters::{Override, Parameter, ParameterSet};
//!
//! let mut params = ParameterSet::new();
//! params.add_param("amp", 5.0).unwrap();
//! params.add_param_with_bounds("wid", 4.0, 0.0, f64::INFINITY).unwrap();
//! params.add(Parameter::fixed("cen", 1.3)).unwrap();
//!
//! assert_eq!(params.varying().len(), 2);
//!
//! let tuned = ParameterSet::merge_overrides(&params, &[("wid".to_string(), Override::Value(-1.0))]).unwrap();
//! assert_eq!(tuned.get("wid").unwrap().value(), 0.0);
//! ```

pub mod bounds;
pub mod parameter;
pub mod parameter_set;

pub use bounds::{Bounds, BoundsError, BoundsTransform};
pub use parameter::{Parameter, ParameterError};
pub use parameter_set::{Override, ParameterSet, SerializationError};
