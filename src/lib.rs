//! # peakfit-rs
//!
//! `peakfit-rs` fits closed-form model functions such as peak lineshapes to
//! data by nonlinear least squares, using named parameters that can be
//! bounded or held fixed instead of a positional parameter vector.
//!
//! The library provides:
//! - [`Model`]: a function plus its declared [`Signature`], fitted with keyword
//!   guesses or a [`ParameterSet`]
//! - A parameter system with bounds, fixing and JSON persistence
//! - Standard errors and correlations from the covariance at the solution
//! - Peak lineshapes and a [`ModelRegistry`] of builtin peak models
//!
//! The iteration itself is delegated to the `levenberg-marquardt` crate.
//!
//! ## Basic Usage
//!
//! ```
//! use ndarray::Array1;
//! use peakfit_rs::lineshapes::gauss;
//! use peakfit_rs::{Kwargs, Parameter};
//! use peakfit_rs::models::gaussian_model;
//!
//! let x = Array1::linspace(-10.0, 10.0, 401);
//! let data = gauss(&x, 7.0, 1.0, 3.0);
//!
//! let kwargs = Kwargs::new()
//!     .var("x", x)
//!     .value("amp", 5.0)
//!     .spec("cen", Parameter::new("cen", 2.0).with_min(1.3).unwrap())
//!     .value("wid", 4.0);
//!
//! let result = gaussian_model().fit(&data, None, &kwargs).unwrap();
//! assert!(result.value("cen").unwrap() >= 1.3);
//! println!("{}", result);
//! ```

pub mod error;
pub mod lineshapes;
pub mod lm;
pub mod model;
pub mod models;
pub mod parameters;
pub mod problem;
pub mod uncertainty;
pub mod utils;

// Re-exports for convenience
pub use error::{PeakFitError, Result};
pub use lm::{LevenbergMarquardt, LmConfig};
pub use model::{FitResult, Kwargs, Model, Signature};
pub use models::ModelRegistry;
pub use parameters::{Override, Parameter, ParameterSet};
pub use problem::Problem;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
