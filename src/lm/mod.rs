//! Levenberg-Marquardt solver configuration and driver.
//!
//! The iteration is delegated to the `levenberg-marquardt` crate. This module
//! holds the configuration ([`LmConfig`]), the driver ([`LevenbergMarquardt`])
//! and the result type ([`LmResult`]).

pub mod algorithm;
pub mod config;

pub use algorithm::{LevenbergMarquardt, LmResult};
pub use config::LmConfig;
