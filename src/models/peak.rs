//! Peak models built on the lineshape functions.
//!
//! Every constructor returns a [`Model`] with the single independent variable
//! `x` and defaults `amp = 1`, `cen = 0`, `wid = 1`; mixed shapes add
//! `frac = 0.5` and Pearson VII adds `expon = 1.5`.

use crate::lineshapes;
use crate::error::Result;
use crate::model::{model_fn, Arguments, Model, Signature};
use ndarray::Array1;

fn peak_signature() -> Signature {
    Signature::new()
        .arg("x")
        .arg_with_default("amp", 1.0)
        .arg_with_default("cen", 0.0)
        .arg_with_default("wid", 1.0)
}

fn three_param(name: &str, shape: fn(&Array1<f64>, f64, f64, f64) -> Array1<f64>) -> Model {
    build(name, peak_signature(), move |args| {
        Ok(shape(
            args.var("x")?,
            args.param("amp")?,
            args.param("cen")?,
            args.param("wid")?,
        ))
    })
}

fn four_param(
    name: &str,
    shape: fn(&Array1<f64>, f64, f64, f64, f64) -> Array1<f64>,
    extra: &'static str,
    default: f64,
) -> Model {
    let signature = peak_signature().arg_with_default(extra, default);
    build(name, signature, move |args| {
        Ok(shape(
            args.var("x")?,
            args.param("amp")?,
            args.param("cen")?,
            args.param("wid")?,
            args.param(extra)?,
        ))
    })
}

fn build<F>(name: &str, signature: Signature, func: F) -> Model
where
    F: Fn(&Arguments<'_>) -> Result<Array1<f64>> + Send + Sync + 'static,
{
    Model::assemble(model_fn(func), signature, vec!["x".to_string()]).with_name(name)
}

/// Gaussian peak, `lineshapes::gauss`.
pub fn gaussian_model() -> Model {
    three_param("gauss", lineshapes::gauss)
}

/// Area-normalised gaussian, `lineshapes::gauss_area`.
pub fn gaussian_area_model() -> Model {
    three_param("gauss_area", lineshapes::gauss_area)
}

/// Lorentzian peak, `lineshapes::loren`.
pub fn lorentzian_model() -> Model {
    three_param("loren", lineshapes::loren)
}

/// Area-normalised lorentzian, `lineshapes::loren_area`.
pub fn lorentzian_area_model() -> Model {
    three_param("loren_area", lineshapes::loren_area)
}

/// Pseudo-Voigt peak with mixing fraction `frac`.
pub fn pseudo_voigt_model() -> Model {
    four_param("pvoigt", lineshapes::pvoigt, "frac", 0.5)
}

/// Area-normalised pseudo-Voigt.
pub fn pseudo_voigt_area_model() -> Model {
    four_param("pvoigt_area", lineshapes::pvoigt_area, "frac", 0.5)
}

/// Pearson VII peak with exponent `expon`.
pub fn pearson7_model() -> Model {
    four_param("pearson7", lineshapes::pearson7, "expon", 1.5)
}

/// Area-normalised Pearson VII.
pub fn pearson7_area_model() -> Model {
    four_param("pearson7_area", lineshapes::pearson7_area, "expon", 1.5)
}
