//! Peak lineshape functions.
//!
//! Pure, element-wise functions of an abscissa array. In every lineshape `wid`
//! is the half-width at half-maximum, so `f(cen ± wid) = f(cen) / 2` for the
//! height-normalised shapes. The `*_area` variants are scaled to unit area per
//! unit `amp`.

use ndarray::Array1;
use statrs::function::gamma::gamma;
use std::f64::consts::{LN_2, PI};

/// Gaussian with peak height `amp`.
///
/// `amp * exp(-ln2 * (x - cen)^2 / wid^2)`
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use peakfit_rs::lineshapes::gauss;
///
/// let y = gauss(&array![1.0, 4.0], 7.0, 1.0, 3.0);
/// assert_eq!(y[0], 7.0);
/// assert!((y[1] - 3.5).abs() < 1e-12);
/// ```
pub fn gauss(x: &Array1<f64>, amp: f64, cen: f64, wid: f64) -> Array1<f64> {
    x.mapv(|x| amp * (-LN_2 * (x - cen).powi(2) / (wid * wid)).exp())
}

/// Lorentzian with peak height `amp`.
///
/// `amp / (1 + ((x - cen) / wid)^2)`
pub fn loren(x: &Array1<f64>, amp: f64, cen: f64, wid: f64) -> Array1<f64> {
    x.mapv(|x| amp / (1.0 + ((x - cen) / wid).powi(2)))
}

/// Gaussian with area `amp`.
pub fn gauss_area(x: &Array1<f64>, amp: f64, cen: f64, wid: f64) -> Array1<f64> {
    let scale = (LN_2 / PI).sqrt() / wid;
    gauss(x, amp, cen, wid) * scale
}

/// Lorentzian with area `amp`.
pub fn loren_area(x: &Array1<f64>, amp: f64, cen: f64, wid: f64) -> Array1<f64> {
    loren(x, amp, cen, wid) / (PI * wid)
}

/// Pseudo-Voigt: `amp * ((1 - frac) * gauss + frac * loren)`, both of unit height.
pub fn pvoigt(x: &Array1<f64>, amp: f64, cen: f64, wid: f64, frac: f64) -> Array1<f64> {
    (gauss(x, 1.0 - frac, cen, wid) + loren(x, frac, cen, wid)) * amp
}

/// Pseudo-Voigt built from the area-normalised gaussian and lorentzian.
pub fn pvoigt_area(x: &Array1<f64>, amp: f64, cen: f64, wid: f64, frac: f64) -> Array1<f64> {
    (gauss_area(x, 1.0 - frac, cen, wid) + loren_area(x, frac, cen, wid)) * amp
}

/// Pearson VII with peak height `amp` and shape exponent `expon`.
///
/// `amp / (1 + ((x - cen) / wid)^2 * (2^(1/expon) - 1))^expon`
///
/// `expon = 1` is a lorentzian; large exponents approach a gaussian.
pub fn pearson7(x: &Array1<f64>, amp: f64, cen: f64, wid: f64, expon: f64) -> Array1<f64> {
    let k = 2f64.powf(1.0 / expon) - 1.0;
    x.mapv(|x| amp / (1.0 + ((x - cen) / wid).powi(2) * k).powf(expon))
}

/// Pearson VII with area `amp`; requires `expon > 0.5` for a finite area.
pub fn pearson7_area(x: &Array1<f64>, amp: f64, cen: f64, wid: f64, expon: f64) -> Array1<f64> {
    let k = 2f64.powf(1.0 / expon) - 1.0;
    let scale = gamma(expon) * k.sqrt() / gamma(expon - 0.5);
    pearson7(x, amp, cen, wid, expon) * (scale / (wid * PI.sqrt()))
}
