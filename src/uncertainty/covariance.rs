//! # Covariance Matrix Calculations
//!
//! Functions for estimating the parameter covariance matrix from the Jacobian
//! at a least-squares solution.

use crate::utils::matrix_convert::{nalgebra_to_ndarray, ndarray_to_nalgebra};
use ndarray::Array2;

/// Calculate covariance matrix from Jacobian matrix.
///
/// For nonlinear least-squares problems, the covariance matrix is estimated as:
///   covar = redchi * inv(J^T * J)
/// where:
///   - J is the Jacobian matrix
///   - redchi is the reduced chi-square (chi^2 / nfree)
///
/// Returns `None` if `J^T * J` cannot be inverted or the inverse is not finite.
pub fn calculate_covariance(jacobian: &Array2<f64>, redchi: f64) -> Option<Array2<f64>> {
    if jacobian.ncols() == 0 {
        return None;
    }

    let jtj = ndarray_to_nalgebra(&jacobian.t().dot(jacobian));
    let inverse = jtj.try_inverse()?;

    let covar = nalgebra_to_ndarray(&inverse) * redchi;
    if covar.iter().all(|v| v.is_finite()) {
        Some(covar)
    } else {
        None
    }
}

/// Calculate correlation matrix from covariance matrix.
///
/// This normalizes the covariance matrix so that diagonal elements are 1.0,
/// and off-diagonal elements represent correlation coefficients between -1 and 1.
pub fn calculate_correlation(covar: &Array2<f64>) -> Array2<f64> {
    let n = covar.nrows();
    let mut correl = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..n {
            if i == j {
                correl[[i, j]] = 1.0;
            } else {
                let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
                if denom > 0.0 {
                    correl[[i, j]] = covar[[i, j]] / denom;
                }
            }
        }
    }

    correl
}

/// Extract standard errors from the covariance matrix.
///
/// Standard errors are the square roots of the diagonal elements; a negative
/// or non-finite diagonal element yields `None`.
pub fn standard_errors_from_covariance(covar: &Array2<f64>) -> Vec<Option<f64>> {
    covar
        .diag()
        .iter()
        .map(|&v| if v.is_finite() && v >= 0.0 { Some(v.sqrt()) } else { None })
        .collect()
}
