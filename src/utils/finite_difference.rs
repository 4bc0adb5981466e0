//! Finite difference methods for numerical differentiation.

use crate::error::{PeakFitError, Result};
use crate::problem::Problem;
use ndarray::{Array1, Array2};

/// Default step size for finite differences.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Compute the Jacobian matrix of a problem using forward finite differences.
///
/// # Arguments
///
/// * `problem` - The problem to evaluate
/// * `params` - The parameter values at which to evaluate the Jacobian
/// * `epsilon` - The relative step size (optional)
///
/// # Returns
///
/// * `Result<Array2<f64>>` - The Jacobian matrix, `J[i,j] = ∂residual[i]/∂param[j]`
pub fn jacobian(
    problem: &dyn Problem,
    params: &Array1<f64>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let n_residuals = problem.residual_count();
    jacobian_fn(|p| problem.eval(p), params, n_residuals, epsilon)
}

/// Compute the Jacobian matrix of an arbitrary vector function.
///
/// The step for each coordinate scales with its magnitude, so it is
/// `epsilon * |x_j|` for large values and `epsilon` near zero.
pub fn jacobian_fn<F>(
    f: F,
    params: &Array1<f64>,
    n_residuals: usize,
    epsilon: Option<f64>,
) -> Result<Array2<f64>>
where
    F: Fn(&Array1<f64>) -> Result<Array1<f64>>,
{
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    let n_params = params.len();

    let residuals = f(params)?;
    check_len(residuals.len(), n_residuals)?;

    let mut jac = Array2::zeros((n_residuals, n_params));

    for j in 0..n_params {
        let mut params_perturbed = params.clone();

        let param_j = params[j];
        let eps_j = if param_j.abs() > eps {
            param_j.abs() * eps
        } else {
            eps
        };

        params_perturbed[j] += eps_j;

        let residuals_perturbed = f(&params_perturbed)?;
        check_len(residuals_perturbed.len(), n_residuals)?;

        for i in 0..n_residuals {
            jac[[i, j]] = (residuals_perturbed[i] - residuals[i]) / eps_j;
        }
    }

    Ok(jac)
}

fn check_len(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(PeakFitError::DimensionMismatch(format!(
            "Expected {} residuals, got {}",
            expected, actual
        )));
    }
    Ok(())
}
