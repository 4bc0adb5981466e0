//! Problem definition trait and the solver adapter.
//!
//! This module defines the `Problem` trait, a nonlinear least-squares problem
//! over a flat, unconstrained parameter vector, and [`LmAdapter`], which exposes
//! any `Problem` to the `levenberg-marquardt` crate's solver.

use crate::error::{PeakFitError, Result};
use crate::utils::matrix_convert::{nalgebra_vec_to_ndarray, ndarray_to_nalgebra, ndarray_vec_to_nalgebra};
use levenberg_marquardt::LeastSquaresProblem;
use nalgebra::storage::Owned;
use nalgebra::{DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2};
use std::cell::{Cell, RefCell};

/// A trait representing a nonlinear least squares problem.
pub trait Problem {
    /// Evaluate the residuals at the given parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameter values at which to evaluate the residuals
    ///
    /// # Returns
    ///
    /// * A vector of residuals, or an error if the evaluation fails
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Get the number of parameters in the problem.
    fn parameter_count(&self) -> usize;

    /// Get the number of residuals in the problem.
    fn residual_count(&self) -> usize;

    /// Evaluate the Jacobian matrix at the given parameters.
    ///
    /// The default implementation uses forward finite differences.
    fn jacobian(&self, params: &Array1<f64>) -> Result<Array2<f64>>
    where
        Self: Sized,
    {
        crate::utils::finite_difference::jacobian(self, params, None)
    }

    /// Check if this problem provides a custom Jacobian implementation.
    fn has_custom_jacobian(&self) -> bool {
        false
    }

    /// Evaluate the sum of squared residuals at the given parameters.
    fn eval_cost(&self, params: &Array1<f64>) -> Result<f64> {
        let residuals = self.eval(params)?;
        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}

/// Adapter to drive a [`Problem`] with the `levenberg-marquardt` crate.
///
/// The crate's solver only learns that an evaluation failed; the adapter keeps
/// the message of the most recent failure so it can be reported afterwards.
pub struct LmAdapter<'a, P: Problem> {
    problem: &'a P,
    params: DVector<f64>,
    epsilon: Option<f64>,
    evaluations: Cell<usize>,
    last_error: RefCell<Option<String>>,
}

impl<'a, P: Problem> LmAdapter<'a, P> {
    /// Create a new adapter starting at `initial_params`.
    ///
    /// `epsilon` is the relative step of the finite-difference Jacobian; `None`
    /// selects the default.
    pub fn new(problem: &'a P, initial_params: &Array1<f64>, epsilon: Option<f64>) -> Self {
        Self {
            problem,
            params: ndarray_vec_to_nalgebra(initial_params),
            epsilon,
            evaluations: Cell::new(0),
            last_error: RefCell::new(None),
        }
    }

    /// Current parameter vector.
    pub fn current_params(&self) -> Array1<f64> {
        nalgebra_vec_to_ndarray(&self.params)
    }

    /// Number of residual evaluations performed through the adapter.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    /// Message of the most recent failed evaluation, if any.
    pub fn take_error(&self) -> Option<String> {
        self.last_error.borrow_mut().take()
    }

    fn record<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                *self.last_error.borrow_mut() = Some(err.to_string());
                None
            }
        }
    }

    fn jacobian_at(&self, params: &Array1<f64>) -> Result<Array2<f64>> {
        if self.problem.has_custom_jacobian() {
            self.problem.jacobian(params)
        } else {
            crate::utils::finite_difference::jacobian(self.problem, params, self.epsilon)
        }
    }
}

impl<'a, P: Problem> LeastSquaresProblem<f64, Dyn, Dyn> for LmAdapter<'a, P> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, x: &DVector<f64>) {
        self.params.copy_from(x);
    }

    fn params(&self) -> DVector<f64> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        self.evaluations.set(self.evaluations.get() + 1);
        let params = self.current_params();
        let residuals = self.record(self.problem.eval(&params))?;

        if residuals.len() != self.problem.residual_count() {
            return self.record(Err(PeakFitError::DimensionMismatch(format!(
                "Expected {} residuals, got {}",
                self.problem.residual_count(),
                residuals.len()
            ))));
        }

        Some(ndarray_vec_to_nalgebra(&residuals))
    }

    fn jacobian(&self) -> Option<DMatrix<f64>> {
        let params = self.current_params();
        let jacobian = self.record(self.jacobian_at(&params))?;
        Some(ndarray_to_nalgebra(&jacobian))
    }
}
