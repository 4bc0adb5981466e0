//! Levenberg-Marquardt solver wrapper.
//!
//! [`LevenbergMarquardt`] drives a [`Problem`] with the `levenberg-marquardt`
//! crate and turns its report into an [`LmResult`]. Non-convergence and failed
//! evaluations are reported through `LmResult::success`, not as errors.

use crate::error::{PeakFitError, Result};
use crate::lm::config::LmConfig;
use crate::problem::{LmAdapter, Problem};
use levenberg_marquardt::LevenbergMarquardt as MinpackLm;
use log::debug;
use ndarray::Array1;
use std::fmt;

/// Result of a Levenberg-Marquardt optimization.
#[derive(Debug, Clone)]
pub struct LmResult {
    /// Optimized parameter values
    pub params: Array1<f64>,

    /// Residuals at the solution, empty if they could not be evaluated
    pub residuals: Array1<f64>,

    /// Sum of squared residuals
    pub cost: f64,

    /// Number of function evaluations
    pub func_evals: usize,

    /// Whether the optimization succeeded
    pub success: bool,

    /// A message describing the result
    pub message: String,
}

impl fmt::Display for LmResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimization Result:")?;
        writeln!(f, "  Success: {}", self.success)?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Cost: {:.6e}", self.cost)?;
        writeln!(f, "  Function evaluations: {}", self.func_evals)?;
        writeln!(f, "  Parameters: {:?}", self.params)?;
        Ok(())
    }
}

/// The Levenberg-Marquardt optimizer.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    /// Configuration options
    config: LmConfig,
}

impl LevenbergMarquardt {
    /// Create a new Levenberg-Marquardt optimizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Levenberg-Marquardt optimizer with the given configuration.
    pub fn with_config(config: LmConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &LmConfig {
        &self.config
    }

    /// Set the tolerance for reduction of the sum of squares.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.config.ftol = ftol;
        self
    }

    /// Set the tolerance for change in parameter values.
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.config.xtol = xtol;
        self
    }

    /// Set the orthogonality tolerance.
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.config.gtol = gtol;
        self
    }

    /// Set the initial step bound factor.
    pub fn with_stepbound(mut self, stepbound: f64) -> Self {
        self.config.stepbound = stepbound;
        self
    }

    /// Set the evaluation budget factor.
    pub fn with_patience(mut self, patience: usize) -> Self {
        self.config.patience = patience;
        self
    }

    /// Enable or disable diagonal rescaling.
    pub fn with_scale_diag(mut self, scale_diag: bool) -> Self {
        self.config.scale_diag = scale_diag;
        self
    }

    /// Set the relative step of the finite-difference Jacobian.
    pub fn with_epsfcn(mut self, epsfcn: f64) -> Self {
        self.config.epsfcn = Some(epsfcn);
        self
    }

    /// Minimize the sum of squared residuals for the given problem.
    ///
    /// # Arguments
    ///
    /// * `problem` - The problem to solve
    /// * `initial_params` - Initial guess for the parameter values
    ///
    /// # Returns
    ///
    /// * `Result<LmResult>` - The result of the optimization. Only a
    ///   dimension mismatch or an invalid configuration is an `Err`.
    pub fn minimize<P: Problem>(&self, problem: &P, initial_params: Array1<f64>) -> Result<LmResult> {
        let n_params = problem.parameter_count();
        if initial_params.len() != n_params {
            return Err(PeakFitError::DimensionMismatch(format!(
                "Expected {} parameters, got {}",
                n_params,
                initial_params.len()
            )));
        }
        self.validate()?;

        // Nothing to move: evaluate once and report.
        if n_params == 0 {
            return Ok(match problem.eval(&initial_params) {
                Ok(residuals) => LmResult {
                    cost: residuals.iter().map(|r| r.powi(2)).sum(),
                    params: initial_params,
                    residuals,
                    func_evals: 1,
                    success: true,
                    message: "No varying parameters".to_string(),
                },
                Err(err) => failed(initial_params, 1, err.to_string()),
            });
        }

        let adapter = LmAdapter::new(problem, &initial_params, self.config.epsfcn);
        let (adapter, report) = MinpackLm::<f64>::new()
            .with_ftol(self.config.ftol)
            .with_xtol(self.config.xtol)
            .with_gtol(self.config.gtol)
            .with_stepbound(self.config.stepbound)
            .with_patience(self.config.patience)
            .with_scale_diag(self.config.scale_diag)
            .minimize(adapter);

        let params = adapter.current_params();
        let func_evals = report.number_of_evaluations.max(adapter.evaluations());

        debug!(
            "solver terminated after {} evaluations: {:?}",
            func_evals, report.termination
        );

        if let Some(message) = adapter.take_error() {
            return Ok(failed(params, func_evals, message));
        }

        let residuals = match problem.eval(&params) {
            Ok(residuals) => residuals,
            Err(err) => return Ok(failed(params, func_evals, err.to_string())),
        };

        Ok(LmResult {
            cost: residuals.iter().map(|r| r.powi(2)).sum(),
            params,
            residuals,
            func_evals,
            success: report.termination.was_successful(),
            message: format!("{:?}", report.termination),
        })
    }

    // The solver crate panics on these, check them up front.
    fn validate(&self) -> Result<()> {
        let c = &self.config;
        if !(c.ftol >= 0.0 && c.xtol >= 0.0 && c.gtol >= 0.0) {
            return Err(PeakFitError::InvalidInput(
                "Tolerances must be non-negative".to_string(),
            ));
        }
        if !(c.stepbound > 0.0) || c.patience == 0 {
            return Err(PeakFitError::InvalidInput(
                "stepbound and patience must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn failed(params: Array1<f64>, func_evals: usize, message: String) -> LmResult {
    LmResult {
        params,
        residuals: Array1::zeros(0),
        cost: f64::NAN,
        func_evals,
        success: false,
        message,
    }
}
