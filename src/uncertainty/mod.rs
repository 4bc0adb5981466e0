//! # Uncertainty Calculation
//!
//! Parameter uncertainties at a least-squares solution: covariance from the
//! Jacobian, standard errors and correlations. Failures degrade to missing
//! values with a logged warning rather than errors.

mod covariance;

pub use covariance::{calculate_correlation, calculate_covariance, standard_errors_from_covariance};

use log::warn;
use ndarray::Array2;

/// Calculator for parameter uncertainties.
#[derive(Debug, Clone)]
pub struct UncertaintyCalculator {
    /// Degrees of freedom (n_points - n_parameters, at least 1)
    pub nfree: usize,
    /// Chi-square value at minimum
    pub chisqr: f64,
    /// Reduced chi-square (chi^2 / nfree)
    pub redchi: f64,
}

/// Covariance and standard errors of the varying parameters.
#[derive(Debug, Clone, Default)]
pub struct Uncertainties {
    /// Covariance matrix, absent if `J^T J` was singular
    pub covariance: Option<Array2<f64>>,
    /// Standard error per varying parameter, in flat-vector order
    pub standard_errors: Vec<Option<f64>>,
}

impl UncertaintyCalculator {
    /// Create a new UncertaintyCalculator
    pub fn new(ndata: usize, nvarys: usize, chisqr: f64) -> Self {
        let nfree = if ndata > nvarys { ndata - nvarys } else { 1 };
        let redchi = chisqr / nfree as f64;

        Self {
            nfree,
            chisqr,
            redchi,
        }
    }

    /// Covariance and standard errors from the Jacobian at the solution
    ///
    /// `names` label the Jacobian columns in log messages.
    pub fn uncertainties(&self, jacobian: &Array2<f64>, names: &[String]) -> Uncertainties {
        let nvarys = jacobian.ncols();
        if nvarys == 0 {
            return Uncertainties::default();
        }

        let Some(covariance) = calculate_covariance(jacobian, self.redchi) else {
            warn!("J^T J is singular; standard errors not available");
            return Uncertainties {
                covariance: None,
                standard_errors: vec![None; nvarys],
            };
        };

        let standard_errors = standard_errors_from_covariance(&covariance);
        for (name, stderr) in names.iter().zip(&standard_errors) {
            if stderr.is_none() {
                warn!("Invalid covariance diagonal for '{}'; standard error omitted", name);
            }
        }

        Uncertainties {
            covariance: Some(covariance),
            standard_errors,
        }
    }
}
