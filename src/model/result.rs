//! Result of fitting a model to data.

use crate::parameters::ParameterSet;
use crate::uncertainty::calculate_correlation;
use ndarray::{Array1, Array2};
use std::fmt;

/// Correlations with a smaller magnitude are left out of the report.
const MIN_REPORTED_CORRELATION: f64 = 0.1;

/// Result of fitting a model to data.
///
/// `values` lists every parameter, fixed ones included, in parameter order.
/// Standard errors live on the varying entries of `params`.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Best-fit value per parameter
    pub values: Vec<(String, f64)>,

    /// Parameter set after the fit
    pub params: ParameterSet,

    /// Final `model - data`; empty if the solution could not be evaluated
    pub residual: Array1<f64>,

    /// Model output at the solution
    pub best_fit: Array1<f64>,

    /// Whether the solver reported convergence
    pub success: bool,

    /// Solver termination message
    pub message: String,

    /// Number of function evaluations
    pub nfev: usize,

    /// Number of data points
    pub ndata: usize,

    /// Number of varying parameters
    pub nvarys: usize,

    /// Degrees of freedom
    pub nfree: usize,

    /// Sum of squared residuals
    pub chisqr: f64,

    /// `chisqr / nfree`
    pub redchi: f64,

    /// Varying parameter names, in covariance order
    pub var_names: Vec<String>,

    /// Covariance of the varying parameters in physical units
    pub covar: Option<Array2<f64>>,

    /// Parameter values the fit started from
    pub init_values: Vec<(String, f64)>,
}

impl FitResult {
    /// Best-fit value of a parameter.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Standard error of a parameter, if it varied and the covariance was valid.
    pub fn stderr(&self, name: &str) -> Option<f64> {
        self.params.get(name).and_then(|p| p.stderr())
    }

    /// Starting value of a parameter.
    pub fn init_value(&self, name: &str) -> Option<f64> {
        self.init_values.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Correlation matrix of the varying parameters.
    pub fn correlation(&self) -> Option<Array2<f64>> {
        self.covar.as_ref().map(calculate_correlation)
    }

    /// Correlation between two varying parameters.
    pub fn correl(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.var_names.iter().position(|n| n == a)?;
        let j = self.var_names.iter().position(|n| n == b)?;
        self.correlation().map(|c| c[[i, j]])
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[[Fit Statistics]]")?;
        writeln!(f, "    success            = {}", self.success)?;
        writeln!(f, "    message            = {}", self.message)?;
        writeln!(f, "    # function evals   = {}", self.nfev)?;
        writeln!(f, "    # data points      = {}", self.ndata)?;
        writeln!(f, "    # variables        = {}", self.nvarys)?;
        writeln!(f, "    chi-square         = {:.6e}", self.chisqr)?;
        writeln!(f, "    reduced chi-square = {:.6e}", self.redchi)?;

        writeln!(f, "[[Variables]]")?;
        let width = self.values.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        for param in self.params.iter() {
            let name = param.name();
            write!(f, "    {:<width$}  {:>12.6}", format!("{}:", name), param.value(), width = width + 1)?;
            if !self.var_names.iter().any(|n| n == name) {
                writeln!(f, " (fixed)")?;
                continue;
            }
            match param.stderr() {
                Some(stderr) => write!(f, " +/- {:.6}", stderr)?,
                None => write!(f, " +/- n/a")?,
            }
            match self.init_value(name) {
                Some(init) => writeln!(f, " (init = {})", init)?,
                None => writeln!(f)?,
            }
        }

        if let Some(correl) = self.correlation() {
            let mut pairs = Vec::new();
            for i in 0..self.var_names.len() {
                for j in (i + 1)..self.var_names.len() {
                    if correl[[i, j]].abs() > MIN_REPORTED_CORRELATION {
                        pairs.push((i, j, correl[[i, j]]));
                    }
                }
            }
            if !pairs.is_empty() {
                pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
                writeln!(f, "[[Correlations]] (unreported correlations are < {:.3})", MIN_REPORTED_CORRELATION)?;
                for (i, j, c) in pairs {
                    writeln!(f, "    C({}, {}) = {:+.4}", self.var_names[i], self.var_names[j], c)?;
                }
            }
        }

        Ok(())
    }
}
