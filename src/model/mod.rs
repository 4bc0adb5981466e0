//! # Models
//!
//! A [`Model`] wraps a plain numeric function together with its declared
//! [`Signature`] and fits it to data with named parameters.
//!
//! Parameters are discovered from the signature: every argument that is not an
//! independent variable is a parameter, in declaration order. A fit call can
//! override defaults with bare values, replace a parameter outright with a full
//! [`Parameter`](crate::parameters::Parameter) (bounds, `vary`), or pass a whole
//! [`ParameterSet`].
//!
//! ## Example
//!
//! ```
//! use ndarray::Array1;
//! use peakfit_rs::lineshapes::gauss;
//! use peakfit_rs::model::{Kwargs, Model, Signature};
//!
//! let model = Model::new(
//!     |args| Ok(gauss(args.var("x")?, args.param("amp")?, args.param("cen")?, args.param("wid")?)),
//!     Signature::from_names(&["x", "amp", "cen", "wid"]),
//!     &["x"],
//! )
//! .unwrap();
//!
//! let x = Array1::linspace(-10.0, 10.0, 201);
//! let data = gauss(&x, 7.0, 1.0, 3.0);
//!
//! let kwargs = Kwargs::new().var("x", x).value("amp", 5.0).value("cen", 2.0).value("wid", 4.0);
//! let result = model.fit(&data, None, &kwargs).unwrap();
//!
//! assert!(result.success);
//! assert!((result.value("cen").unwrap() - 1.0).abs() < 1e-6);
//! ```

pub mod kwargs;
pub mod problem;
pub mod result;
pub mod signature;

pub use kwargs::{KwargValue, Kwargs};
pub use problem::ModelProblem;
pub use result::FitResult;
pub use signature::{Argument, Arguments, Signature};

use crate::error::{PeakFitError, Result};
use crate::lm::LevenbergMarquardt;
use crate::parameters::{Override, Parameter, ParameterError, ParameterSet};
use crate::uncertainty::UncertaintyCalculator;
use crate::utils::finite_difference;
use log::{debug, warn};
use ndarray::Array1;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Shared, thread-safe model function.
pub type ModelFn = Arc<dyn Fn(&Arguments<'_>) -> Result<Array1<f64>> + Send + Sync>;

/// Wrap a closure as a [`ModelFn`].
pub fn model_fn<F>(func: F) -> ModelFn
where
    F: Fn(&Arguments<'_>) -> Result<Array1<f64>> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// A fittable model: a function, its signature and its independent variables.
///
/// A model never holds fit state. Each [`fit`](Model::fit) builds a fresh
/// working parameter set, so one model can be fitted concurrently from several
/// threads.
#[derive(Clone)]
pub struct Model {
    name: String,
    func: ModelFn,
    signature: Signature,
    independent_vars: Vec<String>,
    param_names: Vec<String>,
    solver: LevenbergMarquardt,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("independent_vars", &self.independent_vars)
            .field("param_names", &self.param_names)
            .finish()
    }
}

/// Kwargs split into independent variables and parameter overrides.
struct Partitioned<'k> {
    vars: Vec<(&'k str, &'k Array1<f64>)>,
    overrides: Vec<(String, Override)>,
}

impl Model {
    /// Create a model from a function and its signature.
    ///
    /// # Arguments
    ///
    /// * `func` - The model function
    /// * `signature` - Every argument `func` reads, in declaration order
    /// * `independent_vars` - Arguments supplied as data arrays at call time
    ///
    /// # Returns
    ///
    /// The model, or `UnknownIndependentVariable` if an independent variable is
    /// not in the signature. Duplicate argument names are `InvalidInput`.
    pub fn new<F>(func: F, signature: Signature, independent_vars: &[&str]) -> Result<Self>
    where
        F: Fn(&Arguments<'_>) -> Result<Array1<f64>> + Send + Sync + 'static,
    {
        Self::from_fn(model_fn(func), signature, independent_vars)
    }

    /// Create a model from an already shared function.
    pub fn from_fn(func: ModelFn, signature: Signature, independent_vars: &[&str]) -> Result<Self> {
        if let Some(name) = signature.duplicate() {
            return Err(PeakFitError::InvalidInput(format!(
                "Argument '{}' is declared more than once",
                name
            )));
        }

        if let Some(unknown) = independent_vars.iter().find(|v| !signature.contains(v)) {
            return Err(PeakFitError::UnknownIndependentVariable(unknown.to_string()));
        }

        let independent_vars = independent_vars.iter().map(|v| v.to_string()).collect();
        Ok(Self::assemble(func, signature, independent_vars))
    }

    /// Build a model from parts already known to be consistent.
    pub(crate) fn assemble(func: ModelFn, signature: Signature, independent_vars: Vec<String>) -> Self {
        let param_names = signature
            .iter()
            .filter(|a| !independent_vars.contains(&a.name))
            .map(|a| a.name.clone())
            .collect();

        Self {
            name: "model".to_string(),
            func,
            signature,
            independent_vars,
            param_names,
            solver: LevenbergMarquardt::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Use a differently configured solver.
    pub fn with_solver(mut self, solver: LevenbergMarquardt) -> Self {
        self.solver = solver;
        self
    }

    /// Register defaults for existing parameter arguments.
    ///
    /// Fails with `UnknownParameter` if a name is not a parameter of the model.
    ///
    /// # Examples
    ///
    /// ```
    /// use peakfit_rs::lineshapes::loren;
    /// use peakfit_rs::model::{Model, Signature};
    ///
    /// let model = Model::new(
    ///     |args| Ok(loren(args.var("x")?, args.param("amp")?, args.param("cen")?, args.param("wid")?)),
    ///     Signature::from_names(&["x", "amp", "cen", "wid"]),
    ///     &["x"],
    /// )
    /// .unwrap()
    /// .declare_parameters(&[("amp", 1.0), ("wid", 1.0)])
    /// .unwrap();
    ///
    /// let params = model.params();
    /// assert_eq!(params.get("amp").unwrap().value(), 1.0);
    /// assert!(!params.get("cen").unwrap().has_value());
    /// ```
    pub fn declare_parameters(mut self, defaults: &[(&str, f64)]) -> Result<Self> {
        for (name, default) in defaults {
            if !self.param_names.iter().any(|p| p == name) {
                return Err(ParameterError::UnknownParameter {
                    name: name.to_string(),
                }
                .into());
            }
            self.signature.set_default(name, *default)?;
        }
        Ok(self)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Independent variable names.
    pub fn independent_vars(&self) -> &[String] {
        &self.independent_vars
    }

    /// Configured solver.
    pub fn solver(&self) -> &LevenbergMarquardt {
        &self.solver
    }

    /// A fresh parameter set built from the signature.
    ///
    /// Every parameter varies and is unbounded. Arguments without a default
    /// produce unset parameters.
    pub fn params(&self) -> ParameterSet {
        // names are unique, checked in the constructor
        ParameterSet::from_distinct(
            self.param_names
                .iter()
                .map(|name| match self.signature.get(name).and_then(|a| a.default) {
                    Some(default) => Parameter::new(name, default),
                    None => Parameter::unset(name),
                })
                .collect(),
        )
    }

    /// Evaluate the model.
    ///
    /// `params` is merged over the defaults and then `kwargs` overrides are
    /// applied, exactly as in [`fit`](Model::fit).
    pub fn eval(&self, params: &ParameterSet, kwargs: &Kwargs) -> Result<Array1<f64>> {
        let Partitioned { vars, overrides } = self.partition(kwargs)?;
        let working = self.working_set(Some(params), &overrides)?;

        let values: Vec<(&str, f64)> = working.iter().map(|p| (p.name(), p.value())).collect();
        (self.func)(&Arguments::new(values, vars))
    }

    /// Fit the model to `data`.
    ///
    /// # Arguments
    ///
    /// * `data` - Observed values; residuals are `model - data`
    /// * `params` - Optional parameter set merged over the defaults
    /// * `kwargs` - Independent variables plus per-parameter overrides
    ///
    /// # Returns
    ///
    /// A [`FitResult`]. Argument problems (`MissingIndependentVariable`,
    /// `MissingParameter`, `InvalidInput`, `UnknownParameter`) are errors and
    /// are detected before the function is evaluated. Numerical failure or
    /// non-convergence is reported with `success == false`.
    pub fn fit(&self, data: &Array1<f64>, params: Option<&ParameterSet>, kwargs: &Kwargs) -> Result<FitResult> {
        let Partitioned { vars, overrides } = self.partition(kwargs)?;
        let mut working = self.working_set(params, &overrides)?;
        let init_values = working.values();

        let problem = ModelProblem::new(&self.func, data, &vars, &working);
        let var_names = problem.var_names();
        let initial = problem.initial_internal()?;

        debug!(
            "fitting model '{}': {} data points, {} varying parameters {:?}",
            self.name,
            data.len(),
            var_names.len(),
            var_names
        );

        let lm = self.solver.minimize(&problem, initial)?;
        let physical = problem.to_physical(&lm.params);

        // Jacobian w.r.t. physical values, only if the solution can be evaluated
        let jacobian = if lm.residuals.len() == data.len() && !var_names.is_empty() {
            match finite_difference::jacobian_fn(
                |v| problem.eval_physical(v),
                &physical,
                data.len(),
                self.solver.config().epsfcn,
            ) {
                Ok(jacobian) => Some(jacobian),
                Err(err) => {
                    warn!("Jacobian at the solution could not be evaluated: {}", err);
                    None
                }
            }
        } else {
            None
        };
        let best_fit = if lm.residuals.len() == data.len() {
            &lm.residuals + data
        } else {
            Array1::zeros(0)
        };

        let calc = UncertaintyCalculator::new(data.len(), var_names.len(), lm.cost);
        let uncertainties = jacobian
            .map(|j| calc.uncertainties(&j, &var_names))
            .unwrap_or_default();

        // only this fit's varying parameters carry an uncertainty
        working.clear_stderr();
        for (i, (name, &value)) in var_names.iter().zip(physical.iter()).enumerate() {
            if let Some(param) = working.get_mut(name) {
                param.set_value(value);
                param.set_stderr(uncertainties.standard_errors.get(i).copied().flatten());
            }
        }

        Ok(FitResult {
            values: working.values(),
            params: working,
            residual: lm.residuals,
            best_fit,
            success: lm.success,
            message: lm.message,
            nfev: lm.func_evals,
            ndata: data.len(),
            nvarys: var_names.len(),
            nfree: calc.nfree,
            chisqr: calc.chisqr,
            redchi: calc.redchi,
            var_names,
            covar: uncertainties.covariance,
            init_values,
        })
    }

    /// Fit several datasets independently and in parallel.
    ///
    /// Results are returned in input order, one per dataset.
    pub fn fit_batch(
        &self,
        datasets: &[Array1<f64>],
        params: Option<&ParameterSet>,
        kwargs: &Kwargs,
    ) -> Vec<Result<FitResult>> {
        datasets
            .par_iter()
            .map(|data| self.fit(data, params, kwargs))
            .collect()
    }

    fn partition<'k>(&self, kwargs: &'k Kwargs) -> Result<Partitioned<'k>> {
        let mut vars = Vec::new();
        let mut overrides = Vec::new();

        for (name, value) in kwargs.iter() {
            let independent = self.independent_vars.iter().any(|v| v == name);
            match (value, independent) {
                (KwargValue::Array(data), true) => vars.push((name, data)),
                (KwargValue::Override(entry), false) => overrides.push((name.to_string(), entry.clone())),
                (KwargValue::Array(_), false) => {
                    return Err(PeakFitError::InvalidInput(format!(
                        "'{}' is not an independent variable of the model",
                        name
                    )))
                }
                (KwargValue::Override(_), true) => {
                    return Err(PeakFitError::InvalidInput(format!(
                        "Independent variable '{}' must be given as an array",
                        name
                    )))
                }
            }
        }

        if let Some(missing) = self
            .independent_vars
            .iter()
            .find(|v| !vars.iter().any(|(n, _)| *n == v.as_str()))
        {
            return Err(PeakFitError::MissingIndependentVariable(missing.clone()));
        }

        Ok(Partitioned { vars, overrides })
    }

    fn working_set(&self, params: Option<&ParameterSet>, overrides: &[(String, Override)]) -> Result<ParameterSet> {
        let mut working = self.params();
        if let Some(params) = params {
            working.merge(params)?;
        }
        let working = ParameterSet::merge_overrides(&working, overrides)?;

        if let Some(missing) = working.iter().find(|p| !p.has_value()) {
            return Err(PeakFitError::MissingParameter(missing.name().to_string()));
        }

        Ok(working)
    }
}
