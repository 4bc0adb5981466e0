//! Residual problem built for a single fit.
//!
//! [`ModelProblem`] owns the mapping between the optimizer's flat internal
//! vector and the named, bounded parameter values the model function sees.

use crate::error::{PeakFitError, Result};
use crate::model::signature::Arguments;
use crate::model::ModelFn;
use crate::parameters::{BoundsTransform, ParameterSet};
use crate::problem::Problem;
use ndarray::Array1;

/// A varying parameter's slot in the flat vector.
#[derive(Debug, Clone)]
struct Slot {
    /// Position in the working parameter set
    index: usize,
    transform: BoundsTransform,
}

/// Least-squares problem `model(params, vars) - data` over the internal vector.
pub struct ModelProblem<'a> {
    func: &'a ModelFn,
    data: &'a Array1<f64>,
    vars: &'a [(&'a str, &'a Array1<f64>)],
    params: &'a ParameterSet,
    slots: Vec<Slot>,
}

impl<'a> ModelProblem<'a> {
    /// Build the problem for a complete working parameter set.
    ///
    /// Varying parameters are assigned flat-vector positions in set order.
    pub fn new(
        func: &'a ModelFn,
        data: &'a Array1<f64>,
        vars: &'a [(&'a str, &'a Array1<f64>)],
        params: &'a ParameterSet,
    ) -> Self {
        let slots = params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_free())
            .map(|(index, p)| Slot {
                index,
                transform: p.bounds_transform(),
            })
            .collect();

        Self {
            func,
            data,
            vars,
            params,
            slots,
        }
    }

    /// Names of the varying parameters in flat-vector order.
    pub fn var_names(&self) -> Vec<String> {
        let names = self.params.names();
        self.slots.iter().map(|s| names[s.index].clone()).collect()
    }

    /// Starting point of the optimizer.
    ///
    /// A value sitting on a bound is moved just inside the interval so the
    /// internal coordinate is finite.
    pub fn initial_internal(&self) -> Result<Array1<f64>> {
        let values = self.physical_values();
        self.slots
            .iter()
            .zip(values.iter())
            .map(|(slot, &value)| Ok(slot.transform.seed(value)?))
            .collect()
    }

    /// Current physical values of the varying parameters.
    pub fn physical_values(&self) -> Array1<f64> {
        let all: Vec<f64> = self.params.iter().map(|p| p.value()).collect();
        self.slots.iter().map(|s| all[s.index]).collect()
    }

    /// Map an internal vector to physical values of the varying parameters.
    pub fn to_physical(&self, internal: &Array1<f64>) -> Array1<f64> {
        self.slots
            .iter()
            .zip(internal.iter())
            .map(|(slot, &y)| slot.transform.to_external(y))
            .collect()
    }

    /// Evaluate the model function with the varying parameters at `physical`.
    pub fn eval_model(&self, physical: &Array1<f64>) -> Result<Array1<f64>> {
        let mut values: Vec<(&str, f64)> =
            self.params.iter().map(|p| (p.name(), p.value())).collect();
        for (slot, &value) in self.slots.iter().zip(physical.iter()) {
            values[slot.index].1 = value;
        }

        let args = Arguments::new(values, self.vars.to_vec());
        let output = (self.func)(&args)?;

        if output.len() != self.data.len() {
            return Err(PeakFitError::DimensionMismatch(format!(
                "Model returned {} values for {} data points",
                output.len(),
                self.data.len()
            )));
        }

        Ok(output)
    }

    /// Residuals `model - data` with the varying parameters at `physical`.
    pub fn eval_physical(&self, physical: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(self.eval_model(physical)? - self.data)
    }
}

impl<'a> Problem for ModelProblem<'a> {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        self.eval_physical(&self.to_physical(params))
    }

    fn parameter_count(&self) -> usize {
        self.slots.len()
    }

    fn residual_count(&self) -> usize {
        self.data.len()
    }
}
