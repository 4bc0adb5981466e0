use thiserror::Error;

use crate::parameters::parameter::ParameterError;

/// Error types for the peakfit-rs library.
#[derive(Error, Debug)]
pub enum PeakFitError {
    /// A model parameter has neither a default nor a caller-supplied value.
    #[error("Missing parameter: '{0}' has no default and no value was supplied")]
    MissingParameter(String),

    /// A declared independent variable was not passed to the fit call.
    #[error("Missing independent variable: '{0}'")]
    MissingIndependentVariable(String),

    /// An independent variable name that is not an argument of the model function.
    #[error("Unknown independent variable: '{0}' is not an argument of the model function")]
    UnknownIndependentVariable(String),

    /// Error indicating a mismatch in array dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error during function evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error raised by a parameter or parameter collection.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

impl From<crate::parameters::bounds::BoundsError> for PeakFitError {
    fn from(err: crate::parameters::bounds::BoundsError) -> Self {
        PeakFitError::Parameter(ParameterError::from(err))
    }
}

/// Result type alias for peakfit-rs operations.
pub type Result<T> = std::result::Result<T, PeakFitError>;
