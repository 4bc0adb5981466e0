//! Configuration options for the Levenberg-Marquardt solver.
//!
//! The iteration itself is done by the `levenberg-marquardt` crate (a MINPACK
//! port); these settings are forwarded to it unchanged, except for `epsfcn`,
//! which controls the finite-difference Jacobian computed on this side.

/// Configuration options for the Levenberg-Marquardt solver.
#[derive(Debug, Clone, PartialEq)]
pub struct LmConfig {
    /// Relative tolerance for reduction of the sum of squares. Default: 1.5e-8
    pub ftol: f64,

    /// Relative tolerance for change in parameter values. Default: 1.5e-8
    pub xtol: f64,

    /// Orthogonality tolerance between residuals and Jacobian columns. Default: 0.0
    pub gtol: f64,

    /// Factor for the initial step bound. Default: 100.0
    pub stepbound: f64,

    /// Evaluation budget is `patience * (n_params + 1)`. Default: 100
    pub patience: usize,

    /// Rescale parameters by the Jacobian column norms. Default: true
    pub scale_diag: bool,

    /// Relative step of the finite-difference Jacobian. Default: `None` (1e-8)
    pub epsfcn: Option<f64>,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            ftol: 1.5e-8,
            xtol: 1.5e-8,
            gtol: 0.0,
            stepbound: 100.0,
            patience: 100,
            scale_diag: true,
            epsfcn: None,
        }
    }
}
