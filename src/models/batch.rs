//! Batch reactor: closed, constant-volume, first-order decay in time.
//!
//! With no flow terms the species-A mole balance reduces to
//!
//! ```text
//! dCa/dt = -k * Ca,    Ca(0) = Ca0
//! ```
//!
//! whose analytical solution is exponential decay `Ca0 * exp(-k*t)`. The
//! numerical route integrates the same derivative over a time grid and exists
//! to validate the integrator against the closed form.

use crate::solvers::integration::OdeIntegrator;
use crate::solvers::SolverResult;
use crate::uncertainty::Uncertain;
use crate::Trace;

/// Transient batch-reactor problem with first-order consumption of A.
///
/// # Examples
///
/// ```
/// use molbal::models::Batch;
///
/// let batch = Batch::new(0.23, 2.0);
/// // After 1 hour: 2.0 * exp(-0.23) = 1.589 mol/L
/// assert!((batch.concentration_at(1.0) - 1.589).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Batch {
    /// First-order rate constant k (1/hr)
    pub rate_constant: f64,
    /// Initial concentration Ca0 (mol/L)
    pub initial_concentration: f64,
}

impl Batch {
    /// Creates a batch problem. Arguments in order: k, Ca0.
    pub fn new(rate_constant: f64, initial_concentration: f64) -> Self {
        Batch { rate_constant, initial_concentration }
    }

    /// Time derivative of the concentration: `-k * Ca`.
    pub fn derivative(&self, ca: f64) -> f64 {
        -self.rate_constant * ca
    }

    /// Analytical concentration `Ca0 * exp(-k*t)` at time `t` (hr).
    pub fn concentration_at(&self, t: f64) -> f64 {
        self.initial_concentration * (-self.rate_constant * t).exp()
    }

    /// Integrates the balance over the time grid, returning the trace of
    /// (t, Ca) pairs. The grid must be strictly increasing and start at the
    /// initial time.
    pub fn integrate(&self, integrator: &OdeIntegrator, times: &[f64]) -> SolverResult<Trace> {
        integrator.solve_series(|_t, ca| self.derivative(ca), self.initial_concentration, times)
    }

    /// Analytical concentration at `t` with an uncertain rate constant,
    /// propagated through the exponential.
    pub fn concentration_at_uncertain(&self, rate_constant: Uncertain, t: f64) -> Uncertain {
        self.initial_concentration * (-(rate_constant * t)).exp()
    }
}
