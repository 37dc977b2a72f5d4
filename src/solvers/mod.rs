//! Numerical solvers for reactor mole-balance problems.
//!
//! Each reactor example in this crate reduces to the same pattern: define a
//! small scalar function representing the governing equation, then hand it to
//! one generic numerical primitive. The primitives live here:
//!
//! - [`RootFinder`]: damped Newton iteration for algebraic residuals
//!   `f(x) = 0` (steady-state balances)
//! - [`integration::OdeIntegrator`]: initial-value ODE integration over an
//!   evaluation grid, with event-terminated variant (transient and spatial
//!   balances)
//! - [`quadrature::quad`]: adaptive definite integration with an error
//!   estimate (differential relationships recast in integral form)
//! - [`interpolate::Interpolant`]: continuous approximation of a solved grid,
//!   invertible through the root-finder
//!
//! All solvers are stateless per call: nothing leaks between invocations, so
//! identical inputs give identical outputs.
//!
//! # Failure reporting
//!
//! A solver that fails reports *where it got to*, never a corrected answer:
//! the root-finder's [`SolverError::NoConvergence`] carries the last iterate
//! and its residual, the integrator's [`SolverError::IntegrationFailed`]
//! carries the partial trace accumulated before the failure.

pub mod integration;
pub mod interpolate;
pub mod quadrature;

use log::{debug, warn};

/// Result type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

/// Errors that can occur during solving.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Root-finder exhausted its iteration budget
    #[error(
        "no root found after {iterations} iterations: last iterate {last}, residual {residual}"
    )]
    NoConvergence { iterations: usize, last: f64, residual: f64 },
    /// Finite-difference slope underflowed; Newton step undefined
    #[error("derivative vanished at x = {at}; cannot take a Newton step")]
    DerivativeVanished { at: f64 },
    /// Iterate became non-finite
    #[error("solution diverged: iterate is not finite")]
    Diverged,
    /// ODE evaluation grid is not strictly increasing
    #[error("evaluation grid must be strictly increasing")]
    NonMonotonicGrid,
    /// Underlying ODE method failed (stiffness, non-finite state)
    #[error("ODE integration failed starting from x = {x}: {message}")]
    IntegrationFailed { x: f64, message: String, partial: crate::Trace },
    /// Event function never crossed zero within the integration span
    #[error("no event crossing in [{x0}, {x_end}]")]
    EventNotFound { x0: f64, x_end: f64, trace: crate::Trace },
    /// Quadrature hit its subdivision limit before reaching tolerance
    #[error("quadrature did not converge: value {value}, error estimate {error}")]
    QuadratureDidNotConverge { value: f64, error: f64 },
    /// Interpolation point outside the data range
    #[error("interpolation point {x} outside data range [{lo}, {hi}]")]
    OutOfRange { x: f64, lo: f64, hi: f64 },
    /// Not enough data points for the requested construction
    #[error("at least {needed} data points required, got {got}")]
    InsufficientPoints { needed: usize, got: usize },
    /// x and y data lengths differ
    #[error("x and y lengths differ: {x_len} vs {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },
    /// Singular linear system in spline construction
    #[error("singular linear system in spline construction")]
    SingularSystem,
}

/// Statistics from a root-finder run.
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    /// Number of Newton iterations performed
    pub iterations: usize,
    /// Number of residual evaluations
    pub function_evals: usize,
    /// Final residual magnitude
    pub final_residual: f64,
}

/// Scalar root-finder for algebraic steady-state residuals.
///
/// Solves `f(x) = 0` by Newton iteration with a central finite-difference
/// derivative and an optional relaxation (damping) factor:
///
/// ```text
/// x_{k+1} = x_k - alpha * f(x_k) / f'(x_k)
/// ```
///
/// The caller provides no bracketing guarantee; the function only needs to be
/// continuous near the root. For the strictly linear residuals of the
/// steady-state examples any same-scale initial guess converges in one step.
/// A wrong-units guess yields a "successful" but physically wrong answer;
/// there is no guardrail.
///
/// # Examples
///
/// ```
/// use molbal::solvers::RootFinder;
///
/// let finder = RootFinder::default();
/// let root = finder.solve(|x| x * x - 2.0, 1.0).unwrap();
/// assert!((root - 2.0_f64.sqrt()).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct RootFinder {
    /// Convergence tolerance on the residual magnitude
    pub tolerance: f64,
    /// Maximum number of Newton iterations
    pub max_iterations: usize,
    /// Relaxation factor (1.0 = full Newton step)
    pub relaxation: f64,
}

impl Default for RootFinder {
    fn default() -> Self {
        RootFinder { tolerance: 1e-10, max_iterations: 100, relaxation: 1.0 }
    }
}

impl RootFinder {
    /// Creates a root-finder with the given tolerance and iteration budget.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        RootFinder { tolerance, max_iterations, relaxation: 1.0 }
    }

    /// Sets the relaxation factor (damped Newton method).
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Solves `f(x) = 0` from the initial guess `x0`.
    ///
    /// Returns the root, or [`SolverError::NoConvergence`] with the last
    /// iterate if the iteration budget runs out.
    pub fn solve<F>(&self, f: F, x0: f64) -> SolverResult<f64>
    where
        F: Fn(f64) -> f64,
    {
        self.solve_with_stats(f, x0).map(|(root, _)| root)
    }

    /// Solves `f(x) = 0` and reports iteration statistics.
    pub fn solve_with_stats<F>(&self, f: F, x0: f64) -> SolverResult<(f64, SolverStats)>
    where
        F: Fn(f64) -> f64,
    {
        let mut x = x0;
        let mut stats = SolverStats::default();

        for iteration in 0..self.max_iterations {
            stats.iterations = iteration + 1;

            let fx = f(x);
            stats.function_evals += 1;
            stats.final_residual = fx.abs();

            if !x.is_finite() || !fx.is_finite() {
                warn!("root-finder diverged at iteration {}", iteration);
                return Err(SolverError::Diverged);
            }

            if fx.abs() < self.tolerance {
                debug!("root-finder converged to {} in {} iterations", x, stats.iterations);
                return Ok((x, stats));
            }

            // Central finite-difference derivative with a scale-aware step
            let h = (x.abs() * 1e-6).max(1e-8);
            let dfdx = (f(x + h) - f(x - h)) / (2.0 * h);
            stats.function_evals += 2;

            if dfdx == 0.0 || !dfdx.is_finite() {
                return Err(SolverError::DerivativeVanished { at: x });
            }

            x -= self.relaxation * fx / dfdx;
        }

        let residual = f(x);
        Err(SolverError::NoConvergence {
            iterations: self.max_iterations,
            last: x,
            residual,
        })
    }
}
