//! Initial-value ODE integration for transient and spatial mole balances.
//!
//! Built on the [`differential-equations`](https://docs.rs/differential-equations/)
//! crate. The integrator is treated as an opaque black box: any of the
//! supported methods of sufficient accuracy satisfies the contract that the
//! output trace is ordered like the evaluation grid and its last entry
//! approximates the solution at the final requested point.

use crate::solvers::{SolverError, SolverResult};
use crate::Trace;
use differential_equations::methods::{ExplicitRungeKutta, ImplicitRungeKutta};
use differential_equations::ode::{ODE, ODEProblem};
use log::debug;
use nalgebra::SVector;

/// Integration methods available for the scalar balances in this crate.
///
/// For details on each method, refer to the
/// [`differential-equations`](https://docs.rs/differential-equations/) crate
/// documentation.
///
/// # Variants
///
/// - `Dopri5`: Adaptive explicit Dormand-Prince 5(4) method (default)
/// - `GaussLegendre6`: Adaptive implicit 6th-order Gauss-Legendre method,
///   for stiff balances
/// - `RK4`: Fixed-step explicit 4th-order Runge-Kutta
/// - `Euler`: Fixed-step explicit Forward Euler
#[derive(Debug, Clone, Copy)]
pub enum IntegrationMethod {
    /// Dormand-Prince 5(4) method
    Dopri5,
    /// 6th-order Gauss-Legendre method
    GaussLegendre6,
    /// 4th-order Runge-Kutta
    RK4,
    /// Forward Euler
    Euler,
}

/// Number of internal spans used to bracket an event crossing in
/// [`OdeIntegrator::solve_until`]. The crossing is then refined by bisection
/// inside the bracketing span, so this only bounds the coarse search.
const EVENT_SPANS: usize = 256;

/// Bisection refinements for an event crossing inside its bracketing span.
const EVENT_REFINEMENTS: usize = 100;

/// Which zero crossings of the event function terminate integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDirection {
    /// Terminate only when g goes from negative to non-negative
    Rising,
    /// Terminate only when g goes from positive to non-positive
    Falling,
    /// Terminate on any sign change
    Any,
}

impl EventDirection {
    fn triggered(&self, g_prev: f64, g_next: f64) -> bool {
        match self {
            EventDirection::Rising => g_prev < 0.0 && g_next >= 0.0,
            EventDirection::Falling => g_prev > 0.0 && g_next <= 0.0,
            EventDirection::Any => {
                (g_prev < 0.0 && g_next >= 0.0) || (g_prev > 0.0 && g_next <= 0.0)
            }
        }
    }
}

/// Location of a terminal event crossing.
#[derive(Debug, Clone)]
pub struct EventCrossing {
    /// Independent variable at the crossing
    pub x: f64,
    /// State at the crossing
    pub y: f64,
    /// Internal steps taken up to and including the crossing
    pub trace: Trace,
}

/// Initial-value integrator for scalar ODEs `dy/dx = f(x, y)`.
///
/// # Examples
///
/// Exponential decay, the transient batch-reactor balance:
///
/// ```
/// use molbal::solvers::integration::OdeIntegrator;
///
/// let integrator = OdeIntegrator::default();
/// let trace = integrator
///     .solve_series(|_t, ca| -0.23 * ca, 2.0, &[0.0, 0.5, 1.0])
///     .unwrap();
///
/// let (t_end, ca_end) = trace.last().unwrap();
/// assert_eq!(t_end, 1.0);
/// assert!((ca_end - 2.0 * (-0.23_f64).exp()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct OdeIntegrator {
    /// Integration method to use
    pub method: IntegrationMethod,
    /// Relative tolerance (adaptive methods)
    pub rtol: f64,
    /// Absolute tolerance (adaptive methods)
    pub atol: f64,
}

impl Default for OdeIntegrator {
    fn default() -> Self {
        OdeIntegrator { method: IntegrationMethod::Dopri5, rtol: 1e-8, atol: 1e-10 }
    }
}

/// ODE wrapper adapting a scalar closure to the differential-equations crate.
struct ScalarOde<'a, F> {
    rhs: &'a F,
}

impl<F> ODE<f64, SVector<f64, 1>> for ScalarOde<'_, F>
where
    F: Fn(f64, f64) -> f64,
{
    fn diff(&self, x: f64, y: &SVector<f64, 1>, dydx: &mut SVector<f64, 1>) {
        dydx[0] = (self.rhs)(x, y[0]);
    }
}

impl OdeIntegrator {
    /// Creates an integrator with default tolerances.
    pub fn new(method: IntegrationMethod) -> Self {
        OdeIntegrator { method, ..Default::default() }
    }

    /// Sets the integration method.
    pub fn with_method(mut self, method: IntegrationMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets relative and absolute tolerances for adaptive methods.
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    /// Integrates one span `[x0, x1]` and returns the state at `x1`.
    ///
    /// Fixed-step methods subdivide the span internally; adaptive methods
    /// apply their own step control.
    fn solve_span<F>(&self, f: &F, x0: f64, x1: f64, y0: f64) -> Result<f64, String>
    where
        F: Fn(f64, f64) -> f64,
    {
        let ode = ScalarOde { rhs: f };
        let y0_vec = SVector::<f64, 1>::new(y0);
        let problem = ODEProblem::new(ode, x0, x1, y0_vec);

        // The backend's default initial step is absolute; the event search
        // integrates arbitrarily short spans, so the step must be clamped to
        // the span width or adaptive methods reject the input.
        let h0 = 0.1 * (x1 - x0);

        let solution = match self.method {
            IntegrationMethod::Dopri5 => {
                let mut solver =
                    ExplicitRungeKutta::dopri5().rtol(self.rtol).atol(self.atol).h0(h0);
                problem.solve(&mut solver)
            }
            IntegrationMethod::GaussLegendre6 => {
                let mut solver =
                    ImplicitRungeKutta::gauss_legendre_6().rtol(self.rtol).atol(self.atol).h0(h0);
                problem.solve(&mut solver)
            }
            IntegrationMethod::RK4 => {
                let mut solver = ExplicitRungeKutta::rk4((x1 - x0) / 16.0);
                problem.solve(&mut solver)
            }
            IntegrationMethod::Euler => {
                let mut solver = ExplicitRungeKutta::euler((x1 - x0) / 64.0);
                problem.solve(&mut solver)
            }
        };

        match solution {
            Ok(sol) => {
                let final_y = sol.y[sol.y.len() - 1];
                if !final_y[0].is_finite() {
                    return Err("state became non-finite".to_string());
                }
                Ok(final_y[0])
            }
            Err(e) => Err(e.to_string()),
        }
    }

    /// Integrates `dy/dx = f(x, y)` from `y0` over the evaluation grid `xs`.
    ///
    /// The first grid point is taken as the initial location, so the returned
    /// trace starts at `(xs[0], y0)` and has exactly one entry per grid
    /// point, in grid order.
    ///
    /// # Errors
    ///
    /// - [`SolverError::NonMonotonicGrid`] if `xs` is not strictly increasing
    /// - [`SolverError::IntegrationFailed`] if the underlying method fails;
    ///   the error carries the partial trace accumulated up to the failure
    pub fn solve_series<F>(&self, f: F, y0: f64, xs: &[f64]) -> SolverResult<Trace>
    where
        F: Fn(f64, f64) -> f64,
    {
        if xs.is_empty() {
            return Err(SolverError::InsufficientPoints { needed: 1, got: 0 });
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SolverError::NonMonotonicGrid);
        }

        debug!("integrating {} grid spans with {:?}", xs.len() - 1, self.method);

        let mut trace = Trace::new();
        trace.push(xs[0], y0);
        let mut y = y0;

        for w in xs.windows(2) {
            y = self.solve_span(&f, w[0], w[1], y).map_err(|message| {
                SolverError::IntegrationFailed { x: w[0], message, partial: trace.clone() }
            })?;
            trace.push(w[1], y);
        }

        Ok(trace)
    }

    /// Integrates until the event function `g(x, y)` crosses zero.
    ///
    /// The span `[x0, x_end]` is marched in bounded internal steps; at each
    /// step the event function is evaluated and checked for a sign change in
    /// the requested direction. Once a crossing is bracketed, its location is
    /// refined by bisection against re-integrated state, so the returned
    /// point lies on the numerical solution rather than on a chord between
    /// steps.
    ///
    /// # Errors
    ///
    /// - [`SolverError::EventNotFound`] if `g` never crosses zero before
    ///   `x_end`; the error carries the full trace
    /// - [`SolverError::IntegrationFailed`] on integrator failure, with the
    ///   partial trace
    pub fn solve_until<F, G>(
        &self,
        f: F,
        g: G,
        y0: f64,
        x0: f64,
        x_end: f64,
        direction: EventDirection,
    ) -> SolverResult<EventCrossing>
    where
        F: Fn(f64, f64) -> f64,
        G: Fn(f64, f64) -> f64,
    {
        let mut trace = Trace::new();
        trace.push(x0, y0);

        let mut g_prev = g(x0, y0);
        if g_prev == 0.0 {
            return Ok(EventCrossing { x: x0, y: y0, trace });
        }

        let dx = (x_end - x0) / EVENT_SPANS as f64;
        let mut x_prev = x0;
        let mut y_prev = y0;

        for i in 1..=EVENT_SPANS {
            let x_next = x0 + dx * i as f64;
            let y_next = self.solve_span(&f, x_prev, x_next, y_prev).map_err(|message| {
                SolverError::IntegrationFailed { x: x_prev, message, partial: trace.clone() }
            })?;
            let g_next = g(x_next, y_next);
            trace.push(x_next, y_next);

            if direction.triggered(g_prev, g_next) {
                let (x_star, y_star) =
                    self.refine_crossing(&f, &g, x_prev, y_prev, x_next, g_prev, &trace)?;
                trace.push(x_star, y_star);
                debug!("event crossing located at x = {}", x_star);
                return Ok(EventCrossing { x: x_star, y: y_star, trace });
            }

            x_prev = x_next;
            y_prev = y_next;
            g_prev = g_next;
        }

        Err(SolverError::EventNotFound { x0, x_end, trace })
    }

    /// Bisects the bracketing span `[x_lo, x_hi]` for the zero of
    /// `g(x, y(x))`, where `y(x)` is re-integrated from the span start.
    ///
    /// `steps` is the trace accumulated so far; a failure during refinement
    /// reports it as the partial result.
    #[allow(clippy::too_many_arguments)]
    fn refine_crossing<F, G>(
        &self,
        f: &F,
        g: &G,
        x_lo: f64,
        y_lo: f64,
        x_hi: f64,
        g_lo: f64,
        steps: &Trace,
    ) -> SolverResult<(f64, f64)>
    where
        F: Fn(f64, f64) -> f64,
        G: Fn(f64, f64) -> f64,
    {
        let mut lo = x_lo;
        let mut hi = x_hi;

        for _ in 0..EVENT_REFINEMENTS {
            let mid = 0.5 * (lo + hi);
            if hi - lo <= 1e-12 * (1.0 + mid.abs()) {
                break;
            }
            let y_mid = self.solve_span(f, x_lo, mid, y_lo).map_err(|message| {
                SolverError::IntegrationFailed { x: x_lo, message, partial: steps.clone() }
            })?;
            let g_mid = g(mid, y_mid);
            if g_mid == 0.0 {
                return Ok((mid, y_mid));
            }
            if (g_mid > 0.0) == (g_lo > 0.0) {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let x_star = 0.5 * (lo + hi);
        let y_star = self.solve_span(f, x_lo, x_star, y_lo).map_err(|message| {
            SolverError::IntegrationFailed { x: x_lo, message, partial: steps.clone() }
        })?;
        Ok((x_star, y_star))
    }
}
