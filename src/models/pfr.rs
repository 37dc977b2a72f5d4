//! Plug flow reactor (PFR): spatial first-order decay along reactor volume.
//!
//! At steady state, with plug flow and constant volumetric rate, the mole
//! balance on a differential slice of reactor volume gives
//!
//! ```text
//! dCa/dV = -(k / v0) * Ca,    Ca(0) = Ca0
//! ```
//!
//! formally identical to the batch balance with volume playing the role of
//! time. The analytical profile is `Ca0 * exp(-k*V/v0)`.
//!
//! # The inverse problem
//!
//! The harder question is the design one: what reactor volume produces a
//! given exit concentration? Three independent strategies answer it, each
//! exercising a different numerical primitive (see [`InverseStrategy`]):
//!
//! 1. **Quadrature + root-find**: separate variables to get
//!    `V = integral from Ca_exit to Ca0 of v0/(k*C) dC`, evaluate the
//!    integral by adaptive quadrature, and close the loop with the
//!    root-finder on `V(Ca_exit) - V = 0`.
//! 2. **Event-terminated integration**: integrate the profile forward and
//!    stop when the concentration falls through the target.
//! 3. **Interpolation + root-find**: integrate once over a volume grid,
//!    fit a cubic spline, and invert the spline at the target.
//!
//! The strategies differ in their internal precision and are deliberately
//! kept separate; they are expected to agree to well under 0.01 L on the
//! textbook problem, not to be identical.

use crate::solvers::integration::{EventDirection, OdeIntegrator};
use crate::solvers::interpolate::Interpolant;
use crate::solvers::quadrature::quad;
use crate::solvers::{RootFinder, SolverResult};
use crate::Trace;

/// Number of grid spans used by [`InverseStrategy::InterpolateInvert`].
const INVERSE_GRID_SPANS: usize = 150;

/// Solution strategy for the inverse volume problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseStrategy {
    /// Separate variables, integrate by quadrature, root-find the residual
    QuadratureRootFind,
    /// Integrate forward until the exit concentration crosses the target
    EventIntegration,
    /// Integrate over a grid, spline it, invert the spline
    InterpolateInvert,
}

/// Steady-state PFR problem with first-order consumption of A.
///
/// # Examples
///
/// ```
/// use molbal::models::Pfr;
///
/// let pfr = Pfr::new(0.23, 3.0, 10.0);
/// // 100 L reactor: 3.0 * exp(-0.23 * 100 / 10) = 0.3008 mol/L
/// assert!((pfr.concentration_at(100.0) - 0.3008).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Pfr {
    /// First-order rate constant k (1/min)
    pub rate_constant: f64,
    /// Feed concentration Ca0 (mol/L)
    pub feed_concentration: f64,
    /// Volumetric flow v0 (L/min)
    pub volumetric_flow: f64,
}

impl Pfr {
    /// Creates a PFR problem. Arguments in order: k, Ca0, v0.
    pub fn new(rate_constant: f64, feed_concentration: f64, volumetric_flow: f64) -> Self {
        Pfr { rate_constant, feed_concentration, volumetric_flow }
    }

    /// Spatial derivative of the concentration: `-(k/v0) * Ca`.
    pub fn derivative(&self, ca: f64) -> f64 {
        -(self.rate_constant / self.volumetric_flow) * ca
    }

    /// Analytical concentration `Ca0 * exp(-k*V/v0)` at cumulative reactor
    /// volume `volume` (L).
    pub fn concentration_at(&self, volume: f64) -> f64 {
        self.feed_concentration
            * (-self.rate_constant * volume / self.volumetric_flow).exp()
    }

    /// Integrates the profile over the volume grid, returning the trace of
    /// (V, Ca) pairs.
    pub fn integrate(&self, integrator: &OdeIntegrator, volumes: &[f64]) -> SolverResult<Trace> {
        integrator.solve_series(|_v, ca| self.derivative(ca), self.feed_concentration, volumes)
    }

    /// Exit concentration of a reactor of the given volume, by integration
    /// from the feed.
    pub fn exit_concentration(&self, integrator: &OdeIntegrator, volume: f64) -> SolverResult<f64> {
        let trace = self.integrate(integrator, &[0.0, volume])?;
        // The trace is non-empty by construction: it starts at the feed.
        let (_, ca) = trace.last().unwrap_or((0.0, self.feed_concentration));
        Ok(ca)
    }

    /// Solves the inverse design problem: the reactor volume at which the
    /// exit concentration equals `target`, searched within `[0, v_max]`.
    ///
    /// Each [`InverseStrategy`] uses a different subset of the numerical
    /// primitives; `integrator` is unused by the quadrature strategy and
    /// `finder` is unused by the event strategy.
    pub fn volume_for_exit(
        &self,
        target: f64,
        v_max: f64,
        strategy: InverseStrategy,
        integrator: &OdeIntegrator,
        finder: &RootFinder,
    ) -> SolverResult<f64> {
        match strategy {
            InverseStrategy::QuadratureRootFind => {
                // Separated form: V(Ca) = integral from Ca to Ca0 of v0/(k*C) dC.
                // The quadrature produces the required volume; the root-finder
                // closes the (linear) residual V(target) - V = 0 from mid-span.
                let v0 = self.volumetric_flow;
                let k = self.rate_constant;
                let integral = quad(|c| v0 / (k * c), target, self.feed_concentration)?;
                finder.solve(|v| integral.value - v, 0.5 * v_max)
            }
            InverseStrategy::EventIntegration => {
                let crossing = integrator.solve_until(
                    |_v, ca| self.derivative(ca),
                    |_v, ca| ca - target,
                    self.feed_concentration,
                    0.0,
                    v_max,
                    EventDirection::Falling,
                )?;
                Ok(crossing.x)
            }
            InverseStrategy::InterpolateInvert => {
                let grid: Vec<f64> = (0..=INVERSE_GRID_SPANS)
                    .map(|i| v_max * i as f64 / INVERSE_GRID_SPANS as f64)
                    .collect();
                let trace = self.integrate(integrator, &grid)?;
                let interp = Interpolant::cubic_spline(&trace.xs(), &trace.ys())?;
                interp.invert(target, 0.5 * v_max, finder)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn textbook_pfr() -> Pfr {
        // k = 0.23 /min, Ca0 = 3.0 mol/L, v0 = 10 L/min
        Pfr::new(0.23, 3.0, 10.0)
    }

    #[test]
    fn test_analytic_profile() {
        let pfr = textbook_pfr();
        assert_relative_eq!(pfr.concentration_at(0.0), 3.0, max_relative = 1e-12);
        assert_relative_eq!(pfr.concentration_at(100.0), 0.3008, max_relative = 1e-3);
    }

    #[test]
    fn test_integration_matches_analytic() {
        let pfr = textbook_pfr();
        let integrator = OdeIntegrator::default();
        let exit = pfr.exit_concentration(&integrator, 100.0).unwrap();
        assert_relative_eq!(exit, 0.3008, max_relative = 1e-3);
        assert_relative_eq!(exit, pfr.concentration_at(100.0), max_relative = 1e-6);
    }

    #[test]
    fn test_profile_trace_is_monotone_decreasing() {
        let pfr = textbook_pfr();
        let integrator = OdeIntegrator::default();
        let grid: Vec<f64> = (0..=20).map(|i| i as f64 * 5.0).collect();
        let trace = pfr.integrate(&integrator, &grid).unwrap();
        let ys = trace.ys();
        assert!(ys.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_inverse_volume_all_strategies() {
        let pfr = textbook_pfr();
        let integrator = OdeIntegrator::default();
        let finder = RootFinder::default();

        // Analytical answer: (v0/k) * ln(Ca0/0.3) = 100.112 L
        let expected = 10.0 / 0.23 * (3.0_f64 / 0.3).ln();

        let strategies = [
            InverseStrategy::QuadratureRootFind,
            InverseStrategy::EventIntegration,
            InverseStrategy::InterpolateInvert,
        ];
        let mut volumes = Vec::new();
        for strategy in strategies {
            let v = pfr
                .volume_for_exit(0.3, 150.0, strategy, &integrator, &finder)
                .unwrap();
            assert!((v - expected).abs() < 0.1, "{:?} gave {}", strategy, v);
            volumes.push(v);
        }

        // The strategies are independent but must agree closely.
        for pair in volumes.windows(2) {
            assert!((pair[0] - pair[1]).abs() < 0.01);
        }
    }

    #[test]
    fn test_inverse_volume_matches_textbook_figure() {
        let pfr = textbook_pfr();
        let integrator = OdeIntegrator::default();
        let finder = RootFinder::default();
        let v = pfr
            .volume_for_exit(
                0.3,
                150.0,
                InverseStrategy::QuadratureRootFind,
                &integrator,
                &finder,
            )
            .unwrap();
        assert!((v - 100.11).abs() < 0.1);
    }

    #[test]
    fn test_event_strategy_requires_reachable_target() {
        let pfr = textbook_pfr();
        let integrator = OdeIntegrator::default();
        let finder = RootFinder::default();
        // Within 10 L the concentration only falls to 2.38 mol/L; a target
        // of 0.3 is unreachable and must be reported, not fabricated.
        let result = pfr.volume_for_exit(
            0.3,
            10.0,
            InverseStrategy::EventIntegration,
            &integrator,
            &finder,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_idempotence() {
        let pfr = textbook_pfr();
        let integrator = OdeIntegrator::default();
        let finder = RootFinder::default();
        let a = pfr
            .volume_for_exit(0.3, 150.0, InverseStrategy::EventIntegration, &integrator, &finder)
            .unwrap();
        let b = pfr
            .volume_for_exit(0.3, 150.0, InverseStrategy::EventIntegration, &integrator, &finder)
            .unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
