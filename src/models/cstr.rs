//! Continuously stirred tank reactor (CSTR) at steady state.
//!
//! Perfect mixing makes the reactor contents uniform and equal to the exit
//! stream, so the species-A mole balance with first-order consumption is
//! purely algebraic:
//!
//! ```text
//! accumulation = in - out + generation
//! 0 = Fa0 - v0*Ca - k*Ca*V
//! ```
//!
//! The balance is linear in `Ca` and has the closed form
//! `Ca = Fa0 / (v0 + k*V)`; the residual/root-finder route exists to
//! demonstrate the general pattern that survives when the kinetics are not
//! first-order.

use crate::solvers::{RootFinder, SolverResult};
use crate::uncertainty::Uncertain;

/// Steady-state CSTR problem with first-order consumption of species A.
///
/// # Examples
///
/// ```
/// use molbal::models::Cstr;
///
/// let cstr = Cstr::new(0.23, 1.0, 2.5, 10.0);
/// assert!((cstr.exit_concentration() - 0.2083).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Cstr {
    /// First-order rate constant k (1/hr)
    pub rate_constant: f64,
    /// Inlet molar flow of A, Fa0 (mol/hr)
    pub feed_rate: f64,
    /// Volumetric flow v0 (L/hr)
    pub volumetric_flow: f64,
    /// Reactor volume V (L)
    pub volume: f64,
}

impl Cstr {
    /// Creates a CSTR problem. Arguments in order: k, Fa0, v0, V.
    pub fn new(rate_constant: f64, feed_rate: f64, volumetric_flow: f64, volume: f64) -> Self {
        Cstr { rate_constant, feed_rate, volumetric_flow, volume }
    }

    /// Mole-balance residual at a trial exit concentration:
    /// `Fa0 - v0*Ca - k*Ca*V`. Zero at the steady state.
    pub fn residual(&self, ca: f64) -> f64 {
        self.feed_rate - self.volumetric_flow * ca - self.rate_constant * ca * self.volume
    }

    /// Closed-form exit concentration `Fa0 / (v0 + k*V)` (mol/L).
    pub fn exit_concentration(&self) -> f64 {
        self.feed_rate / (self.volumetric_flow + self.rate_constant * self.volume)
    }

    /// Solves the mole-balance residual for the exit concentration with a
    /// root-finder, from the given initial guess.
    ///
    /// The residual is linear, so any same-scale guess converges; a
    /// wrong-units guess still "converges" to a physically wrong value.
    pub fn solve_exit_concentration(&self, finder: &RootFinder, guess: f64) -> SolverResult<f64> {
        finder.solve(|ca| self.residual(ca), guess)
    }

    /// Closed-form exit concentration with an uncertain rate constant.
    ///
    /// All other parameters are treated as exact; the uncertainty in `k`
    /// propagates through `Fa0 / (v0 + k*V)` by the first-order rule, giving
    /// `sigma_Ca = Fa0*V / (v0 + k*V)^2 * sigma_k`.
    pub fn exit_concentration_uncertain(&self, rate_constant: Uncertain) -> Uncertain {
        self.feed_rate / (self.volumetric_flow + rate_constant * self.volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn textbook_cstr() -> Cstr {
        // k = 0.23 /hr, Fa0 = 1.0 mol/hr, v0 = 2.5 L/hr, V = 10 L
        Cstr::new(0.23, 1.0, 2.5, 10.0)
    }

    #[test]
    fn test_closed_form_exit_concentration() {
        let cstr = textbook_cstr();
        // Exact value is 0.208333...; compare against the rounded figure.
        assert_relative_eq!(cstr.exit_concentration(), 0.2083, max_relative = 1e-3);
    }

    #[test]
    fn test_root_find_matches_closed_form() {
        let cstr = textbook_cstr();
        let finder = RootFinder::default();
        let solved = cstr.solve_exit_concentration(&finder, 1.0).unwrap();
        assert_relative_eq!(solved, cstr.exit_concentration(), max_relative = 1e-10);
    }

    #[test]
    fn test_residual_vanishes_at_solution() {
        let cstr = textbook_cstr();
        let ca = cstr.exit_concentration();
        assert!(cstr.residual(ca).abs() < 1e-12);
        // Away from the solution the residual is signed.
        assert!(cstr.residual(0.0) > 0.0);
        assert!(cstr.residual(1.0) < 0.0);
    }

    #[test]
    fn test_any_same_scale_guess_converges() {
        let cstr = textbook_cstr();
        let finder = RootFinder::default();
        for guess in [0.01, 0.5, 1.0, 10.0, -3.0] {
            let solved = cstr.solve_exit_concentration(&finder, guess).unwrap();
            assert_relative_eq!(solved, cstr.exit_concentration(), max_relative = 1e-8);
        }
    }

    #[test]
    fn test_uncertain_rate_constant() {
        let cstr = textbook_cstr();
        let ca = cstr.exit_concentration_uncertain(Uncertain::new(0.23, 0.10));

        assert_relative_eq!(ca.value, cstr.exit_concentration(), max_relative = 1e-12);
        // |dCa/dk| * sigma_k = Fa0*V/(v0 + k*V)^2 * 0.10 = 10/4.8^2 * 0.10
        let expected_sigma = 1.0 * 10.0 / (4.8_f64 * 4.8) * 0.10;
        assert_relative_eq!(ca.sigma, expected_sigma, max_relative = 1e-10);
        // Textbook figure: roughly 0.04 mol/L within 10%.
        assert!((ca.sigma - 0.04).abs() / 0.04 < 0.10);
    }

    #[test]
    fn test_idempotence() {
        let cstr = textbook_cstr();
        let finder = RootFinder::default();
        let a = cstr.solve_exit_concentration(&finder, 1.0).unwrap();
        let b = cstr.solve_exit_concentration(&finder, 1.0).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
