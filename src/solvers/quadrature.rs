//! Adaptive definite quadrature.
//!
//! Used to convert a differential mole balance into a closed-form residual
//! for the root-finder when the integral form is analytically cheap. For a
//! first-order PFR, for example, separating variables gives
//!
//! ```text
//! V(Ca) = integral from Ca to Ca0 of v0 / (k * C) dC
//! ```
//!
//! which [`quad`] evaluates directly, with an error estimate.

use crate::solvers::{SolverError, SolverResult};

/// Options for adaptive quadrature.
#[derive(Debug, Clone)]
pub struct QuadOptions {
    /// Relative tolerance
    pub rtol: f64,
    /// Absolute tolerance
    pub atol: f64,
    /// Maximum subdivision depth
    pub limit: usize,
}

impl Default for QuadOptions {
    fn default() -> Self {
        QuadOptions { rtol: 1e-10, atol: 1e-12, limit: 50 }
    }
}

/// Result of adaptive quadrature.
#[derive(Debug, Clone)]
pub struct QuadResult {
    /// Computed integral value
    pub value: f64,
    /// Estimated absolute error
    pub error: f64,
    /// Number of integrand evaluations
    pub evals: usize,
}

/// Computes the definite integral of `f` over `[a, b]` with default options.
///
/// Adaptive Simpson subdivision with a Richardson error estimate. Returns the
/// value, the accumulated error estimate, and the evaluation count.
///
/// # Examples
///
/// ```
/// use molbal::solvers::quadrature::quad;
///
/// let result = quad(|x| x * x, 0.0, 3.0).unwrap();
/// assert!((result.value - 9.0).abs() < 1e-9);
/// assert!(result.error < 1e-9);
/// ```
///
/// # Errors
///
/// [`SolverError::QuadratureDidNotConverge`] if the subdivision limit is
/// reached before the tolerance is met; the error carries the best value and
/// its estimate.
pub fn quad<F>(f: F, a: f64, b: f64) -> SolverResult<QuadResult>
where
    F: Fn(f64) -> f64,
{
    quad_with_options(f, a, b, &QuadOptions::default())
}

/// Computes the definite integral of `f` over `[a, b]`.
pub fn quad_with_options<F>(f: F, a: f64, b: f64, options: &QuadOptions) -> SolverResult<QuadResult>
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return Ok(QuadResult { value: 0.0, error: 0.0, evals: 0 });
    }

    let mut evals = 0usize;
    let m = 0.5 * (a + b);
    let fa = f(a);
    let fm = f(m);
    let fb = f(b);
    evals += 3;

    let whole = simpson(a, b, fa, fm, fb);
    let tolerance = options.atol.max(options.rtol * whole.abs());

    let (value, error, converged) =
        adapt(&f, a, b, fa, fm, fb, whole, tolerance, options.limit, &mut evals);

    if converged {
        Ok(QuadResult { value, error, evals })
    } else {
        Err(SolverError::QuadratureDidNotConverge { value, error })
    }
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

/// Recursive adaptive Simpson step. The factor 15 comes from the Richardson
/// extrapolation of the composite rule against the single-panel rule.
#[allow(clippy::too_many_arguments)]
fn adapt<F>(
    f: &F,
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tolerance: f64,
    depth: usize,
    evals: &mut usize,
) -> (f64, f64, bool)
where
    F: Fn(f64) -> f64,
{
    let m = 0.5 * (a + b);
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);
    *evals += 2;

    let left = simpson(a, m, fa, flm, fm);
    let right = simpson(m, b, fm, frm, fb);
    let delta = left + right - whole;

    if delta.abs() <= 15.0 * tolerance {
        return (left + right + delta / 15.0, delta.abs() / 15.0, true);
    }
    if depth == 0 {
        return (left + right, delta.abs(), false);
    }

    let (lv, le, lc) = adapt(f, a, m, fa, flm, fm, left, 0.5 * tolerance, depth - 1, evals);
    let (rv, re, rc) = adapt(f, m, b, fm, frm, fb, right, 0.5 * tolerance, depth - 1, evals);
    (lv + rv, le + re, lc && rc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_exact() {
        // Simpson is exact for cubics; the adaptive wrapper must not disturb that.
        let result = quad(|x| x.powi(3) - 2.0 * x + 1.0, -1.0, 2.0).unwrap();
        assert_relative_eq!(result.value, 3.75, max_relative = 1e-12);
    }

    #[test]
    fn test_reciprocal_integrand() {
        // The PFR design-equation integrand: v0/(k*C) with v0=10, k=0.23.
        let v0 = 10.0;
        let k = 0.23;
        let result = quad(|c| v0 / (k * c), 0.3, 3.0).unwrap();
        let expected = v0 / k * (3.0_f64 / 0.3).ln();
        assert_relative_eq!(result.value, expected, max_relative = 1e-9);
        assert!(result.evals > 3);
    }

    #[test]
    fn test_reversed_bounds_flip_sign() {
        let forward = quad(|x| x.exp(), 0.0, 1.0).unwrap();
        let backward = quad(|x| x.exp(), 1.0, 0.0).unwrap();
        assert_relative_eq!(forward.value, -backward.value, max_relative = 1e-10);
    }

    #[test]
    fn test_degenerate_interval() {
        let result = quad(|x| x.sin(), 2.0, 2.0).unwrap();
        assert_eq!(result.value, 0.0);
        assert_eq!(result.evals, 0);
    }

    #[test]
    fn test_subdivision_limit_reported() {
        let options = QuadOptions { rtol: 1e-14, atol: 1e-16, limit: 2 };
        // Oscillatory integrand cannot converge with only two subdivision levels.
        let err = quad_with_options(|x| (50.0 * x).sin(), 0.0, 10.0, &options).unwrap_err();
        match err {
            SolverError::QuadratureDidNotConverge { value, error } => {
                assert!(value.is_finite());
                assert!(error > 0.0);
            }
            other => panic!("expected QuadratureDidNotConverge, got {:?}", other),
        }
    }

    #[test]
    fn test_error_estimate_bounds_true_error() {
        let result = quad(|x| (-x).exp(), 0.0, 5.0).unwrap();
        let exact = 1.0 - (-5.0_f64).exp();
        assert!((result.value - exact).abs() <= result.error.max(1e-10));
    }
}
