//! Interpolation over solved grids, with root-finder-based inversion.
//!
//! Integrating once over a dense grid and inverting the interpolant is often
//! cheaper than re-running the ODE integrator inside a root-finder: the grid
//! is solved a single time, and every subsequent query is a polynomial
//! evaluation.

use crate::solvers::{RootFinder, SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Linear,
    CubicSpline,
}

/// Continuous approximation of a discrete (x, y) grid.
///
/// Two smoothing schemes are provided: piecewise-linear and natural cubic
/// spline. Evaluation outside the data range is an error; the grid must be
/// strictly increasing in x.
///
/// # Examples
///
/// ```
/// use molbal::solvers::interpolate::Interpolant;
///
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// let ys = [0.0, 1.0, 4.0, 9.0];
/// let interp = Interpolant::cubic_spline(&xs, &ys).unwrap();
///
/// let y = interp.eval(1.5).unwrap();
/// assert!((y - 2.25).abs() < 0.15);
/// ```
#[derive(Debug, Clone)]
pub struct Interpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots (cubic spline only)
    second_derivatives: Vec<f64>,
    kind: Kind,
}

impl Interpolant {
    /// Builds a piecewise-linear interpolant. Requires at least two points.
    pub fn linear(xs: &[f64], ys: &[f64]) -> SolverResult<Self> {
        Self::validate(xs, ys, 2)?;
        Ok(Interpolant {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second_derivatives: Vec::new(),
            kind: Kind::Linear,
        })
    }

    /// Builds a natural cubic spline (zero curvature at both ends).
    /// Requires at least three points.
    pub fn cubic_spline(xs: &[f64], ys: &[f64]) -> SolverResult<Self> {
        Self::validate(xs, ys, 3)?;

        let n = xs.len();
        let inner = n - 2;

        // Tridiagonal system for the interior second derivatives:
        // h_{i-1} m_{i-1} + 2(h_{i-1}+h_i) m_i + h_i m_{i+1} = 6 (s_i - s_{i-1})
        let mut matrix = DMatrix::<f64>::zeros(inner, inner);
        let mut rhs = DVector::<f64>::zeros(inner);
        for i in 1..n - 1 {
            let h_prev = xs[i] - xs[i - 1];
            let h_next = xs[i + 1] - xs[i];
            let row = i - 1;
            if row > 0 {
                matrix[(row, row - 1)] = h_prev;
            }
            matrix[(row, row)] = 2.0 * (h_prev + h_next);
            if row + 1 < inner {
                matrix[(row, row + 1)] = h_next;
            }
            rhs[row] =
                6.0 * ((ys[i + 1] - ys[i]) / h_next - (ys[i] - ys[i - 1]) / h_prev);
        }

        let decomp = matrix.lu();
        let solution = decomp.solve(&rhs).ok_or(SolverError::SingularSystem)?;

        let mut second_derivatives = vec![0.0; n];
        for (row, value) in solution.iter().enumerate() {
            second_derivatives[row + 1] = *value;
        }

        Ok(Interpolant {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second_derivatives,
            kind: Kind::CubicSpline,
        })
    }

    fn validate(xs: &[f64], ys: &[f64], needed: usize) -> SolverResult<()> {
        if xs.len() != ys.len() {
            return Err(SolverError::LengthMismatch { x_len: xs.len(), y_len: ys.len() });
        }
        if xs.len() < needed {
            return Err(SolverError::InsufficientPoints { needed, got: xs.len() });
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SolverError::NonMonotonicGrid);
        }
        Ok(())
    }

    /// The x-range covered by the data.
    pub fn range(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Evaluates the interpolant at `x`.
    ///
    /// # Errors
    ///
    /// [`SolverError::OutOfRange`] if `x` falls outside the data range.
    pub fn eval(&self, x: f64) -> SolverResult<f64> {
        let (lo, hi) = self.range();
        if x < lo || x > hi {
            return Err(SolverError::OutOfRange { x, lo, hi });
        }
        Ok(self.eval_unchecked(x))
    }

    /// Evaluates without the range check; `x` must lie within the data range.
    fn eval_unchecked(&self, x: f64) -> f64 {
        // Locate the interval: largest j with xs[j] <= x, capped at n-2.
        let j = self
            .xs
            .partition_point(|&knot| knot <= x)
            .saturating_sub(1)
            .min(self.xs.len() - 2);

        let xa = self.xs[j];
        let xb = self.xs[j + 1];
        let ya = self.ys[j];
        let yb = self.ys[j + 1];
        let h = xb - xa;

        match self.kind {
            Kind::Linear => ya + (yb - ya) * (x - xa) / h,
            Kind::CubicSpline => {
                let ma = self.second_derivatives[j];
                let mb = self.second_derivatives[j + 1];
                let da = xb - x;
                let db = x - xa;
                (ma * da.powi(3) + mb * db.powi(3)) / (6.0 * h)
                    + (ya / h - ma * h / 6.0) * da
                    + (yb / h - mb * h / 6.0) * db
            }
        }
    }

    /// Solves `interp(x) = target` with the given root-finder.
    ///
    /// The residual is evaluated with `x` clamped to the data range so that
    /// intermediate Newton steps cannot wander out of bounds; the returned
    /// root is clamped likewise.
    pub fn invert(&self, target: f64, guess: f64, finder: &RootFinder) -> SolverResult<f64> {
        let (lo, hi) = self.range();
        let root = finder.solve(|x| self.eval_unchecked(x.clamp(lo, hi)) - target, guess)?;
        Ok(root.clamp(lo, hi))
    }
}
