//! # Molbal: Mole-Balance Models for Ideal Chemical Reactors
//!
//! A small library pairing the mole balances of the three ideal reactor
//! archetypes (CSTR, batch, and plug flow) with the generic numerical
//! primitives needed to solve them: scalar root-finding, initial-value ODE
//! integration (plain and event-terminated), adaptive quadrature,
//! interpolation-based inversion, and linear uncertainty propagation.
//!
//! Every balance reduces to the same conservation statement,
//!
//! ```text
//! accumulation = in - out + generation
//! ```
//!
//! specialized per reactor type. At steady state the accumulation term is
//! zero and the balance becomes an algebraic residual for a root-finder; in
//! transient or spatial form it becomes a derivative for an ODE integrator.
//!
//! ## Example
//!
//! Exit concentration of a steady-state CSTR with first-order consumption,
//! solved both in closed form and by root-finding the mole-balance residual:
//!
//! ```
//! use molbal::models::Cstr;
//! use molbal::solvers::RootFinder;
//!
//! // k = 0.23 /hr, Fa0 = 1.0 mol/hr, v0 = 2.5 L/hr, V = 10 L
//! let cstr = Cstr::new(0.23, 1.0, 2.5, 10.0);
//!
//! let closed_form = cstr.exit_concentration();
//! let finder = RootFinder::default();
//! let solved = cstr.solve_exit_concentration(&finder, 1.0).unwrap();
//!
//! assert!((closed_form - 0.2083).abs() < 1e-4);
//! assert!((solved - closed_form).abs() < 1e-8);
//! ```
//!
//! ## Design
//!
//! Each worked problem carries its parameters in an explicit struct
//! ([`models::Cstr`], [`models::Batch`], [`models::Pfr`]); nothing is shared
//! between problems and every solver call is stateless, so repeated solves
//! with identical inputs produce identical results.
//!
//! Physically nonsensical inputs (negative volumes, inconsistent units) are
//! deliberately not validated: a linear residual in the wrong units still has
//! a "successful" root, just not a physically meaningful one. The caller owns
//! the units.

pub mod models;
pub mod solvers;
pub mod uncertainty;

pub use solvers::{SolverError, SolverResult};
pub use uncertainty::Uncertain;

/// An ordered sequence of (independent variable, state) pairs produced by
/// numerical integration.
///
/// Traces are finite, fully materialized, and ordered the same way as the
/// evaluation grid that produced them. The last entry approximates the
/// solution at the final requested point.
///
/// # Examples
///
/// ```
/// use molbal::Trace;
///
/// let mut trace = Trace::new();
/// trace.push(0.0, 2.0);
/// trace.push(1.0, 1.589);
///
/// assert_eq!(trace.len(), 2);
/// assert_eq!(trace.last(), Some((1.0, 1.589)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    points: Vec<(f64, f64)>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Trace { points: Vec::new() }
    }

    /// Creates a trace from an existing point sequence.
    pub fn from_points(points: Vec<(f64, f64)>) -> Self {
        Trace { points }
    }

    /// Appends a point to the trace.
    pub fn push(&mut self, x: f64, y: f64) {
        self.points.push((x, y));
    }

    /// Number of points in the trace.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the trace holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point, if any.
    pub fn first(&self) -> Option<(f64, f64)> {
        self.points.first().copied()
    }

    /// Last point, if any.
    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }

    /// All points as a slice.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Independent-variable values, in order.
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|&(x, _)| x).collect()
    }

    /// State values, in order.
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, y)| y).collect()
    }

    /// Iterates over the points.
    pub fn iter(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a (f64, f64);
    type IntoIter = std::slice::Iter<'a, (f64, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_accessors() {
        let trace = Trace::from_points(vec![(0.0, 3.0), (50.0, 0.95), (100.0, 0.3)]);
        assert_eq!(trace.len(), 3);
        assert!(!trace.is_empty());
        assert_eq!(trace.first(), Some((0.0, 3.0)));
        assert_eq!(trace.last(), Some((100.0, 0.3)));
        assert_eq!(trace.xs(), vec![0.0, 50.0, 100.0]);
        assert_eq!(trace.ys(), vec![3.0, 0.95, 0.3]);
    }

    #[test]
    fn test_trace_push_preserves_order() {
        let mut trace = Trace::new();
        assert!(trace.is_empty());
        trace.push(0.0, 1.0);
        trace.push(0.5, 0.8);
        trace.push(1.0, 0.6);
        let xs = trace.xs();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_trace_iteration() {
        let trace = Trace::from_points(vec![(0.0, 1.0), (1.0, 2.0)]);
        let sum: f64 = trace.iter().map(|&(_, y)| y).sum();
        assert_eq!(sum, 3.0);
        let count = (&trace).into_iter().count();
        assert_eq!(count, 2);
    }
}
