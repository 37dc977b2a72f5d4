//! Linear (first-order) uncertainty propagation.
//!
//! A physical quantity is represented as a nominal value plus a standard
//! deviation. Arithmetic propagates uncertainty by the linearized
//! error-propagation rule: partial derivatives times the input variances,
//! summed in quadrature, under the assumption that inputs are uncorrelated.
//!
//! For `z = f(a, b)`:
//!
//! ```text
//! sigma_z^2 = (df/da)^2 sigma_a^2 + (df/db)^2 sigma_b^2
//! ```
//!
//! Correlated inputs are not modeled; combining an [`Uncertain`] with itself
//! (e.g. `x * x`) therefore overestimates the spread compared to `x.powi(2)`,
//! which applies the single-variable rule. Prefer the method forms when the
//! same measured quantity appears more than once.
//!
//! # Examples
//!
//! ```
//! use molbal::Uncertain;
//!
//! // CSTR exit concentration with an uncertain rate constant:
//! // Ca = Fa0 / (v0 + k*V), k = 0.23 +/- 0.10 /hr
//! let k = Uncertain::new(0.23, 0.10);
//! let ca = 1.0 / (2.5 + k * 10.0);
//!
//! assert!((ca.value - 0.2083).abs() < 1e-4);
//! assert!((ca.sigma - 0.0434).abs() < 1e-3);
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A physical quantity with first-order Gaussian uncertainty.
///
/// Fields are public; `sigma` is kept non-negative by the constructors and by
/// every propagation rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uncertain {
    /// Nominal value
    pub value: f64,
    /// Standard deviation
    pub sigma: f64,
}

impl Uncertain {
    /// Creates a quantity with the given nominal value and standard
    /// deviation. The sign of `sigma` is ignored.
    pub fn new(value: f64, sigma: f64) -> Self {
        Uncertain { value, sigma: sigma.abs() }
    }

    /// Creates an exact quantity (zero standard deviation).
    pub fn exact(value: f64) -> Self {
        Uncertain { value, sigma: 0.0 }
    }

    /// Relative standard deviation `sigma / |value|`.
    pub fn relative_sigma(&self) -> f64 {
        self.sigma / self.value.abs()
    }

    /// `e^x` with propagated uncertainty `e^x * sigma`.
    pub fn exp(self) -> Self {
        let value = self.value.exp();
        Uncertain { value, sigma: value * self.sigma }
    }

    /// Natural logarithm with propagated uncertainty `sigma / |x|`.
    pub fn ln(self) -> Self {
        Uncertain { value: self.value.ln(), sigma: self.sigma / self.value.abs() }
    }

    /// Integer power with the single-variable rule `|n x^(n-1)| sigma`.
    pub fn powi(self, n: i32) -> Self {
        let derivative = n as f64 * self.value.powi(n - 1);
        Uncertain { value: self.value.powi(n), sigma: derivative.abs() * self.sigma }
    }

    /// Real power with the single-variable rule `|p x^(p-1)| sigma`.
    pub fn powf(self, p: f64) -> Self {
        let derivative = p * self.value.powf(p - 1.0);
        Uncertain { value: self.value.powf(p), sigma: derivative.abs() * self.sigma }
    }

    /// Reciprocal with propagated uncertainty `sigma / x^2`.
    pub fn recip(self) -> Self {
        Uncertain { value: self.value.recip(), sigma: self.sigma / (self.value * self.value) }
    }
}

impl fmt::Display for Uncertain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "{:.*} ± {:.*}", precision, self.value, precision, self.sigma)
        } else {
            write!(f, "{} ± {}", self.value, self.sigma)
        }
    }
}

impl Add for Uncertain {
    type Output = Uncertain;
    fn add(self, rhs: Uncertain) -> Uncertain {
        Uncertain { value: self.value + rhs.value, sigma: self.sigma.hypot(rhs.sigma) }
    }
}

impl Sub for Uncertain {
    type Output = Uncertain;
    fn sub(self, rhs: Uncertain) -> Uncertain {
        Uncertain { value: self.value - rhs.value, sigma: self.sigma.hypot(rhs.sigma) }
    }
}

impl Mul for Uncertain {
    type Output = Uncertain;
    fn mul(self, rhs: Uncertain) -> Uncertain {
        Uncertain {
            value: self.value * rhs.value,
            sigma: (self.sigma * rhs.value).hypot(rhs.sigma * self.value),
        }
    }
}

impl Div for Uncertain {
    type Output = Uncertain;
    fn div(self, rhs: Uncertain) -> Uncertain {
        let value = self.value / rhs.value;
        Uncertain {
            value,
            sigma: (self.sigma / rhs.value).hypot(self.value * rhs.sigma / (rhs.value * rhs.value)),
        }
    }
}

impl Neg for Uncertain {
    type Output = Uncertain;
    fn neg(self) -> Uncertain {
        Uncertain { value: -self.value, sigma: self.sigma }
    }
}

// Exact scalars on either side carry zero variance.

impl Add<f64> for Uncertain {
    type Output = Uncertain;
    fn add(self, rhs: f64) -> Uncertain {
        self + Uncertain::exact(rhs)
    }
}

impl Add<Uncertain> for f64 {
    type Output = Uncertain;
    fn add(self, rhs: Uncertain) -> Uncertain {
        Uncertain::exact(self) + rhs
    }
}

impl Sub<f64> for Uncertain {
    type Output = Uncertain;
    fn sub(self, rhs: f64) -> Uncertain {
        self - Uncertain::exact(rhs)
    }
}

impl Sub<Uncertain> for f64 {
    type Output = Uncertain;
    fn sub(self, rhs: Uncertain) -> Uncertain {
        Uncertain::exact(self) - rhs
    }
}

impl Mul<f64> for Uncertain {
    type Output = Uncertain;
    fn mul(self, rhs: f64) -> Uncertain {
        self * Uncertain::exact(rhs)
    }
}

impl Mul<Uncertain> for f64 {
    type Output = Uncertain;
    fn mul(self, rhs: Uncertain) -> Uncertain {
        Uncertain::exact(self) * rhs
    }
}

impl Div<f64> for Uncertain {
    type Output = Uncertain;
    fn div(self, rhs: f64) -> Uncertain {
        self / Uncertain::exact(rhs)
    }
}

impl Div<Uncertain> for f64 {
    type Output = Uncertain;
    fn div(self, rhs: Uncertain) -> Uncertain {
        Uncertain::exact(self) / rhs
    }
}
