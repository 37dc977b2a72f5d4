//! Mole-balance models for the three ideal reactor archetypes.
//!
//! Every model starts from the same conservation statement,
//!
//! ```text
//! accumulation = in - out + generation
//! ```
//!
//! applied to species A undergoing first-order consumption `r = k * Ca`:
//!
//! | Reactor | Balance | Character |
//! |---------|---------|-----------|
//! | [`Cstr`] | `0 = Fa0 - v0*Ca - k*Ca*V` | algebraic (steady state) |
//! | [`Batch`] | `dCa/dt = -k*Ca` | ODE in time |
//! | [`Pfr`] | `dCa/dV = -(k/v0)*Ca` | ODE in reactor volume |
//!
//! Each problem is a plain parameter struct: constants live with the problem
//! they belong to, not in shared state, so two problems can never contaminate
//! each other. Units are the caller's responsibility and are documented per
//! field; nothing checks them.

pub mod batch;
pub mod cstr;
pub mod pfr;

pub use batch::Batch;
pub use cstr::Cstr;
pub use pfr::{InverseStrategy, Pfr};
