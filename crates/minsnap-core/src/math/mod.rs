//! Mathematical building blocks for trajectory generation
//!
//! Fixed-degree polynomials and piecewise polynomial curves.

pub mod polynomial;
pub mod piecewise;

pub use polynomial::*;
pub use piecewise::*;
