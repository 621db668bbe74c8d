//! Fixed-capacity polynomials
//!
//! Segment polynomials are stored in the monomial basis with at most
//! [`POLY_COEFFS`] coefficients (degree ≤ 7), in ascending power order:
//!
//! ```text
//! f(τ) = c₀ + c₁τ + c₂τ² + ... + c₇τ⁷
//! ```
//!
//! where τ is the local time elapsed since the start of the segment.

use serde::{Deserialize, Serialize};

/// Number of coefficients of a segment polynomial (degree 7)
pub const POLY_COEFFS: usize = 8;

/// Immutable polynomial of degree at most 7
///
/// `len` is the number of meaningful coefficients. Differentiation drops
/// one coefficient, so the nominal degree strictly decreases; once `len`
/// reaches zero the polynomial is identically zero.
///
/// Serialized as the sequence of meaningful coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Polynomial {
    coeffs: [f64; POLY_COEFFS],
    len: usize,
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Vec<f64>> for Polynomial {
    type Error = String;

    fn try_from(coeffs: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&coeffs).ok_or_else(|| {
            format!(
                "expected at most {} coefficients, got {}",
                POLY_COEFFS,
                coeffs.len()
            )
        })
    }
}

impl From<Polynomial> for Vec<f64> {
    fn from(p: Polynomial) -> Self {
        p.coefficients().to_vec()
    }
}

impl Polynomial {
    /// Create a degree-7 polynomial from its 8 coefficients (ascending powers)
    pub fn new(coeffs: [f64; POLY_COEFFS]) -> Self {
        Self {
            coeffs,
            len: POLY_COEFFS,
        }
    }

    /// Create a polynomial from a slice of at most 8 coefficients
    ///
    /// Returns `None` if more than 8 coefficients are given.
    pub fn from_slice(coeffs: &[f64]) -> Option<Self> {
        if coeffs.len() > POLY_COEFFS {
            return None;
        }
        let mut padded = [0.0; POLY_COEFFS];
        padded[..coeffs.len()].copy_from_slice(coeffs);
        Some(Self {
            coeffs: padded,
            len: coeffs.len(),
        })
    }

    /// The identically-zero polynomial
    pub fn zero() -> Self {
        Self {
            coeffs: [0.0; POLY_COEFFS],
            len: 0,
        }
    }

    /// All-ones degree-7 polynomial used to generate constraint rows
    ///
    /// After k calls to [`Polynomial::derivative`], its coefficients are the
    /// falling factorials that multiply the unknown coefficients in the
    /// k-th derivative, so [`Polynomial::basis_row_at`] yields the
    /// corresponding constraint row.
    pub fn constraint_template() -> Self {
        Self::new([1.0; POLY_COEFFS])
    }

    /// Meaningful coefficients in ascending power order
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs[..self.len]
    }

    /// Nominal degree, `None` for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// True once differentiated past degree 0
    pub fn is_zero(&self) -> bool {
        self.len == 0
    }

    /// Evaluate f(τ) using Horner's scheme
    pub fn eval(&self, tau: f64) -> f64 {
        self.coefficients()
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * tau + c)
    }

    /// First derivative: c'ₖ = (k + 1)·cₖ₊₁
    pub fn derivative(&self) -> Self {
        if self.len <= 1 {
            return Self::zero();
        }

        let mut coeffs = [0.0; POLY_COEFFS];
        for k in 0..self.len - 1 {
            coeffs[k] = self.coeffs[k + 1] * (k + 1) as f64;
        }

        Self {
            coeffs,
            len: self.len - 1,
        }
    }

    /// Derivative of the given order (order 0 returns a copy)
    pub fn nth_derivative(&self, order: usize) -> Self {
        (0..order).fold(*self, |p, _| p.derivative())
    }

    /// Evaluate the `order`-th derivative at τ
    pub fn eval_derivative(&self, tau: f64, order: usize) -> f64 {
        self.nth_derivative(order).eval(tau)
    }

    /// Row `[c₀τ⁰, c₁τ¹, ...]` left-padded with zeros to width 8
    ///
    /// For the constraint template differentiated k times, entry j of the
    /// row is the factor multiplying coefficient j in the k-th derivative
    /// evaluated at τ.
    pub fn basis_row_at(&self, tau: f64) -> [f64; POLY_COEFFS] {
        let mut row = [0.0; POLY_COEFFS];
        let offset = POLY_COEFFS - self.len;
        let mut power = 1.0;
        for (k, c) in self.coefficients().iter().enumerate() {
            row[offset + k] = c * power;
            power *= tau;
        }
        row
    }
}
