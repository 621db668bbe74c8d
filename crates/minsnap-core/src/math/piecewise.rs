//! Piecewise polynomial curves
//!
//! A sequence of segment polynomials joined at knots. Segment `i` is
//! evaluated in local time over `[0, duration_i)`; the last segment also
//! covers its closing instant so the final knot is reachable.

use serde::Serialize;
use thiserror::Error;

use super::polynomial::Polynomial;

/// Evaluation errors
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EvalError {
    #[error("Time {t} outside trajectory span [{start}, {end}]")]
    OutOfRange { t: f64, start: f64, end: f64 },
}

/// Ordered polynomial segments on a shared time axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PiecewisePolynomial {
    /// Segment polynomials in local time
    segments: Vec<Polynomial>,
    /// Absolute knot times (segments.len() + 1 entries)
    knots: Vec<f64>,
}

impl PiecewisePolynomial {
    /// Create from segments and their durations, starting at t = 0
    ///
    /// Knots are the prefix sums of the durations. Returns `None` if the
    /// lengths disagree or a duration is not strictly positive.
    pub fn new(segments: Vec<Polynomial>, durations: &[f64]) -> Option<Self> {
        let mut knots = Vec::with_capacity(durations.len() + 1);
        knots.push(0.0);
        for &dt in durations {
            let last = knots[knots.len() - 1];
            knots.push(last + dt);
        }
        Self::from_knots(segments, knots)
    }

    /// Create from segments and absolute knot times
    ///
    /// Using the caller's knot times directly avoids accumulating rounding
    /// error from summed durations, so every knot evaluates exactly at its
    /// timestamp.
    pub fn from_knots(segments: Vec<Polynomial>, knots: Vec<f64>) -> Option<Self> {
        if segments.is_empty() || knots.len() != segments.len() + 1 {
            return None;
        }
        if !knots.iter().all(|k| k.is_finite()) || knots.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }
        Some(Self { segments, knots })
    }

    /// Segment polynomials
    pub fn segments(&self) -> &[Polynomial] {
        &self.segments
    }

    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Absolute knot times
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Duration of every segment
    pub fn durations(&self) -> Vec<f64> {
        self.knots.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Time of the first knot
    pub fn start_time(&self) -> f64 {
        self.knots[0]
    }

    /// Time of the last knot
    pub fn end_time(&self) -> f64 {
        self.knots[self.knots.len() - 1]
    }

    /// Total time span
    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// Index of the segment active at global time t
    ///
    /// Interior knots belong to the segment that starts there.
    pub fn segment_index(&self, t: f64) -> Result<usize, EvalError> {
        let (start, end) = (self.start_time(), self.end_time());
        // NaN fails both comparisons
        if !(t >= start && t <= end) {
            return Err(EvalError::OutOfRange { t, start, end });
        }

        // Number of knots ≤ t, minus one, clamped onto the last segment
        let idx = self.knots.partition_point(|&k| k <= t).saturating_sub(1);
        Ok(idx.min(self.segments.len() - 1))
    }

    /// Evaluate the `order`-th derivative at global time t
    pub fn evaluate(&self, t: f64, order: usize) -> Result<f64, EvalError> {
        let idx = self.segment_index(t)?;
        let tau = t - self.knots[idx];
        Ok(self.segments[idx].eval_derivative(tau, order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_ramp() -> PiecewisePolynomial {
        // 0 → 2 over [0, 2), then 2 → 1 over [2, 3]
        PiecewisePolynomial::new(
            vec![
                Polynomial::from_slice(&[0.0, 1.0]).unwrap(),
                Polynomial::from_slice(&[2.0, -1.0]).unwrap(),
            ],
            &[2.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_construction() {
        let pp = linear_ramp();
        assert_eq!(pp.segment_count(), 2);
        assert_eq!(pp.knots(), &[0.0, 2.0, 3.0]);
        assert_relative_eq!(pp.duration(), 3.0, epsilon = 1e-12);
        assert_eq!(pp.durations(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_rejects_bad_layout() {
        let seg = vec![Polynomial::from_slice(&[1.0]).unwrap()];
        assert!(PiecewisePolynomial::new(seg.clone(), &[]).is_none());
        assert!(PiecewisePolynomial::new(seg.clone(), &[0.0]).is_none());
        assert!(PiecewisePolynomial::new(seg.clone(), &[-1.0]).is_none());
        assert!(PiecewisePolynomial::new(Vec::new(), &[]).is_none());
        assert!(PiecewisePolynomial::new(seg, &[1.0]).is_some());
    }

    #[test]
    fn test_segment_lookup() {
        let pp = linear_ramp();
        assert_eq!(pp.segment_index(0.0).unwrap(), 0);
        assert_eq!(pp.segment_index(1.999).unwrap(), 0);
        assert_eq!(pp.segment_index(2.0).unwrap(), 1);
        assert_eq!(pp.segment_index(3.0).unwrap(), 1);
    }

    #[test]
    fn test_evaluate() {
        let pp = linear_ramp();
        assert_relative_eq!(pp.evaluate(1.0, 0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pp.evaluate(2.0, 0).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(pp.evaluate(2.5, 0).unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(pp.evaluate(3.0, 0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pp.evaluate(0.5, 1).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pp.evaluate(2.5, 1).unwrap(), -1.0, epsilon = 1e-12);
        assert_eq!(pp.evaluate(2.5, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_range() {
        let pp = linear_ramp();
        assert!(matches!(pp.evaluate(-0.1, 0), Err(EvalError::OutOfRange { .. })));
        assert!(matches!(pp.evaluate(3.0001, 0), Err(EvalError::OutOfRange { .. })));
        assert!(matches!(pp.evaluate(f64::NAN, 0), Err(EvalError::OutOfRange { .. })));
    }

    #[test]
    fn test_repeatable() {
        let pp = linear_ramp();
        let a = pp.evaluate(2.25, 1).unwrap();
        let b = pp.evaluate(2.25, 1).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
