//! Per-axis minimum-snap solver
//!
//! Fits N−1 degree-7 segments through N timed waypoints for one channel.
//! Each segment contributes 8 unknown coefficients, and the constraints are
//! stacked into one square system of size 8(N−1):
//!
//! ```text
//! start (segment 0, τ = 0):        p = w₀,  p' = p'' = p''' = 0
//! interior knot i (1 ≤ i ≤ N−2):   p⁽ᵏ⁾ᵢ₋₁(Δtᵢ₋₁) − p⁽ᵏ⁾ᵢ(0) = 0   for k = 1..6
//!                                  pᵢ₋₁(Δtᵢ₋₁) = wᵢ,  pᵢ(0) = wᵢ
//! end (segment N−2, τ = Δt):       p = wₙ₋₁, p' = p'' = p''' = 0
//! ```
//!
//! The matrix depends only on the segment durations, so all channels sharing
//! a time base reuse a single LU factorization and differ only in the
//! right-hand side.
//!
//! Columns of a segment scale with powers of its duration, so the system is
//! row and column equilibrated before factoring. Every solution is checked
//! against its waypoints and rejected as [`SolverError::SingularSystem`] when
//! the system was too ill-conditioned to honour them.

use nalgebra::{DMatrix, DVector, Dyn, LU};
use thiserror::Error;

use crate::math::{PiecewisePolynomial, Polynomial, POLY_COEFFS};
use crate::trajectory::AxisTrajectory;
use crate::waypoint::{Channel, TimedWaypoint, Waypoint};

/// Derivative orders pinned at the start and end waypoints (position..jerk)
pub const BOUNDARY_ORDERS: usize = 4;

/// Highest derivative order matched across interior knots
pub const CONTINUITY_ORDER: usize = 6;

/// Largest waypoint miss accepted from a solve, relative to
/// `max(1, max |value|)` over the channel's waypoint values
pub const RESIDUAL_TOLERANCE: f64 = 1e-8;

/// Solver errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("At least 2 waypoints are required, got {got}")]
    InsufficientWaypoints { got: usize },
    #[error("First waypoint must be at t = 0, got t = {t}")]
    InvalidStartTime { t: f64 },
    #[error("Waypoint {index} at t = {t} does not come after previous time {previous}")]
    NonMonotonicTime { index: usize, previous: f64, t: f64 },
    #[error("Waypoint {index} has a non-finite {field}")]
    NonFiniteValue { index: usize, field: &'static str },
    #[error("Constraint system is singular: {0}")]
    SingularSystem(String),
}

/// Check a waypoint sequence before any matrix is built
///
/// Equal consecutive timestamps describe a zero-duration segment, whose
/// constraint rows are linearly dependent, and are reported as
/// [`SolverError::SingularSystem`]. Decreasing timestamps are reported as
/// [`SolverError::NonMonotonicTime`].
pub fn validate_waypoints(waypoints: &[TimedWaypoint]) -> Result<(), SolverError> {
    if waypoints.len() < 2 {
        return Err(SolverError::InsufficientWaypoints {
            got: waypoints.len(),
        });
    }

    for (index, wp) in waypoints.iter().enumerate() {
        if !wp.t.is_finite() {
            return Err(SolverError::NonFiniteValue { index, field: "t" });
        }
        if let Some(channel) = wp.waypoint.non_finite_channel() {
            return Err(SolverError::NonFiniteValue {
                index,
                field: channel.name(),
            });
        }
    }

    if waypoints[0].t != 0.0 {
        return Err(SolverError::InvalidStartTime { t: waypoints[0].t });
    }

    for (index, pair) in waypoints.windows(2).enumerate() {
        let (previous, t) = (pair[0].t, pair[1].t);
        if t < previous {
            return Err(SolverError::NonMonotonicTime {
                index: index + 1,
                previous,
                t,
            });
        }
        if t == previous {
            return Err(SolverError::SingularSystem(format!(
                "segment {} has zero duration (t = {})",
                index, t
            )));
        }
    }

    Ok(())
}

/// Constraint rows for derivative orders 0..8 of one segment at local time τ
///
/// `rows[k]` dotted with the segment coefficients gives the k-th derivative.
fn derivative_rows(tau: f64) -> [[f64; POLY_COEFFS]; POLY_COEFFS] {
    let mut rows = [[0.0; POLY_COEFFS]; POLY_COEFFS];
    let mut template = Polynomial::constraint_template();
    for row in rows.iter_mut() {
        *row = template.basis_row_at(tau);
        template = template.derivative();
    }
    rows
}

/// Write `sign * row` into the coefficient block of `segment`
fn put_row(
    a: &mut DMatrix<f64>,
    row: usize,
    segment: usize,
    values: &[f64; POLY_COEFFS],
    sign: f64,
) {
    let col0 = segment * POLY_COEFFS;
    for (j, v) in values.iter().enumerate() {
        a[(row, col0 + j)] = sign * v;
    }
}

/// Row index of the first continuity equation for interior knot i (1-based)
fn interior_row(knot: usize) -> usize {
    BOUNDARY_ORDERS + (knot - 1) * POLY_COEFFS
}

/// Build the 8(N−1) × 8(N−1) constraint matrix for the given durations
pub fn constraint_matrix(durations: &[f64]) -> DMatrix<f64> {
    let segments = durations.len();
    let n = POLY_COEFFS * segments;
    let mut a = DMatrix::zeros(n, n);
    if segments == 0 {
        return a;
    }

    let at_start = derivative_rows(0.0);

    for k in 0..BOUNDARY_ORDERS {
        put_row(&mut a, k, 0, &at_start[k], 1.0);
    }

    for knot in 1..segments {
        let at_end_of_prev = derivative_rows(durations[knot - 1]);
        let row0 = interior_row(knot);

        // Derivative matching: prev − next = 0
        for k in 1..=CONTINUITY_ORDER {
            let row = row0 + k - 1;
            put_row(&mut a, row, knot - 1, &at_end_of_prev[k], 1.0);
            put_row(&mut a, row, knot, &at_start[k], -1.0);
        }

        // Both adjoining segments pass through the waypoint
        put_row(&mut a, row0 + CONTINUITY_ORDER, knot - 1, &at_end_of_prev[0], 1.0);
        put_row(&mut a, row0 + CONTINUITY_ORDER + 1, knot, &at_start[0], 1.0);
    }

    let at_end = derivative_rows(durations[segments - 1]);
    let row0 = n - BOUNDARY_ORDERS;
    for k in 0..BOUNDARY_ORDERS {
        put_row(&mut a, row0 + k, segments - 1, &at_end[k], 1.0);
    }

    a
}

/// Right-hand side for one channel's waypoint values
///
/// Derivative rows are all zero (rest at both ends, continuity inside).
pub fn boundary_vector(values: &[f64]) -> DVector<f64> {
    let segments = values.len().saturating_sub(1);
    let n = POLY_COEFFS * segments;
    let mut b = DVector::zeros(n);
    if segments == 0 {
        return b;
    }

    b[0] = values[0];
    for knot in 1..segments {
        let row0 = interior_row(knot);
        b[row0 + CONTINUITY_ORDER] = values[knot];
        b[row0 + CONTINUITY_ORDER + 1] = values[knot];
    }
    b[n - BOUNDARY_ORDERS] = values[segments];

    b
}

/// Row and column scale factors that bring every row and column of `a` to
/// unit max-norm
///
/// A zero row or column means the system cannot have a unique solution.
fn equilibrate(a: &DMatrix<f64>) -> Result<(DVector<f64>, DVector<f64>), SolverError> {
    let mut rows = DVector::zeros(a.nrows());
    for (i, row) in a.row_iter().enumerate() {
        let max = row.amax();
        if max == 0.0 {
            return Err(SolverError::SingularSystem(format!("constraint row {i} is empty")));
        }
        rows[i] = 1.0 / max;
    }

    let mut cols = DVector::zeros(a.ncols());
    for (j, col) in a.column_iter().enumerate() {
        let max = col.component_mul(&rows).amax();
        if max == 0.0 {
            return Err(SolverError::SingularSystem(format!(
                "coefficient {} of segment {} is unconstrained",
                j % POLY_COEFFS,
                j / POLY_COEFFS
            )));
        }
        cols[j] = 1.0 / max;
    }

    Ok((rows, cols))
}

/// Factored constraint system for one time base
///
/// Construction validates the waypoints and factors the matrix once;
/// [`AxisTrajectorySolver::solve`] can then be called for each channel,
/// from any thread.
#[derive(Debug, Clone)]
pub struct AxisTrajectorySolver {
    waypoints: Vec<TimedWaypoint>,
    knots: Vec<f64>,
    /// Factorization of diag(row_scale) · A · diag(col_scale)
    lu: LU<f64, Dyn, Dyn>,
    row_scale: DVector<f64>,
    col_scale: DVector<f64>,
}

impl AxisTrajectorySolver {
    /// Validate the waypoints and factor their constraint matrix
    pub fn new(waypoints: &[TimedWaypoint]) -> Result<Self, SolverError> {
        validate_waypoints(waypoints)?;

        let knots: Vec<f64> = waypoints.iter().map(|wp| wp.t).collect();
        let durations: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();

        let a = constraint_matrix(&durations);
        log::debug!(
            "Factoring {}x{} constraint system for {} segments",
            a.nrows(),
            a.ncols(),
            durations.len()
        );

        let (row_scale, col_scale) = equilibrate(&a)?;
        let scaled = DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| {
            row_scale[i] * a[(i, j)] * col_scale[j]
        });

        let lu = scaled.lu();
        if !lu.is_invertible() {
            return Err(SolverError::SingularSystem(format!(
                "zero pivot in {} segment system (durations {:?})",
                durations.len(),
                durations
            )));
        }

        Ok(Self {
            waypoints: waypoints.to_vec(),
            knots,
            lu,
            row_scale,
            col_scale,
        })
    }

    /// Number of polynomial segments (waypoints − 1)
    pub fn segment_count(&self) -> usize {
        self.knots.len() - 1
    }

    /// Knot times shared by every channel
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Solve one channel
    pub fn solve(&self, channel: Channel) -> Result<AxisTrajectory, SolverError> {
        let curve = self.solve_with(|wp| wp.channel(channel))?;
        Ok(AxisTrajectory::new(channel, curve))
    }

    /// Solve for the values picked out of each waypoint by `extract`
    pub fn solve_with<F>(&self, extract: F) -> Result<PiecewisePolynomial, SolverError>
    where
        F: Fn(&Waypoint) -> f64,
    {
        let values: Vec<f64> = self.waypoints.iter().map(|wp| extract(&wp.waypoint)).collect();
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SolverError::NonFiniteValue {
                index,
                field: "extracted value",
            });
        }

        let b = boundary_vector(&values).component_mul(&self.row_scale);
        let x = self
            .lu
            .solve(&b)
            .ok_or_else(|| SolverError::SingularSystem("LU back-substitution failed".into()))?
            .component_mul(&self.col_scale);

        if x.iter().any(|c| !c.is_finite()) {
            return Err(SolverError::SingularSystem(
                "solution contains non-finite coefficients".into(),
            ));
        }

        let segments: Vec<Polynomial> = x
            .as_slice()
            .chunks_exact(POLY_COEFFS)
            .map(|chunk| {
                let mut coeffs = [0.0; POLY_COEFFS];
                coeffs.copy_from_slice(chunk);
                Polynomial::new(coeffs)
            })
            .collect();

        self.check_fit(&segments, &values)?;

        PiecewisePolynomial::from_knots(segments, self.knots.clone()).ok_or_else(|| {
            SolverError::SingularSystem("solution does not match the knot layout".into())
        })
    }

    /// Reject solutions that miss a waypoint by more than
    /// [`RESIDUAL_TOLERANCE`]
    fn check_fit(&self, segments: &[Polynomial], values: &[f64]) -> Result<(), SolverError> {
        let limit = RESIDUAL_TOLERANCE * values.iter().fold(1.0_f64, |m, v| m.max(v.abs()));

        for (i, (p, w)) in segments.iter().zip(self.knots.windows(2)).enumerate() {
            let start_miss = (p.eval(0.0) - values[i]).abs();
            let end_miss = (p.eval(w[1] - w[0]) - values[i + 1]).abs();
            let miss = start_miss.max(end_miss);
            if start_miss.is_nan() || end_miss.is_nan() || miss > limit {
                log::debug!("Segment {} misses its waypoints by {:e}", i, miss);
                return Err(SolverError::SingularSystem(format!(
                    "ill-conditioned system: segment {} misses its waypoints by {:e} (limit {:e})",
                    i, miss, limit
                )));
            }
        }
        Ok(())
    }
}

/// Validate, build, and solve the system for a single channel
pub fn solve_axis(
    waypoints: &[TimedWaypoint],
    channel: Channel,
) -> Result<AxisTrajectory, SolverError> {
    AxisTrajectorySolver::new(waypoints)?.solve(channel)
}
