//! Fixed-rate trajectory sampling
//!
//! Turns a [`Trajectory`] into the stream of references a tracking
//! controller consumes at a fixed rate.

use thiserror::Error;

use minsnap_core::{EvalError, Trajectory, TrajectoryPoint};

use crate::config::ConfigError;

/// Largest number of samples produced for one trajectory
pub const MAX_SAMPLES: usize = 10_000_000;

/// Sample times covering `[start, end]` at `1 / rate_hz` spacing
///
/// The final instant is always included, even when the duration is not a
/// whole number of periods.
pub fn sample_times(start: f64, end: f64, rate_hz: f64) -> Result<Vec<f64>, ConfigError> {
    if !(rate_hz.is_finite() && rate_hz > 0.0) {
        return Err(ConfigError::Invalid(format!(
            "sampling rate must be positive, got {rate_hz}"
        )));
    }

    let dt = 1.0 / rate_hz;
    let span = ((end - start) / dt).floor();
    if !(span >= 0.0 && span < MAX_SAMPLES as f64) {
        return Err(ConfigError::Invalid(format!(
            "sampling [{start}, {end}] at {rate_hz} Hz exceeds {MAX_SAMPLES} samples"
        )));
    }
    // Multiply instead of accumulating so the grid does not drift.
    let steps = span as usize;
    let mut times: Vec<f64> = (0..=steps)
        .map(|k| start + k as f64 * dt)
        // Drop grid points that would land on top of the end sample.
        .filter(|t| end - t > 1e-9 * dt)
        .collect();
    times.push(end);
    Ok(times)
}

/// Errors from sampling a trajectory
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Sample a trajectory at a fixed rate, end point included
pub fn sample_uniform(
    trajectory: &Trajectory,
    rate_hz: f64,
) -> Result<Vec<TrajectoryPoint>, SamplingError> {
    let times = sample_times(trajectory.start_time(), trajectory.end_time(), rate_hz)?;
    log::debug!("Sampling {} points at {} Hz", times.len(), rate_hz);
    times
        .into_iter()
        .map(|t| trajectory.sample(t).map_err(SamplingError::from))
        .collect()
}

/// Every `stride`-th sample plus the final one, each yielded once
pub fn decimate<T>(samples: &[T], stride: usize) -> impl Iterator<Item = &T> {
    let stride = stride.max(1);
    let last = samples.len().saturating_sub(1);
    samples
        .iter()
        .enumerate()
        .filter(move |(i, _)| i % stride == 0 || *i == last)
        .map(|(_, s)| s)
}
