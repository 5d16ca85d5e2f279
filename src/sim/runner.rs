use tracing::{debug, info, warn};

use super::config::SimConfig;
use super::event::{ImpactDetector, ImpactEvent};
use crate::error::{OrbitError, OrbitResult};
use crate::orbital::elements::{wrap_radians, OrbitalElements};
use crate::orbital::frame::{self, StateVector};

// ---------------------------------------------------------------------------
// Sampled trajectory
// ---------------------------------------------------------------------------

/// Time-ordered samples of one propagation, truncated at impact.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub states: Vec<StateVector>,
    pub timestep: f64, // s
    pub duration: f64, // nominal span requested, s
    pub impact: Option<ImpactEvent>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last(&self) -> Option<&StateVector> {
        self.states.last()
    }

    /// Samples whose Kepler solve hit the iteration cap.
    pub fn unconverged(&self) -> impl Iterator<Item = &StateVector> {
        self.states.iter().filter(|s| !s.converged)
    }
}

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

/// Check the time grid and the sample cap before any work is done.
fn sample_count(config: &SimConfig) -> OrbitResult<usize> {
    let (duration, timestep) = (config.duration, config.timestep);
    let reason = if !duration.is_finite() || !timestep.is_finite() {
        Some("duration and timestep must be finite")
    } else if duration < 0.0 {
        Some("duration must be >= 0")
    } else if timestep <= 0.0 {
        Some("timestep must be > 0")
    } else {
        None
    };
    if let Some(reason) = reason {
        return Err(OrbitError::InvalidTimeGrid { duration, timestep, reason });
    }

    let samples = config.nominal_samples();
    if samples > config.max_samples as f64 {
        warn!(duration, timestep, samples, limit = config.max_samples, "sample limit exceeded");
        return Err(OrbitError::SampleLimit {
            duration,
            timestep,
            samples,
            limit: config.max_samples,
        });
    }
    Ok(samples as usize)
}

/// Propagate `elements` on the grid t_k = k * timestep, k = 0.. while t_k <= duration.
///
/// Stops at the first sample on or below `config.body_radius`; that sample is
/// the last one returned and is recorded as the trajectory's impact.
pub fn sample(elements: &OrbitalElements, config: &SimConfig) -> OrbitResult<Trajectory> {
    let n_samples = sample_count(config)?;
    let mean_motion = elements.mean_motion();
    let m0 = elements.mean_anom();
    let detector = ImpactDetector::new(config.body_radius);

    debug!(n_samples, mean_motion, period = elements.period(), "sampling trajectory");

    let mut states = Vec::with_capacity(n_samples);
    let mut impact = None;
    let mut unconverged = 0usize;

    for k in 0..n_samples {
        let t = k as f64 * config.timestep;
        let m = wrap_radians(m0 + mean_motion * t);
        let sol = config.solver.solve(m, elements.ecc())?;
        if !sol.converged {
            unconverged += 1;
            debug!(
                time = t,
                iterations = sol.iterations,
                residual = sol.residual,
                "kepler solve did not converge, using best estimate"
            );
        }

        let state = frame::state_at(sol.eccentric_anomaly, elements, t, sol.converged);
        let hit = detector.check(k, &state);
        states.push(state);

        if let Some(event) = hit {
            info!(time = event.time, index = event.index, depth = event.depth, "surface impact");
            impact = Some(event);
            break;
        }
    }

    if unconverged > 0 {
        warn!(
            unconverged,
            samples = states.len(),
            max_iterations = config.solver.max_iterations,
            "kepler solve hit the iteration cap"
        );
    }

    Ok(Trajectory {
        states,
        timestep: config.timestep,
        duration: config.duration,
        impact,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
