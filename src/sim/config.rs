use serde::{Deserialize, Serialize};

use crate::orbital::kepler::KeplerSolver;
use crate::physics::gravity::R_EARTH;

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

pub const DEFAULT_DURATION: f64 = 7_200.0; // s, two hours
pub const DEFAULT_TIMESTEP: f64 = 60.0;    // s
pub const DEFAULT_MAX_SAMPLES: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub duration: f64,      // nominal span, s
    pub timestep: f64,      // sample spacing, s
    pub max_samples: usize, // requests needing more samples are rejected
    pub body_radius: f64,   // impact surface radius, km
    #[serde(skip)]
    pub solver: KeplerSolver,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            timestep: DEFAULT_TIMESTEP,
            max_samples: DEFAULT_MAX_SAMPLES,
            body_radius: R_EARTH,
            solver: KeplerSolver::default(),
        }
    }
}

impl SimConfig {
    pub fn new(duration: f64, timestep: f64) -> Self {
        Self { duration, timestep, ..Self::default() }
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn with_body_radius(mut self, body_radius: f64) -> Self {
        self.body_radius = body_radius;
        self
    }

    pub fn with_solver(mut self, solver: KeplerSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Samples on the grid t_k = k * timestep <= duration, absent impact.
    ///
    /// Float-valued so oversized requests can be reported without overflow.
    pub fn nominal_samples(&self) -> f64 {
        (self.duration / self.timestep).floor() + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SimConfig::default();
        assert_eq!(c.duration, 7_200.0);
        assert_eq!(c.timestep, 60.0);
        assert_eq!(c.nominal_samples(), 121.0);
        assert_eq!(c.body_radius, R_EARTH);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: SimConfig = serde_json::from_str(r#"{"timestep": 10}"#).unwrap();
        assert_eq!(c.timestep, 10.0);
        assert_eq!(c.duration, DEFAULT_DURATION);
        assert_eq!(c.max_samples, DEFAULT_MAX_SAMPLES);
    }
}
