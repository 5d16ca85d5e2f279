//! Error types for kepler-sim.
//!
//! Every user-facing failure is a value: invalid elements, unknown presets and
//! oversized sampling requests are all recoverable by the caller.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for kepler-sim operations.
pub type OrbitResult<T> = Result<T, OrbitError>;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub reason: String,
}

impl Violation {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations.iter().map(Violation::to_string).collect::<Vec<_>>().join("; ")
}

/// All field violations found in one element set (never just the first).
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Whether `field` is among the violations.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Unified error type for all kepler-sim operations.
#[derive(Debug, Error)]
pub enum OrbitError {
    /// Element set rejected by the validator.
    #[error("invalid orbital elements: {0}")]
    Validation(#[from] ValidationError),

    /// Lookup miss in the preset catalog.
    #[error("unknown preset '{key}'")]
    PresetNotFound { key: String },

    /// Requested sample count exceeds the configured cap.
    #[error(
        "duration {duration} s at timestep {timestep} s needs {samples} samples, limit is {limit}"
    )]
    SampleLimit {
        duration: f64,
        timestep: f64,
        samples: f64,
        limit: usize,
    },

    /// Duration/timestep pair that cannot define a time grid.
    #[error("invalid time grid (duration {duration} s, timestep {timestep} s): {reason}")]
    InvalidTimeGrid {
        duration: f64,
        timestep: f64,
        reason: &'static str,
    },

    /// Kepler's equation requested outside the elliptical domain.
    #[error("eccentricity {ecc} is outside the elliptical range [0, 1)")]
    NonElliptical { ecc: f64 },

    /// Mean anomaly handed to the Kepler solver is NaN or infinite.
    #[error("mean anomaly {m} is not finite")]
    NonFiniteAnomaly { m: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_field() {
        let err = ValidationError {
            violations: vec![
                Violation::new("a", "must be > 0"),
                Violation::new("e", "must be in [0, 1)"),
            ],
        };
        assert_eq!(err.to_string(), "a: must be > 0; e: must be in [0, 1)");
        assert!(err.has_field("e"));
        assert!(!err.has_field("mu"));

        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());

        let wrapped: OrbitError = err.into();
        assert!(wrapped.to_string().starts_with("invalid orbital elements"));
    }

    #[test]
    fn sample_limit_reports_grid() {
        let err = OrbitError::SampleLimit {
            duration: 1e9,
            timestep: 1.0,
            samples: 1e9 + 1.0,
            limit: 100_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("1000000000"), "{msg}");
        assert!(msg.contains("100000"), "{msg}");
    }
}
