//! Request/response contracts: Simulate, Validate and List presets.
//!
//! Lengths in km, velocities in km/s, times in s, input angles in degrees.
//! Transport (HTTP, CLI, ...) lives outside this module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::error::{OrbitResult, Violation};
use crate::orbital::elements::{OrbitalElements, OrbitalInfo, RawElements};
use crate::orbital::presets::{Preset, PresetCatalog};
use crate::physics::gravity::CentralBody;
use crate::sim::config::{SimConfig, DEFAULT_DURATION, DEFAULT_TIMESTEP};
use crate::sim::runner::{sample, Trajectory};

fn default_duration() -> f64 {
    DEFAULT_DURATION
}

fn default_timestep() -> f64 {
    DEFAULT_TIMESTEP
}

// ---------------------------------------------------------------------------
// Simulate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulateRequest {
    pub elements: RawElements,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_timestep")]
    pub timestep: f64,
}

impl SimulateRequest {
    pub fn new(elements: RawElements, duration: f64, timestep: f64) -> Self {
        Self { elements, duration, timestep }
    }

    /// `base` with this request's time grid.
    pub fn config(&self, base: &SimConfig) -> SimConfig {
        SimConfig {
            duration: self.duration,
            timestep: self.timestep,
            ..base.clone()
        }
    }
}

/// Column-oriented trajectory for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryData {
    pub times: Vec<f64>,
    pub positions: Vec<[f64; 3]>,
    pub velocities: Vec<[f64; 3]>,
}

impl From<&Trajectory> for TrajectoryData {
    fn from(traj: &Trajectory) -> Self {
        TrajectoryData {
            times: traj.states.iter().map(|s| s.time).collect(),
            positions: traj.states.iter().map(|s| s.pos.into()).collect(),
            velocities: traj.states.iter().map(|s| s.vel.into()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulateResponse {
    pub elements: OrbitalElements,
    pub orbital_info: OrbitalInfo,
    pub trajectory: TrajectoryData,
    pub analysis: Analysis,
    pub warnings: Vec<String>,
}

/// Validate, propagate and analyse one request with default settings.
pub fn simulate(request: &SimulateRequest) -> OrbitResult<SimulateResponse> {
    let elements = request.elements.validate()?;
    simulate_with(&elements, &request.config(&SimConfig::default()))
}

/// Propagate and analyse already validated elements.
pub fn simulate_with(elements: &OrbitalElements, config: &SimConfig) -> OrbitResult<SimulateResponse> {
    let trajectory = sample(elements, config)?;
    Ok(respond(elements, &trajectory, config))
}

/// Analyse an existing trajectory and package it as a Simulate response.
pub fn respond(elements: &OrbitalElements, trajectory: &Trajectory, config: &SimConfig) -> SimulateResponse {
    let analysis = Analysis::from_trajectory(elements, trajectory, config.body_radius);
    let body = CentralBody { mu: elements.mu(), radius: config.body_radius };

    let mut warnings = Vec::new();
    if analysis.unconverged_samples > 0 {
        warnings.push(format!(
            "{} sample(s) use an unconverged Kepler solution after {} iterations",
            analysis.unconverged_samples, config.solver.max_iterations
        ));
    }
    if let Some(impact) = &trajectory.impact {
        warnings.push(format!(
            "surface impact at t={:.1} s (sample {}); trajectory truncated before the requested {:.1} s",
            impact.time, impact.index, trajectory.duration
        ));
    }

    SimulateResponse {
        elements: *elements,
        orbital_info: elements.info(&body),
        trajectory: TrajectoryData::from(trajectory),
        analysis,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Validate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidateResponse {
    Valid { elements: OrbitalElements },
    Invalid { violations: Vec<Violation> },
}

pub fn validate(raw: &RawElements) -> ValidateResponse {
    match raw.validate() {
        Ok(elements) => ValidateResponse::Valid { elements },
        Err(err) => ValidateResponse::Invalid { violations: err.violations },
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

pub fn list_presets() -> BTreeMap<&'static str, &'static Preset> {
    let catalog = PresetCatalog::global();
    catalog.keys().zip(catalog.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_grid() {
        let req: SimulateRequest =
            serde_json::from_str(r#"{"elements": {"a": 7000, "e": 0.2, "i": 28.5, "omega": 0, "Omega": 0, "M0": 0}}"#)
                .unwrap();
        assert_eq!(req.duration, 7_200.0);
        assert_eq!(req.timestep, 60.0);
        let resp = simulate(&req).unwrap();
        assert_eq!(resp.trajectory.times.len(), 121);
        assert!(resp.warnings.is_empty());
    }

    #[test]
    fn simulate_rejects_invalid_elements() {
        let req = SimulateRequest::new(RawElements::new(-100.0, 1.0, 0.0, 0.0, 0.0, 0.0), 600.0, 60.0);
        match simulate(&req) {
            Err(crate::OrbitError::Validation(err)) => {
                assert!(err.has_field("a"));
                assert!(err.has_field("e"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn response_json_shape() {
        let req = SimulateRequest::new(RawElements::new(6_000.0, 0.6, 45.0, 0.0, 0.0, 0.0), 3_600.0, 60.0);
        let json = serde_json::to_value(simulate(&req).unwrap()).unwrap();

        assert!(json["trajectory"]["times"].is_array());
        assert_eq!(json["trajectory"]["positions"][0].as_array().unwrap().len(), 3);
        assert_eq!(json["trajectory"]["velocities"][0].as_array().unwrap().len(), 3);
        for key in ["periapsis", "apoapsis", "period", "min_altitude", "max_altitude", "avg_velocity", "impact"] {
            assert!(json["analysis"].get(key).is_some(), "analysis.{key} missing");
        }
        assert!(json["analysis"]["impact"]["depth"].as_f64().unwrap() > 0.0);
        assert_eq!(json["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn unconverged_samples_reach_analysis_and_warnings() {
        use crate::orbital::kepler::KeplerSolver;

        let el = OrbitalElements::new(20_000.0, 0.9, 0.0, 0.0, 0.0, 10.0).unwrap();
        let config = SimConfig::new(600.0, 60.0).with_solver(KeplerSolver::default().with_max_iterations(1));
        let resp = simulate_with(&el, &config).unwrap();

        assert!(resp.analysis.unconverged_samples > 0);
        assert!(resp.analysis.unconverged_samples <= resp.analysis.samples);
        let expected = format!("{} sample(s) use an unconverged Kepler solution", resp.analysis.unconverged_samples);
        assert!(
            resp.warnings.iter().any(|w| w.starts_with(&expected) && w.contains("after 1 iterations")),
            "warnings: {:?}",
            resp.warnings
        );
    }

    #[test]
    fn overflowing_elements_are_rejected_before_sampling() {
        let tiny = SimulateRequest::new(RawElements::new(1e-110, 0.1, 0.0, 0.0, 0.0, 0.0), 600.0, 60.0);
        match simulate(&tiny) {
            Err(crate::OrbitError::Validation(err)) => assert!(err.has_field("a")),
            other => panic!("expected validation error, got {other:?}"),
        }

        let heavy = SimulateRequest::new(RawElements::new(7_000.0, 0.1, 0.0, 0.0, 0.0, 0.0).with_mu(1e308), 0.0, 60.0);
        match simulate(&heavy) {
            Err(crate::OrbitError::Validation(err)) => assert!(err.has_field("mu")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_reports_outcome() {
        let ok = validate(&RawElements::new(7_000.0, 0.1, 0.0, 0.0, 0.0, 370.0));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "valid");
        assert_eq!(json["elements"]["M0"], 10.0);

        let bad = validate(&RawElements::new(7_000.0, -0.1, 0.0, 0.0, 0.0, 0.0));
        let ValidateResponse::Invalid { violations } = bad else {
            panic!("negative eccentricity must be rejected");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "e");
    }

    #[test]
    fn presets_listed_by_key() {
        let presets = list_presets();
        assert_eq!(presets.len(), 6);
        assert_eq!(presets["iss"].name, "International Space Station");
        for (key, preset) in &presets {
            assert_eq!(*key, preset.key);
        }
    }
}
