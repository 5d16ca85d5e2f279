//! Orbit summary derived from elements and a sampled trajectory.
//!
//! Apsides and period come from closed-form expressions. Min/max altitude,
//! average speed and the sampled extrema are scans over the samples and
//! inherit the grid's resolution: near periapsis of an eccentric orbit the
//! sampled minimum can overshoot the true one by an amount that grows with
//! the timestep.

use serde::Serialize;

use crate::orbital::elements::OrbitalElements;
use crate::orbital::frame::StateVector;
use crate::physics::gravity::{vis_viva_speed, CentralBody};
use crate::sim::event::ImpactEvent;
use crate::sim::runner::Trajectory;

/// Closed-form apsis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Apsis {
    pub radius: f64,   // km
    pub altitude: f64, // km above the body surface
    pub speed: f64,    // km/s (vis-viva)
}

/// Sample of the trajectory with the smallest or largest radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampledExtremum {
    pub index: usize,
    pub time: f64,
    pub position: [f64; 3],
    pub radius: f64,
    pub altitude: f64,
}

impl SampledExtremum {
    fn new(index: usize, state: &StateVector, body: &CentralBody) -> Self {
        let radius = state.radius();
        Self {
            index,
            time: state.time,
            position: state.pos.into(),
            radius,
            altitude: body.altitude(radius),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub periapsis: Apsis,
    pub apoapsis: Apsis,
    pub period: f64,      // s
    pub mean_motion: f64, // rad/s
    pub min_altitude: f64,
    pub max_altitude: f64,
    #[serde(rename = "avg_velocity")]
    pub avg_speed: f64, // km/s
    pub sampled_periapsis: Option<SampledExtremum>,
    pub sampled_apoapsis: Option<SampledExtremum>,
    pub will_impact: bool, // analytic: periapsis at or below the surface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactEvent>,
    pub samples: usize,
    pub unconverged_samples: usize,
}

impl Analysis {
    /// Summarize `trajectory` of `elements` around a body of `body_radius` km.
    ///
    /// An empty trajectory reports zero for the sampled statistics.
    pub fn from_trajectory(elements: &OrbitalElements, trajectory: &Trajectory, body_radius: f64) -> Self {
        let body = CentralBody { mu: elements.mu(), radius: body_radius };
        let apsis = |radius: f64| Apsis {
            radius,
            altitude: body.altitude(radius),
            speed: vis_viva_speed(radius, elements.sma(), elements.mu()),
        };

        let states = &trajectory.states;
        let closest = states
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.radius().total_cmp(&b.1.radius()));
        let farthest = states
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.radius().total_cmp(&b.1.radius()));

        let sampled_periapsis = closest.map(|(i, s)| SampledExtremum::new(i, s, &body));
        let sampled_apoapsis = farthest.map(|(i, s)| SampledExtremum::new(i, s, &body));

        let avg_speed = if states.is_empty() {
            0.0
        } else {
            states.iter().map(StateVector::speed).sum::<f64>() / states.len() as f64
        };

        let periapsis = apsis(elements.periapsis_radius());

        Analysis {
            periapsis,
            apoapsis: apsis(elements.apoapsis_radius()),
            period: elements.period(),
            mean_motion: elements.mean_motion(),
            min_altitude: sampled_periapsis.map_or(0.0, |e| e.altitude),
            max_altitude: sampled_apoapsis.map_or(0.0, |e| e.altitude),
            avg_speed,
            sampled_periapsis,
            sampled_apoapsis,
            will_impact: periapsis.altitude <= 0.0,
            impact: trajectory.impact,
            samples: states.len(),
            unconverged_samples: trajectory.unconverged().count(),
        }
    }
}
