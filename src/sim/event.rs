use serde::Serialize;

use crate::orbital::frame::StateVector;
use crate::physics::gravity::R_EARTH;

// ---------------------------------------------------------------------------
// Surface impact
// ---------------------------------------------------------------------------

/// First sample found at or below the central body's surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactEvent {
    pub time: f64,   // s
    pub index: usize,
    pub depth: f64,  // body radius minus sample radius, km (>= 0)
}

/// Stateless surface-crossing predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactDetector {
    pub body_radius: f64, // km
}

impl Default for ImpactDetector {
    fn default() -> Self {
        Self { body_radius: R_EARTH }
    }
}

impl ImpactDetector {
    pub fn new(body_radius: f64) -> Self {
        Self { body_radius }
    }

    /// |pos| <= body radius.
    pub fn is_impacted(&self, state: &StateVector) -> bool {
        state.radius() <= self.body_radius
    }

    /// Impact event for sample `index`, if it lies on or inside the surface.
    pub fn check(&self, index: usize, state: &StateVector) -> Option<ImpactEvent> {
        if !self.is_impacted(state) {
            return None;
        }
        Some(ImpactEvent {
            time: state.time,
            index,
            depth: self.body_radius - state.radius(),
        })
    }
}
