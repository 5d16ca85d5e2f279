use serde::Serialize;

// ---------------------------------------------------------------------------
// Central-body constants (km, s)
// ---------------------------------------------------------------------------

pub const MU_EARTH: f64 = 398_600.441_8; // km^3/s^2
pub const R_EARTH: f64 = 6_371.0;        // mean Earth radius, km

/// Gravitating body the orbit is propagated around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CentralBody {
    pub mu: f64,     // gravitational parameter, km^3/s^2
    pub radius: f64, // mean surface radius, km
}

impl CentralBody {
    pub const EARTH: CentralBody = CentralBody { mu: MU_EARTH, radius: R_EARTH };

    /// Altitude above the mean surface for a given orbital radius.
    pub fn altitude(&self, r: f64) -> f64 {
        r - self.radius
    }
}

impl Default for CentralBody {
    fn default() -> Self {
        Self::EARTH
    }
}

/// Orbital speed at radius `r` on an ellipse of semi-major axis `sma` (vis-viva).
pub fn vis_viva_speed(r: f64, sma: f64, mu: f64) -> f64 {
    (mu * (2.0 / r - 1.0 / sma)).max(0.0).sqrt()
}

/// Circular orbit velocity at a given radius.
pub fn circular_velocity(r: f64) -> f64 {
    circular_velocity_mu(r, MU_EARTH)
}

pub fn circular_velocity_mu(r: f64, mu: f64) -> f64 {
    (mu / r).sqrt()
}
