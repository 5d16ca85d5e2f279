use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, Violation};
use crate::physics::gravity::{CentralBody, MU_EARTH, R_EARTH};

fn default_mu() -> f64 {
    MU_EARTH
}

/// Element set as submitted by a caller: unchecked, angles in degrees and
/// possibly outside [0, 360).
///
/// Angles default to 0 deg and `mu` defaults to Earth when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RawElements {
    #[serde(rename = "a")]
    pub sma: f64, // semi-major axis, km
    #[serde(rename = "e")]
    pub ecc: f64, // eccentricity
    #[serde(rename = "i", default)]
    pub inc: f64, // inclination, deg
    #[serde(rename = "omega", default)]
    pub argp: f64, // argument of periapsis, deg
    #[serde(rename = "Omega", default)]
    pub raan: f64, // longitude of ascending node, deg
    #[serde(rename = "M0", default)]
    pub mean_anom: f64, // mean anomaly at epoch, deg
    #[serde(default = "default_mu")]
    pub mu: f64, // gravitational parameter, km^3/s^2
}

impl RawElements {
    /// Earth-centred element set.
    pub fn new(sma: f64, ecc: f64, inc: f64, argp: f64, raan: f64, mean_anom: f64) -> Self {
        Self { sma, ecc, inc, argp, raan, mean_anom, mu: MU_EARTH }
    }

    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    /// Check ranges and wrap angles. Reports every violated field at once.
    pub fn validate(&self) -> Result<OrbitalElements, ValidationError> {
        let mut violations = Vec::new();

        let sma_ok = self.sma.is_finite() && self.sma > 0.0;
        if !sma_ok {
            violations.push(Violation::new(
                "a",
                format!("semi-major axis must be finite and > 0 km, got {}", self.sma),
            ));
        }

        if !self.ecc.is_finite() {
            violations.push(Violation::new("e", format!("eccentricity must be finite, got {}", self.ecc)));
        } else if self.ecc < 0.0 {
            violations.push(Violation::new("e", format!("eccentricity must be >= 0, got {}", self.ecc)));
        } else if self.ecc >= 1.0 {
            violations.push(Violation::new(
                "e",
                format!("eccentricity must be < 1 (elliptical orbits only), got {}", self.ecc),
            ));
        }

        let mu_ok = self.mu.is_finite() && self.mu > 0.0;
        if !mu_ok {
            violations.push(Violation::new(
                "mu",
                format!("gravitational parameter must be finite and > 0, got {}", self.mu),
            ));
        }

        // In-range magnitudes can still overflow or underflow what propagation derives from them.
        if sma_ok && mu_ok {
            let mean_motion = (self.mu / self.sma.powi(3)).sqrt();
            if !mean_motion.is_finite() || mean_motion <= 0.0 || !(TAU / mean_motion).is_finite() {
                violations.push(Violation::new(
                    "a",
                    format!(
                        "mean motion sqrt(mu / a^3) is not representable for a = {} km, mu = {}",
                        self.sma, self.mu
                    ),
                ));
            }
            if !(self.mu * self.sma).sqrt().is_finite() {
                violations.push(Violation::new(
                    "mu",
                    format!(
                        "velocity scale sqrt(mu * a) overflows for a = {} km, mu = {}",
                        self.sma, self.mu
                    ),
                ));
            }
        }

        for (field, value) in [
            ("i", self.inc),
            ("omega", self.argp),
            ("Omega", self.raan),
            ("M0", self.mean_anom),
        ] {
            if !value.is_finite() {
                violations.push(Violation::new(field, format!("angle must be finite, got {value}")));
            }
        }

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        Ok(OrbitalElements {
            sma: self.sma,
            ecc: self.ecc,
            inc: wrap_degrees(self.inc),
            argp: wrap_degrees(self.argp),
            raan: wrap_degrees(self.raan),
            mean_anom: wrap_degrees(self.mean_anom),
            mu: self.mu,
        })
    }
}

/// Wrap an angle into [0, 360).
pub fn wrap_degrees(deg: f64) -> f64 {
    wrap_into(deg, 360.0)
}

/// Wrap an angle into [0, 2pi).
pub fn wrap_radians(rad: f64) -> f64 {
    wrap_into(rad, TAU)
}

fn wrap_into(x: f64, period: f64) -> f64 {
    let w = x.rem_euclid(period);
    // rem_euclid rounds tiny negative inputs up to `period`
    if w >= period { 0.0 } else { w }
}

/// Validated classical Keplerian elements.
///
/// Only obtainable through [`RawElements::validate`], so every instance
/// satisfies `a > 0`, `0 <= e < 1`, `mu > 0` and angles in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalElements {
    #[serde(rename = "a")]
    sma: f64,
    #[serde(rename = "e")]
    ecc: f64,
    #[serde(rename = "i")]
    inc: f64,
    #[serde(rename = "omega")]
    argp: f64,
    #[serde(rename = "Omega")]
    raan: f64,
    #[serde(rename = "M0")]
    mean_anom: f64,
    mu: f64,
}

impl OrbitalElements {
    /// Validate an Earth-centred element set given in km and degrees.
    pub fn new(
        sma: f64,
        ecc: f64,
        inc: f64,
        argp: f64,
        raan: f64,
        mean_anom: f64,
    ) -> Result<Self, ValidationError> {
        RawElements::new(sma, ecc, inc, argp, raan, mean_anom).validate()
    }

    /// Circular Earth orbit at given altitude (km) and inclination (deg).
    pub fn circular(altitude: f64, inc: f64) -> Result<Self, ValidationError> {
        Self::new(R_EARTH + altitude, 0.0, inc, 0.0, 0.0, 0.0)
    }

    pub fn sma(&self) -> f64 {
        self.sma
    }

    pub fn ecc(&self) -> f64 {
        self.ecc
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn inc_deg(&self) -> f64 {
        self.inc
    }

    pub fn argp_deg(&self) -> f64 {
        self.argp
    }

    pub fn raan_deg(&self) -> f64 {
        self.raan
    }

    pub fn mean_anom_deg(&self) -> f64 {
        self.mean_anom
    }

    pub fn inc(&self) -> f64 {
        self.inc.to_radians()
    }

    pub fn argp(&self) -> f64 {
        self.argp.to_radians()
    }

    pub fn raan(&self) -> f64 {
        self.raan.to_radians()
    }

    pub fn mean_anom(&self) -> f64 {
        self.mean_anom.to_radians()
    }

    /// Back to the loosely typed form (already normalized).
    pub fn to_raw(&self) -> RawElements {
        RawElements {
            sma: self.sma,
            ecc: self.ecc,
            inc: self.inc,
            argp: self.argp,
            raan: self.raan,
            mean_anom: self.mean_anom,
            mu: self.mu,
        }
    }

    /// Mean motion n = sqrt(mu / a^3), rad/s.
    pub fn mean_motion(&self) -> f64 {
        (self.mu / self.sma.powi(3)).sqrt()
    }

    /// Orbital period T = 2pi / n, s.
    pub fn period(&self) -> f64 {
        TAU / self.mean_motion()
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.sma * (1.0 - self.ecc * self.ecc).sqrt()
    }

    /// Periapsis radius a(1 - e), km.
    pub fn periapsis_radius(&self) -> f64 {
        self.sma * (1.0 - self.ecc)
    }

    /// Apoapsis radius a(1 + e), km.
    pub fn apoapsis_radius(&self) -> f64 {
        self.sma * (1.0 + self.ecc)
    }

    /// Analytic summary that needs no sampling.
    pub fn info(&self, body: &CentralBody) -> OrbitalInfo {
        let periapsis_altitude = body.altitude(self.periapsis_radius());
        let will_impact = periapsis_altitude <= 0.0;
        let period = self.period();
        OrbitalInfo {
            mean_motion: self.mean_motion(),
            period,
            period_minutes: period / 60.0,
            period_hours: period / 3600.0,
            periapsis_altitude,
            apoapsis_altitude: body.altitude(self.apoapsis_radius()),
            will_impact,
            impact_depth: if will_impact { -periapsis_altitude } else { 0.0 },
        }
    }
}

/// Closed-form orbit properties derived from elements alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalInfo {
    pub mean_motion: f64,        // rad/s
    pub period: f64,             // s
    pub period_minutes: f64,
    pub period_hours: f64,
    pub periapsis_altitude: f64, // km
    pub apoapsis_altitude: f64,  // km
    pub will_impact: bool,       // periapsis at or below the surface
    pub impact_depth: f64,       // km below the surface at periapsis, 0 otherwise
}
