use nalgebra::{Rotation3, Vector3};

use super::elements::OrbitalElements;

/// Position/velocity sample in the inertial frame.
///
/// Frame: equatorial inertial, z toward the reference pole, x toward the
/// reference direction. Units km, km/s, s.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    pub time: f64,          // s since epoch
    pub pos: Vector3<f64>,  // km
    pub vel: Vector3<f64>,  // km/s
    pub converged: bool,    // Kepler solve for this sample met its tolerance
}

impl StateVector {
    pub fn radius(&self) -> f64 {
        self.pos.norm()
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

/// True anomaly from eccentric anomaly (half-angle form, quadrant-safe).
pub fn true_anomaly(e_anom: f64, ecc: f64) -> f64 {
    2.0 * ((1.0 + ecc).sqrt() * (e_anom / 2.0).sin())
        .atan2((1.0 - ecc).sqrt() * (e_anom / 2.0).cos())
}

/// Orbital radius r = a(1 - e cos E).
pub fn orbital_radius(e_anom: f64, elements: &OrbitalElements) -> f64 {
    elements.sma() * (1.0 - elements.ecc() * e_anom.cos())
}

/// Position and velocity in the perifocal (PQW) frame, x toward periapsis.
pub fn perifocal_state(e_anom: f64, elements: &OrbitalElements) -> (Vector3<f64>, Vector3<f64>) {
    let ecc = elements.ecc();
    let r = orbital_radius(e_anom, elements);
    let nu = true_anomaly(e_anom, ecc);

    let pos = Vector3::new(r * nu.cos(), r * nu.sin(), 0.0);

    let sqrt_mu_a = (elements.mu() * elements.sma()).sqrt();
    let vel = Vector3::new(
        -sqrt_mu_a / r * e_anom.sin(),
        sqrt_mu_a / r * (1.0 - ecc * ecc).sqrt() * e_anom.cos(),
        0.0,
    );

    (pos, vel)
}

/// Perifocal -> inertial rotation.
///
/// Undoes the three frame rotations in order: -omega about the orbit normal,
/// then -i about the line of nodes, then -Omega about the reference pole.
/// As an active rotation of vectors that is Rz(Omega) * Rx(i) * Rz(omega).
pub fn perifocal_to_inertial(elements: &OrbitalElements) -> Rotation3<f64> {
    let r_argp = Rotation3::from_axis_angle(&Vector3::z_axis(), elements.argp());
    let r_inc = Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inc());
    let r_raan = Rotation3::from_axis_angle(&Vector3::z_axis(), elements.raan());
    r_raan * r_inc * r_argp
}

/// Inertial state at eccentric anomaly `e_anom`, stamped with `time`.
pub fn state_at(e_anom: f64, elements: &OrbitalElements, time: f64, converged: bool) -> StateVector {
    let (pos_pqw, vel_pqw) = perifocal_state(e_anom, elements);
    let rot = perifocal_to_inertial(elements);
    StateVector {
        time,
        pos: rot * pos_pqw,
        vel: rot * vel_pqw,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::gravity::{vis_viva_speed, MU_EARTH};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn elements(sma: f64, ecc: f64, inc: f64, argp: f64, raan: f64) -> OrbitalElements {
        OrbitalElements::new(sma, ecc, inc, argp, raan, 0.0).unwrap()
    }

    /// Closed-form PQW -> ECI matrix applied to a perifocal vector.
    fn reference_rotation(el: &OrbitalElements, v: &Vector3<f64>) -> Vector3<f64> {
        let (cos_raan, sin_raan) = (el.raan().cos(), el.raan().sin());
        let (cos_argp, sin_argp) = (el.argp().cos(), el.argp().sin());
        let (cos_inc, sin_inc) = (el.inc().cos(), el.inc().sin());
        Vector3::new(
            (cos_raan * cos_argp - sin_raan * sin_argp * cos_inc) * v.x
                + (-cos_raan * sin_argp - sin_raan * cos_argp * cos_inc) * v.y,
            (sin_raan * cos_argp + cos_raan * sin_argp * cos_inc) * v.x
                + (-sin_raan * sin_argp + cos_raan * cos_argp * cos_inc) * v.y,
            (sin_argp * sin_inc) * v.x + (cos_argp * sin_inc) * v.y,
        )
    }

    #[test]
    fn radius_at_apsides() {
        let el = elements(26_600.0, 0.74, 63.4, 270.0, 0.0);
        let peri = state_at(0.0, &el, 0.0, true);
        let apo = state_at(PI, &el, 0.0, true);
        assert_relative_eq!(peri.radius(), el.periapsis_radius(), max_relative = 1e-12);
        assert_relative_eq!(apo.radius(), el.apoapsis_radius(), max_relative = 1e-12);
    }

    #[test]
    fn rotation_matches_closed_form() {
        let el = elements(8_000.0, 0.1, 37.0, 123.0, 211.0);
        let rot = perifocal_to_inertial(&el);
        for v in [Vector3::x(), Vector3::y(), Vector3::new(3.0, -4.0, 0.0)] {
            let got = rot * v;
            let want = reference_rotation(&el, &v);
            assert!((got - want).norm() < 1e-12, "{got:?} vs {want:?}");
        }
    }

    #[test]
    fn angular_momentum_points_along_orbit_normal() {
        let el = elements(8_000.0, 0.3, 51.6, 40.0, 75.0);
        let s = state_at(1.1, &el, 0.0, true);
        let h = s.pos.cross(&s.vel).normalize();
        let (i, raan) = (el.inc(), el.raan());
        let normal = Vector3::new(i.sin() * raan.sin(), -i.sin() * raan.cos(), i.cos());
        assert!((h - normal).norm() < 1e-12, "h = {h:?}");
    }

    #[test]
    fn periapsis_lies_along_argument_of_periapsis() {
        // Equatorial orbit: periapsis direction is at longitude Omega + omega.
        let el = elements(10_000.0, 0.2, 0.0, 30.0, 60.0);
        let peri = state_at(0.0, &el, 0.0, true);
        let lon = peri.pos.y.atan2(peri.pos.x).to_degrees();
        assert!((lon - 90.0).abs() < 1e-9, "periapsis longitude {lon}");
    }

    #[test]
    fn speed_matches_vis_viva() {
        let el = elements(12_000.0, 0.45, 10.0, 20.0, 30.0);
        for e_anom in [0.0, 0.7, 2.0, PI, 4.5] {
            let s = state_at(e_anom, &el, 0.0, true);
            let expected = vis_viva_speed(s.radius(), el.sma(), MU_EARTH);
            assert_relative_eq!(s.speed(), expected, max_relative = 1e-10);
            // Velocity is perpendicular to position only at the apsides
            if e_anom == 0.0 || e_anom == PI {
                assert!(s.pos.dot(&s.vel).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn true_anomaly_is_quadrant_safe() {
        assert_eq!(true_anomaly(0.0, 0.5), 0.0);
        assert!((true_anomaly(PI, 0.5) - PI).abs() < 1e-12);
        // Past apoapsis the true anomaly keeps increasing beyond pi
        let nu = true_anomaly(4.0, 0.5);
        assert!(nu > PI && nu < 2.0 * PI, "nu = {nu}");
    }
}
