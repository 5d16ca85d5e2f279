use crate::error::{OrbitError, OrbitResult};

/// Outcome of one Kepler solve.
///
/// `converged == false` means the iteration cap was hit and
/// `eccentric_anomaly` is only the last Newton iterate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub eccentric_anomaly: f64, // rad
    pub iterations: u32,
    pub residual: f64, // |E - e sin E - M|, rad
    pub converged: bool,
}

/// Newton-Raphson solver for M = E - e sin E on elliptical orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    pub tolerance: f64, // step size below which E is accepted, rad
    pub max_iterations: u32,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 50,
        }
    }
}

impl KeplerSolver {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Solve for eccentric anomaly given mean anomaly `m` (rad, any real) and `ecc`.
    ///
    /// Rejects `ecc` outside [0, 1) and a non-finite `m` before iterating.
    pub fn solve(&self, m: f64, ecc: f64) -> OrbitResult<KeplerSolution> {
        if !ecc.is_finite() || !(0.0..1.0).contains(&ecc) {
            return Err(OrbitError::NonElliptical { ecc });
        }
        if !m.is_finite() {
            return Err(OrbitError::NonFiniteAnomaly { m });
        }

        let residual = |e_anom: f64| (e_anom - ecc * e_anom.sin() - m).abs();

        // Starting from M + e sin M keeps high-eccentricity cases near the root.
        let mut e_anom = m + ecc * m.sin();

        for iter in 1..=self.max_iterations {
            let f = e_anom - ecc * e_anom.sin() - m;
            let df = 1.0 - ecc * e_anom.cos();
            let next = e_anom - f / df;

            if (next - e_anom).abs() < self.tolerance {
                return Ok(KeplerSolution {
                    eccentric_anomaly: next,
                    iterations: iter,
                    residual: residual(next),
                    converged: true,
                });
            }
            e_anom = next;
        }

        Ok(KeplerSolution {
            eccentric_anomaly: e_anom,
            iterations: self.max_iterations,
            residual: residual(e_anom),
            converged: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn satisfies_kepler_equation_across_grid() {
        let solver = KeplerSolver::default();
        for ei in 0..=99 {
            let ecc = ei as f64 * 0.01;
            for mi in 0..360 {
                let m = mi as f64 / 360.0 * TAU;
                let sol = solver.solve(m, ecc).unwrap();
                assert!(sol.converged, "no convergence at e={ecc}, M={m}");
                let err = (sol.eccentric_anomaly - ecc * sol.eccentric_anomaly.sin() - m).abs();
                assert!(err < 1e-6, "residual {err:.3e} at e={ecc}, M={m}");
            }
        }
    }

    #[test]
    fn circular_orbit_is_identity() {
        let sol = KeplerSolver::default().solve(1.234, 0.0).unwrap();
        assert!((sol.eccentric_anomaly - 1.234).abs() < 1e-12);
        assert!(sol.iterations <= 2);
    }

    #[test]
    fn apsides_are_fixed_points() {
        let solver = KeplerSolver::default();
        assert_eq!(solver.solve(0.0, 0.7).unwrap().eccentric_anomaly, 0.0);
        let apo = solver.solve(PI, 0.7).unwrap();
        assert!((apo.eccentric_anomaly - PI).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_elliptical() {
        let solver = KeplerSolver::default();
        assert!(matches!(solver.solve(1.0, 1.0), Err(OrbitError::NonElliptical { .. })));
        assert!(matches!(solver.solve(1.0, -0.1), Err(OrbitError::NonElliptical { .. })));
    }

    #[test]
    fn rejects_non_finite_mean_anomaly() {
        let solver = KeplerSolver::default();
        for m in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            match solver.solve(m, 0.1) {
                Err(err @ OrbitError::NonFiniteAnomaly { .. }) => {
                    assert!(err.to_string().contains("mean anomaly"), "{err}");
                }
                other => panic!("expected non-finite anomaly error for M={m}, got {other:?}"),
            }
        }
    }

    #[test]
    fn loose_tolerance_stops_early() {
        let tight = KeplerSolver::default().solve(2.0, 0.8).unwrap();
        let loose = KeplerSolver::default().with_tolerance(1e-2).solve(2.0, 0.8).unwrap();
        assert!(loose.converged);
        assert!(loose.iterations <= tight.iterations);
    }

    #[test]
    fn capped_iteration_is_flagged() {
        let solver = KeplerSolver::default().with_max_iterations(1);
        let sol = solver.solve(0.3, 0.95).unwrap();
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 1);
        assert!(sol.residual > 0.0);
    }
}
