use std::io::Write;
use std::path::Path;

use crate::error::OrbitResult;
use crate::sim::runner::Trajectory;

/// Write trajectory data to CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          radius, altitude, converged
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &Trajectory, body_radius: f64) -> OrbitResult<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,radius,altitude,converged"
    )?;

    for s in &trajectory.states {
        let r = s.radius();
        writeln!(
            writer,
            "{:.3},{:.6},{:.6},{:.6},{:.9},{:.9},{:.9},{:.6},{:.6},{}",
            s.time,
            s.pos.x, s.pos.y, s.pos.z,
            s.vel.x, s.vel.y, s.vel.z,
            r,
            r - body_radius,
            s.converged,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &Trajectory, body_radius: f64) -> OrbitResult<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, trajectory, body_radius)?;
    file.flush()?;
    Ok(())
}
