pub mod physics;
pub mod orbital;
pub mod sim;
pub mod analysis;
pub mod api;
pub mod io;
pub mod error;

pub use analysis::Analysis;
pub use error::{OrbitError, OrbitResult, ValidationError, Violation};
pub use orbital::{OrbitalElements, PresetCatalog, RawElements, StateVector};
pub use sim::{sample, ImpactEvent, SimConfig, Trajectory};
