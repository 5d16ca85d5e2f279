pub mod elements;
pub mod frame;
pub mod kepler;
pub mod presets;

pub use elements::{OrbitalElements, OrbitalInfo, RawElements};
pub use frame::StateVector;
pub use kepler::{KeplerSolution, KeplerSolver};
pub use presets::{Preset, PresetCatalog};
