pub mod config;
pub mod event;
pub mod runner;

pub use config::SimConfig;
pub use event::{ImpactDetector, ImpactEvent};
pub use runner::{sample, Trajectory};
