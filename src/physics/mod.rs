pub mod gravity;

pub use gravity::{CentralBody, MU_EARTH, R_EARTH};
