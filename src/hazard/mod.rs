//! Hazard layer: hidden mines, explosion simulation and risk estimation

pub mod estimate;
pub mod explosion;
pub mod map;

pub use estimate::{HazardEstimate, RISK_THRESHOLD};
pub use explosion::{simulate_explosion, will_trigger, Explosion};
pub use map::{HazardMap, HAZARD_CELLS, HAZARD_SIZE};
