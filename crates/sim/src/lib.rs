//! Tag games played on a dynamic spatial index.

pub mod config;
pub mod error;
pub mod field;
pub mod gamemodes;
pub mod player;
pub mod runner;
pub mod world;

// Re-export commonly used types
pub use config::Config;
pub use error::SimError;
pub use field::Field;
pub use runner::{Outcome, Simulation, StopReason, run};
pub use world::World;
