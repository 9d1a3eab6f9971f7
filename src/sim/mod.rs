//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (milliseconds, 60 Hz)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod sea;
pub mod state;
pub mod tick;

pub use collision::{impact_kick, sphere_collide};
pub use enemy::{Enemy, spawn_enemies};
pub use sea::Sea;
pub use state::{Airplane, Camera, GameState, GameStatus, Statistics, World};
pub use tick::{TickInput, tick};
