//! Sea Glider - an arcade flight game over a procedurally animated sea
//!
//! Core modules:
//! - `sim`: Deterministic simulation (flight kinematics, enemies, waves, collisions)
//! - `scene`: Flat registry of renderable nodes owned by the simulation
//! - `assets`: In-memory model store for the built-in low-poly meshes
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Quality/accessibility preferences
//! - `highscores`: Best-distance leaderboard

pub mod assets;
pub mod highscores;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, matched to display refresh)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Map a value from one range to another, clamping the input first.
///
/// `v` is clamped to `[vmin, vmax]`, then linearly mapped to `[tmin, tmax]`.
/// Output is therefore always bounded by the target range.
#[inline]
pub fn normalize(v: f32, vmin: f32, vmax: f32, tmin: f32, tmax: f32) -> f32 {
    let nv = v.clamp(vmin, vmax);
    let pc = (nv - vmin) / (vmax - vmin);
    tmin + pc * (tmax - tmin)
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    while angle >= TAU {
        angle -= TAU;
    }
    while angle < 0.0 {
        angle += TAU;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_maps_and_clamps() {
        // Mid-range maps linearly
        assert!((normalize(0.0, -1.0, 1.0, -100.0, 100.0)).abs() < 0.001);
        assert!((normalize(0.5, -1.0, 1.0, -100.0, 100.0) - 50.0).abs() < 0.001);
        // Out-of-range input clamps to the target bounds
        assert!((normalize(5.0, -1.0, 1.0, -100.0, 100.0) - 100.0).abs() < 0.001);
        assert!((normalize(-5.0, -1.0, 1.0, -100.0, 100.0) + 100.0).abs() < 0.001);
    }

    #[test]
    fn test_wrap_angle() {
        use std::f32::consts::{PI, TAU};
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 0.001);
        assert!((wrap_angle(-PI) - PI).abs() < 0.001);
        assert!(wrap_angle(0.0) == 0.0);
    }
}
