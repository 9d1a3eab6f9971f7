//! Procedurally animated sea surface
//!
//! The sea is a cylinder lying along the z axis, spinning under the plane.
//! Every grid vertex carries its own wave oscillator: a random phase,
//! amplitude and angular speed sampled at construction. Each tick moves the
//! vertex on a small circle around its base position, which reads as rolling
//! waves once the surface is lit flat-shaded.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::World;
use crate::wrap_angle;

/// One oscillating vertex of the sea surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wave {
    /// Rest position on the cylinder, in sea-local space
    pub base: Vec3,
    /// Current phase (radians)
    pub ang: f32,
    /// Circle radius of the oscillation
    pub amp: f32,
    /// Phase advance per millisecond
    pub speed: f32,
}

/// The sea surface: a vertex grid plus its spin angle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sea {
    pub waves: Vec<Wave>,
    /// Displaced vertex positions, updated each tick (sea-local space)
    pub positions: Vec<Vec3>,
    /// Spin around the cylinder axis, wrapped to [0, 2π)
    pub rotation: f32,
    pub radial_segments: u32,
    pub length_segments: u32,
}

impl Sea {
    /// Build the cylinder grid and seed every vertex's oscillator
    pub fn new(world: &World, rng: &mut impl Rng) -> Self {
        let radial = world.sea_radial_segments;
        let length = world.sea_length_segments;
        let mut waves = Vec::with_capacity(((radial + 1) * (length + 1)) as usize);

        for j in 0..=length {
            let t = j as f32 / length as f32;
            let z = (t - 0.5) * world.sea_length;
            for i in 0..=radial {
                let theta = i as f32 / radial as f32 * std::f32::consts::TAU;
                let base = Vec3::new(
                    world.sea_radius * theta.cos(),
                    world.sea_radius * theta.sin(),
                    z,
                );
                waves.push(Wave {
                    base,
                    ang: rng.random_range(0.0..std::f32::consts::TAU),
                    amp: rng.random_range(world.waves_min_amp..world.waves_max_amp),
                    speed: rng.random_range(world.waves_min_speed..world.waves_max_speed),
                });
            }
        }

        let positions = waves.iter().map(|w| w.base).collect();
        Self {
            waves,
            positions,
            rotation: 0.0,
            radial_segments: radial,
            length_segments: length,
        }
    }

    /// Advance every oscillator and refresh the displaced positions
    pub fn tick(&mut self, dt: f32) {
        for (wave, pos) in self.waves.iter_mut().zip(self.positions.iter_mut()) {
            pos.x = wave.base.x + wave.ang.cos() * wave.amp;
            pos.y = wave.base.y + wave.ang.sin() * wave.amp;
            pos.z = wave.base.z;
            wave.ang += wave.speed * dt;
        }
    }

    /// Spin the cylinder by the current scroll speed
    pub fn spin(&mut self, speed: f32, dt: f32) {
        self.rotation = wrap_angle(self.rotation + speed * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn make_sea() -> (World, Sea) {
        let world = World::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let sea = Sea::new(&world, &mut rng);
        (world, sea)
    }

    #[test]
    fn test_grid_dimensions() {
        let (world, sea) = make_sea();
        let expected =
            ((world.sea_radial_segments + 1) * (world.sea_length_segments + 1)) as usize;
        assert_eq!(sea.waves.len(), expected);
        assert_eq!(sea.positions.len(), expected);
    }

    #[test]
    fn test_oscillator_params_within_tuning() {
        let (world, sea) = make_sea();
        for wave in &sea.waves {
            assert!(wave.amp >= world.waves_min_amp && wave.amp < world.waves_max_amp);
            assert!(wave.speed >= world.waves_min_speed && wave.speed < world.waves_max_speed);
        }
    }

    #[test]
    fn test_displacement_bounded_by_amplitude() {
        let (_, mut sea) = make_sea();
        for _ in 0..500 {
            sea.tick(1000.0 / 60.0);
        }
        for (wave, pos) in sea.waves.iter().zip(sea.positions.iter()) {
            let d = (*pos - wave.base).length();
            assert!(d <= wave.amp + 0.001, "displacement {d} exceeds amp {}", wave.amp);
            // z never moves
            assert_eq!(pos.z, wave.base.z);
        }
    }

    #[test]
    fn test_spin_wraps() {
        let (_, mut sea) = make_sea();
        for _ in 0..10_000 {
            sea.spin(0.0005, 1000.0 / 60.0);
            assert!(sea.rotation >= 0.0 && sea.rotation < std::f32::consts::TAU);
        }
    }
}
