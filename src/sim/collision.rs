//! Collision detection and response
//!
//! Everything is a sphere here: a hit is a Euclidean-distance threshold
//! test, and the response is a displacement kick applied to the plane's
//! steering targets.

use glam::Vec3;

/// Fixed kick magnitude applied on impact
const KICK_STRENGTH: f32 = 10.0;

/// True if two positions are closer than `tolerance`
#[inline]
pub fn sphere_collide(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    (a - b).length() < tolerance
}

/// Displacement velocity pushing the plane away from an impact point
pub fn impact_kick(plane_pos: Vec3, impact_pos: Vec3) -> Vec3 {
    let diff = plane_pos - impact_pos;
    let d = diff.length();
    if d < 1e-6 {
        // Degenerate: dead-center hit, no preferred direction
        return Vec3::ZERO;
    }
    diff * (KICK_STRENGTH / d)
}
