//! Enemy obstacles
//!
//! Enemies orbit the sea cylinder toward the plane: each one advances along
//! a circle of its own radius, sweeping from the horizon ahead, past the
//! plane, and out of view behind it. A hit is a plain distance test against
//! the plane; an enemy that makes it past half a revolution despawns.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{impact_kick, sphere_collide};
use super::state::{GameState, GameStatus, World};
use crate::scene::NodeId;

/// An enemy obstacle on its orbit around the sea
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Orbit angle; spawns slightly negative, despawns past π
    pub angle: f32,
    /// Orbit radius from the sea axis
    pub distance: f32,
    pub position: Vec3,
    /// Per-tick tumble rates (y and z rotation)
    pub tumble: [f32; 2],
    pub node: NodeId,
}

/// Spawn a batch of enemies ahead of the plane
pub fn spawn_enemies(world: &World, state: &mut GameState, count: u32) {
    for i in 0..count {
        let jitter: f32 = state.rng.random_range(-1.0..1.0);
        let distance =
            world.sea_radius + world.plane_default_height + jitter * (world.plane_amp_height - 20.0);
        let z = (state.rng.random_range(0.0..1.0f32) - 0.5) * 300.0;
        let angle = -(i as f32 * 0.1);

        let color = [
            state.rng.random_range(0.2..1.0),
            state.rng.random_range(0.2..1.0),
            state.rng.random_range(0.2..1.0),
            1.0,
        ];
        let tumble = [
            state.rng.random_range(0.0..0.1),
            state.rng.random_range(0.0..0.1),
        ];

        // Spawn with x compressed toward the horizon; the first advance
        // places the enemy on its true orbit
        let position = Vec3::new(
            angle.cos() * distance * 0.2,
            -world.sea_radius + angle.sin() * distance,
            z,
        );

        let node = state.scene.add("enemy", color);
        if let Some(n) = state.scene.get_mut(node) {
            n.position = position;
            n.scale = Vec3::splat(5.0);
        }

        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            angle,
            distance,
            position,
            tumble,
            node,
        });
    }
    state.stats.enemies_spawned += count;
    log::debug!(
        "Spawned {} enemies ({} alive)",
        count,
        state.enemies.len()
    );
}

/// Advance every enemy, resolve plane collisions, cull the passed-by ones
pub fn advance_enemies(world: &World, state: &mut GameState, dt: f32) {
    let orbit_speed = state.speed * world.enemies_speed;
    let plane_pos = state.airplane.position;
    let playing = state.status == GameStatus::Playing;

    let mut removed: Vec<(u32, NodeId)> = Vec::new();
    let mut hit_at: Option<Vec3> = None;

    for enemy in state.enemies.iter_mut() {
        enemy.angle += dt * orbit_speed;
        if enemy.angle > std::f32::consts::TAU {
            enemy.angle -= std::f32::consts::TAU;
        }
        enemy.position.x = enemy.angle.cos() * enemy.distance;
        enemy.position.y = -world.sea_radius + enemy.angle.sin() * enemy.distance;

        if let Some(node) = state.scene.get_mut(enemy.node) {
            node.position = enemy.position;
            node.rotation.y += enemy.tumble[0];
            node.rotation.z += enemy.tumble[1];
        }

        if playing && sphere_collide(plane_pos, enemy.position, world.enemy_distance_tolerance) {
            removed.push((enemy.id, enemy.node));
            hit_at = Some(enemy.position);
            state.stats.enemies_killed += 1;
        } else if enemy.angle > std::f32::consts::PI {
            // Passed behind the plane
            removed.push((enemy.id, enemy.node));
        }
    }

    for &(id, node) in &removed {
        state.scene.remove(node);
        state.enemies.retain(|e| e.id != id);
    }

    if let Some(impact) = hit_at {
        let kick = impact_kick(plane_pos, impact);
        state.collision_speed_x = kick.x;
        state.collision_speed_y = kick.y;
        state.ambient_light = 2.0;
        state.lives = state.lives.saturating_sub(1);
        state.stats.lives_lost += 1;
        state.status = GameStatus::GameOver;
        log::info!(
            "Hit at distance {:.0} ({} enemies dodged)",
            state.distance,
            state.stats.enemies_spawned - state.stats.enemies_killed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (World, GameState) {
        let world = World::default();
        let state = GameState::new(&world, 99);
        (world, state)
    }

    #[test]
    fn test_spawn_batch() {
        let (world, mut state) = setup();
        spawn_enemies(&world, &mut state, 5);

        assert_eq!(state.enemies.len(), 5);
        assert_eq!(state.stats.enemies_spawned, 5);
        // Plane + propeller + 5 enemies
        assert_eq!(state.scene.len(), 7);

        let max_orbit = world.sea_radius + world.plane_default_height + (world.plane_amp_height - 20.0);
        let min_orbit = world.sea_radius + world.plane_default_height - (world.plane_amp_height - 20.0);
        for (i, enemy) in state.enemies.iter().enumerate() {
            assert!((enemy.angle - (-(i as f32) * 0.1)).abs() < 0.001);
            assert!(enemy.distance >= min_orbit && enemy.distance <= max_orbit);
            assert!(enemy.position.z.abs() <= 150.0);
        }
    }

    #[test]
    fn test_passed_by_enemy_despawns() {
        let (world, mut state) = setup();
        spawn_enemies(&world, &mut state, 1);
        state.enemies[0].angle = std::f32::consts::PI + 0.01;
        // Far from the plane so no collision fires
        state.enemies[0].distance = world.sea_radius * 2.0;
        state.speed = 0.0;

        advance_enemies(&world, &mut state, 16.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.scene.len(), 2);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_collision_ends_the_run() {
        let (world, mut state) = setup();
        spawn_enemies(&world, &mut state, 1);

        // Park the enemy's orbit right on the plane
        let plane = state.airplane.position;
        state.enemies[0].angle = (plane.y + world.sea_radius).atan2(plane.x);
        state.enemies[0].distance = Vec3::new(plane.x, plane.y + world.sea_radius, 0.0).length();
        state.enemies[0].position.z = plane.z;
        state.speed = 0.0;

        advance_enemies(&world, &mut state, 16.0);

        assert_eq!(state.status, GameStatus::GameOver);
        assert!(state.enemies.is_empty());
        assert_eq!(state.stats.enemies_killed, 1);
        assert_eq!(state.stats.lives_lost, 1);
        assert_eq!(state.lives, 0);
        assert_eq!(state.ambient_light, 2.0);
        // Knockback pushes the steering targets away from the impact
        assert!(state.collision_speed_x != 0.0 || state.collision_speed_y != 0.0);
    }

    #[test]
    fn test_no_collision_when_not_playing() {
        let (world, mut state) = setup();
        spawn_enemies(&world, &mut state, 1);
        let plane = state.airplane.position;
        state.enemies[0].angle = (plane.y + world.sea_radius).atan2(plane.x);
        state.enemies[0].distance = Vec3::new(plane.x, plane.y + world.sea_radius, 0.0).length();
        state.enemies[0].position.z = plane.z;
        state.speed = 0.0;
        state.status = GameStatus::GameOver;

        advance_enemies(&world, &mut state, 16.0);
        assert_eq!(state.stats.enemies_killed, 0);
    }
}
