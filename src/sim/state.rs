//! Game state and core simulation types
//!
//! `World` is the read-only tuning record; `GameState` is the mutable
//! session state owned by the frame loop and rebuilt on replay.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::sea::Sea;
use crate::scene::{NodeId, Scene};

/// Airplane mesh scale (model is authored at 4x gameplay size)
pub const PLANE_SCALE: f32 = 0.25;
/// Propeller hub offset along the fuselage, in model space
pub const PROPELLER_OFFSET: Vec3 = Vec3::new(60.0, 0.0, 0.0);

const PLANE_COLOR: [f32; 4] = [0.949, 0.325, 0.275, 1.0];
const PROPELLER_COLOR: [f32; 4] = [0.137, 0.098, 0.059, 1.0];

/// Static world tunables. Speeds and accelerations are per millisecond;
/// distances are in world units. Read-only after initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub init_speed: f32,
    pub increment_speed_by_time: f32,
    pub distance_for_speed_update: u32,
    pub ratio_speed_distance: f32,

    pub max_lives: u8,

    pub plane_default_height: f32,
    pub plane_amp_height: f32,
    pub plane_amp_width: f32,
    pub plane_move_sensivity: f32,
    pub plane_rot_z_sensivity: f32,
    pub plane_min_speed: f32,
    pub plane_max_speed: f32,

    pub sea_radius: f32,
    pub sea_length: f32,
    pub sea_radial_segments: u32,
    pub sea_length_segments: u32,
    pub waves_min_amp: f32,
    pub waves_max_amp: f32,
    pub waves_min_speed: f32,
    pub waves_max_speed: f32,

    pub camera_sensivity: f32,

    pub enemy_distance_tolerance: f32,
    pub enemies_speed: f32,
    pub distance_for_enemies_spawn: u32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            init_speed: 0.00035,
            increment_speed_by_time: 0.0000025,
            distance_for_speed_update: 100,
            ratio_speed_distance: 50.0,

            max_lives: 1,

            plane_default_height: 100.0,
            plane_amp_height: 150.0,
            plane_amp_width: 100.0,
            plane_move_sensivity: 0.002,
            plane_rot_z_sensivity: 0.002,
            plane_min_speed: 1.2,
            plane_max_speed: 1.6,

            sea_radius: 600.0,
            sea_length: 800.0,
            sea_radial_segments: 40,
            sea_length_segments: 10,
            waves_min_amp: 5.0,
            waves_max_amp: 20.0,
            waves_min_speed: 0.001,
            waves_max_speed: 0.003,

            camera_sensivity: 0.002,

            enemy_distance_tolerance: 40.0,
            enemies_speed: 0.6,
            distance_for_enemies_spawn: 50,
        }
    }
}

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Plane under player control
    Playing,
    /// Plane spiraling down after a fatal hit or sea contact
    GameOver,
    /// Crash finished, waiting for a replay click
    WaitingReplay,
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
    pub lives_lost: u32,
}

/// The player's plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airplane {
    pub node: NodeId,
    pub propeller: NodeId,
    pub position: Vec3,
    /// Euler rotation (XYZ order); z is roll toward the height target
    pub rotation: Vec3,
    pub propeller_angle: f32,
}

impl Airplane {
    fn new(node: NodeId, propeller: NodeId, world: &World) -> Self {
        Self {
            node,
            propeller,
            position: Vec3::new(0.0, world.plane_default_height, 0.0),
            rotation: Vec3::ZERO,
            propeller_angle: 0.0,
        }
    }

    fn reset(&mut self, world: &World) {
        self.position = Vec3::new(0.0, world.plane_default_height, 0.0);
        self.rotation = Vec3::ZERO;
        self.propeller_angle = 0.0;
    }
}

/// Follow-view camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub fov_deg: f32,
    pub position: Vec3,
    /// Euler rotation (XYZ order)
    pub rotation: Vec3,
}

/// Fixed follow-view orientation, looking along the flight path
const FOLLOW_ROTATION: Vec3 = Vec3::new(-1.490_248, -1.412_451_4, -1.489_232_3);

impl Camera {
    pub fn new() -> Self {
        Self {
            fov_deg: 50.0,
            position: Vec3::ZERO,
            rotation: FOLLOW_ROTATION,
        }
    }

    /// Snap behind and above the plane
    pub fn set_follow_view(&mut self, plane_pos: Vec3) {
        self.position = Vec3::new(-70.0, plane_pos.y + 70.0, plane_pos.z);
        self.rotation = FOLLOW_ROTATION;
    }

    /// Combined view-projection matrix for the current pose
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_deg.to_radians(), aspect, 0.1, 10_000.0);
        let rot = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        let view = (Mat4::from_translation(self.position) * Mat4::from_quat(rot)).inverse();
        proj * view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG (wave phases, enemy spawn jitter)
    pub rng: Pcg32,
    pub status: GameStatus,
    pub paused: bool,

    /// Effective scroll speed (`base_speed * plane_speed`), per ms
    pub speed: f32,
    pub base_speed: f32,
    pub target_base_speed: f32,
    /// Floored distance at which the last speed bump fired
    pub speed_last_update: f32,

    /// Distance flown, the player's score
    pub distance: f32,
    pub lives: u8,

    pub plane_fall_speed: f32,
    /// Throttle factor from the mouse x position
    pub plane_speed: f32,
    /// Collision knockback: velocity and accumulated displacement,
    /// applied to the plane's steering targets and decayed each tick
    pub collision_speed_x: f32,
    pub collision_speed_y: f32,
    pub collision_displacement_x: f32,
    pub collision_displacement_y: f32,

    /// Floored distance at which the last enemy batch spawned
    pub enemy_last_spawn: f32,

    /// Ambient light level; flashes to 2.0 on impact, settles at 0.5
    pub ambient_light: f32,

    pub time_ticks: u64,
    pub stats: Statistics,

    pub scene: Scene,
    pub airplane: Airplane,
    pub camera: Camera,
    pub enemies: Vec<Enemy>,
    pub sea: Sea,

    next_id: u32,
}

impl GameState {
    /// Create a fresh session with the given seed
    pub fn new(world: &World, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut scene = Scene::new();
        let sea = Sea::new(world, &mut rng);

        let node = scene.add("airplane", PLANE_COLOR);
        let propeller = scene.add("propeller", PROPELLER_COLOR);
        let airplane = Airplane::new(node, propeller, world);

        let mut camera = Camera::new();
        camera.set_follow_view(airplane.position);

        let mut state = Self {
            seed,
            rng,
            status: GameStatus::Playing,
            paused: false,
            speed: 0.0,
            base_speed: world.init_speed,
            target_base_speed: world.init_speed,
            speed_last_update: 0.0,
            distance: 0.0,
            lives: world.max_lives,
            plane_fall_speed: 0.001,
            plane_speed: 0.0,
            collision_speed_x: 0.0,
            collision_speed_y: 0.0,
            collision_displacement_x: 0.0,
            collision_displacement_y: 0.0,
            enemy_last_spawn: 0.0,
            ambient_light: 0.5,
            time_ticks: 0,
            stats: Statistics::default(),
            scene,
            airplane,
            camera,
            enemies: Vec::new(),
            sea,
            next_id: 1,
        };
        state.sync_nodes();
        state
    }

    /// Reset the session for a replay. The scene keeps the plane and sea,
    /// enemies are despawned, and all progression scalars start over.
    /// The RNG keeps running so replays see fresh waves of enemies.
    pub fn reset(&mut self, world: &World) {
        for enemy in self.enemies.drain(..) {
            self.scene.remove(enemy.node);
        }

        self.status = GameStatus::Playing;
        self.paused = false;
        self.speed = 0.0;
        self.base_speed = world.init_speed;
        self.target_base_speed = world.init_speed;
        self.speed_last_update = 0.0;
        self.distance = 0.0;
        self.lives = world.max_lives;
        self.plane_fall_speed = 0.001;
        self.plane_speed = 0.0;
        self.collision_speed_x = 0.0;
        self.collision_speed_y = 0.0;
        self.collision_displacement_x = 0.0;
        self.collision_displacement_y = 0.0;
        self.enemy_last_spawn = 0.0;
        self.ambient_light = 0.5;
        self.stats = Statistics::default();

        self.airplane.reset(world);
        self.camera.set_follow_view(self.airplane.position);
        self.sync_nodes();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Push the plane and propeller transforms into their scene nodes
    pub fn sync_nodes(&mut self) {
        let plane = &self.airplane;
        let plane_matrix;
        if let Some(node) = self.scene.get_mut(plane.node) {
            node.position = plane.position;
            node.rotation = plane.rotation;
            node.scale = Vec3::splat(PLANE_SCALE);
            plane_matrix = node.matrix();
        } else {
            return;
        }

        let prop_rotation = plane.rotation + Vec3::new(plane.propeller_angle, 0.0, 0.0);
        if let Some(node) = self.scene.get_mut(plane.propeller) {
            node.position = plane_matrix.transform_point3(PROPELLER_OFFSET);
            node.rotation = prop_rotation;
            node.scale = Vec3::splat(PLANE_SCALE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_matches_world() {
        let world = World::default();
        let state = GameState::new(&world, 7);

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.lives, world.max_lives);
        assert_eq!(state.base_speed, world.init_speed);
        assert_eq!(state.distance, 0.0);
        assert!(state.enemies.is_empty());
        // Plane and propeller nodes exist
        assert!(state.scene.get(state.airplane.node).is_some());
        assert!(state.scene.get(state.airplane.propeller).is_some());
        // Plane sits at the default cruising height
        assert_eq!(state.airplane.position.y, world.plane_default_height);
    }

    #[test]
    fn test_reset_clears_enemies_and_progress() {
        let world = World::default();
        let mut state = GameState::new(&world, 7);

        super::super::enemy::spawn_enemies(&world, &mut state, 5);
        state.distance = 1234.0;
        state.status = GameStatus::WaitingReplay;

        state.reset(&world);

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.distance, 0.0);
        assert!(state.enemies.is_empty());
        // Only the plane and propeller remain in the scene
        assert_eq!(state.scene.len(), 2);
        assert_eq!(state.stats, Statistics::default());
    }

    #[test]
    fn test_camera_follow_view() {
        let mut camera = Camera::new();
        camera.set_follow_view(Vec3::new(0.0, 100.0, 25.0));
        assert_eq!(camera.position, Vec3::new(-70.0, 170.0, 25.0));

        // View-projection is invertible and finite
        let vp = camera.view_proj(16.0 / 9.0);
        assert!(vp.determinant().is_finite());
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let world = World::default();
        let state = GameState::new(&world, 42);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, state.seed);
        assert_eq!(back.status, state.status);
        assert_eq!(back.scene.len(), state.scene.len());
    }
}
