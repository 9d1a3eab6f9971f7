//! Fixed timestep simulation tick
//!
//! One call advances the whole session by one display frame: progression
//! cadences, flight kinematics, camera follow, the crash sequence, sea
//! animation and enemy motion. The timestep is in milliseconds.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::enemy::{advance_enemies, spawn_enemies};
use super::state::{GameState, GameStatus, World};
use crate::normalize;

/// Enemies spawned per cadence crossing
const ENEMIES_PER_SPAWN: u32 = 5;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Pointer position normalized to [-1, 1] on both axes (y up)
    pub mouse: Vec2,
    /// Restart request (click/tap while waiting for replay)
    pub replay: bool,
    /// Pause toggle
    pub pause: bool,
    /// Widen the field of view with throttle (disabled by reduced motion)
    pub fov_swing: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            mouse: Vec2::ZERO,
            replay: false,
            pause: false,
            fov_swing: true,
        }
    }
}

/// Advance the game state by one fixed timestep (`dt` in milliseconds)
pub fn tick(world: &World, state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.paused = !state.paused;
        log::info!("Paused: {}", state.paused);
    }
    if state.paused {
        return;
    }

    state.time_ticks += 1;

    // Progression cadences fire on floored-distance milestones, each at
    // most once per milestone
    if state.status == GameStatus::Playing {
        let milestone = state.distance.floor();
        if (milestone as u64).is_multiple_of(world.distance_for_speed_update as u64)
            && milestone > state.speed_last_update
        {
            state.speed_last_update = milestone;
            state.target_base_speed += world.increment_speed_by_time * dt;
        }
        if (milestone as u64).is_multiple_of(world.distance_for_enemies_spawn as u64)
            && milestone > state.enemy_last_spawn
        {
            state.enemy_last_spawn = milestone;
            spawn_enemies(world, state, ENEMIES_PER_SPAWN);
        }
    }

    airplane_tick(world, state, input, dt);

    match state.status {
        GameStatus::Playing => {
            state.distance += state.speed * dt * world.ratio_speed_distance;
            state.base_speed += (state.target_base_speed - state.base_speed) * dt * 0.02;
            state.speed = state.base_speed * state.plane_speed;

            if state.lives == 0 {
                log::info!("Out of lives at distance {:.0}", state.distance);
                state.status = GameStatus::GameOver;
            }
            if state.airplane.position.y < 0.0 {
                log::info!("Sea contact at distance {:.0}", state.distance);
                state.status = GameStatus::GameOver;
            }
        }

        GameStatus::GameOver => {
            // Death spiral: bleed speed, roll over, fall faster and faster
            state.speed *= 0.99;
            let plane = &mut state.airplane;
            plane.rotation.z += (-FRAC_PI_2 - plane.rotation.z) * 0.0002 * dt;
            plane.rotation.x += 0.0003 * dt;
            state.plane_fall_speed *= 1.05;
            plane.position.y -= state.plane_fall_speed * dt;

            if plane.position.y < -200.0 {
                state.status = GameStatus::WaitingReplay;
                log::info!(
                    "Run over: distance {:.0}, {} enemies spawned",
                    state.distance,
                    state.stats.enemies_spawned
                );
            }
        }

        GameStatus::WaitingReplay => {
            if input.replay {
                state.reset(world);
                return;
            }
        }
    }

    state.sea.spin(state.speed, dt);
    state.sea.tick(dt);
    state.ambient_light += (0.5 - state.ambient_light) * dt * 0.005;

    advance_enemies(world, state, dt);
    state.sync_nodes();
}

/// Flight kinematics, camera follow, and knockback decay.
///
/// The plane chases target coordinates derived from the pointer: x maps to
/// throttle and lateral position, y to height. Targets are offset by the
/// collision knockback displacement, then the plane eases toward them, so
/// positions stay bounded by the configured amplitudes plus any knockback.
fn airplane_tick(world: &World, state: &mut GameState, input: &TickInput, dt: f32) {
    state.airplane.propeller_angle += 0.2 + state.plane_speed * dt * 0.005;

    if state.status == GameStatus::Playing {
        state.plane_speed = normalize(
            input.mouse.x,
            -0.5,
            0.5,
            world.plane_min_speed,
            world.plane_max_speed,
        );
        let mut target_x = normalize(
            input.mouse.x,
            -1.0,
            1.0,
            -world.plane_amp_width,
            world.plane_amp_width,
        );
        let mut target_y = normalize(
            input.mouse.y,
            -1.0,
            1.0,
            world.plane_default_height - world.plane_amp_height - 2.0,
            world.plane_default_height + world.plane_amp_height,
        );

        state.collision_displacement_x += state.collision_speed_x;
        target_x += state.collision_displacement_x;
        state.collision_displacement_y += state.collision_speed_y;
        target_y += state.collision_displacement_y;

        let plane = &mut state.airplane;
        plane.position.z += (target_x - plane.position.z) * dt * world.plane_move_sensivity;
        plane.position.y += (target_y - plane.position.y) * dt * world.plane_move_sensivity;
        plane.rotation.z = (target_y - plane.position.y) * dt * world.plane_rot_z_sensivity;

        state.camera.fov_deg = if input.fov_swing {
            normalize(input.mouse.x, -30.0, 1.0, 40.0, 80.0)
        } else {
            50.0
        };
        state.camera.position.y = plane.position.y + 30.0;
        state.camera.position.z +=
            (plane.position.z - state.camera.position.z) * dt * world.camera_sensivity;
    }

    // Knockback bleeds off whatever the status
    state.collision_speed_x += -state.collision_speed_x * dt * 0.03;
    state.collision_displacement_x += -state.collision_displacement_x * dt * 0.01;
    state.collision_speed_y += -state.collision_speed_y * dt * 0.03;
    state.collision_displacement_y += -state.collision_displacement_y * dt * 0.01;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT_MS;
    use proptest::prelude::*;

    fn run(world: &World, state: &mut GameState, input: &TickInput, ticks: u32) {
        for _ in 0..ticks {
            tick(world, state, input, SIM_DT_MS);
        }
    }

    #[test]
    fn test_distance_progresses() {
        let world = World::default();
        let mut state = GameState::new(&world, 1);
        let input = TickInput::default();

        run(&world, &mut state, &input, 60);
        assert!(state.distance > 0.0);
        assert!(state.speed > 0.0);
        // Centered mouse maps to mid throttle
        assert!((state.plane_speed - 1.4).abs() < 0.001);
    }

    #[test]
    fn test_enemy_spawn_cadence() {
        let world = World::default();
        let mut state = GameState::new(&world, 2);
        let input = TickInput::default();

        // Nothing spawns before the first 50 distance units
        while state.distance < 49.0 {
            tick(&world, &mut state, &input, SIM_DT_MS);
        }
        assert_eq!(state.stats.enemies_spawned, 0);

        while state.distance < 51.0 {
            tick(&world, &mut state, &input, SIM_DT_MS);
        }
        assert_eq!(state.stats.enemies_spawned, 5);

        // Second batch at 100
        while state.distance < 101.0 {
            tick(&world, &mut state, &input, SIM_DT_MS);
        }
        assert_eq!(state.stats.enemies_spawned, 10);
    }

    #[test]
    fn test_speed_bump_cadence() {
        let world = World::default();
        let mut state = GameState::new(&world, 3);
        let input = TickInput::default();

        while state.distance < 99.0 {
            tick(&world, &mut state, &input, SIM_DT_MS);
        }
        assert_eq!(state.target_base_speed, world.init_speed);

        while state.distance < 101.0 {
            tick(&world, &mut state, &input, SIM_DT_MS);
        }
        assert!(state.target_base_speed > world.init_speed);
        assert_eq!(state.speed_last_update, 100.0);
    }

    #[test]
    fn test_sea_contact_ends_the_run() {
        let world = World::default();
        let mut state = GameState::new(&world, 4);
        // Full dive: height target drops below the waterline
        let input = TickInput {
            mouse: Vec2::new(0.0, -1.0),
            ..Default::default()
        };

        run(&world, &mut state, &input, 600);
        assert_ne!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_crash_then_replay_cycle() {
        let world = World::default();
        let mut state = GameState::new(&world, 5);
        let input = TickInput::default();

        state.status = GameStatus::GameOver;
        run(&world, &mut state, &input, 2000);
        assert_eq!(state.status, GameStatus::WaitingReplay);
        assert!(state.airplane.position.y < -200.0);

        // Replay input while waiting restarts the session
        let replay = TickInput {
            replay: true,
            ..Default::default()
        };
        tick(&world, &mut state, &replay, SIM_DT_MS);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.airplane.position.y, world.plane_default_height);
    }

    #[test]
    fn test_replay_ignored_while_playing() {
        let world = World::default();
        let mut state = GameState::new(&world, 6);
        let input = TickInput::default();
        run(&world, &mut state, &input, 30);
        let distance = state.distance;

        let replay = TickInput {
            replay: true,
            ..Default::default()
        };
        tick(&world, &mut state, &replay, SIM_DT_MS);
        assert_eq!(state.status, GameStatus::Playing);
        assert!(state.distance > distance);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let world = World::default();
        let mut state = GameState::new(&world, 7);
        let input = TickInput::default();
        run(&world, &mut state, &input, 30);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&world, &mut state, &pause, SIM_DT_MS);
        assert!(state.paused);

        let ticks = state.time_ticks;
        let distance = state.distance;
        run(&world, &mut state, &input, 30);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.distance, distance);

        // Second toggle resumes
        tick(&world, &mut state, &pause, SIM_DT_MS);
        assert!(!state.paused);
        assert!(state.time_ticks > ticks);
    }

    #[test]
    fn test_determinism() {
        let world = World::default();
        let mut a = GameState::new(&world, 99999);
        let mut b = GameState::new(&world, 99999);

        let inputs = [
            TickInput {
                mouse: Vec2::new(0.3, 0.2),
                ..Default::default()
            },
            TickInput {
                mouse: Vec2::new(-0.5, 0.8),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&world, &mut a, input, SIM_DT_MS);
            tick(&world, &mut b, input, SIM_DT_MS);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert!((a.distance - b.distance).abs() < 0.0001);
        for (ea, eb) in a.enemies.iter().zip(b.enemies.iter()) {
            assert!((ea.position - eb.position).length() < 0.0001);
        }
    }

    proptest! {
        /// Without collisions the plane stays inside the configured
        /// steering envelope for any pointer input.
        #[test]
        fn prop_plane_position_bounded(
            moves in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 1..200)
        ) {
            let world = World::default();
            let mut state = GameState::new(&world, 42);

            let y_min = world.plane_default_height - world.plane_amp_height - 2.0;
            let y_max = world.plane_default_height + world.plane_amp_height;

            for (mx, my) in moves {
                let input = TickInput {
                    mouse: Vec2::new(mx, my),
                    ..Default::default()
                };
                tick(&world, &mut state, &input, SIM_DT_MS);
                if state.status != GameStatus::Playing {
                    break;
                }
                prop_assert!(state.airplane.position.y >= y_min - 0.001);
                prop_assert!(state.airplane.position.y <= y_max + 0.001);
                prop_assert!(state.airplane.position.z.abs() <= world.plane_amp_width + 0.001);
            }
        }
    }
}
