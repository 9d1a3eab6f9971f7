//! Sea Glider entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use sea_glider::assets::ModelStore;
    use sea_glider::consts::*;
    use sea_glider::renderer::{RenderState, meshes};
    use sea_glider::sim::{GameState, GameStatus, TickInput, World, tick};
    use sea_glider::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        world: World,
        state: GameState,
        models: ModelStore,
        settings: Settings,
        high_scores: HighScores,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track status transitions for high score recording
        last_status: GameStatus,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let world = World::default();
            let state = GameState::new(&world, seed);
            let settings = Settings::load();
            let mut input = TickInput::default();
            input.fov_swing = settings.effective_fov_swing();
            Self {
                world,
                state,
                models: ModelStore::builtin(),
                settings,
                high_scores: HighScores::load(),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_status: GameStatus::Playing,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f32, time: f64) {
            let dt_ms = dt_ms.min(100.0);
            self.accumulator += dt_ms;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&self.world, &mut self.state, &input, SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.replay = false;
                self.input.pause = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // Record the run when the crash animation finishes
            let status = self.state.status;
            if status != self.last_status {
                if status == GameStatus::WaitingReplay {
                    self.record_run();
                }
                self.last_status = status;
            }
        }

        /// Push the finished run onto the leaderboard
        fn record_run(&mut self) {
            let distance = self.state.distance.floor() as u64;
            let stats = &self.state.stats;
            let dodged = stats.enemies_spawned.saturating_sub(stats.enemies_killed);
            if let Some(rank) = self
                .high_scores
                .add_score(distance, dodged, js_sys::Date::now())
            {
                self.high_scores.save();
                log::info!("New high score: {}m (rank {})", distance, rank + 1);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(ref mut render_state) = self.render_state else {
                return;
            };

            let mut vertices =
                match meshes::scene_vertices(&self.state.scene, &self.models) {
                    Ok(v) => v,
                    Err(e) => {
                        log::error!("{}", e);
                        return;
                    }
                };
            vertices.extend(meshes::sea_vertices(&self.state.sea, self.world.sea_radius));

            let view_proj = self.state.camera.view_proj(render_state.aspect());
            let camera_pos = self.state.camera.position;
            let ambient = self.state.ambient_light;

            match render_state.render(&vertices, view_proj, camera_pos, ambient) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("distValue") {
                el.set_text_content(Some(&(self.state.distance.floor() as u64).to_string()));
            }

            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("fpsValue") {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            if let Some(el) = document.get_element_by_id("replayMessage") {
                if self.state.status == GameStatus::WaitingReplay {
                    let _ = el.set_attribute("class", "message");
                } else {
                    let _ = el.set_attribute("class", "message hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("pausedMessage") {
                if self.state.paused {
                    let _ = el.set_attribute("class", "message");
                } else {
                    let _ = el.set_attribute("class", "message hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sea Glider starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = RenderState::new(surface, &adapter, width, height).await;
        {
            let g = game.borrow();
            render_state.fog_enabled = g.settings.quality.fog_enabled();
        }
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(&canvas, game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Sea Glider running!");
    }

    /// Convert client coordinates to the [-1, 1] pointer space (y up)
    fn normalize_pointer(canvas: &HtmlCanvasElement, x: f32, y: f32) -> (f32, f32) {
        let w = canvas.client_width() as f32;
        let h = canvas.client_height() as f32;
        let tx = -1.0 + (x / w.max(1.0)) * 2.0;
        let ty = 1.0 - (y / h.max(1.0)) * 2.0;
        (tx, ty)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move steers the plane
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let (tx, ty) = normalize_pointer(
                    &canvas_clone,
                    event.offset_x() as f32,
                    event.offset_y() as f32,
                );
                let mut g = game.borrow_mut();
                g.input.mouse.x = tx;
                g.input.mouse.y = ty;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse release triggers replay
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.replay = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let (tx, ty) = normalize_pointer(&canvas_clone, x, y);
                    let mut g = game.borrow_mut();
                    g.input.mouse.x = tx;
                    g.input.mouse.y = ty;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end triggers replay
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.replay = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "p" | "P" | "Escape" => g.input.pause = true,
                    " " | "Enter" => g.input.replay = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(ref mut rs) = game.borrow_mut().render_state {
                rs.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.status == GameStatus::Playing && !g.state.paused {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.status == GameStatus::Playing && !g.state.paused {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            g.update(dt_ms, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use sea_glider::consts::SIM_DT_MS;
    use sea_glider::sim::{GameState, GameStatus, TickInput, World, tick};

    env_logger::init();
    log::info!("Sea Glider (native) starting...");
    log::info!("Run with `trunk serve` for the web version; native mode runs a headless demo.");

    let world = World::default();
    let mut state = GameState::new(&world, 0xC0FFEE);
    let input = TickInput {
        mouse: Vec2::new(0.2, 0.1),
        ..TickInput::default()
    };

    // Fly for a minute of simulated time or until the run ends
    for _ in 0..3600 {
        tick(&world, &mut state, &input, SIM_DT_MS);
        if state.status != GameStatus::Playing {
            break;
        }
    }

    log::info!(
        "Demo run over: distance {}m, {} enemies spawned, {} hits",
        state.distance.floor() as u64,
        state.stats.enemies_spawned,
        state.stats.enemies_killed
    );
}
