//! Sky Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use sky_shooter::consts::*;
    use sky_shooter::platform::InputAdapter;
    use sky_shooter::renderer::{RenderState, scene};
    use sky_shooter::sim::{GameState, tick};
    use sky_shooter::{HudView, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: InputAdapter,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                state: GameState::new(settings, seed),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: InputAdapter::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.next_input();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let field = self.state.field();
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene(&self.state);
                match render_state.render(&vertices, field.x, field.y) {
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
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = HudView::from_state(&self.state);

            if let Some(el) = document.get_element_by_id("hud-hits") {
                el.set_text_content(Some(&hud.hits_label));
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if hud.game_over_visible {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(HudView::GAME_OVER_TEXT));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    /// Read optional JSON settings embedded in the page
    fn load_settings(document: &web_sys::Document) -> Settings {
        let Some(json) = document
            .get_element_by_id("game-settings")
            .and_then(|el| el.text_content())
            .filter(|s| !s.trim().is_empty())
        else {
            log::info!("Using default settings");
            return Settings::default();
        };

        match Settings::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from page");
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Settings::default()
            }
        }
    }

    /// Size the canvas backing store to its CSS box. Returns (css, physical) sizes.
    fn fit_canvas(canvas: &HtmlCanvasElement) -> ((f32, f32), (u32, u32)) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        ((client_w as f32, client_h as f32), (width, height))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sky Shooter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let ((css_w, css_h), (width, height)) = fit_canvas(&canvas);

        let mut settings = load_settings(&document);
        settings.field_width = css_w;
        settings.field_height = css_h;
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));

        log::info!("Game initialized with seed: {}", seed);

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

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {e}; running without rendering"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Sky Shooter running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer position relative to the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                game.borrow_mut().input.pointer_moved(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Hold to fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_down();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release anywhere stops firing
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let ((css_w, css_h), (width, height)) = fit_canvas(&canvas_clone);
            let mut g = game.borrow_mut();
            g.input.resized(css_w, css_h);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
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

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Shooter (native) starting...");
    log::info!("Native mode runs a headless autoplay session - run with `trunk serve` for the web version");

    let settings = native_settings();
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });

    autoplay(settings, seed, 60 * 60);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Settings from the `SKY_SHOOTER_SETTINGS` JSON environment variable
#[cfg(not(target_arch = "wasm32"))]
fn native_settings() -> sky_shooter::Settings {
    use sky_shooter::Settings;

    match std::env::var("SKY_SHOOTER_SETTINGS") {
        Ok(json) => Settings::from_json(&json).unwrap_or_else(|e| {
            log::warn!("{e}; using default settings");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Play a seeded session with a simple autopilot and log the outcome
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(settings: sky_shooter::Settings, seed: u64, ticks: u32) {
    use sky_shooter::consts::SIM_DT;
    use sky_shooter::platform::InputAdapter;
    use sky_shooter::sim::{GamePhase, GameState, tick};

    let mut state = GameState::new(settings, seed);
    let mut input = InputAdapter::new();
    input.pointer_down();

    let mut game_overs = 0u32;
    let mut total_hits = 0u32;
    let mut last_phase = state.phase();
    let mut last_hits = 0u32;

    for _ in 0..ticks {
        // Chase the lowest target
        if let Some(target) = state
            .targets()
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        {
            input.pointer_moved(target.pos.x + target.size.x / 2.0);
        }

        tick(&mut state, &input.next_input(), SIM_DT);

        let hits = state.session().hits;
        if hits > last_hits {
            total_hits += hits - last_hits;
        }
        last_hits = hits;

        let phase = state.phase();
        if phase != last_phase {
            if phase == GamePhase::GameOver {
                game_overs += 1;
            }
            last_phase = phase;
        }
    }

    log::info!(
        "Autoplay finished: {} ticks, {} hits, {} game overs",
        state.time_ticks(),
        total_hits,
        game_overs
    );
    match serde_json::to_string(state.session()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Failed to serialize session: {e}"),
    }
}
