//! Canvas Duel entry point
//!
//! wasm32: wires DOM events into the engine and runs the animation-frame loop.
//! native: headless runner for replay files and a seeded attract demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent};

    use canvas_duel::consts::*;
    use canvas_duel::input::{self, CanvasRect, Control};
    use canvas_duel::millis_to_duration;
    use canvas_duel::platform::FrameDriver;
    use canvas_duel::platform::web::BrowserFrames;
    use canvas_duel::renderer::{DrawList, SdfRenderState};
    use canvas_duel::settings::Settings;
    use canvas_duel::sim::{Command, Engine, PlayerId};

    /// Game instance holding all state
    struct Game {
        engine: Engine,
        render_state: Option<SdfRenderState>,
        draw_list: DrawList,
        driver: FrameDriver,
        frames: BrowserFrames,
        document: Document,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// Config target the modal currently shows
        shown_target: Option<PlayerId>,
    }

    impl Game {
        fn canvas_rect(&self) -> CanvasRect {
            let rect = self.canvas.get_bounding_client_rect();
            CanvasRect {
                left: rect.left() as f32,
                top: rect.top() as f32,
            }
        }

        /// Apply a command and bring the frame chain and DOM in line
        fn apply(&mut self, command: Command) {
            let was_running = self.engine.is_running();
            let reset = command == Command::Reset;
            self.engine.apply(command);
            let running = self.engine.is_running();

            if was_running != running {
                // First frame after a resume measures from itself
                self.last_time = 0.0;
            }
            self.driver.sync(running, &mut self.frames);

            if !running {
                // The chain is stopped; show the paused state once
                self.render();
            }
            self.update_hud();
            self.update_config_modal();
            if reset {
                self.sync_sliders();
            }
        }

        /// Move every slider to the value the simulation is using
        fn sync_sliders(&self) {
            for control in Control::ALL {
                if let Some(slider) = input_element(&self.document, &control.element_id()) {
                    slider.set_value(&control.current_value(self.engine.state()).to_string());
                }
            }
        }

        /// Animation-frame callback
        fn frame(&mut self, time: f64) {
            self.driver.frame_fired();

            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;

            self.engine.advance(millis_to_duration(dt));
            // Tick events are logged inside the sim; drop them here
            self.engine.drain_events();

            self.render();
            self.update_hud();

            if self.engine.is_running() {
                self.driver.start(&mut self.frames);
            }
        }

        fn render(&mut self) {
            self.draw_list.reset();
            self.engine.render(&mut self.draw_list);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.draw_list) {
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

        /// Update score elements in DOM
        fn update_hud(&self) {
            let score = &self.engine.state().score;
            for id in PlayerId::ALL {
                let selector = format!("p{}-score", id.number());
                if let Some(el) = self.document.get_element_by_id(&selector) {
                    let text = score.get(id).to_string();
                    if el.text_content().as_deref() != Some(text.as_str()) {
                        el.set_text_content(Some(&text));
                    }
                }
            }
        }

        /// Show/hide the color form for the current config target
        fn update_config_modal(&mut self) {
            let target = self.engine.state().phase.config_target();
            if target == self.shown_target {
                return;
            }
            self.shown_target = target;

            if let Some(el) = self.document.get_element_by_id("config-modal") {
                let class = if target.is_some() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(id) = target {
                if let Some(el) = self.document.get_element_by_id("config-player") {
                    el.set_text_content(Some(&format!("Player {}", id.number())));
                }
                // Prefill with the current bullet color
                let current = self.engine.state().player(id).bullet_color.to_hex();
                if let Some(input) = input_element(&self.document, "config-color") {
                    input.set_value(&current);
                }
            }
        }
    }

    fn input_element(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    async fn init_gpu(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Option<SdfRenderState> {
        // WebGPU first, WebGL2 when the browser lacks it
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(a) => a,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match SdfRenderState::new(surface, &adapter, width, height).await {
            Ok(state) => Some(state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Canvas Duel starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Backing store at device resolution; layout stays 500x500 CSS px
        let dpr = window.device_pixel_ratio();
        let width = (CANVAS_WIDTH as f64 * dpr) as u32;
        let height = (CANVAS_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let render_state = init_gpu(&canvas, width, height).await;
        if render_state.is_none() {
            log::warn!("Running without a renderer");
        }

        let game = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            let weak = weak.clone();
            let on_frame = move |time: f64| {
                if let Some(game) = weak.upgrade() {
                    game.borrow_mut().frame(time);
                }
            };
            RefCell::new(Game {
                engine: Engine::new(settings),
                render_state,
                draw_list: DrawList::new(),
                driver: FrameDriver::new(),
                frames: BrowserFrames::new(window.clone(), on_frame),
                document: document.clone(),
                canvas: canvas.clone(),
                last_time: 0.0,
                shown_target: None,
            })
        });

        setup_pointer_handlers(&canvas, game.clone());
        setup_sliders(&document, game.clone());
        setup_config_form(&document, game.clone());
        setup_restart_button(&document, game.clone());

        {
            let mut g = game.borrow_mut();
            g.render();
            g.update_hud();
            g.update_config_modal();
            g.sync_sliders();
            let running = g.engine.is_running();
            let Game { driver, frames, .. } = &mut *g;
            driver.sync(running, frames);
        }

        log::info!("Canvas Duel running!");
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - cursor in canvas-local coordinates
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let rect = g.canvas_rect();
                let cmd = input::pointer_move(rect, event.client_x() as f32, event.client_y() as f32);
                g.apply(cmd);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - select a player to configure
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let rect = g.canvas_rect();
                let cmd = input::pointer_click(rect, event.client_x() as f32, event.client_y() as f32);
                g.apply(cmd);
            });
            let _ =
                canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_sliders(document: &Document, game: Rc<RefCell<Game>>) {
        for control in Control::ALL {
            let id = control.element_id();
            let Some(slider) = input_element(document, &id) else {
                log::warn!("Missing slider #{}", id);
                continue;
            };

            let game = game.clone();
            let target = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                match control.command(&target.value()) {
                    Ok(cmd) => game.borrow_mut().apply(cmd),
                    Err(e) => log::warn!("{}", e),
                }
            });
            let _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_config_form(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(form) = document.get_element_by_id("config-form") else {
            log::warn!("Missing #config-form");
            return;
        };
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let Some(color_input) = input_element(&document, "config-color") else {
                return;
            };
            match input::color_submit(&color_input.value()) {
                Ok(cmd) => game.borrow_mut().apply(cmd),
                Err(e) => log::warn!("{}", e),
            }
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().apply(Command::Reset);
                log::info!("Game restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use canvas_duel::consts::*;
    use canvas_duel::sim::{Color, Command, PlayerId, Replay, ReplayFrame, ReplayOutcome};
    use canvas_duel::{Result, Settings};

    /// Frame delta fed to the engine by the attract demo (ms)
    const DEMO_FRAME_MS: f64 = 1000.0 / 60.0;

    /// Headless Canvas Duel: run a replay file, or a seeded attract demo when none is given.
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct CliArgs {
        /// Replay document (JSON) to run instead of the attract demo.
        #[arg(value_name = "REPLAY")]
        replay: Option<PathBuf>,
        /// Settings file (JSON); overrides the replay's embedded settings.
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
        /// Seed for the attract demo's cursor wander.
        #[arg(long, value_name = "SEED", default_value_t = 0x00c0_ffee)]
        seed: u64,
        /// Attract demo length in seconds of game time.
        #[arg(
            long,
            value_name = "SECONDS",
            default_value_t = 60,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        seconds: u32,
    }

    /// Seeded wandering cursor with the occasional click-and-recolor
    fn attract_replay(settings: Settings, seed: u64, seconds: u32) -> Replay {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut cursor = (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
        let frame_count = seconds * 60;
        let mut frames = Vec::with_capacity(frame_count as usize);

        for _ in 0..frame_count {
            cursor.0 = (cursor.0 + rng.random_range(-12.0..=12.0)).clamp(0.0, CANVAS_WIDTH);
            cursor.1 = (cursor.1 + rng.random_range(-12.0..=12.0)).clamp(0.0, CANVAS_HEIGHT);
            let mut commands = vec![Command::PointerMove {
                x: cursor.0,
                y: cursor.1,
            }];

            // Roughly every 10s: click where we are, pick a new bullet color
            if rng.random_ratio(1, 600) {
                commands.push(Command::Click {
                    x: cursor.0,
                    y: cursor.1,
                });
                commands.push(Command::SubmitColor {
                    color: Color::rgb(rng.random(), rng.random(), rng.random()),
                });
            }

            // Occasionally nudge a slider
            if rng.random_ratio(1, 900) {
                let player = if rng.random_bool(0.5) {
                    PlayerId::One
                } else {
                    PlayerId::Two
                };
                commands.push(Command::SetBulletRate {
                    player,
                    rate: rng.random_range(BULLET_RATE_MIN..=BULLET_RATE_MAX),
                });
            }

            frames.push(ReplayFrame {
                dt_ms: DEMO_FRAME_MS,
                commands,
                repeat: 1,
            });
        }

        Replay { settings, frames }
    }

    fn report(outcome: &ReplayOutcome) {
        log::info!(
            "{} ticks, score {} : {}, {} hits, {} live bullets, final phase {:?}",
            outcome.ticks,
            outcome.scores[0],
            outcome.scores[1],
            outcome.hits,
            outcome.live_bullets,
            outcome.final_phase
        );
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize outcome: {}", e),
        }
    }

    pub fn run() -> Result<()> {
        let args = CliArgs::parse();

        let settings = match &args.settings {
            Some(path) => Settings::load_file(path)?,
            None => Settings::default(),
        };

        let replay = match &args.replay {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let mut replay = Replay::from_json(&json)?;
                if args.settings.is_some() {
                    replay.settings = settings;
                }
                log::info!(
                    "Replaying {} ({} frames)",
                    path.display(),
                    replay.frames.len()
                );
                replay
            }
            None => {
                log::info!("Attract demo: {}s, seed {}", args.seconds, args.seed);
                attract_replay(settings, args.seed, args.seconds)
            }
        };

        report(&replay.run());
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Canvas Duel (native) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
