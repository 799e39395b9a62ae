//! Downhill Chase entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};

    use downhill_chase::audio::{AudioManager, play_events};
    use downhill_chase::consts::*;
    use downhill_chase::hud::SpeedReadout;
    use downhill_chase::settings::Settings;
    use downhill_chase::sim::{
        GameEvent, GameState, ImageAtlas, ImageKey, ImageSize, TickInput, Viewport, render_list,
        tick,
    };

    /// Game instance holding all state
    struct Game {
        settings: Settings,
        /// None until every sprite has loaded (or failed to)
        state: Option<GameState>,
        images: ImageAtlas,
        elements: HashMap<ImageKey, HtmlImageElement>,
        pending_images: usize,
        audio: AudioManager,
        speed: SpeedReadout,
        ctx: CanvasRenderingContext2d,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(settings: Settings, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                audio: AudioManager::from_settings(&settings),
                speed: SpeedReadout::new(settings.tuning.starting_speed),
                settings,
                state: None,
                images: ImageAtlas::new(),
                elements: HashMap::new(),
                pending_images: ImageKey::ALL.len(),
                ctx,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Record a finished image load; the first session starts after the last one
        fn image_settled(&mut self, key: ImageKey, loaded: bool) {
            if loaded {
                if let Some(el) = self.elements.get(&key) {
                    self.images.insert(
                        key,
                        ImageSize {
                            width: el.natural_width() as f32,
                            height: el.natural_height() as f32,
                        },
                    );
                }
            } else {
                log::warn!("Failed to load {}", key.url());
            }

            self.pending_images = self.pending_images.saturating_sub(1);
            if self.pending_images == 0 && self.state.is_none() {
                self.start();
            }
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            log::info!(
                "{} of {} images loaded, starting with seed {}",
                self.images.len(),
                ImageKey::ALL.len(),
                seed
            );
            let state = GameState::new(
                seed,
                Viewport::from(&self.settings),
                self.settings.tuning.clone(),
                &self.images,
            );
            self.speed = SpeedReadout::new(state.tuning.starting_speed);
            self.state = Some(state);
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let Some(state) = self.state.as_mut() else {
                return;
            };
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(state, &self.input, &self.images, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input = TickInput::default();
            }

            let events = state.drain_events();
            play_events(&mut self.audio, &events);
            self.speed.observe(&events);
            if events.contains(&GameEvent::SkierCaught) {
                log::info!("Skier eaten");
            }
        }

        /// Render the current frame
        fn render(&self) {
            self.ctx.clear_rect(
                0.0,
                0.0,
                self.settings.display_width as f64,
                self.settings.display_height as f64,
            );
            let Some(state) = &self.state else { return };

            for item in render_list(state, &self.images) {
                let Some(el) = self.elements.get(&item.image) else {
                    continue;
                };
                self.ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(
                        el,
                        item.x as f64,
                        item.y as f64,
                        item.width as f64,
                        item.height as f64,
                    )
                    .ok();
            }

            if self.settings.show_speed {
                self.ctx.set_font("16px sans-serif");
                self.ctx.fill_text(&self.speed.text(), 10.0, 20.0).ok();
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Downhill Chase starting...");

        let settings = Settings::load();
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(&settings.canvas_id)
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(settings.display_width as u32);
        canvas.set_height(settings.display_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let game = Rc::new(RefCell::new(Game::new(settings, ctx)));

        load_images(game.clone());
        setup_input_handlers(game.clone());
        setup_auto_mute(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Downhill Chase running!");
    }

    fn load_images(game: Rc<RefCell<Game>>) {
        for key in ImageKey::ALL {
            let Ok(el) = HtmlImageElement::new() else {
                log::error!("Could not create image element for {}", key.as_str());
                game.borrow_mut().image_settled(key, false);
                continue;
            };

            let on_load = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || game.borrow_mut().image_settled(key, true))
            };
            let on_error = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || game.borrow_mut().image_settled(key, false))
            };
            el.set_onload(Some(on_load.as_ref().unchecked_ref()));
            el.set_onerror(Some(on_error.as_ref().unchecked_ref()));
            on_load.forget();
            on_error.forget();

            // Register before setting src so the load handler can find it
            game.borrow_mut().elements.insert(key, el.clone());
            el.set_src(key.url());
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" => g.input.turn_left = true,
                "ArrowRight" => g.input.turn_right = true,
                "ArrowUp" => g.input.turn_up = true,
                "ArrowDown" => g.input.turn_down = true,
                " " => g.input.jump = true,
                "f" | "F" => g.input.speed_up = true,
                "r" | "R" => g.input.restart = true,
                "m" | "M" => {
                    let muted = !g.settings.muted;
                    g.settings.muted = muted;
                    g.audio.set_muted(muted);
                    g.settings.save();
                    log::info!("Muted: {}", muted);
                    return;
                }
                _ => return,
            }
            // Keep arrows and space from scrolling the page
            event.prevent_default();
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_mute(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur && !g.audio.is_muted() {
                    g.audio.set_muted(true);
                    log::info!("Auto-muted (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus restores the saved preference
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
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
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Downhill Chase (native) starting...");
    log::info!("The playable version runs in the browser - build for wasm32 with `trunk serve`");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run with a scripted player, handy for eyeballing the tuning
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use downhill_chase::audio::{AudioManager, play_events};
    use downhill_chase::consts::SIM_DT;
    use downhill_chase::hud::SpeedReadout;
    use downhill_chase::settings::Settings;
    use downhill_chase::sim::{
        Entity, GameEvent, GameState, ImageAtlas, TickInput, Viewport, tick,
    };

    /// One simulated minute
    const DEMO_TICKS: u64 = 60 * 60;

    pub fn run(seed: u64) {
        let settings = Settings::load();
        let images = ImageAtlas::with_default_sizes();
        let mut audio = AudioManager::from_settings(&settings);
        let mut state = GameState::new(
            seed,
            Viewport::from(&settings),
            settings.tuning.clone(),
            &images,
        );

        let mut speed = SpeedReadout::new(state.tuning.starting_speed);
        let mut crashes = 0;
        let mut was_crashed = false;
        let mut deaths = 0;
        let mut furthest = 0.0f32;
        for t in 0..DEMO_TICKS {
            let input = scripted_input(t, &state);
            tick(&mut state, &input, &images, SIM_DT);
            furthest = furthest.max(state.skier.position().y);

            if state.skier.is_crashed() && !was_crashed {
                crashes += 1;
            }
            was_crashed = state.skier.is_crashed();

            let events = state.drain_events();
            play_events(&mut audio, &events);
            speed.observe(&events);
            deaths += events
                .iter()
                .filter(|e| **e == GameEvent::SkierCaught)
                .count();
        }

        println!("Seed {}: {} ticks simulated", seed, DEMO_TICKS);
        println!("  sessions started: {}", state.session);
        println!("  times eaten:      {}", deaths);
        println!("  obstacle crashes: {}", crashes);
        println!("  furthest y:       {:.0}", furthest);
        println!("  live obstacles:   {}", state.obstacles.len());
        println!("  {}", speed.text());
        if let Ok(json) = serde_json::to_string(&state.skier) {
            println!("  final skier:      {}", json);
        }
    }

    /// Weave every couple of seconds, jump now and then, get up after crashes
    fn scripted_input(t: u64, state: &GameState) -> TickInput {
        if state.skier.is_crashed() {
            return TickInput {
                turn_right: true,
                ..Default::default()
            };
        }
        match t % 240 {
            0 => TickInput {
                turn_left: true,
                ..Default::default()
            },
            60 | 180 => TickInput {
                turn_down: true,
                ..Default::default()
            },
            120 => TickInput {
                turn_right: true,
                ..Default::default()
            },
            200 => TickInput {
                jump: true,
                ..Default::default()
            },
            _ => TickInput::default(),
        }
    }
}
