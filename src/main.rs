//! Fruit Merge entry point
//!
//! Browser: wires the canvas, DOM controls and the two timers (animation
//! frame loop and spawn interval) to the simulation.
//! Native: runs a headless autoplay session for smoke testing.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use fruit_merge::Tuning;
    use fruit_merge::renderer::{CanvasRenderer, display_list, score_text};
    use fruit_merge::sim::{GameEvent, GameState, InputEvent, apply_input, frame, spawn_tick, start};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
        score_el: Option<HtmlElement>,
        /// setInterval handle for the spawner
        spawn_handle: Option<i32>,
        /// A requestAnimationFrame callback is pending
        frame_scheduled: bool,
    }

    impl Game {
        /// Canvas client x to field units
        fn field_x(&self, client_x: f64) -> f32 {
            let rect = self.canvas.get_bounding_client_rect();
            let scale = if rect.width() > 0.0 {
                self.state.tuning.field_width as f64 / rect.width()
            } else {
                1.0
            };
            ((client_x - rect.left()) * scale) as f32
        }

        fn set_score(&self, score: u64) {
            if let Some(el) = &self.score_el {
                el.set_inner_text(&score_text(score));
            }
        }

        fn stop_spawner(&mut self) {
            if let Some(handle) = self.spawn_handle.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
        }

        /// React to simulation events. Returns true on game over.
        fn handle_events(&mut self) -> bool {
            let mut over = false;
            for event in self.state.drain_events() {
                match event {
                    GameEvent::ScoreChanged(score) => self.set_score(score),
                    GameEvent::GameOver { .. } => {
                        self.stop_spawner();
                        over = true;
                    }
                    _ => {}
                }
            }
            over
        }

        fn render(&self) {
            if let Err(e) = self.renderer.render(&display_list(&self.state)) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Fruit Merge starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or("no game-canvas element")?
            .dyn_into()?;

        let tuning = Tuning::load();
        let renderer = CanvasRenderer::new(&canvas, tuning.field_width, tuning.field_height)?;
        let score_el = document
            .get_element_by_id("score")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, tuning),
            renderer,
            canvas: canvas.clone(),
            score_el,
            spawn_handle: None,
            frame_scheduled: false,
        }));
        log::info!("Game initialized with seed: {}", seed);

        // One spawn callback, reused by every setInterval
        let spawn_cb = {
            let game = game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                spawn_tick(&mut game.borrow_mut().state);
            });
            let f: js_sys::Function = closure
                .as_ref()
                .unchecked_ref::<js_sys::Function>()
                .clone();
            closure.forget();
            f
        };

        setup_start_button(game.clone(), spawn_cb)?;
        setup_input_handlers(&canvas, game.clone())?;

        game.borrow().render();
        log::info!("Fruit Merge ready");
        Ok(())
    }

    fn setup_start_button(
        game: Rc<RefCell<Game>>,
        spawn_cb: js_sys::Function,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let btn = document
            .get_element_by_id("start-button")
            .ok_or("no start-button element")?;

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let schedule_frame = {
                let mut g = game.borrow_mut();
                if !start(&mut g.state) {
                    return;
                }
                g.handle_events();
                g.stop_spawner();
                let period = g.state.tuning.spawn_interval_ms as i32;
                match window
                    .set_interval_with_callback_and_timeout_and_arguments_0(&spawn_cb, period)
                {
                    Ok(handle) => g.spawn_handle = Some(handle),
                    Err(e) => log::error!("Failed to start spawn timer: {:?}", e),
                }
                // The previous run's loop may still have a frame queued
                !std::mem::replace(&mut g.frame_scheduled, true)
            };
            if schedule_frame {
                request_animation_frame(game.clone());
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.field_x(event.client_x() as f64);
                apply_input(&mut g.state, InputEvent::MoveTo(x));
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.field_x(touch.client_x() as f64);
                    apply_input(&mut g.state, InputEvent::MoveTo(x));
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Fast drop while pressed
        for (name, input) in [
            ("mousedown", InputEvent::FastDropStart),
            ("mouseup", InputEvent::FastDropEnd),
            ("touchstart", InputEvent::FastDropStart),
            ("touchend", InputEvent::FastDropEnd),
        ] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                apply_input(&mut game.borrow_mut().state, input);
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let input = match event.key().as_str() {
                    "ArrowLeft" => InputEvent::NudgeLeft,
                    "ArrowRight" => InputEvent::NudgeRight,
                    "ArrowDown" => InputEvent::KeyFastDrop,
                    _ => return,
                };
                apply_input(&mut game.borrow_mut().state, input);
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "ArrowDown" {
                    apply_input(&mut game.borrow_mut().state, InputEvent::FastDropEnd);
                }
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let (keep_going, game_over) = {
            let mut g = game.borrow_mut();
            if !g.state.is_running() {
                g.frame_scheduled = false;
                return;
            }
            frame(&mut g.state, time);
            g.render();
            let over = g.handle_events();
            let keep_going = g.state.is_running();
            g.frame_scheduled = keep_going;
            (keep_going, over)
        };

        if game_over {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message("Game Over!");
            }
        }
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Merge (native) starting...");
    log::info!("Running headless autoplay; use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => fruit_merge::Tuning::load_file(std::path::Path::new(&path)),
        None => fruit_merge::Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    headless::run(tuning, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use fruit_merge::Tuning;
    use fruit_merge::consts::HEADLESS_FRAME_MS;
    use fruit_merge::sim::{
        GameEvent, GameState, InputEvent, IntervalTimer, apply_input, frame,
        spawn_tick, start,
    };

    /// Ten minutes of play at 60 Hz
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    pub fn run(tuning: Tuning, seed: u64) {
        let mut state = GameState::new(seed, tuning);
        let mut player = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9);
        let mut spawner = IntervalTimer::new(state.tuning.spawn_interval_ms);
        let mut now = 0.0;

        start(&mut state);
        spawner.start(now);
        log::info!("Headless session started with seed {}", seed);

        let mut frames = 0;
        // Game over cancels the spawner, which ends the session
        while frames < MAX_FRAMES && spawner.is_active() {
            now += HEADLESS_FRAME_MS;
            frames += 1;

            if spawner.poll(now) {
                spawn_tick(&mut state);
            }

            // Aim each new fruit somewhere, then let it drop
            if frames % 30 == 0 {
                let width = state.tuning.field_width;
                let x = player.random_range(0.0..width);
                apply_input(&mut state, InputEvent::MoveTo(x));
            }

            frame(&mut state, now);

            for event in state.drain_events() {
                match event {
                    GameEvent::Merged { rank, points, .. } => {
                        log::debug!("Merge to rank {} (+{})", rank, points)
                    }
                    GameEvent::GameOver { .. } => spawner.cancel(),
                    _ => {}
                }
            }
        }

        log::info!(
            "Session ended after {} frames ({:?}): score {}, top rank {}, {} fruit in box",
            frames,
            state.phase,
            state.score,
            state.top_rank,
            state.fruits.len()
        );
        println!("Score: {}", state.score);
    }
}
