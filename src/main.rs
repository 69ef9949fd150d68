//! Bounce Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser drives one simulation tick per animation frame; the presenter
//! re-reads the world state read-only after each tick.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use bounce_runner::consts::*;
    use bounce_runner::sim::{GameState, InputBuffer, Key, tick};

    /// Game instance holding all state plus the outstanding frame handle
    struct Game {
        state: GameState,
        input: InputBuffer,
        ctx: CanvasRenderingContext2d,
        /// Single outstanding requestAnimationFrame handle; cancelled on stop
        raf_handle: Option<i32>,
        running: bool,
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                state: GameState::new(seed),
                input: InputBuffer::new(),
                ctx,
                raf_handle: None,
                running: false,
            }
        }

        /// Reset to the fresh-run invariants with a new seed
        fn restart(&mut self, seed: u64) {
            log::info!("restarting run with seed {seed}");
            self.state = GameState::new(seed);
            self.input.clear();
        }

        /// Draw the current world state. Reads only; never mutates the sim.
        fn render(&self) {
            let ctx = &self.ctx;
            let state = &self.state;
            let w = state.view.x as f64;
            let h = state.view.y as f64;
            let offset = state.scroll_offset as f64;

            ctx.set_fill_style_str("#1a1a1a");
            ctx.fill_rect(0.0, 0.0, w, h);

            // Platforms (world y-up, screen y-down)
            ctx.set_fill_style_str("#4a90d9");
            for platform in &state.platforms {
                ctx.fill_rect(
                    platform.pos.x as f64 - offset,
                    h - platform.pos.y as f64,
                    platform.width as f64,
                    platform.height as f64,
                );
            }

            // Ball with a spin spoke
            let ball = &state.ball;
            let bx = ball.pos.x as f64 - offset;
            let by = h - ball.pos.y as f64;
            let r = ball.radius as f64;
            ctx.set_fill_style_str("#d94a4a");
            ctx.begin_path();
            let _ = ctx.arc(bx, by, r, 0.0, TAU);
            ctx.fill();
            ctx.set_stroke_style_str("#ffffff");
            ctx.begin_path();
            ctx.move_to(bx, by);
            let spin = ball.rotation as f64;
            ctx.line_to(bx + r * spin.cos(), by + r * spin.sin());
            ctx.stroke();

            // HUD
            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("16px monospace");
            let _ = ctx.fill_text(&format!("score {}", state.score), 10.0, 24.0);
            if state.game_over {
                ctx.set_font("32px monospace");
                let _ = ctx.fill_text("GAME OVER - press Enter", w / 2.0 - 200.0, h / 2.0);
            }
        }
    }

    /// Map a browser key name onto a logical game key
    fn map_key(key: &str) -> Option<Key> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | " " | "w" | "W" => Some(Key::Jump),
            "Enter" => Some(Key::Confirm),
            _ => None,
        }
    }

    /// Begin the tick schedule. Safe to call repeatedly; a running loop is
    /// left alone.
    fn start(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.running {
                return;
            }
            g.running = true;
        }
        log::info!("simulation loop started");
        schedule_frame(game.clone());
    }

    /// Cancel the outstanding frame so no further tick is dispatched.
    fn stop(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        g.running = false;
        if let Some(handle) = g.raf_handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
        log::info!("simulation loop stopped");
    }

    fn schedule_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let inner = game.clone();
        let closure = Closure::once(move |_time: f64| {
            frame(inner);
        });
        if let Ok(handle) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            game.borrow_mut().raf_handle = Some(handle);
        }
        closure.forget();
    }

    fn frame(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.raf_handle = None;
            if !g.running {
                return;
            }
            let Game { state, input, .. } = &mut *g;
            tick(state, input);
            g.render();
        }
        schedule_frame(game);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = map_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().input.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = map_key(&event.key()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                // Confirm after game over restarts instead of releasing
                if key == Key::Confirm && g.state.game_over {
                    let seed = js_sys::Date::now() as u64;
                    g.restart(seed);
                    drop(g);
                    start(&game);
                } else {
                    g.input.key_up(key);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause the loop while the tab is hidden, resume when it returns.
    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let doc = document.clone();

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                stop(&game);
            } else {
                start(&game);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(VIEW_WIDTH as u32);
        canvas.set_height(VIEW_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        log::info!("Bounce Runner starting with seed {seed}");

        let game = Rc::new(RefCell::new(Game::new(seed, ctx)));
        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        start(&game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bounce_runner::sim::{GameState, InputBuffer, Key, tick};

    env_logger::init();
    log::info!("Bounce Runner (native) starting headless demo");

    // Headless smoke run: hold Right and let the sim play itself out
    let mut state = GameState::new(0xB0B);
    let mut input = InputBuffer::new();
    input.key_down(Key::Right);

    for _ in 0..600 {
        tick(&mut state, &mut input);
        if state.game_over {
            break;
        }
    }

    log::info!(
        "demo finished: ticks={} score={} platforms={} game_over={}",
        state.time_ticks,
        state.score,
        state.platforms.len(),
        state.game_over
    );
    println!(
        "score {} after {} ticks (game over: {})",
        state.score, state.time_ticks, state.game_over
    );
}
