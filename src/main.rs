//! Bullseye entry point
//!
//! Handles platform-specific initialization: on wasm it wires browser input
//! to the game session and drives the frame loop; natively it runs a
//! headless smoke round.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, MouseEvent, TouchEvent};

    use bullseye::Config;
    use bullseye::platform::DomStage;
    use bullseye::sim::Game;

    /// Longest frame delta fed to the timers. A stalled tab should resume
    /// calmly instead of dumping a burst of catch-up ticks.
    const MAX_FRAME_MS: f64 = 250.0;

    /// Game instance plus frame bookkeeping
    struct App {
        game: Game<DomStage>,
        last_time: f64,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bullseye starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // missing markup is a wiring bug; nothing can run without it
        let stage = DomStage::new(&document).expect("game markup incomplete");

        let seed = js_sys::Date::now() as u64;
        let config = Config::load();
        let app = Rc::new(RefCell::new(App {
            game: Game::new(stage, config, seed),
            last_time: 0.0,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_bow_handlers(&document, app.clone());
        setup_buttons(&document, app.clone());

        // Start frame loop
        request_animation_frame(app);

        log::info!("Bullseye running!");
    }

    fn setup_bow_handlers(document: &Document, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let bow = document.get_element_by_id("bow").expect("no bow element");

        // Drag start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                app.borrow_mut().game.drag_start();
            });
            let _ =
                bow.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag move - window-level so the gesture survives leaving the bow
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let area_top = a.game.stage().play_area().top;
                a.game.drag_move(event.client_y() as f32 - area_top);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag end - window-level; releasing outside the play area still ends it
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.drag_end();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Fire
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.fire();
            });
            let _ = bow.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch drag
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.drag_start();
            });
            let _ = bow
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let area_top = a.game.stage().play_area().top;
                    a.game.drag_move(touch.client_y() as f32 - area_top);
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().game.drag_end();
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.pause();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let dt = if a.last_time > 0.0 {
                (time - a.last_time).min(MAX_FRAME_MS)
            } else {
                0.0
            };
            a.last_time = time;
            a.game.advance(dt);
        }

        request_animation_frame(app);
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
    log::info!("Bullseye (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    println!("\nRunning headless smoke round...");
    smoke_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_round() {
    use bullseye::platform::HeadlessStage;
    use bullseye::{ArrowPhase, Config, Game};

    let mut game = Game::new(HeadlessStage::new(), Config::default(), 7);
    game.start();

    // line the target up with the bow and take the shot
    let aim = game.stage().bow_center_y() - game.stage().target_size.y / 2.0;
    game.stage_mut().target_top = aim;
    game.fire();

    for _ in 0..200 {
        game.advance(f64::from(game.config().arrow_tick_ms));
        if game.state().arrow.phase == ArrowPhase::Stuck {
            break;
        }
    }

    assert_eq!(game.state().hits, 1, "smoke shot should land");
    assert_eq!(game.state().score, game.config().points_per_hit);
    println!("✓ Smoke round passed (score {})", game.state().score);
}
