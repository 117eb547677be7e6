//! Bouncy Fellas entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use bouncy_fellas::renderer::{CanvasRenderer, INITIAL_HINT, Sprite, link_label};
    use bouncy_fellas::sim::{Screen, SimState, TickInput, tick};
    use bouncy_fellas::{Tuning, frame_delta};

    /// Host instance holding all state
    struct Host {
        state: SimState,
        tuning: Tuning,
        renderer: CanvasRenderer,
        sprites: Vec<Sprite>,
        input: TickInput,
        last_time: f64,
    }

    impl Host {
        /// Run one simulation step
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                frame_delta(time - self.last_time)
            } else {
                1.0
            };
            self.last_time = time;

            let report = tick(&mut self.state, &self.input, dt, &self.tuning);

            // Clear one-shot inputs after processing
            self.input.secondary_click = None;

            if report.recovered > 0 {
                log::debug!("Recovered {} bodies on frame {}", report.recovered, self.state.frame);
            }
            if let Some(text) = report.link.and_then(link_label) {
                set_info_text(text);
            }
        }

        fn render(&self) {
            if let Err(e) = self.renderer.render(&self.state, &self.sprites) {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let (w, h) = self.renderer.resize(
                canvas.client_width() as f64,
                canvas.client_height() as f64,
                dpr,
            );
            self.input.screen = Screen::new(w, h);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bouncy Fellas starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let mut renderer = match CanvasRenderer::new(canvas.clone(), dpr) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Canvas unavailable: {:?}", e);
                return;
            }
        };
        let (w, h) = renderer.resize(
            canvas.client_width() as f64,
            canvas.client_height() as f64,
            dpr,
        );
        let screen = Screen::new(w, h);

        let tuning = Tuning::load();
        // Write the effective values back so they can be edited from the console
        if let Err(e) = tuning.save() {
            log::warn!("Tuning not saved: {}", e);
        }
        let seed = js_sys::Date::now() as u64;
        let state = match SimState::demo(seed, screen, &tuning) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Bad scene tuning: {}", e);
                return;
            }
        };
        log::info!("Scene initialized with seed: {}", seed);

        let sprites = vec![
            Sprite::new(state.bodies[0].id, tuning.sprite_size, "#2c6bed", "hero"),
            Sprite::new(state.bodies[1].id, tuning.sprite_size, "#e8a33d", "fella"),
        ];

        let mut input = TickInput::new(screen);
        // Start the pointer where the hero is so it does not jump
        input.target = Some(state.bodies[0].pos);

        let host = Rc::new(RefCell::new(Host {
            state,
            tuning,
            renderer,
            sprites,
            input,
            last_time: 0.0,
        }));

        set_info_text(INITIAL_HINT);
        setup_input_handlers(&canvas, host.clone());
        setup_resize(canvas, host.clone());

        request_animation_frame(host);

        log::info!("Bouncy Fellas running!");
    }

    /// Pointer position relative to the canvas (CSS pixels)
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Mouse move
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                host.borrow_mut().input.target = Some(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move
        for name in ["touchstart", "touchmove"] {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let point = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    host.borrow_mut().input.target = Some(point);
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Right click - release / re-attach
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                host.borrow_mut().input.secondary_click = Some(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            host.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn set_info_text(text: &str) {
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("info"));
        if let Some(el) = el {
            el.set_text_content(Some(text));
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, frame loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            h.update(time);
            h.render();
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bouncy Fellas (native) starting...");
    log::info!("Native mode runs a headless scripted session - serve the wasm build for the canvas");

    if let Err(e) = headless_run(600) {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the demo scene with a pointer circling the screen
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(frames: u64) -> Result<(), bouncy_fellas::sim::BodyError> {
    use bouncy_fellas::polar_to_cartesian;
    use bouncy_fellas::sim::{Screen, SimState, TickInput, tick};
    use bouncy_fellas::Tuning;

    let screen = Screen::new(800.0, 600.0);
    let tuning = Tuning::load();
    let mut state = SimState::demo(0x5eed, screen, &tuning)?;
    let mut input = TickInput::new(screen);

    let mut contacts = 0u32;
    let mut recovered = 0u32;
    for frame in 0..frames {
        let theta = frame as f32 * 0.02;
        input.target = Some(screen.center() + polar_to_cartesian(200.0, theta));

        let report = tick(&mut state, &input, 1.0, &tuning);
        contacts += report.pair_contacts;
        recovered += report.recovered;

        if frame % 60 == 0 {
            for body in &state.bodies {
                log::info!(
                    "frame {:4} body {} pos ({:7.1}, {:7.1}) vel ({:6.2}, {:6.2})",
                    frame,
                    body.id,
                    body.pos.x,
                    body.pos.y,
                    body.vel.x,
                    body.vel.y
                );
            }
        }
    }

    println!(
        "{} frames: {} body contacts, {} recoveries, collided: {}",
        frames, contacts, recovered, state.has_collided
    );
    Ok(())
}
