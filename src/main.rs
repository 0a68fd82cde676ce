//! Vergence Trainer entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use vergence_trainer::platform::{canvas_pixel_size, now_ms, run_seed};
    use vergence_trainer::renderer::RenderState;
    use vergence_trainer::session::Toggle;
    use vergence_trainer::sim::FrameOutput;
    use vergence_trainer::{Session, Settings};

    /// App instance holding all state
    struct App {
        session: Session,
        render_state: Option<RenderState>,
        /// Rotation speed restored when rotation is toggled back on
        saved_rotation: f64,
    }

    impl App {
        fn new(settings: Settings, seed: u64) -> Self {
            let saved_rotation = if settings.rotation_speed > 0.0 {
                settings.rotation_speed
            } else {
                Settings::default().rotation_speed
            };
            Self {
                session: Session::new(settings, seed),
                render_state: None,
                saved_rotation,
            }
        }

        /// Render a frame
        fn render(&mut self, frame: &FrameOutput) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(frame) {
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

        /// Validate, apply and persist new settings. Redraws when paused.
        fn apply_settings(&mut self, settings: Settings) {
            if self.session.update_settings(settings).is_ok() {
                self.session.settings().save();
                if !self.session.is_playing() {
                    let frame = self.session.current_frame();
                    self.render(&frame);
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Vergence Trainer starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let (width, height) = canvas_pixel_size(canvas.client_width(), canvas.client_height(), dpr);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let autoplay = settings.autoplay;
        let seed = run_seed();
        let app = Rc::new(RefCell::new(App::new(settings, seed)));
        log::info!("Session initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
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
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, dpr as f32).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        // Draw the resting frame
        {
            let mut a = app.borrow_mut();
            let frame = a.session.current_frame();
            a.render(&frame);
        }

        setup_keyboard(app.clone());
        setup_resize(app.clone(), canvas);

        if autoplay {
            play(app);
        }

        log::info!("Vergence Trainer ready");
    }

    /// Start playback and schedule the frame loop
    fn play(app: Rc<RefCell<App>>) {
        let started = app.borrow_mut().session.play(now_ms());
        if started {
            request_animation_frame(app);
        }
    }

    /// Toggle play/pause, cancelling the pending frame on pause
    fn toggle(app: Rc<RefCell<App>>) {
        let result = app.borrow_mut().session.toggle(now_ms());
        match result {
            Toggle::Playing => request_animation_frame(app),
            Toggle::Paused { frame, cancel } => {
                if let (Some(id), Some(window)) = (cancel, web_sys::window()) {
                    let _ = window.cancel_animation_frame(id);
                }
                app.borrow_mut().render(&frame);
            }
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let key = event.key();
            if key == " " {
                event.prevent_default();
                toggle(app.clone());
                return;
            }

            let mut a = app.borrow_mut();
            let mut settings = a.session.settings().clone();
            match key.as_str() {
                "+" | "=" => settings.step_speed(0.1),
                "-" | "_" => settings.step_speed(-0.1),
                "]" => settings.step_phase_interval(1),
                "[" => settings.step_phase_interval(-1),
                "r" | "R" => {
                    if settings.rotation_speed > 0.0 {
                        a.saved_rotation = settings.rotation_speed;
                        settings.rotation_speed = 0.0;
                    } else {
                        settings.rotation_speed = a.saved_rotation;
                    }
                    log::info!("Rotation speed: {}", settings.rotation_speed);
                }
                _ => return,
            }
            a.apply_settings(settings);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Keep the backing store in step with the canvas CSS size and zoom level
    fn setup_resize(app: Rc<RefCell<App>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let (width, height) =
                canvas_pixel_size(canvas.client_width(), canvas.client_height(), dpr);
            if width == 0 || height == 0 {
                return;
            }
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            if let Some(ref mut render_state) = a.render_state {
                render_state.set_viewport(width, height, dpr as f32);
            }
            // A running loop redraws on its next frame
            if !a.session.is_playing() {
                let frame = a.session.current_frame();
                a.render(&frame);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let loop_app = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(loop_app, time);
        });
        if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            app.borrow_mut().session.set_pending(id);
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let frame = {
            let mut a = app.borrow_mut();
            let frame = a.session.on_frame(time);
            if let Some(ref f) = frame {
                a.render(f);
            }
            frame
        };

        // Paused between scheduling and firing: let the loop die
        if frame.is_some() {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

/// Headless run: steps the engine at a simulated refresh rate and logs frames
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use vergence_trainer::platform::run_seed;
    use vergence_trainer::{Session, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Vergence Trainer (native) starting...");
    log::info!("Rendering requires the web build - run with `trunk serve`");

    let seconds: f64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10.0);
    let refresh_hz = 60.0;
    let frame_ms = 1000.0 / refresh_hz;

    let settings = Settings::load();
    if let Err(e) = settings.validate() {
        log::error!("Invalid settings: {}", e);
        std::process::exit(1);
    }
    let mut session = Session::new(settings, run_seed());

    // Play for the first half, pause for two seconds, then play out the rest
    let half = seconds * 1000.0 / 2.0;
    let mut now = 0.0;
    session.play(now);
    let mut frames = 0u64;
    while now < seconds * 1000.0 + 2000.0 {
        now += frame_ms;
        if session.is_playing() && now >= half && now < half + frame_ms {
            let (frame, _) = session.pause(now);
            log::info!("paused   {:>8.1}ms  {:?}", session.engine().elapsed(now), frame);
        } else if !session.is_playing() && now >= half + 2000.0 {
            session.play(now);
            log::info!("resumed  {:>8.1}ms", session.engine().elapsed(now));
        }

        if let Some(frame) = session.on_frame(now) {
            frames += 1;
            if frames % refresh_hz as u64 == 0 {
                log::info!(
                    "{:>8.1}ms  scale {:.3}  offset {:.1}px  rot {:6.1}°  {}",
                    session.engine().elapsed(now),
                    frame.scale,
                    frame.offset_x,
                    frame.rotation_deg,
                    frame.mode.as_str()
                );
            }
        }
    }
    log::info!("{} frames rendered", frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
