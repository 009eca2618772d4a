//! Valentine Card entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_card {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{Event, PageTransitionEvent};

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use valentine_card::card::{CardEvent, CardState, DeviceClass};
    use valentine_card::platform::{KeepAlive, Listener, now_ms, viewport_size};
    use valentine_card::view::CardView;
    use valentine_card::{CardConfig, Confetti};

    /// Mixed into the seed so confetti draws don't perturb evasion draws
    const FX_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

    thread_local! {
        /// Owns the running card until `pagehide`; callbacks hold `Weak`s
        static CARD: KeepAlive<App> = const { KeepAlive::new() };
    }

    /// Card instance holding all state
    struct App {
        state: CardState,
        confetti: Confetti,
        fx_rng: Pcg32,
        view: CardView,
        last_time: f64,
        listeners: Vec<Listener>,
        // Animation frame plumbing
        frame_callback: Option<Closure<dyn FnMut(f64)>>,
        frame_id: Option<i32>,
    }

    impl App {
        fn new(seed: u64, config: &CardConfig) -> Result<Self, JsValue> {
            let confetti = Confetti::new(config.confetti.clone());
            let view = CardView::mount(config, &confetti)?;
            Ok(Self {
                state: CardState::new(seed),
                confetti,
                fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
                view,
                last_time: 0.0,
                listeners: Vec::new(),
                frame_callback: None,
                frame_id: None,
            })
        }

        /// Advance timers, react to events, render
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                0.0
            };
            self.last_time = time;

            self.state.advance(time);
            let viewport = viewport_size();
            self.handle_events(viewport);

            self.confetti
                .step(dt, viewport.0, viewport.1, &mut self.fx_rng);
            self.view.render(&self.state);
            self.view.draw_confetti(&self.confetti, viewport);
        }

        fn handle_events(&mut self, viewport: (f32, f32)) {
            for event in self.state.drain_events() {
                match event {
                    CardEvent::Evaded { direction, offset } => {
                        log::debug!("No button evaded {:?} to ({}, {})", direction, offset.x, offset.y);
                    }
                    CardEvent::ShakeStarted => log::debug!("Shake started"),
                    CardEvent::ShakeEnded => log::debug!("Shake ended"),
                    CardEvent::Confirmed => log::info!("Yes! Switching to celebration"),
                    CardEvent::EffectStarted => {
                        self.confetti
                            .start(viewport.0, viewport.1, &mut self.fx_rng);
                    }
                    CardEvent::EffectEnded => {
                        self.confetti.stop();
                        log::info!("Confetti finished");
                    }
                    CardEvent::TrailPruned { removed } => {
                        log::trace!("Trail pruned ({} removed)", removed);
                    }
                    CardEvent::TornDown => log::info!("Card torn down"),
                }
            }
        }

        fn request_frame(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(callback) = &self.frame_callback {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => self.frame_id = Some(id),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }

        /// Cancel the frame loop and every listener, then stop all timers
        fn teardown(&mut self) {
            if let (Some(window), Some(id)) = (web_sys::window(), self.frame_id.take()) {
                let _ = window.cancel_animation_frame(id);
            }
            self.frame_callback = None;
            self.listeners.clear();
            self.state.teardown();
            self.handle_events((0.0, 0.0));
            self.confetti.stop();
            self.view.unmount();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Valentine card starting...");

        if let Err(e) = start() {
            log::error!("Card failed to start: {:?}", e);
        }
    }

    fn start() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let config = CardConfig::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, &config)?));

        let (width, _) = viewport_size();
        log::info!(
            "Card initialized with seed: {} ({} layout)",
            seed,
            DeviceClass::from_viewport_width(width).as_str()
        );

        let listeners = setup_input_handlers(&app)?;
        app.borrow_mut().listeners = listeners;

        setup_page_lifecycle()?;
        start_frame_loop(&app);

        if let Some(previous) = CARD.with(|card| card.install(app)) {
            log::warn!("Replacing a card that was already running");
            previous.borrow_mut().teardown();
        }

        log::info!("Valentine card running!");
        Ok(())
    }

    fn setup_input_handlers(app: &Rc<RefCell<App>>) -> Result<Vec<Listener>, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let mut listeners = Vec::new();

        // Pointer trail
        {
            let app = Rc::downgrade(app);
            listeners.push(Listener::new(&window, "mousemove", move |event: Event| {
                let Some(event) = event.dyn_ref::<web_sys::MouseEvent>() else {
                    return;
                };
                if let Some(app) = app.upgrade() {
                    app.borrow_mut()
                        .state
                        .pointer_moved(event.client_x() as f32, event.client_y() as f32);
                }
            })?);
        }

        let (yes_button, no_button) = {
            let a = app.borrow();
            (a.view.yes_button().clone(), a.view.no_button().clone())
        };

        // No button: hover
        {
            let app = Rc::downgrade(app);
            listeners.push(Listener::new(&no_button, "mouseenter", move |_event: Event| {
                evade(&app);
            })?);
        }

        // No button: touch (must not turn into a click)
        {
            let app = Rc::downgrade(app);
            listeners.push(Listener::new(&no_button, "touchstart", move |event: Event| {
                event.prevent_default();
                evade(&app);
            })?);
        }

        // Yes button
        {
            let app = Rc::downgrade(app);
            listeners.push(Listener::new(&yes_button, "click", move |_event: Event| {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().state.confirm(now_ms());
                }
            })?);
        }

        Ok(listeners)
    }

    fn evade(app: &Weak<RefCell<App>>) {
        if let Some(app) = app.upgrade() {
            let (width, _) = viewport_size();
            app.borrow_mut().state.evade(width, now_ms());
        }
    }

    fn setup_page_lifecycle() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Page going away: release everything. Fires once, then frees itself.
        {
            let on_hide = Closure::once_into_js(move |_event: Event| {
                if let Some(app) = CARD.with(|card| card.release()) {
                    app.borrow_mut().teardown();
                }
            });
            window.add_event_listener_with_callback("pagehide", on_hide.unchecked_ref())?;
        }

        // Restored from the back/forward cache after teardown: start over
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if event.persisted() {
                    log::info!("Restored from page cache, reloading");
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().reload();
                    }
                }
            });
            window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn start_frame_loop(app: &Rc<RefCell<App>>) {
        let weak = Rc::downgrade(app);
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(app) = weak.upgrade() {
                let mut a = app.borrow_mut();
                if a.state.is_torn_down() {
                    return;
                }
                a.frame(time);
                a.request_frame();
            }
        });

        let mut a = app.borrow_mut();
        a.frame_callback = Some(callback);
        a.request_frame();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_card::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Valentine card (native) starting...");
    log::info!("The card runs in the browser - use `trunk serve` for the web version");

    println!("\nRunning card smoke check...");
    smoke_check();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: hover the No button a few times, say yes, let it play out
#[cfg(not(target_arch = "wasm32"))]
fn smoke_check() {
    use valentine_card::card::{CardEvent, CardState, DeviceClass, View};
    use valentine_card::consts::*;

    let mut card = CardState::new(14);
    let mut now = 0.0;
    card.advance(now);

    for width in [1280.0_f32, 1280.0, 390.0, 390.0] {
        for i in 0..30 {
            card.pointer_moved(i as f32 * 3.0, i as f32 * 2.0);
        }
        now += 120.0;
        card.advance(now);
        if let Some(evasion) = card.evade(width, now) {
            let bound = DeviceClass::from_viewport_width(width).profile().max_offset;
            assert!(evasion.offset.abs().max_element() <= bound);
            println!(
                "  evaded {:?} on {} layout -> ({}, {})",
                evasion.direction,
                evasion.device.as_str(),
                evasion.offset.x,
                evasion.offset.y
            );
        }
    }
    assert!(card.trail().len() <= TRAIL_INSERT_CAP);

    card.confirm(now);
    assert_eq!(card.view(), View::Celebration);
    card.advance(now + CELEBRATION_EFFECT_MS);
    assert!(!card.effect_active());
    assert!(card.drain_events().contains(&CardEvent::EffectEnded));

    card.teardown();
    println!("✓ Card smoke check passed!");
}
