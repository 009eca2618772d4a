//! DOM view of the card
//!
//! Builds the card markup once, then mirrors `CardState` into it every frame.
//! Only attributes that changed since the previous frame are written.

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlImageElement};

use crate::card::{CardState, View};
use crate::config::CardConfig;
use crate::confetti::Confetti;
use crate::consts::TRAIL_INSERT_CAP;

/// Decorative glyphs cycled by the floating hearts
const FLOATING_HEARTS: [&str; 6] = ["❤️", "💕", "💖", "💗", "💝", "💓"];
const FLOATING_HEART_COUNT: usize = 15;
const SPARKLE_COUNT: usize = 20;
const FIREWORK_COUNT: usize = 6;
const HEADER_HEARTS: [&str; 5] = ["❤️", "💕", "💖", "💗", "💝"];

/// The mounted card
pub struct CardView {
    root: HtmlElement,
    card: HtmlElement,
    buttons: HtmlElement,
    yes_button: HtmlElement,
    no_button: HtmlElement,
    celebration: HtmlElement,
    fireworks: Option<HtmlElement>,
    trail_dots: Vec<HtmlElement>,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    palette_css: Vec<String>,
    canvas_size: (u32, u32),
    // Last rendered values
    shown_view: View,
    shown_shaking: bool,
    shown_offset: Vec2,
    shown_trail: (usize, Option<u64>),
    shown_confetti: bool,
}

fn element(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let el = document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("created element is not an HtmlElement"))?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    Ok(el)
}

fn set_hidden(el: &HtmlElement, hidden: bool) {
    let _ = el.class_list().toggle_with_force("hidden", hidden);
}

impl CardView {
    /// Build the card inside `#app` (or `<body>` when there is none)
    pub fn mount(config: &CardConfig, confetti: &Confetti) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let host: HtmlElement = match document.get_element_by_id("app") {
            Some(el) => el
                .dyn_into()
                .map_err(|_| JsValue::from_str("#app is not an HtmlElement"))?,
            None => document.body().ok_or("no body")?,
        };

        let root = element(&document, "div", "app-container")?;

        // Confetti canvas sits above everything and ignores the pointer
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;
        canvas.set_class_name("confetti-canvas hidden");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a 2d context"))?;
        root.append_child(&canvas)?;

        let mut trail_dots = Vec::with_capacity(TRAIL_INSERT_CAP);
        if config.show_cursor_trail {
            for _ in 0..TRAIL_INSERT_CAP {
                let dot = element(&document, "div", "cursor-particle hidden")?;
                root.append_child(&dot)?;
                trail_dots.push(dot);
            }
        }

        if config.show_decorations {
            let hearts_bg = element(&document, "div", "floating-hearts-bg")?;
            for i in 0..FLOATING_HEART_COUNT {
                let heart = element(
                    &document,
                    "div",
                    &format!("floating-heart floating-heart-{}", i),
                )?;
                heart.set_text_content(Some(FLOATING_HEARTS[i % FLOATING_HEARTS.len()]));
                hearts_bg.append_child(&heart)?;
            }
            root.append_child(&hearts_bg)?;
        }

        let fireworks = if config.show_decorations {
            let container = element(&document, "div", "fireworks-container hidden")?;
            for i in 0..FIREWORK_COUNT {
                let fw = element(&document, "div", &format!("firework firework-{}", i))?;
                container.append_child(&fw)?;
            }
            root.append_child(&container)?;
            Some(container)
        } else {
            None
        };

        let card = element(&document, "div", "valentine-card")?;

        if config.show_decorations {
            let sparkles = element(&document, "div", "sparkles")?;
            for i in 0..SPARKLE_COUNT {
                let sparkle = element(&document, "div", &format!("sparkle sparkle-{}", i))?;
                sparkle.set_text_content(Some("✨"));
                sparkles.append_child(&sparkle)?;
            }
            card.append_child(&sparkles)?;

            let header = element(&document, "div", "hearts-decoration")?;
            for glyph in HEADER_HEARTS {
                let span = element(&document, "span", "heart")?;
                span.set_text_content(Some(glyph));
                header.append_child(&span)?;
            }
            card.append_child(&header)?;
        }

        let headline = element(&document, "h1", "valentine-text")?;
        headline.set_text_content(Some(&config.headline));
        card.append_child(&headline)?;

        let buttons = element(&document, "div", "buttons-container")?;
        let yes_button = element(&document, "button", "yes-button")?;
        yes_button.set_text_content(Some(&config.yes_label));
        let no_button = element(&document, "button", "no-button")?;
        no_button.set_text_content(Some(&config.no_label));
        no_button
            .style()
            .set_property("transition", "transform 0.3s ease")?;
        buttons.append_child(&yes_button)?;
        buttons.append_child(&no_button)?;
        card.append_child(&buttons)?;

        let celebration = element(&document, "div", "gif-container hidden")?;
        let image: HtmlImageElement = document
            .create_element("img")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not an img"))?;
        image.set_class_name("celebration-gif");
        image.set_alt(&config.celebration_image_alt);
        // Set lazily on confirm so the image is only fetched when needed
        image.set_attribute("data-src", &config.celebration_image_url)?;
        celebration.append_child(&image)?;
        let message = element(&document, "p", "success-message")?;
        message.set_text_content(Some(&config.success_message));
        celebration.append_child(&message)?;
        card.append_child(&celebration)?;

        root.append_child(&card)?;
        host.append_child(&root)?;

        let palette_css = confetti
            .palette()
            .iter()
            .map(|[r, g, b]| format!("rgb({}, {}, {})", r, g, b))
            .collect();

        log::info!("Card mounted");

        Ok(Self {
            root,
            card,
            buttons,
            yes_button,
            no_button,
            celebration,
            fireworks,
            trail_dots,
            canvas,
            ctx,
            palette_css,
            canvas_size: (0, 0),
            shown_view: View::Prompt,
            shown_shaking: false,
            shown_offset: Vec2::ZERO,
            shown_trail: (0, None),
            shown_confetti: false,
        })
    }

    pub fn yes_button(&self) -> &HtmlElement {
        &self.yes_button
    }

    pub fn no_button(&self) -> &HtmlElement {
        &self.no_button
    }

    /// Mirror the card state into the DOM
    pub fn render(&mut self, card: &CardState) {
        self.render_trail(card);

        let offset = card.offset();
        if offset != self.shown_offset {
            let _ = self.no_button.style().set_property(
                "transform",
                &format!("translate({}px, {}px)", offset.x, offset.y),
            );
            self.shown_offset = offset;
        }

        if card.is_shaking() != self.shown_shaking {
            self.shown_shaking = card.is_shaking();
            let _ = self
                .card
                .class_list()
                .toggle_with_force("shake-animation", self.shown_shaking);
        }

        if card.view() != self.shown_view {
            self.shown_view = card.view();
            let celebrating = self.shown_view == View::Celebration;
            set_hidden(&self.buttons, celebrating);
            set_hidden(&self.celebration, !celebrating);
            if let Some(fireworks) = &self.fireworks {
                set_hidden(fireworks, !celebrating);
            }
            if celebrating {
                self.load_celebration_image();
            }
        }
    }

    fn render_trail(&mut self, card: &CardState) {
        if self.trail_dots.is_empty() {
            return;
        }
        let trail = card.trail();
        let key = (trail.len(), trail.newest().map(|p| p.id));
        if key == self.shown_trail {
            return;
        }
        self.shown_trail = key;

        let mut particles = trail.iter();
        for dot in &self.trail_dots {
            match particles.next() {
                Some(p) => {
                    let style = dot.style();
                    let _ = style.set_property("left", &format!("{}px", p.pos.x));
                    let _ = style.set_property("top", &format!("{}px", p.pos.y));
                    set_hidden(dot, false);
                }
                None => set_hidden(dot, true),
            }
        }
    }

    fn load_celebration_image(&self) {
        let image = self
            .celebration
            .query_selector("img.celebration-gif")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
        if let Some(image) = image {
            if let Some(src) = image.get_attribute("data-src") {
                image.set_src(&src);
            }
        }
    }

    /// Draw the confetti, resizing the canvas to the viewport if needed
    pub fn draw_confetti(&mut self, confetti: &Confetti, viewport: (f32, f32)) {
        let running = confetti.is_running();
        if running != self.shown_confetti {
            self.shown_confetti = running;
            let _ = self.canvas.class_list().toggle_with_force("hidden", !running);
        }
        if !running {
            return;
        }

        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(1.0);
        let (w, h) = (viewport.0 as f64, viewport.1 as f64);
        let size = ((w * dpr) as u32, (h * dpr) as u32);
        if size != self.canvas_size {
            self.canvas.set_width(size.0);
            self.canvas.set_height(size.1);
            self.canvas_size = size;
        }

        let ctx = &self.ctx;
        let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, w, h);
        for piece in confetti.pieces() {
            if piece.pos.y < -piece.size.x {
                continue;
            }
            let Some(color) = self.palette_css.get(piece.color) else {
                continue;
            };
            ctx.save();
            let _ = ctx.translate(piece.pos.x as f64, piece.pos.y as f64);
            let _ = ctx.rotate(piece.angle as f64);
            ctx.set_fill_style_str(color);
            let (pw, ph) = (piece.size.x as f64, piece.size.y as f64);
            ctx.fill_rect(-pw / 2.0, -ph / 2.0, pw, ph);
            ctx.restore();
        }
    }

    /// Remove the card from the page
    pub fn unmount(&self) {
        self.root.remove();
        log::info!("Card unmounted");
    }
}
