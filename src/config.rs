//! Card text, image and effect configuration
//!
//! Read once at startup from an optional JSON block embedded in the page:
//!
//! ```html
//! <script id="card-config" type="application/json">
//!   { "headline": "Will you be my Valentine?" }
//! </script>
//! ```
//!
//! Every field has a default, so a partial block (or none) is fine.

use serde::{Deserialize, Serialize};

use crate::confetti::ConfettiConfig;

/// Element id of the embedded JSON block
pub const CONFIG_ELEMENT_ID: &str = "card-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// The question on the card
    pub headline: String,
    pub yes_label: String,
    pub no_label: String,
    /// Shown under the image after "Yes"
    pub success_message: String,
    /// Remote image shown after "Yes" (fetched by the browser, never by us)
    pub celebration_image_url: String,
    pub celebration_image_alt: String,
    pub confetti: ConfettiConfig,

    // === Decorations ===
    /// Pointer trail dots
    pub show_cursor_trail: bool,
    /// Floating hearts, sparkles and fireworks
    pub show_decorations: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            headline: "Will you be my Valentine?".to_string(),
            yes_label: "YES! 💕".to_string(),
            no_label: "No 😂".to_string(),
            success_message: "I knew you'd say yes! 💖".to_string(),
            celebration_image_url:
                "https://media.tenor.com/lQ7k8ool9FoAAAAM/happy-man-smiling-erik.gif".to_string(),
            celebration_image_alt: "Love celebration".to_string(),
            confetti: ConfettiConfig::default(),
            show_cursor_trail: true,
            show_decorations: true,
        }
    }
}

impl CardConfig {
    /// Parse a JSON block, falling back to defaults when it is malformed
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid card config ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load the embedded config block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) if !json.trim().is_empty() => {
                log::info!("Loaded card config from page");
                Self::from_json(&json)
            }
            _ => {
                log::info!("Using default card config");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
