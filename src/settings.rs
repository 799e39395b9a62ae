//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web build; native builds always start
//! from defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{GAME_HEIGHT, GAME_WIDTH};
use crate::tuning::Tuning;

/// Smallest display we bother laying out for
const MIN_DISPLAY: f32 = 100.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    /// Canvas width in pixels
    pub display_width: f32,
    /// Canvas height in pixels
    pub display_height: f32,
    /// Id of the canvas element to draw into
    pub canvas_id: String,

    // === Gameplay ===
    pub tuning: Tuning,

    // === HUD ===
    /// Draw the skier's speed in the corner
    pub show_speed: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start muted
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_width: GAME_WIDTH,
            display_height: GAME_HEIGHT,
            canvas_id: "skiCanvas".to_string(),

            tuning: Tuning::default(),

            show_speed: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "downhill_chase_settings";

    /// Parse stored settings, falling back to defaults when the JSON is bad
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Stored settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values
    pub fn sanitized(mut self) -> Self {
        if !(self.display_width >= MIN_DISPLAY) {
            log::warn!("display_width {} too small", self.display_width);
            self.display_width = GAME_WIDTH;
        }
        if !(self.display_height >= MIN_DISPLAY) {
            log::warn!("display_height {} too small", self.display_height);
            self.display_height = GAME_HEIGHT;
        }
        if self.canvas_id.is_empty() {
            self.canvas_id = Self::default().canvas_id;
        }
        self.master_volume = clamp_volume(self.master_volume);
        self.sfx_volume = clamp_volume(self.sfx_volume);
        self.tuning = self.tuning.sanitized();
        self
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not write settings to LocalStorage");
                } else {
                    log::info!("Settings saved");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings storage on native, key {}", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn clamp_volume(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.canvas_id, "skiCanvas");
        assert_eq!(settings.display_width, GAME_WIDTH);
        assert_eq!(settings.clone().sanitized(), settings);
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{ "muted": true, "tuning": { "rhino_speed": 12.0 } }"#);
        assert!(settings.muted);
        assert_eq!(settings.tuning.rhino_speed, 12.0);
        assert_eq!(settings.display_height, GAME_HEIGHT);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_eq!(Settings::from_json("{ nope"), Settings::default());
    }

    #[test]
    fn test_sanitize_clamps() {
        let settings = Settings {
            display_width: 0.0,
            master_volume: 3.0,
            sfx_volume: f32::NAN,
            canvas_id: String::new(),
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.display_width, GAME_WIDTH);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
        assert_eq!(settings.canvas_id, "skiCanvas");
    }

    #[test]
    fn test_roundtrip_through_storage_format() {
        let settings = Settings {
            display_width: 800.0,
            muted: true,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }
}
