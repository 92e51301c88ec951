//! Game tuning and preferences
//!
//! Persisted to LocalStorage on the web build so tweaked values survive a
//! reload; native builds use the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// All gameplay tunables in one place.
///
/// `arrow_tick_ms` and `arrow_step` jointly define arrow speed
/// (defaults: 18 units / 20ms = 900 units per second).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Round length in seconds
    pub round_seconds: u32,
    /// Target re-placement interval (ms)
    pub target_tick_ms: u32,
    /// Arrow advancement interval (ms)
    pub arrow_tick_ms: u32,
    /// Horizontal units the arrow travels per tick
    pub arrow_step: f32,
    /// Score awarded per hit
    pub points_per_hit: u32,

    // === Play-area bounds ===
    /// Highest top the target may be placed at
    pub target_min_top: f32,
    /// Bottom edge of the target's travel band
    pub target_max_bottom: f32,
    /// Highest top the bow may be dragged to
    pub bow_min_top: f32,

    /// Whether a new shot may be fired while the previous arrow is stuck in
    /// the target. When false the round allows exactly one shot after a hit.
    pub rearm_after_hit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,
            target_tick_ms: TARGET_TICK_MS,
            arrow_tick_ms: ARROW_TICK_MS,
            arrow_step: ARROW_STEP,
            points_per_hit: POINTS_PER_HIT,
            target_min_top: TARGET_MIN_TOP,
            target_max_bottom: TARGET_MAX_BOTTOM,
            bow_min_top: BOW_MIN_TOP,
            rearm_after_hit: true,
        }
    }
}

impl Config {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bullseye_config";

    /// Load config from LocalStorage (WASM only); falls back to defaults on
    /// missing or unreadable data.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(config) = serde_json::from_str(&json) {
                    log::info!("Loaded config from LocalStorage");
                    return config;
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
