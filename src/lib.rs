//! Bullseye - a drag-and-shoot archery range for the browser
//!
//! Core modules:
//! - `sim`: Deterministic game logic (round state machine, timers, collision)
//! - `stage`: Presentation adapter seam (geometry, HUD sinks, screens)
//! - `platform`: Browser/headless stage implementations
//! - `config`: Data-driven game tuning

pub mod config;
pub mod platform;
pub mod sim;
pub mod stage;

pub use config::Config;
pub use sim::{ArrowPhase, Game, GamePhase, GameState};
pub use stage::{Rect, Screen, Stage, StageError};

/// Game configuration constants
pub mod consts {
    /// Round length in seconds
    pub const ROUND_SECONDS: u32 = 60;
    /// Target re-placement cadence
    pub const TARGET_TICK_MS: u32 = 1000;
    /// Arrow advancement cadence
    pub const ARROW_TICK_MS: u32 = 20;
    /// Horizontal distance an arrow covers per tick.
    /// 18 units every 20ms = 900 units/sec; both numbers together set the
    /// difficulty, change them in lockstep.
    pub const ARROW_STEP: f32 = 18.0;
    /// Score awarded per hit
    pub const POINTS_PER_HIT: u32 = 10;

    /// Target travel bounds (play-area coordinates)
    pub const TARGET_MIN_TOP: f32 = 100.0;
    pub const TARGET_MAX_BOTTOM: f32 = 780.0;

    /// Topmost bow position; the bottom bound follows the play-area height
    pub const BOW_MIN_TOP: f32 = 100.0;
}
