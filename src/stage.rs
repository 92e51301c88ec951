//! Presentation adapter seam
//!
//! The game core never touches the DOM directly; it reads rendered geometry
//! and pushes position/HUD updates through the [`Stage`] trait. Rect queries
//! must reflect what is currently on screen (including a target mid-glide),
//! not the last discrete position the core requested.

use glam::Vec2;
use thiserror::Error;

/// Which top-level view is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Title screen with the start control
    Start,
    /// The playfield
    Game,
}

/// Axis-aligned rectangle in the shared play-area coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Top-left corner as a point
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Inclusive axis-aligned overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() >= other.left
            && self.left <= other.right()
            && self.bottom() >= other.top
            && self.top <= other.bottom()
    }
}

/// Raised when the presentation adapter cannot attach to its document.
/// The game cannot run headless against a missing element, so construction
/// fails fast instead of limping along.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("required element `{0}` not found in document")]
    MissingElement(&'static str),
    #[error("no document available")]
    NoDocument,
}

/// Everything the game core needs from the presentation layer.
///
/// Geometry queries return the *rendered* state in one shared coordinate
/// space; setters take play-area-relative positions.
pub trait Stage {
    // === Geometry (rendered state) ===
    fn play_area(&self) -> Rect;
    fn target_rect(&self) -> Rect;
    fn bow_rect(&self) -> Rect;
    fn arrow_rect(&self) -> Rect;
    /// Current on-screen target top, even mid-glide. Used to freeze the
    /// target exactly where the player sees it when the round pauses.
    fn rendered_target_top(&self) -> f32;

    // === Target ===
    fn set_target_top(&mut self, top: f32);
    /// Toggle the smooth glide between discrete target positions
    fn set_target_glide(&mut self, enabled: bool);

    // === Bow ===
    fn set_bow_top(&mut self, top: f32);

    // === Arrow (single slot) ===
    /// Show the arrow at flight start, vertically centered on `origin.y`
    fn place_arrow(&mut self, origin: Vec2);
    fn set_arrow_x(&mut self, x: f32);
    /// Attach the arrow to the target at the given relative offset so it
    /// rides along with subsequent target movement
    fn pin_arrow(&mut self, offset: Vec2);
    fn clear_arrow(&mut self);

    // === HUD sinks ===
    fn set_score(&mut self, score: u32);
    fn set_hits(&mut self, hits: u32);
    fn set_misses(&mut self, misses: u32);
    fn set_seconds(&mut self, seconds: u32);

    fn show_screen(&mut self, screen: Screen);
}
