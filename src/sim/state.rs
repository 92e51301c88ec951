//! Round state and core game types
//!
//! Plain data only; all transitions live in [`super::game`].

use glam::Vec2;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen, no round in progress
    Idle,
    /// Active round
    Running,
    /// Round frozen; timers gated, target captured in place
    Paused,
}

/// Lifecycle state of the (single) arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowPhase {
    /// No arrow on screen
    #[default]
    Absent,
    /// Arrow advancing across the play area
    Flying,
    /// Arrow attached to the target after a hit
    Stuck,
}

/// The single arrow slot. A new shot reclaims it; there is never more than
/// one arrow in flight.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arrow {
    pub phase: ArrowPhase,
    /// Horizontal position of the arrow's left edge (play-area coordinates)
    pub x: f32,
    /// Flight start point (bow's trailing edge, vertical center)
    pub origin: Vec2,
}

impl Arrow {
    pub fn is_flying(&self) -> bool {
        self.phase == ArrowPhase::Flying
    }
}

/// The moving target; re-placed once per target tick while the round runs
#[derive(Debug, Clone, Copy, Default)]
pub struct Target {
    pub top: f32,
}

/// Bow drag gesture state. Dragging survives pause; position updates are
/// gated on the round phase instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bow {
    pub dragging: bool,
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub hits: u32,
    pub misses: u32,
    pub remaining_seconds: u32,
    /// Guards against a second arrow while one is in flight (or while paused)
    pub shoot_lock: bool,
    pub target: Target,
    pub bow: Bow,
    pub arrow: Arrow,
}

impl GameState {
    /// Fresh pre-round state
    pub fn new(round_seconds: u32) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            hits: 0,
            misses: 0,
            remaining_seconds: round_seconds,
            shoot_lock: false,
            target: Target::default(),
            bow: Bow::default(),
            arrow: Arrow::default(),
        }
    }

    /// Zero the counters and rewind the countdown for a new round.
    /// Drag state is deliberately left alone.
    pub fn reset(&mut self, round_seconds: u32) {
        self.score = 0;
        self.hits = 0;
        self.misses = 0;
        self.remaining_seconds = round_seconds;
        self.shoot_lock = false;
        self.arrow = Arrow::default();
    }
}
