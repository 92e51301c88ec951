//! Deterministic game logic
//!
//! Everything that decides the round lives here. This module must stay
//! platform-free and deterministic:
//! - Elapsed time is fed in, never sampled
//! - Seeded RNG only
//! - Geometry comes from the [`crate::stage::Stage`] seam, never the DOM
//!
//! The rendering side only ever observes state and receives pushed updates.

pub mod game;
pub mod state;
pub mod timer;

pub use game::Game;
pub use state::{Arrow, ArrowPhase, Bow, GamePhase, GameState, Target};
pub use timer::Ticker;
