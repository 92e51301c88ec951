//! Round session and controllers
//!
//! One [`Game`] value owns a full round: phase machine, counters, the three
//! periodic tasks, the drag gesture, and the single arrow slot. Every tick
//! body re-checks the phase at its top, so a pause requested between
//! scheduling and execution of a tick still freezes the world completely.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Arrow, ArrowPhase, GamePhase, GameState};
use super::timer::Ticker;
use crate::config::Config;
use crate::stage::{Screen, Stage};

/// A game session bound to a presentation stage.
pub struct Game<S: Stage> {
    stage: S,
    config: Config,
    state: GameState,
    seed: u64,
    rng: Pcg32,
    target_timer: Ticker,
    countdown_timer: Ticker,
    arrow_timer: Ticker,
}

impl<S: Stage> Game<S> {
    pub fn new(stage: S, config: Config, seed: u64) -> Self {
        let mut game = Self {
            stage,
            state: GameState::new(config.round_seconds),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            target_timer: Ticker::new(config.target_tick_ms),
            countdown_timer: Ticker::new(1000),
            arrow_timer: Ticker::new(config.arrow_tick_ms),
            config,
        };
        game.stage.set_seconds(game.config.round_seconds);
        game.stage.show_screen(Screen::Start);
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    // === Lifecycle ===

    /// Begin a round. Valid only from the start screen.
    pub fn start(&mut self) {
        if self.state.phase != GamePhase::Idle {
            return;
        }
        self.state.reset(self.config.round_seconds);
        self.state.phase = GamePhase::Running;

        self.stage.show_screen(Screen::Game);
        self.push_hud();

        self.stage.set_target_glide(true);
        self.move_target();
        self.target_timer.start();
        self.countdown_timer.start();

        log::info!("Round started (seed {})", self.seed);
    }

    /// Freeze the round. The target is captured at its rendered position so
    /// resume continues without a visual jump.
    pub fn pause(&mut self) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        self.state.phase = GamePhase::Paused;

        let top = self.stage.rendered_target_top();
        self.stage.set_target_glide(false);
        self.stage.set_target_top(top);
        self.state.target.top = top;
        self.target_timer.stop();

        // block new shots while paused
        self.state.shoot_lock = true;

        log::info!("Round paused");
    }

    /// Unfreeze a paused round.
    pub fn resume(&mut self) {
        if self.state.phase != GamePhase::Paused {
            return;
        }
        self.state.phase = GamePhase::Running;

        self.stage.set_target_glide(true);
        self.move_target();
        self.target_timer.start();

        // keep the lock only while a flight is still unresolved
        self.state.shoot_lock = self.state.arrow.is_flying();

        log::info!("Round resumed");
    }

    /// Abort the round and return to the start screen. No-op on the start
    /// screen; mid-round this ends exactly like a natural countdown expiry.
    pub fn restart(&mut self) {
        if self.state.phase == GamePhase::Idle {
            return;
        }
        log::info!("Round restarted");
        self.end();
    }

    fn end(&mut self) {
        self.target_timer.stop();
        self.countdown_timer.stop();
        self.arrow_timer.stop();

        self.stage.clear_arrow();
        self.state.reset(self.config.round_seconds);
        self.state.phase = GamePhase::Idle;

        // snap the target home without animating the trip back
        self.stage.set_target_glide(false);
        self.stage.set_target_top(self.config.target_min_top);
        self.stage.set_target_glide(true);
        self.state.target.top = self.config.target_min_top;

        self.push_hud();
        self.stage.show_screen(Screen::Start);
    }

    // === Input events ===

    /// Fire an arrow from the bow's trailing edge. Silently ignored while
    /// paused, mid-drag, or while the previous shot is unresolved.
    pub fn fire(&mut self) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        if self.state.bow.dragging || self.state.shoot_lock {
            return;
        }
        if self.state.arrow.phase == ArrowPhase::Stuck && !self.config.rearm_after_hit {
            return;
        }

        let area = self.stage.play_area();
        let bow = self.stage.bow_rect();
        let origin = Vec2::new(
            bow.right() - area.left,
            bow.top + bow.height / 2.0 - area.top,
        );

        self.state.shoot_lock = true;
        self.state.arrow = Arrow {
            phase: ArrowPhase::Flying,
            x: origin.x,
            origin,
        };
        self.stage.place_arrow(origin);
        self.arrow_timer.start();
    }

    pub fn drag_start(&mut self) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        self.state.bow.dragging = true;
    }

    /// Track the pointer while dragging. `pointer_y` is relative to the
    /// play-area top. Gated on the running phase; a drag that spans a pause
    /// stops moving the bow and picks back up on resume.
    pub fn drag_move(&mut self, pointer_y: f32) {
        if self.state.phase != GamePhase::Running || !self.state.bow.dragging {
            return;
        }
        let area = self.stage.play_area();
        let bow = self.stage.bow_rect();
        let max_top = (area.height - bow.height).max(self.config.bow_min_top);
        let top = (pointer_y - bow.height / 2.0).clamp(self.config.bow_min_top, max_top);
        self.stage.set_bow_top(top);
    }

    /// Always processed, even paused; releasing the button outside the play
    /// area must still end the gesture.
    pub fn drag_end(&mut self) {
        self.state.bow.dragging = false;
    }

    // === Periodic tasks ===

    /// Feed elapsed wall time to the three periodic tasks. Called once per
    /// animation frame by the driver.
    pub fn advance(&mut self, dt_ms: f64) {
        if self.state.phase == GamePhase::Idle {
            return;
        }
        for _ in 0..self.target_timer.advance(dt_ms) {
            self.move_target();
        }
        for _ in 0..self.countdown_timer.advance(dt_ms) {
            self.tick_countdown();
            if self.state.phase == GamePhase::Idle {
                // countdown expired and tore the round down
                return;
            }
        }
        for _ in 0..self.arrow_timer.advance(dt_ms) {
            self.tick_arrow();
        }
    }

    /// Re-place the target at a fresh uniform position inside its travel band.
    fn move_target(&mut self) {
        let height = self.stage.target_rect().height;
        let min = self.config.target_min_top;
        let max = (self.config.target_max_bottom - height).max(min);
        let top = self.rng.random_range(min..=max).floor();
        self.state.target.top = top;
        self.stage.set_target_top(top);
    }

    fn tick_countdown(&mut self) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        self.stage.set_seconds(self.state.remaining_seconds);
        if self.state.remaining_seconds == 0 {
            log::info!(
                "Round over: {} hits, {} misses, score {}",
                self.state.hits,
                self.state.misses,
                self.state.score
            );
            self.end();
        }
    }

    fn tick_arrow(&mut self) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        if !self.state.arrow.is_flying() {
            return;
        }

        self.state.arrow.x += self.config.arrow_step;
        self.stage.set_arrow_x(self.state.arrow.x);

        let arrow = self.stage.arrow_rect();
        let target = self.stage.target_rect();

        if arrow.overlaps(&target) {
            self.arrow_timer.stop();

            // pin at the offset measured right now, so the arrow rides along
            // with whatever the target does next
            let offset = arrow.origin() - target.origin();
            self.stage.pin_arrow(offset);
            self.state.arrow.phase = ArrowPhase::Stuck;

            self.state.hits += 1;
            self.state.score += self.config.points_per_hit;
            self.stage.set_hits(self.state.hits);
            self.stage.set_score(self.state.score);
            self.state.shoot_lock = false;

            log::info!("Hit! score {}", self.state.score);
            return;
        }

        // miss once the whole shaft has cleared the right edge
        if arrow.left > self.stage.play_area().right() {
            self.arrow_timer.stop();

            self.state.misses += 1;
            self.stage.set_misses(self.state.misses);
            self.stage.clear_arrow();
            self.state.arrow = Arrow::default();
            self.state.shoot_lock = false;

            log::info!("Miss ({} total)", self.state.misses);
        }
    }

    fn push_hud(&mut self) {
        self.stage.set_score(self.state.score);
        self.stage.set_hits(self.state.hits);
        self.stage.set_misses(self.state.misses);
        self.stage.set_seconds(self.state.remaining_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessStage;

    const SEED: u64 = 12345;

    fn new_game() -> Game<HeadlessStage> {
        Game::new(HeadlessStage::new(), Config::default(), SEED)
    }

    /// Drive the arrow timer until the current flight resolves (or give up)
    fn fly_until_resolved(game: &mut Game<HeadlessStage>) {
        for _ in 0..200 {
            game.advance(f64::from(game.config().arrow_tick_ms));
            if !game.state().arrow.is_flying() {
                return;
            }
        }
        panic!("arrow never resolved");
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut game = new_game();
        assert_eq!(game.state().phase, GamePhase::Idle);

        game.start();
        assert_eq!(game.state().phase, GamePhase::Running);
        assert!(game.target_timer.is_running());
        assert!(game.countdown_timer.is_running());
        assert_eq!(game.stage().screen, Screen::Game);

        // start mid-round is a no-op
        game.advance(2000.0);
        let remaining = game.state().remaining_seconds;
        game.start();
        assert_eq!(game.state().remaining_seconds, remaining);
    }

    #[test]
    fn test_hit_scenario() {
        let mut game = new_game();
        game.start();
        // park the target where the bow points
        let aim = game.stage().bow_center_y() - 60.0;
        game.stage_mut().target_top = aim;

        game.fire();
        assert!(game.state().arrow.is_flying());
        assert!(game.state().shoot_lock);

        fly_until_resolved(&mut game);

        assert_eq!(game.state().arrow.phase, ArrowPhase::Stuck);
        assert_eq!(game.state().hits, 1);
        assert_eq!(game.state().score, 10);
        assert_eq!(game.state().misses, 0);
        assert!(!game.state().shoot_lock);
        // HUD saw every mutation
        assert_eq!(game.stage().score, 10);
        assert_eq!(game.stage().hits, 1);
        // arrow rides with the target
        assert!(game.stage().arrow_pinned());
    }

    #[test]
    fn test_miss_scenario() {
        let mut game = new_game();
        game.start();
        // aim below the target's travel band
        game.stage_mut().bow_top = 0.0;

        game.fire();
        fly_until_resolved(&mut game);

        assert_eq!(game.state().arrow.phase, ArrowPhase::Absent);
        assert_eq!(game.state().misses, 1);
        assert_eq!(game.state().hits, 0);
        assert_eq!(game.state().score, 0);
        assert!(!game.state().shoot_lock);
        assert_eq!(game.stage().misses, 1);
        assert!(!game.stage().arrow_visible());
    }

    #[test]
    fn test_fire_is_gated() {
        let mut game = new_game();
        // idle: nothing happens
        game.fire();
        assert_eq!(game.state().arrow.phase, ArrowPhase::Absent);

        game.start();

        // dragging: nothing happens
        game.drag_start();
        game.fire();
        assert_eq!(game.state().arrow.phase, ArrowPhase::Absent);
        game.drag_end();

        // paused: nothing happens
        game.pause();
        game.fire();
        assert_eq!(game.state().arrow.phase, ArrowPhase::Absent);
        game.resume();

        // in flight: the lock holds
        game.fire();
        let x = game.state().arrow.x;
        game.advance(20.0);
        let advanced = game.state().arrow.x;
        assert!(advanced > x);
        game.fire(); // second shot ignored
        assert_eq!(game.state().arrow.x, advanced);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut game = new_game();
        game.start();
        game.stage_mut().bow_top = 0.0; // guarantee a long flight
        game.fire();
        game.advance(100.0);

        let arrow_x = game.state().arrow.x;
        let remaining = game.state().remaining_seconds;
        let target_top = game.stage().target_top;

        game.pause();
        assert_eq!(game.state().phase, GamePhase::Paused);
        assert!(!game.target_timer.is_running());
        assert!(game.state().shoot_lock);

        // a full simulated second passes; nothing may move
        game.advance(1000.0);
        assert_eq!(game.state().arrow.x, arrow_x);
        assert_eq!(game.state().remaining_seconds, remaining);
        assert_eq!(game.stage().target_top, target_top);

        game.resume();
        assert!(game.target_timer.is_running());
        // arrow was mid-flight, so the lock survives resume
        assert!(game.state().shoot_lock);

        game.advance(20.0);
        assert!(game.state().arrow.x > arrow_x);
    }

    #[test]
    fn test_pause_captures_mid_glide_position() {
        let mut game = new_game();
        game.start();

        // the stage reports a render position partway through a glide
        game.stage_mut().mid_glide_top = Some(333.0);
        game.pause();

        assert_eq!(game.state().target.top, 333.0);
        assert_eq!(game.stage().target_top, 333.0);
        assert!(!game.stage().glide);

        game.stage_mut().mid_glide_top = None;
        game.resume();
        assert!(game.stage().glide);
    }

    #[test]
    fn test_resume_clears_lock_when_no_flight() {
        let mut game = new_game();
        game.start();
        game.pause();
        assert!(game.state().shoot_lock);
        game.resume();
        assert!(!game.state().shoot_lock);
    }

    #[test]
    fn test_pause_resume_invalid_states_are_noops() {
        let mut game = new_game();
        game.resume(); // idle
        assert_eq!(game.state().phase, GamePhase::Idle);
        game.pause(); // idle
        assert_eq!(game.state().phase, GamePhase::Idle);

        game.start();
        game.resume(); // running
        assert_eq!(game.state().phase, GamePhase::Running);
        game.pause();
        game.pause(); // already paused
        assert_eq!(game.state().phase, GamePhase::Paused);
    }

    #[test]
    fn test_countdown_reaches_zero_and_ends_round() {
        let mut game = new_game();
        game.start();
        game.fire();

        game.advance(60_000.0);

        assert_eq!(game.state().phase, GamePhase::Idle);
        assert_eq!(game.state().remaining_seconds, 60);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().hits, 0);
        assert_eq!(game.state().misses, 0);
        assert!(!game.state().shoot_lock);
        assert_eq!(game.state().arrow.phase, ArrowPhase::Absent);
        assert!(!game.target_timer.is_running());
        assert!(!game.countdown_timer.is_running());
        assert!(!game.arrow_timer.is_running());
        assert_eq!(game.stage().screen, Screen::Start);
        assert!(!game.stage().arrow_visible());
        assert_eq!(game.stage().target_top, game.config().target_min_top);
    }

    #[test]
    fn test_countdown_frozen_while_paused() {
        let mut game = new_game();
        game.start();
        game.advance(3000.0);
        assert_eq!(game.state().remaining_seconds, 57);

        game.pause();
        game.advance(5000.0);
        assert_eq!(game.state().remaining_seconds, 57);

        game.resume();
        game.advance(1000.0);
        assert_eq!(game.state().remaining_seconds, 56);
    }

    #[test]
    fn test_restart_matches_natural_expiry() {
        let mut expiry = new_game();
        expiry.start();
        expiry.fire();
        expiry.advance(60_000.0);

        let mut restarted = new_game();
        restarted.start();
        restarted.fire();
        restarted.advance(500.0);
        restarted.restart();

        let a = expiry.state();
        let b = restarted.state();
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.hits, b.hits);
        assert_eq!(a.misses, b.misses);
        assert_eq!(a.remaining_seconds, b.remaining_seconds);
        assert_eq!(a.shoot_lock, b.shoot_lock);
        assert_eq!(a.arrow.phase, b.arrow.phase);
        assert_eq!(expiry.stage().screen, restarted.stage().screen);

        // restart from the start screen is a no-op
        restarted.restart();
        assert_eq!(restarted.state().phase, GamePhase::Idle);
    }

    #[test]
    fn test_refire_after_hit_reclaims_slot() {
        let mut game = new_game();
        game.start();
        let aim = game.stage().bow_center_y() - 60.0;
        game.stage_mut().target_top = aim;
        game.fire();
        fly_until_resolved(&mut game);
        assert_eq!(game.state().arrow.phase, ArrowPhase::Stuck);

        // default config allows another shot; the stuck arrow is reclaimed
        game.fire();
        assert!(game.state().arrow.is_flying());
        assert!(!game.stage().arrow_pinned());
    }

    #[test]
    fn test_single_shot_after_hit_when_rearm_disabled() {
        let config = Config {
            rearm_after_hit: false,
            ..Default::default()
        };
        let mut game = Game::new(HeadlessStage::new(), config, SEED);
        game.start();
        let aim = game.stage().bow_center_y() - 60.0;
        game.stage_mut().target_top = aim;
        game.fire();
        fly_until_resolved(&mut game);
        assert_eq!(game.state().arrow.phase, ArrowPhase::Stuck);

        game.fire();
        assert_eq!(game.state().arrow.phase, ArrowPhase::Stuck);
    }

    #[test]
    fn test_drag_clamps_and_gates() {
        let mut game = new_game();
        game.start();

        game.drag_start();
        game.drag_move(0.0);
        assert_eq!(game.stage().bow_top, game.config().bow_min_top);

        game.drag_move(10_000.0);
        let area = game.stage().play_area();
        let bow = game.stage().bow_rect();
        assert_eq!(game.stage().bow_top, area.height - bow.height);

        // paused drags stop producing updates but the gesture survives
        game.drag_move(400.0);
        let mid = game.stage().bow_top;
        game.pause();
        game.drag_move(200.0);
        assert_eq!(game.stage().bow_top, mid);
        game.resume();
        game.drag_move(200.0);
        assert!(game.stage().bow_top < mid);
        assert!(game.state().bow.dragging);

        // drag end lands even when paused
        game.pause();
        game.drag_end();
        assert!(!game.state().bow.dragging);
    }

    #[test]
    fn test_target_stays_inside_travel_band() {
        let mut game = new_game();
        game.start();
        let min = game.config().target_min_top;
        let max = game.config().target_max_bottom - game.stage().target_rect().height;
        for _ in 0..100 {
            game.advance(1000.0);
            if game.state().phase == GamePhase::Idle {
                break;
            }
            let top = game.state().target.top;
            assert!(top >= min && top <= max, "target top {top} out of band");
        }
    }
}
