//! Stage implementations
//!
//! Two stages back the [`crate::stage::Stage`] seam:
//! - [`HeadlessStage`]: pure-Rust geometry, used by the native binary and the
//!   test suite
//! - [`DomStage`] (wasm only): absolute-positioned DOM elements, looked up
//!   once at startup and failing fast when the document is incomplete

use glam::Vec2;

use crate::stage::{Rect, Screen, Stage};

/// A stage backed by plain numbers instead of a document.
///
/// Geometry mirrors the browser layout: a fixed play area with the bow on
/// the left edge and the target near the right edge. Positions jump
/// instantly; `mid_glide_top` lets a driver simulate the rendered position
/// of a glide in progress.
#[derive(Debug, Clone)]
pub struct HeadlessStage {
    pub area: Rect,
    pub target_left: f32,
    pub target_size: Vec2,
    pub bow_left: f32,
    pub bow_size: Vec2,
    pub arrow_size: Vec2,

    pub target_top: f32,
    pub bow_top: f32,
    pub glide: bool,
    /// Simulated on-screen target top partway through a glide; when set,
    /// `rendered_target_top` reports this instead of the last discrete top
    pub mid_glide_top: Option<f32>,

    arrow_pos: Option<Vec2>,
    pin_offset: Option<Vec2>,

    pub score: u32,
    pub hits: u32,
    pub misses: u32,
    pub seconds: u32,
    pub screen: Screen,
}

impl HeadlessStage {
    pub fn new() -> Self {
        Self {
            area: Rect::new(0.0, 0.0, 1000.0, 860.0),
            target_left: 900.0,
            target_size: Vec2::new(40.0, 120.0),
            bow_left: 20.0,
            bow_size: Vec2::new(60.0, 80.0),
            arrow_size: Vec2::new(60.0, 12.0),
            target_top: 100.0,
            bow_top: 100.0,
            glide: true,
            mid_glide_top: None,
            arrow_pos: None,
            pin_offset: None,
            score: 0,
            hits: 0,
            misses: 0,
            seconds: 0,
            screen: Screen::Start,
        }
    }

    /// Vertical center of the bow (play-area coordinates)
    pub fn bow_center_y(&self) -> f32 {
        self.bow_top + self.bow_size.y / 2.0
    }

    pub fn arrow_visible(&self) -> bool {
        self.arrow_pos.is_some() || self.pin_offset.is_some()
    }

    pub fn arrow_pinned(&self) -> bool {
        self.pin_offset.is_some()
    }
}

impl Default for HeadlessStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for HeadlessStage {
    fn play_area(&self) -> Rect {
        self.area
    }

    fn target_rect(&self) -> Rect {
        Rect::new(
            self.area.left + self.target_left,
            self.area.top + self.target_top,
            self.target_size.x,
            self.target_size.y,
        )
    }

    fn bow_rect(&self) -> Rect {
        Rect::new(
            self.area.left + self.bow_left,
            self.area.top + self.bow_top,
            self.bow_size.x,
            self.bow_size.y,
        )
    }

    fn arrow_rect(&self) -> Rect {
        if let Some(offset) = self.pin_offset {
            let target = self.target_rect();
            return Rect::new(
                target.left + offset.x,
                target.top + offset.y,
                self.arrow_size.x,
                self.arrow_size.y,
            );
        }
        match self.arrow_pos {
            Some(pos) => Rect::new(
                self.area.left + pos.x,
                self.area.top + pos.y,
                self.arrow_size.x,
                self.arrow_size.y,
            ),
            // parked far off-field so stray queries never collide
            None => Rect::new(-10_000.0, -10_000.0, 0.0, 0.0),
        }
    }

    fn rendered_target_top(&self) -> f32 {
        self.mid_glide_top.unwrap_or(self.target_top)
    }

    fn set_target_top(&mut self, top: f32) {
        self.target_top = top;
    }

    fn set_target_glide(&mut self, enabled: bool) {
        self.glide = enabled;
    }

    fn set_bow_top(&mut self, top: f32) {
        self.bow_top = top;
    }

    fn place_arrow(&mut self, origin: Vec2) {
        self.pin_offset = None;
        self.arrow_pos = Some(Vec2::new(origin.x, origin.y - self.arrow_size.y / 2.0));
    }

    fn set_arrow_x(&mut self, x: f32) {
        if let Some(pos) = self.arrow_pos.as_mut() {
            pos.x = x;
        }
    }

    fn pin_arrow(&mut self, offset: Vec2) {
        self.arrow_pos = None;
        self.pin_offset = Some(offset);
    }

    fn clear_arrow(&mut self) {
        self.arrow_pos = None;
        self.pin_offset = None;
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn set_hits(&mut self, hits: u32) {
        self.hits = hits;
    }

    fn set_misses(&mut self, misses: u32) {
        self.misses = misses;
    }

    fn set_seconds(&mut self, seconds: u32) {
        self.seconds = seconds;
    }

    fn show_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomStage;

#[cfg(target_arch = "wasm32")]
mod dom {
    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, HtmlElement};

    use crate::stage::{Rect, Screen, Stage, StageError};

    /// The browser stage: absolute-positioned elements inside `#game-area`,
    /// HUD spans, and the two screen containers.
    pub struct DomStage {
        area: HtmlElement,
        target: HtmlElement,
        bow: HtmlElement,
        arrow: HtmlElement,
        score_el: Element,
        hits_el: Element,
        misses_el: Element,
        timer_el: Element,
        start_screen: HtmlElement,
        game_screen: HtmlElement,
    }

    fn require(document: &Document, id: &'static str) -> Result<HtmlElement, StageError> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or(StageError::MissingElement(id))
    }

    fn require_el(document: &Document, id: &'static str) -> Result<Element, StageError> {
        document
            .get_element_by_id(id)
            .ok_or(StageError::MissingElement(id))
    }

    fn bounding_rect(el: &Element) -> Rect {
        let r = el.get_bounding_client_rect();
        Rect::new(
            r.left() as f32,
            r.top() as f32,
            r.width() as f32,
            r.height() as f32,
        )
    }

    fn set_px(el: &HtmlElement, prop: &str, value: f32) {
        let _ = el.style().set_property(prop, &format!("{value}px"));
    }

    impl DomStage {
        /// Look up every element the game needs. The core cannot run against
        /// a partial document, so a missing element is a hard error.
        pub fn new(document: &Document) -> Result<Self, StageError> {
            let stage = Self {
                area: require(document, "game-area")?,
                target: require(document, "target")?,
                bow: require(document, "bow")?,
                arrow: require(document, "arrow")?,
                score_el: require_el(document, "score")?,
                hits_el: require_el(document, "hits")?,
                misses_el: require_el(document, "misses")?,
                timer_el: require_el(document, "timer")?,
                start_screen: require(document, "start-screen")?,
                game_screen: require(document, "game-screen")?,
            };
            // the arrow element is a hidden template until the first shot
            let _ = stage.arrow.style().set_property("display", "none");
            Ok(stage)
        }
    }

    impl Stage for DomStage {
        fn play_area(&self) -> Rect {
            bounding_rect(&self.area)
        }

        fn target_rect(&self) -> Rect {
            bounding_rect(&self.target)
        }

        fn bow_rect(&self) -> Rect {
            bounding_rect(&self.bow)
        }

        fn arrow_rect(&self) -> Rect {
            bounding_rect(&self.arrow)
        }

        fn rendered_target_top(&self) -> f32 {
            // computed style reports the animated position mid-glide
            web_sys::window()
                .and_then(|w| w.get_computed_style(&self.target).ok())
                .flatten()
                .and_then(|style| style.get_property_value("top").ok())
                .and_then(|top| top.strip_suffix("px").and_then(|v| v.parse().ok()))
                .unwrap_or_else(|| self.target_rect().top - self.play_area().top)
        }

        fn set_target_top(&mut self, top: f32) {
            set_px(&self.target, "top", top);
        }

        fn set_target_glide(&mut self, enabled: bool) {
            let style = self.target.style();
            if enabled {
                // force a reflow so a jump made while glide was off lands
                // before the transition comes back
                let _ = self.target.offset_height();
                let _ = style.set_property("transition", "top 1s linear");
            } else {
                let _ = style.set_property("transition", "none");
            }
        }

        fn set_bow_top(&mut self, top: f32) {
            set_px(&self.bow, "top", top);
        }

        fn place_arrow(&mut self, origin: Vec2) {
            // reclaim the single slot, wherever the last shot left it
            let _ = self.area.append_child(&self.arrow);
            let style = self.arrow.style();
            let _ = style.set_property("display", "block");
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("transform", "none");
            let _ = style.set_property("right", "auto");
            let _ = style.set_property("bottom", "auto");
            let height = self.arrow.offset_height() as f32;
            set_px(&self.arrow, "left", origin.x);
            set_px(&self.arrow, "top", origin.y - height / 2.0);
        }

        fn set_arrow_x(&mut self, x: f32) {
            set_px(&self.arrow, "left", x);
        }

        fn pin_arrow(&mut self, offset: Vec2) {
            let _ = self.target.append_child(&self.arrow);
            set_px(&self.arrow, "left", offset.x);
            set_px(&self.arrow, "top", offset.y);
        }

        fn clear_arrow(&mut self) {
            let _ = self.arrow.style().set_property("display", "none");
            let _ = self.area.append_child(&self.arrow);
        }

        fn set_score(&mut self, score: u32) {
            self.score_el.set_text_content(Some(&score.to_string()));
        }

        fn set_hits(&mut self, hits: u32) {
            self.hits_el.set_text_content(Some(&hits.to_string()));
        }

        fn set_misses(&mut self, misses: u32) {
            self.misses_el.set_text_content(Some(&misses.to_string()));
        }

        fn set_seconds(&mut self, seconds: u32) {
            self.timer_el.set_text_content(Some(&seconds.to_string()));
        }

        fn show_screen(&mut self, screen: Screen) {
            match screen {
                Screen::Start => {
                    let _ = self.start_screen.style().set_property("display", "flex");
                    let _ = self.game_screen.style().set_property("display", "none");
                }
                Screen::Game => {
                    let _ = self.start_screen.style().set_property("display", "none");
                    let _ = self.game_screen.style().set_property("display", "block");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_geometry_is_consistent() {
        let stage = HeadlessStage::new();
        let area = stage.play_area();
        let target = stage.target_rect();
        let bow = stage.bow_rect();
        assert!(target.left > bow.right());
        assert!(target.right() <= area.right());
    }

    #[test]
    fn test_arrow_slot_lifecycle() {
        let mut stage = HeadlessStage::new();
        assert!(!stage.arrow_visible());

        stage.place_arrow(Vec2::new(80.0, 140.0));
        assert!(stage.arrow_visible());
        // vertically centered on the origin
        let rect = stage.arrow_rect();
        assert_eq!(rect.top, 140.0 - stage.arrow_size.y / 2.0);

        stage.set_arrow_x(200.0);
        assert_eq!(stage.arrow_rect().left, 200.0);

        stage.pin_arrow(Vec2::new(-30.0, 12.0));
        assert!(stage.arrow_pinned());
        // pinned arrow follows the target
        let before = stage.arrow_rect();
        stage.set_target_top(stage.target_top + 50.0);
        let after = stage.arrow_rect();
        assert_eq!(after.top, before.top + 50.0);
        assert_eq!(after.left, before.left);

        stage.clear_arrow();
        assert!(!stage.arrow_visible());
    }

    #[test]
    fn test_rendered_top_prefers_mid_glide() {
        let mut stage = HeadlessStage::new();
        stage.set_target_top(500.0);
        assert_eq!(stage.rendered_target_top(), 500.0);
        stage.mid_glide_top = Some(321.0);
        assert_eq!(stage.rendered_target_top(), 321.0);
    }
}
