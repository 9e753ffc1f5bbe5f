use crate::button::surface_error;
use crate::color::{self, Color};
use crate::error::RenderError;
use crate::geometry::{Point, Rect};
use crate::surface::Surface;
use crate::timeline::{Easing, Timeline};
use std::time::Duration;

const RIPPLE_ALPHA: f64 = 128.0 / 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RipplePhase {
    #[default]
    Idle,
    Rippling,
    Rippled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleState {
    pub press_point: Point,
    pub radius: f64,
    pub color: Color,
    pub owner_index: usize,
}

/// Circular reveal spreading from a press point inside one button.
#[derive(Debug, Clone)]
pub struct Ripple {
    phase: RipplePhase,
    state: Option<RippleState>,
    target_radius: f64,
    timeline: Timeline,
    override_color: Option<Color>,
}

impl Ripple {
    pub fn new(duration: Duration, override_color: Option<Color>) -> Self {
        Self {
            phase: RipplePhase::Idle,
            state: None,
            target_radius: 0.0,
            timeline: Timeline::new(duration, Easing::AccelerateDecelerate),
            override_color,
        }
    }

    pub fn phase(&self) -> RipplePhase {
        self.phase
    }

    pub fn state(&self) -> Option<&RippleState> {
        self.state.as_ref()
    }

    /// Radius the spread grows towards, enough to cover the button from the press point.
    pub fn target_radius(&self) -> f64 {
        self.target_radius
    }

    /// Starts a ripple on the button occupying `rect`.
    ///
    /// Returns false and leaves everything untouched when the press lies
    /// outside the button's circle.
    pub fn start(
        &mut self,
        now: Duration,
        owner_index: usize,
        rect: Rect,
        press: Point,
        background: Color,
    ) -> bool {
        let radius = rect.radius();
        let distance = press.distance(rect.center());
        if distance > radius {
            log::trace!("ripple press {press:?} outside button {owner_index}");
            return false;
        }

        self.target_radius = radius + distance;
        self.state = Some(RippleState {
            press_point: press,
            radius: 0.0,
            color: self
                .override_color
                .unwrap_or_else(|| color::ripple_tint(background)),
            owner_index,
        });
        self.phase = RipplePhase::Rippling;

        self.timeline.cancel();
        self.timeline.start(now, 0.0, 1.0);
        true
    }

    /// Advances the spread. Returns true when something visible changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(frame) = self.timeline.advance(now) else {
            return false;
        };
        if let Some(state) = self.state.as_mut() {
            if frame.finished {
                state.radius = 0.0;
                self.phase = RipplePhase::Rippled;
            } else {
                state.radius = self.target_radius * frame.value;
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.timeline.cancel();
        self.state = None;
        self.target_radius = 0.0;
        self.phase = RipplePhase::Idle;
    }

    /// Paints the ripple if it belongs to the button at `index`.
    pub fn draw<S: Surface>(
        &self,
        surface: &mut S,
        index: usize,
        rect: Rect,
    ) -> Result<(), RenderError> {
        let Some(state) = self.state.filter(|s| s.owner_index == index) else {
            return Ok(());
        };

        surface.save().map_err(surface_error)?;
        surface.clip_circle(rect.center(), rect.radius());
        surface
            .fill_circle(
                state.press_point,
                state.radius,
                color::with_alpha(state.color, RIPPLE_ALPHA),
            )
            .map_err(surface_error)?;
        surface.restore().map_err(surface_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn button() -> Rect {
        Rect::new(0.0, 0.0, 60.0, 60.0)
    }

    #[test]
    fn press_on_edge_reaches_far_side() {
        let mut ripple = Ripple::new(ms(200), None);
        assert!(ripple.start(ms(0), 0, button(), Point::new(30.0, 0.0), color::WHITE));
        assert_eq!(ripple.phase(), RipplePhase::Rippling);
        assert_eq!(ripple.target_radius(), 60.0);
    }

    #[test]
    fn press_at_center_uses_button_radius() {
        let mut ripple = Ripple::new(ms(200), None);
        ripple.start(ms(0), 0, button(), Point::new(30.0, 30.0), color::WHITE);
        assert_eq!(ripple.target_radius(), 30.0);
    }

    #[test]
    fn spread_starts_from_nothing() {
        let mut ripple = Ripple::new(ms(200), None);
        ripple.start(ms(0), 0, button(), Point::new(30.0, 0.0), color::WHITE);
        assert_eq!(ripple.state().unwrap().radius, 0.0);

        // first frame on the start instant has not grown yet
        ripple.tick(ms(0));
        assert!(ripple.state().unwrap().radius < 1e-9);
        ripple.tick(ms(100));
        let mid = ripple.state().unwrap().radius;
        assert!(mid > 0.0 && mid < 60.0);
    }

    #[test]
    fn press_outside_circle_is_ignored() {
        let mut ripple = Ripple::new(ms(200), None);
        // inside the square, outside the circle
        assert!(!ripple.start(ms(0), 0, button(), Point::new(1.0, 1.0), color::WHITE));
        assert_eq!(ripple.phase(), RipplePhase::Idle);
        assert!(ripple.state().is_none());
    }

    #[test]
    fn finishes_as_rippled_with_zero_radius() {
        let mut ripple = Ripple::new(ms(100), None);
        ripple.start(ms(0), 0, button(), Point::new(30.0, 30.0), color::WHITE);
        assert!(ripple.tick(ms(50)));
        let mid = ripple.state().unwrap().radius;
        assert!(mid > 0.0 && mid < 30.0);

        ripple.tick(ms(100));
        assert_eq!(ripple.phase(), RipplePhase::Rippled);
        assert_eq!(ripple.state().unwrap().radius, 0.0);
        assert!(!ripple.tick(ms(150)));
    }

    #[test]
    fn override_color_wins() {
        let mut ripple = Ripple::new(ms(100), Some(color::BLACK));
        ripple.start(ms(0), 0, button(), Point::new(30.0, 30.0), color::WHITE);
        assert_eq!(ripple.state().unwrap().color, color::BLACK);
    }

    #[test]
    fn draws_clipped_to_owner_only() {
        let mut ripple = Ripple::new(ms(100), None);
        ripple.start(ms(0), 0, button(), Point::new(30.0, 30.0), color::WHITE);

        let mut surface = RecordingSurface::new();
        ripple.draw(&mut surface, 1, button()).unwrap();
        assert!(surface.ops.is_empty());

        ripple.draw(&mut surface, 0, button()).unwrap();
        assert_eq!(surface.ops.len(), 4);
        assert!(matches!(surface.ops[1], DrawOp::ClipCircle { radius, .. } if radius == 30.0));
    }
}
