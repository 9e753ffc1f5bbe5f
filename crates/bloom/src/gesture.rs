//! Tells clicks, long presses and drags apart on a single touch stream.

use crate::events::MoveEvent;
use crate::geometry::{Point, Vector};
use crate::input::{PointerEvent, PointerKind};
use std::time::Duration;

/// Movement up to this far from the press, on both axes, is finger jitter.
pub const MOVE_THRESHOLD: f64 = 5.0;
pub const LONG_PRESS_DELAY: Duration = Duration::from_millis(500);

/// Identifies one scheduled long-press callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, PartialEq)]
struct GestureSession {
    start_point: Point,
    current_offset: Vector,
    moved_past_threshold: bool,
    long_press_fired: bool,
    pending_timer: Option<TimerToken>,
}

impl GestureSession {
    fn new(start_point: Point) -> Self {
        Self {
            start_point,
            current_offset: Vector::ZERO,
            moved_past_threshold: false,
            long_press_fired: false,
            pending_timer: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutput {
    Move(MoveEvent),
    ScheduleLongPress { token: TimerToken, delay: Duration },
}

#[derive(Debug, Clone)]
pub struct GestureClassifier {
    threshold: f64,
    long_press_delay: Duration,
    session: Option<GestureSession>,
    next_token: u64,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(MOVE_THRESHOLD, LONG_PRESS_DELAY)
    }
}

impl GestureClassifier {
    pub fn new(threshold: f64, long_press_delay: Duration) -> Self {
        Self {
            threshold,
            long_press_delay,
            session: None,
            next_token: 0,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.moved_past_threshold)
    }

    /// Offset of the latest sample from the press, while a press is held.
    pub fn current_offset(&self) -> Option<Vector> {
        self.session.as_ref().map(|s| s.current_offset)
    }

    /// Drops any touch sequence in progress; a pending timer becomes stale.
    pub fn reset(&mut self) {
        self.session = None;
    }

    fn exceeds_threshold(&self, offset: Vector) -> bool {
        offset.dx.abs() > self.threshold || offset.dy.abs() > self.threshold
    }

    fn issue_token(&mut self) -> TimerToken {
        self.next_token += 1;
        TimerToken(self.next_token)
    }

    /// Click, long-click and drag recognition for movable nodes.
    pub fn movable(&mut self, event: &PointerEvent) -> Option<GestureOutput> {
        match event.kind {
            PointerKind::Down => {
                let token = self.issue_token();
                let mut session = GestureSession::new(event.position);
                session.pending_timer = Some(token);
                self.session = Some(session);
                Some(GestureOutput::ScheduleLongPress {
                    token,
                    delay: self.long_press_delay,
                })
            }
            PointerKind::Move => {
                let offset = event.position - self.session.as_ref()?.start_point;
                let past = self.exceeds_threshold(offset);
                let session = self.session.as_mut()?;
                if !(session.moved_past_threshold || past) {
                    return None;
                }
                session.moved_past_threshold = true;
                session.pending_timer = None;
                session.current_offset = offset;
                Some(GestureOutput::Move(MoveEvent::MovingTo(offset)))
            }
            PointerKind::Up => {
                let session = self.session.take()?;
                if session.long_press_fired {
                    log::debug!("release after long press, nothing more to report");
                    return None;
                }
                if session.moved_past_threshold {
                    let offset = event.position - session.start_point;
                    Some(GestureOutput::Move(MoveEvent::MoveEnded(offset)))
                } else {
                    Some(GestureOutput::Move(MoveEvent::Clicked))
                }
            }
            PointerKind::Cancel => {
                self.reset();
                None
            }
        }
    }

    /// Only plain clicks count; a release too far from the press is dropped.
    pub fn clicks_only(&mut self, event: &PointerEvent) -> Option<MoveEvent> {
        match event.kind {
            PointerKind::Down => {
                self.session = Some(GestureSession::new(event.position));
                None
            }
            PointerKind::Move => {
                let session = self.session.as_mut()?;
                session.current_offset = event.position - session.start_point;
                None
            }
            PointerKind::Up => {
                let session = self.session.take()?;
                let offset = event.position - session.start_point;
                if self.exceeds_threshold(offset) {
                    log::debug!("not a click (moved {offset:?}), ignored");
                    None
                } else {
                    Some(MoveEvent::Clicked)
                }
            }
            PointerKind::Cancel => {
                self.reset();
                None
            }
        }
    }

    /// The long-press timer fired. Stale or superseded tokens do nothing.
    pub fn on_long_press(&mut self, token: TimerToken) -> Option<MoveEvent> {
        let session = self.session.as_mut()?;
        if session.pending_timer != Some(token) || session.moved_past_threshold {
            log::trace!("ignoring stale long-press timer {token:?}");
            return None;
        }
        session.pending_timer = None;
        session.long_press_fired = true;
        Some(MoveEvent::LongClicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn press(g: &mut GestureClassifier, x: f64, y: f64) -> TimerToken {
        match g.movable(&PointerEvent::down(x, y, ms(0))) {
            Some(GestureOutput::ScheduleLongPress { token, delay }) => {
                assert_eq!(delay, LONG_PRESS_DELAY);
                token
            }
            other => panic!("expected a timer request, got {other:?}"),
        }
    }

    #[test]
    fn still_press_is_a_click() {
        let mut g = GestureClassifier::default();
        press(&mut g, 10.0, 10.0);
        assert_eq!(
            g.movable(&PointerEvent::up(10.0, 10.0, ms(100))),
            Some(GestureOutput::Move(MoveEvent::Clicked))
        );
        assert!(!g.is_tracking());
    }

    #[test]
    fn threshold_is_strict() {
        let mut g = GestureClassifier::default();
        press(&mut g, 0.0, 0.0);
        assert_eq!(g.movable(&PointerEvent::moved(5.0, -5.0, ms(10))), None);
        assert!(!g.is_dragging());
        assert_eq!(
            g.movable(&PointerEvent::up(5.0, 5.0, ms(20))),
            Some(GestureOutput::Move(MoveEvent::Clicked))
        );
    }

    #[test]
    fn drag_emits_moving_then_move_ended() {
        let mut g = GestureClassifier::default();
        let token = press(&mut g, 100.0, 100.0);

        assert_eq!(
            g.movable(&PointerEvent::moved(110.0, 100.0, ms(50))),
            Some(GestureOutput::Move(MoveEvent::MovingTo(Vector::new(
                10.0, 0.0
            ))))
        );
        // once dragging, small steps still count
        assert_eq!(
            g.movable(&PointerEvent::moved(111.0, 101.0, ms(60))),
            Some(GestureOutput::Move(MoveEvent::MovingTo(Vector::new(
                11.0, 1.0
            ))))
        );
        // the timer was cancelled by the drag
        assert_eq!(g.on_long_press(token), None);
        assert_eq!(g.current_offset(), Some(Vector::new(11.0, 1.0)));

        assert_eq!(
            g.movable(&PointerEvent::up(112.0, 99.0, ms(70))),
            Some(GestureOutput::Move(MoveEvent::MoveEnded(Vector::new(
                12.0, -1.0
            ))))
        );
    }

    #[test]
    fn long_press_suppresses_click() {
        let mut g = GestureClassifier::default();
        let token = press(&mut g, 0.0, 0.0);
        assert_eq!(g.on_long_press(token), Some(MoveEvent::LongClicked));
        assert_eq!(g.on_long_press(token), None);
        assert_eq!(g.movable(&PointerEvent::up(0.0, 0.0, ms(700))), None);
    }

    #[test]
    fn timer_from_earlier_press_is_stale() {
        let mut g = GestureClassifier::default();
        let first = press(&mut g, 0.0, 0.0);
        g.movable(&PointerEvent::up(0.0, 0.0, ms(100)));
        assert_eq!(g.on_long_press(first), None);

        let second = press(&mut g, 0.0, 0.0);
        assert_ne!(first, second);
        assert_eq!(g.on_long_press(first), None);
        assert_eq!(g.on_long_press(second), Some(MoveEvent::LongClicked));
    }

    #[test]
    fn cancel_drops_the_session() {
        let mut g = GestureClassifier::default();
        let token = press(&mut g, 0.0, 0.0);
        assert_eq!(g.movable(&PointerEvent::cancel(ms(10))), None);
        assert_eq!(g.on_long_press(token), None);
        assert_eq!(g.movable(&PointerEvent::up(0.0, 0.0, ms(20))), None);
    }

    #[test]
    fn clicks_only_judges_the_release_point() {
        let mut g = GestureClassifier::default();
        g.clicks_only(&PointerEvent::down(0.0, 0.0, ms(0)));
        assert_eq!(
            g.clicks_only(&PointerEvent::up(5.0, 0.0, ms(10))),
            Some(MoveEvent::Clicked)
        );

        // wandering off and coming back still counts
        g.clicks_only(&PointerEvent::down(0.0, 0.0, ms(20)));
        assert_eq!(g.clicks_only(&PointerEvent::moved(30.0, 0.0, ms(30))), None);
        assert_eq!(
            g.clicks_only(&PointerEvent::up(1.0, 1.0, ms(40))),
            Some(MoveEvent::Clicked)
        );

        g.clicks_only(&PointerEvent::down(0.0, 0.0, ms(50)));
        assert_eq!(g.clicks_only(&PointerEvent::up(0.0, 6.0, ms(60))), None);
        assert!(!g.is_tracking());
    }
}
