//! Full-surface layer that owns touch input while a widget is expanded.

use crate::geometry::{AngleCalculator, Point, Rect, Vector};
use crate::input::{PointerEvent, PointerKind};

/// What the widget should do in response to an overlay touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// Finger went down on button `index`.
    Pressed(usize),
    Entered(usize),
    Exited(usize),
    /// Finger lifted over the button it went down on.
    Selected(usize),
    /// Finger lifted away from the button it went down on.
    Released(usize),
    /// Finger went down and up on empty space.
    Dismissed,
}

#[derive(Debug, Clone, Copy)]
struct Touch {
    tracked: Option<(usize, Rect)>,
    inside: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CaptureOverlay {
    bounds: Rect,
    sub_rect: Rect,
    offsets: Vec<Vector>,
    translations: Vec<Vector>,
    touch: Option<Touch>,
}

impl CaptureOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays the buttons out in root coordinates around `bounds`.
    ///
    /// `rects` is the widget's per-button rect vector and gets rewritten.
    pub fn attach(
        &mut self,
        bounds: Rect,
        side_margin: f64,
        sub_size: f64,
        calc: &AngleCalculator,
        radius: f64,
        rects: &mut [Rect],
    ) {
        self.bounds = bounds;
        self.sub_rect = Rect::square_around(bounds.center(), sub_size);
        self.offsets.clear();
        self.offsets.push(Vector::ZERO);
        for i in 1..rects.len() {
            self.offsets.push(calc.offset(radius, i).flip_y());
        }
        self.translations = vec![Vector::ZERO; rects.len()];
        self.touch = None;

        for (i, rect) in rects.iter_mut().enumerate() {
            *rect = if i == 0 {
                bounds.inset(side_margin)
            } else {
                self.sub_rect
            };
        }
        log::debug!("overlay laid out {} buttons around {bounds:?}", rects.len());
    }

    /// Forgets the cached layout.
    pub fn detach(&mut self) {
        self.offsets.clear();
        self.translations.clear();
        self.touch = None;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn sub_rect(&self) -> Rect {
        self.sub_rect
    }

    pub fn translation(&self, index: usize) -> Vector {
        self.translations.get(index).copied().unwrap_or_default()
    }

    pub fn move_offset(&self, index: usize) -> Vector {
        self.offsets.get(index).copied().unwrap_or_default()
    }

    /// Moves every sub-button to `progress` of its way out.
    pub fn set_progress(&mut self, progress: f64) {
        for (translation, offset) in self.translations.iter_mut().zip(&self.offsets).skip(1) {
            *translation = *offset * progress;
        }
    }

    fn hit_rect(&self, index: usize, rects: &[Rect]) -> Rect {
        if index == 0 {
            rects[0]
        } else {
            rects[index].offset(self.translation(index))
        }
    }

    /// First button whose current rect contains `p`.
    pub fn hit_test(&self, p: Point, rects: &[Rect]) -> Option<usize> {
        (0..rects.len()).find(|&i| self.hit_rect(i, rects).contains(p))
    }

    /// Routes a touch. Presses are taken only when `accept_down` holds;
    /// the rest of a rejected sequence is ignored.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        rects: &[Rect],
        accept_down: bool,
    ) -> Option<OverlayAction> {
        match event.kind {
            PointerKind::Down => {
                if !accept_down {
                    self.touch = None;
                    return None;
                }
                let tracked = self
                    .hit_test(event.position, rects)
                    .map(|i| (i, self.hit_rect(i, rects)));
                self.touch = Some(Touch {
                    tracked,
                    inside: tracked.is_some(),
                });
                tracked.map(|(i, _)| OverlayAction::Pressed(i))
            }
            PointerKind::Move => {
                let touch = self.touch.as_mut()?;
                let (index, rect) = touch.tracked?;
                let inside = rect.contains(event.position);
                if inside == touch.inside {
                    return None;
                }
                touch.inside = inside;
                Some(if inside {
                    OverlayAction::Entered(index)
                } else {
                    OverlayAction::Exited(index)
                })
            }
            PointerKind::Up => {
                let touch = self.touch.take()?;
                match touch.tracked {
                    None => Some(OverlayAction::Dismissed),
                    Some((index, rect)) if rect.contains(event.position) => {
                        Some(OverlayAction::Selected(index))
                    }
                    Some((index, _)) => Some(OverlayAction::Released(index)),
                }
            }
            PointerKind::Cancel => {
                let touch = self.touch.take()?;
                touch.tracked.map(|(i, _)| OverlayAction::Released(i))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const T: Duration = Duration::ZERO;

    /// Three buttons on a 0..180 degree arc, 76x76 widget at (100, 100).
    fn laid_out() -> (CaptureOverlay, Vec<Rect>) {
        let mut overlay = CaptureOverlay::new();
        let mut rects = vec![Rect::default(); 3];
        let calc = AngleCalculator::new(0.0, 180.0, 2);
        let bounds = Rect::new(100.0, 100.0, 176.0, 176.0);
        overlay.attach(bounds, 8.0, 60.0, &calc, 85.0, &mut rects);
        (overlay, rects)
    }

    #[test]
    fn attach_rewrites_rects() {
        let (overlay, rects) = laid_out();
        assert_eq!(rects[0], Rect::new(108.0, 108.0, 168.0, 168.0));
        assert_eq!(rects[1], Rect::new(108.0, 108.0, 168.0, 168.0));
        assert_eq!(rects[2], overlay.sub_rect());
        assert_eq!(overlay.translation(1), Vector::ZERO);
    }

    #[test]
    fn translations_follow_progress() {
        let (mut overlay, _) = laid_out();
        overlay.set_progress(1.0);
        let first = overlay.translation(1);
        assert!((first.dx - 85.0).abs() < 1e-9 && first.dy.abs() < 1e-9);
        let second = overlay.translation(2);
        assert!((second.dx + 85.0).abs() < 1e-9);

        overlay.set_progress(0.0);
        assert_eq!(overlay.translation(1), Vector::ZERO);
        assert_eq!(overlay.translation(0), Vector::ZERO);
    }

    #[test]
    fn hit_test_prefers_lowest_index_and_uses_translation() {
        let (mut overlay, rects) = laid_out();
        let center = Point::new(138.0, 138.0);
        assert_eq!(overlay.hit_test(center, &rects), Some(0));

        overlay.set_progress(1.0);
        assert_eq!(overlay.hit_test(Point::new(223.0, 138.0), &rects), Some(1));
        assert_eq!(overlay.hit_test(Point::new(53.0, 138.0), &rects), Some(2));
        // right edge of sub-button 1, inclusive
        assert_eq!(overlay.hit_test(Point::new(253.0, 138.0), &rects), Some(1));
        assert_eq!(overlay.hit_test(Point::new(138.0, 300.0), &rects), None);
    }

    #[test]
    fn press_and_release_on_button_selects_it() {
        let (mut overlay, rects) = laid_out();
        overlay.set_progress(1.0);
        assert_eq!(
            overlay.handle(&PointerEvent::down(53.0, 138.0, T), &rects, true),
            Some(OverlayAction::Pressed(2))
        );
        assert_eq!(
            overlay.handle(&PointerEvent::moved(300.0, 300.0, T), &rects, true),
            Some(OverlayAction::Exited(2))
        );
        assert_eq!(
            overlay.handle(&PointerEvent::moved(55.0, 140.0, T), &rects, true),
            Some(OverlayAction::Entered(2))
        );
        assert_eq!(
            overlay.handle(&PointerEvent::up(55.0, 140.0, T), &rects, true),
            Some(OverlayAction::Selected(2))
        );
    }

    #[test]
    fn release_elsewhere_does_nothing_but_release() {
        let (mut overlay, rects) = laid_out();
        overlay.handle(&PointerEvent::down(138.0, 138.0, T), &rects, true);
        assert_eq!(
            overlay.handle(&PointerEvent::up(400.0, 400.0, T), &rects, true),
            Some(OverlayAction::Released(0))
        );
    }

    #[test]
    fn tap_on_empty_space_dismisses() {
        let (mut overlay, rects) = laid_out();
        assert_eq!(
            overlay.handle(&PointerEvent::down(10.0, 10.0, T), &rects, true),
            None
        );
        assert_eq!(
            overlay.handle(&PointerEvent::up(10.0, 10.0, T), &rects, true),
            Some(OverlayAction::Dismissed)
        );
    }

    #[test]
    fn rejected_press_swallows_the_sequence() {
        let (mut overlay, rects) = laid_out();
        assert_eq!(
            overlay.handle(&PointerEvent::down(138.0, 138.0, T), &rects, false),
            None
        );
        assert_eq!(
            overlay.handle(&PointerEvent::up(138.0, 138.0, T), &rects, true),
            None
        );
    }
}
