//! The expandable radial button.
//!
//! A [`RadialButton`] draws its primary button in its own slot. Pressing it
//! attaches a capture overlay covering the whole root surface, fans the
//! sub-buttons out on an arc and routes every touch through the overlay until
//! the collapse animation has finished.
//!
//! Hosts feed it [`PointerEvent`]s and clock ticks, render the two layers when
//! asked to through [`WidgetEvent::Invalidate`], and drain the remaining
//! events after each call.

use crate::blur::Backdrop;
use crate::button::{ButtonEntity, surface_error};
use crate::color::{self, Color};
use crate::config::WidgetConfig;
use crate::debounce::RepeatGuard;
use crate::error::{ConfigurationError, RenderError};
use crate::events::{Layer, WidgetEvent};
use crate::expansion::{Command, ExpansionController, Phase};
use crate::geometry::{AngleCalculator, Point, Rect, Vector};
use crate::input::{PointerEvent, PointerKind};
use crate::overlay::{CaptureOverlay, OverlayAction};
use crate::ripple::{Ripple, RipplePhase};
use crate::surface::{Surface, TextStyle};
use crate::timeline::Easing;
use std::collections::VecDeque;
use std::time::Duration;

const SHADOW_ALPHA: f64 = 32.0 / 255.0;

#[derive(Debug)]
pub struct RadialButton {
    config: WidgetConfig,
    buttons: Vec<ButtonEntity>,
    rects: Vec<Rect>,
    bounds: Rect,
    calc: AngleCalculator,
    controller: ExpansionController,
    overlay: CaptureOverlay,
    ripple: Ripple,
    guard: RepeatGuard,
    overlay_guard: RepeatGuard,
    pressed: Option<usize>,
    touching: bool,
    last_press: Point,
    events: VecDeque<WidgetEvent>,
}

impl RadialButton {
    pub fn new(config: WidgetConfig, primary: ButtonEntity, subs: Vec<ButtonEntity>) -> Self {
        let size = config.desired_size();
        let mut widget = Self {
            controller: ExpansionController::new(&config),
            ripple: Ripple::new(config.ripple_duration(), config.ripple_color()),
            guard: RepeatGuard::new(config.repeat_threshold()),
            overlay_guard: RepeatGuard::new(config.repeat_threshold()),
            calc: AngleCalculator::new(config.start_angle, config.end_angle, 0),
            config,
            buttons: Vec::new(),
            rects: Vec::new(),
            bounds: Rect::new(0.0, 0.0, size, size),
            overlay: CaptureOverlay::new(),
            pressed: None,
            touching: false,
            last_press: Point::default(),
            events: VecDeque::new(),
        };
        widget.set_buttons(primary, subs);
        widget
    }

    /// Builds from a flat list whose first entry is the primary button.
    pub fn from_buttons(
        config: WidgetConfig,
        buttons: Vec<ButtonEntity>,
    ) -> Result<Self, ConfigurationError> {
        let mut buttons = buttons.into_iter();
        let primary = buttons.next().ok_or(ConfigurationError::EmptyButtonSet)?;
        Ok(Self::new(config, primary, buttons.collect()))
    }

    /// Replaces the whole button set.
    ///
    /// In selection mode the primary is kept as its own entry and a copy of it
    /// becomes the first sub-button, so it can be chosen back.
    pub fn set_buttons(&mut self, primary: ButtonEntity, subs: Vec<ButtonEntity>) {
        let mut buttons = Vec::with_capacity(subs.len() + 2);
        if self.config.selection_mode {
            buttons.push(primary.duplicate());
        }
        buttons.push(primary);
        buttons.extend(subs);
        for (i, button) in buttons.iter_mut().enumerate() {
            button.set_primary(i == 0);
        }

        self.calc = AngleCalculator::new(
            self.config.start_angle,
            self.config.end_angle,
            buttons.len() - 1,
        );
        self.buttons = buttons;
        self.pressed = None;
        self.restore_local_rects();
        if self.controller.overlay_attached() {
            self.layout_overlay();
            self.emit(WidgetEvent::Invalidate(Layer::Overlay));
        }
        self.emit(WidgetEvent::Invalidate(Layer::Widget));
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn buttons(&self) -> &[ButtonEntity] {
        &self.buttons
    }

    pub fn primary(&self) -> &ButtonEntity {
        &self.buttons[0]
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Where the widget sits on the root surface.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.emit(WidgetEvent::Invalidate(Layer::Widget));
    }

    pub fn desired_size(&self) -> f64 {
        self.config.desired_size()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn is_expanded(&self) -> bool {
        self.controller.phase() != Phase::Idle
    }

    pub fn overlay_attached(&self) -> bool {
        self.controller.overlay_attached()
    }

    /// Whether the host should keep ticking.
    pub fn is_animating(&self) -> bool {
        self.controller.is_animating() || self.ripple.phase() == RipplePhase::Rippling
    }

    pub fn progress(&self) -> f64 {
        self.controller.progress()
    }

    /// Current displacement of button `index` on the overlay.
    pub fn translation(&self, index: usize) -> Vector {
        self.overlay.translation(index)
    }

    pub fn pressed(&self) -> Option<usize> {
        self.pressed
    }

    pub fn ripple(&self) -> &Ripple {
        &self.ripple
    }

    pub fn set_expand_easing(&mut self, easing: Easing) {
        self.controller.set_expand_easing(easing);
    }

    pub fn set_collapse_easing(&mut self, easing: Easing) {
        self.controller.set_collapse_easing(easing);
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = WidgetEvent> + '_ {
        self.events.drain(..)
    }

    fn emit(&mut self, event: WidgetEvent) {
        self.events.push_back(event);
    }

    /// Widget-local rects: every button sits inside the side margin.
    fn restore_local_rects(&mut self) {
        let margin = self.config.side_margin();
        self.rects = self
            .buttons
            .iter()
            .map(|b| {
                let size = if b.is_primary() {
                    self.config.main_button_size
                } else {
                    self.config.sub_button_size
                };
                Rect::new(margin, margin, margin + size, margin + size)
            })
            .collect();
    }

    fn layout_overlay(&mut self) {
        self.overlay.attach(
            self.bounds,
            self.config.side_margin(),
            self.config.sub_button_size,
            &self.calc,
            self.config.expansion_radius(),
            &mut self.rects,
        );
        self.overlay.set_progress(self.controller.progress());
    }

    pub fn expand(&mut self, now: Duration) {
        let commands = self.controller.expand(now);
        self.apply(commands, now);
    }

    pub fn collapse(&mut self, now: Duration) {
        let commands = self.controller.collapse(now);
        self.apply(commands, now);
    }

    /// Hands over the filtered snapshot asked for by [`WidgetEvent::BlurRequested`].
    pub fn on_blur_ready(&mut self, backdrop: Backdrop, now: Duration) {
        let commands = self.controller.on_blur_ready(backdrop, now);
        self.apply(commands, now);
    }

    pub fn tick(&mut self, now: Duration) {
        let commands = self.controller.tick(now);
        if self.controller.overlay_attached() {
            self.overlay.set_progress(self.controller.progress());
        }
        if self.ripple.tick(now) && self.controller.overlay_attached() {
            self.emit(WidgetEvent::Invalidate(Layer::Overlay));
        }
        self.apply(commands, now);
    }

    fn apply(&mut self, commands: Vec<Command>, now: Duration) {
        for command in commands {
            match command {
                Command::RequestBlur(request) => self.emit(WidgetEvent::BlurRequested(request)),
                Command::AttachOverlay => {
                    self.layout_overlay();
                    self.emit(WidgetEvent::OverlayAttached);
                    if self.config.ripple {
                        self.ripple.start(
                            now,
                            0,
                            self.rects[0],
                            self.last_press,
                            self.buttons[0].background(),
                        );
                    }
                }
                Command::DetachOverlay => {
                    self.overlay.detach();
                    self.pressed = None;
                    self.restore_local_rects();
                    self.emit(WidgetEvent::OverlayDetached);
                }
                Command::ResetRipple => self.ripple.reset(),
                Command::Notify(event) => self.emit(event),
                Command::Redraw(layer) => self.emit(WidgetEvent::Invalidate(layer)),
            }
        }
    }

    /// Feeds one pointer sample. Returns whether the widget consumed it.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.controller.overlay_attached() {
            self.handle_overlay_pointer(event);
            true
        } else {
            self.handle_widget_pointer(event)
        }
    }

    fn set_pressed(&mut self, pressed: Option<usize>, layer: Layer) {
        if self.pressed != pressed {
            self.pressed = pressed;
            self.emit(WidgetEvent::Invalidate(layer));
        }
    }

    fn handle_widget_pointer(&mut self, event: &PointerEvent) -> bool {
        let inside = self.bounds.contains(event.position);
        match event.kind {
            PointerKind::Down => {
                if !inside || !self.guard.admit(event.time) {
                    return false;
                }
                if self.controller.phase() != Phase::Idle {
                    log::trace!("press ignored while {:?}", self.controller.phase());
                    return false;
                }
                self.touching = true;
                self.last_press = event.position;
                self.set_pressed(Some(0), Layer::Widget);
                true
            }
            PointerKind::Move => {
                if !self.touching {
                    return false;
                }
                self.set_pressed(inside.then_some(0), Layer::Widget);
                true
            }
            PointerKind::Up => {
                if !std::mem::take(&mut self.touching) {
                    return false;
                }
                self.set_pressed(None, Layer::Widget);
                if inside {
                    self.last_press = event.position;
                    self.expand(event.time);
                }
                true
            }
            PointerKind::Cancel => {
                let was_touching = std::mem::take(&mut self.touching);
                self.set_pressed(None, Layer::Widget);
                was_touching
            }
        }
    }

    fn handle_overlay_pointer(&mut self, event: &PointerEvent) {
        let accept_down = event.kind == PointerKind::Down
            && self.overlay_guard.admit(event.time)
            && self.controller.phase() == Phase::Expanded;
        let Some(action) = self.overlay.handle(event, &self.rects, accept_down) else {
            return;
        };
        log::trace!("overlay {action:?}");
        match action {
            OverlayAction::Pressed(i) | OverlayAction::Entered(i) => {
                self.set_pressed(Some(i), Layer::Overlay);
            }
            OverlayAction::Exited(_) | OverlayAction::Released(_) => {
                self.set_pressed(None, Layer::Overlay);
            }
            OverlayAction::Selected(i) => {
                self.set_pressed(None, Layer::Overlay);
                self.select(i, event.time);
            }
            OverlayAction::Dismissed => self.collapse(event.time),
        }
    }

    fn select(&mut self, index: usize, now: Duration) {
        if index > 0 {
            self.emit(WidgetEvent::PopupButtonClicked(index));
            if self.config.selection_mode {
                let (primary, subs) = self.buttons.split_at_mut(1);
                primary[0].adopt_content(&subs[index - 1]);
            }
        }
        self.collapse(now);
    }

    fn text_style(&self, index: usize) -> TextStyle {
        if index == 0 {
            TextStyle {
                size: self.config.main_text_size,
                color: self.config.main_text_color.into(),
            }
        } else {
            TextStyle {
                size: self.config.sub_text_size,
                color: self.config.sub_text_color.into(),
            }
        }
    }

    fn draw_shadow<S: Surface>(
        &self,
        surface: &mut S,
        rect: Rect,
        scale: f64,
    ) -> Result<(), RenderError> {
        let elevation = self.config.elevation;
        if elevation <= 0.0 || scale <= 0.0 {
            return Ok(());
        }
        let radius = rect.radius();
        let center = rect.center() + Vector::new(0.0, elevation / 2.0);
        surface
            .fill_radial_shadow(
                center,
                (radius - elevation).max(0.0) * scale,
                (radius + elevation) * scale,
                color::with_alpha(color::BLACK, SHADOW_ALPHA),
            )
            .map_err(surface_error)
    }

    fn draw_button<S: Surface>(
        &self,
        surface: &mut S,
        index: usize,
        rect: Rect,
    ) -> Result<(), RenderError> {
        let button = &self.buttons[index];
        if self.pressed == Some(index) {
            button.draw_pressed(surface, rect, self.text_style(index), index)
        } else {
            button.draw(surface, rect, self.text_style(index), index)
        }
    }

    /// Paints the collapsed button in widget-local coordinates.
    ///
    /// Nothing is drawn while the overlay or a blurred backdrop stands in
    /// for it.
    pub fn render_widget<S: Surface>(&self, surface: &mut S) -> Result<(), RenderError> {
        if self.controller.overlay_attached()
            || self.controller.blur().is_some_and(|b| b.hides_widget())
        {
            return Ok(());
        }
        let rect = self.rects[0];
        self.draw_shadow(surface, rect, 1.0)?;
        self.draw_button(surface, 0, rect)
    }

    /// Paints the overlay layer over `viewport`, the whole root surface.
    pub fn render_overlay<S: Surface>(
        &self,
        surface: &mut S,
        viewport: Rect,
    ) -> Result<(), RenderError> {
        if !self.controller.overlay_attached() {
            return Ok(());
        }
        if let Some((backdrop, alpha)) = self.controller.blur().and_then(|b| b.backdrop()) {
            surface
                .draw_backdrop(backdrop, alpha)
                .map_err(surface_error)?;
        }
        let mask: Color = self.config.mask_color.into();
        if mask.alpha > 0.0 {
            surface.fill_rect(viewport, mask).map_err(surface_error)?;
        }

        let progress = self.controller.progress();
        let rotation = self.config.rotate_degrees * self.controller.rotate_progress();
        // sub-buttons first so the primary ends up on top
        for index in (0..self.buttons.len()).rev() {
            let rect = self.rects[index];
            let shift = self.overlay.translation(index);

            surface.save().map_err(surface_error)?;
            surface.translate(shift.dx, shift.dy);
            if index == 0 {
                self.draw_shadow(surface, rect, 1.0)?;
                if rotation != 0.0 {
                    surface.rotate_about(rect.center(), rotation);
                }
            } else {
                self.draw_shadow(surface, rect, progress)?;
            }
            self.draw_button(surface, index, rect)?;
            if index == 0 {
                self.ripple.draw(surface, 0, rect)?;
            }
            surface.restore().map_err(surface_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn config() -> WidgetConfig {
        WidgetConfig {
            start_angle: 0.0,
            end_angle: 180.0,
            ..WidgetConfig::default()
        }
    }

    /// Primary plus two sub-buttons, placed at (100, 100).
    fn widget(config: WidgetConfig) -> RadialButton {
        let mut w = RadialButton::from_buttons(
            config,
            vec![
                ButtonEntity::text(["0"]).unwrap(),
                ButtonEntity::icon("take", 0.0),
                ButtonEntity::icon("give", 0.0),
            ],
        )
        .unwrap();
        let size = w.desired_size();
        w.set_bounds(Rect::new(100.0, 100.0, 100.0 + size, 100.0 + size));
        w.drain_events().count();
        w
    }

    fn run_until(w: &mut RadialButton, from: u64, to: u64) {
        let mut t = from;
        while t <= to {
            w.tick(ms(t));
            t += 5;
        }
    }

    fn tap(w: &mut RadialButton, x: f64, y: f64, at: u64) {
        w.handle_pointer(&PointerEvent::down(x, y, ms(at)));
        w.handle_pointer(&PointerEvent::up(x, y, ms(at + 10)));
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = RadialButton::from_buttons(WidgetConfig::default(), Vec::new()).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyButtonSet);
    }

    #[test]
    fn local_rects_sit_inside_margin() {
        let w = widget(config());
        assert_eq!(w.rects().len(), 3);
        assert_eq!(w.rects()[0], Rect::new(8.0, 8.0, 68.0, 68.0));
        assert!(w.buttons()[0].is_primary());
        assert!(!w.buttons()[1].is_primary());
    }

    #[test]
    fn selecting_a_sub_button_reports_and_collapses() {
        let mut w = widget(config());
        tap(&mut w, 138.0, 138.0, 0);
        assert!(w.overlay_attached());
        let events: Vec<_> = w.drain_events().collect();
        let attached = events.iter().position(|e| *e == WidgetEvent::OverlayAttached);
        let expand = events.iter().position(|e| *e == WidgetEvent::Expand);
        assert!(attached.unwrap() < expand.unwrap());

        run_until(&mut w, 15, 300);
        assert_eq!(w.phase(), Phase::Expanded);
        w.drain_events().count();

        // second sub-button sits at 180 degrees, 85 units left of center
        tap(&mut w, 53.0, 138.0, 400);
        run_until(&mut w, 415, 800);

        let events: Vec<_> = w.drain_events().collect();
        let notable: Vec<_> = events
            .iter()
            .copied()
            .filter(|e| !matches!(e, WidgetEvent::Invalidate(_) | WidgetEvent::OverlayDetached))
            .collect();
        assert_eq!(
            notable,
            vec![
                WidgetEvent::PopupButtonClicked(2),
                WidgetEvent::Collapse,
                WidgetEvent::CollapseFinished,
            ]
        );

        let detached = events.iter().position(|e| *e == WidgetEvent::OverlayDetached);
        let finished = events.iter().position(|e| *e == WidgetEvent::CollapseFinished);
        assert!(detached.unwrap() < finished.unwrap());
        assert_eq!(
            events.last(),
            Some(&WidgetEvent::Invalidate(Layer::Widget))
        );
        assert!(!w.overlay_attached());
    }

    #[test]
    fn translations_return_to_rest_after_collapse() {
        let mut w = widget(config());
        tap(&mut w, 138.0, 138.0, 0);
        run_until(&mut w, 15, 300);

        let out = w.translation(1);
        assert!((out.dx - 85.0).abs() < 1e-9 && out.dy.abs() < 1e-9);

        w.collapse(ms(400));
        run_until(&mut w, 405, 800);
        assert_eq!(w.progress(), 0.0);
        for i in 0..3 {
            assert_eq!(w.translation(i), Vector::ZERO);
        }
        assert_eq!(w.rects()[1], Rect::new(8.0, 8.0, 68.0, 68.0));
    }

    #[test]
    fn tap_on_empty_space_collapses_without_selection() {
        let mut w = widget(config());
        tap(&mut w, 138.0, 138.0, 0);
        run_until(&mut w, 15, 300);
        w.drain_events().count();

        tap(&mut w, 500.0, 500.0, 400);
        let events: Vec<_> = w.drain_events().collect();
        assert!(events.contains(&WidgetEvent::Collapse));
        assert!(!events.iter().any(|e| matches!(e, WidgetEvent::PopupButtonClicked(_))));
    }

    #[test]
    fn release_outside_widget_does_not_expand() {
        let mut w = widget(config());
        assert!(w.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(0))));
        assert_eq!(w.pressed(), Some(0));
        w.handle_pointer(&PointerEvent::moved(300.0, 300.0, ms(5)));
        assert_eq!(w.pressed(), None);
        assert!(w.handle_pointer(&PointerEvent::up(300.0, 300.0, ms(10))));
        assert_eq!(w.phase(), Phase::Idle);
        assert!(!w.overlay_attached());
    }

    #[test]
    fn fast_repeat_press_is_rejected() {
        let mut w = widget(config());
        assert!(w.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(0))));
        w.handle_pointer(&PointerEvent::up(300.0, 300.0, ms(10)));

        // inside the 225ms window of the previous press
        assert!(!w.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(100))));
        // the rejected press restarted the window
        assert!(!w.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(300))));
        assert!(w.handle_pointer(&PointerEvent::down(138.0, 138.0, ms(600))));
    }

    #[test]
    fn selection_mode_copies_choice_onto_primary() {
        let mut w = widget(WidgetConfig {
            selection_mode: true,
            ..config()
        });
        assert_eq!(w.buttons().len(), 4);
        assert_eq!(w.buttons()[1].text_lines(), ["0"]);

        tap(&mut w, 138.0, 138.0, 0);
        run_until(&mut w, 15, 300);
        // three subs on 0..180: the last one sits at 180 degrees
        tap(&mut w, 53.0, 138.0, 400);
        assert_eq!(
            w.primary().icon_handle().map(|i| i.as_str()),
            Some("give")
        );
        assert!(w.primary().is_primary());
    }

    #[test]
    fn ripple_starts_from_the_press_on_attach() {
        let mut w = widget(config());
        tap(&mut w, 140.0, 138.0, 0);
        assert_eq!(w.ripple().phase(), RipplePhase::Rippling);
        assert_eq!(w.ripple().state().unwrap().press_point, Point::new(140.0, 138.0));

        run_until(&mut w, 15, 300);
        assert_eq!(w.ripple().phase(), RipplePhase::Rippled);
        w.collapse(ms(400));
        assert_eq!(w.ripple().phase(), RipplePhase::Idle);
    }

    #[test]
    fn blur_defers_attach_and_replays_collapse() {
        let mut w = widget(WidgetConfig {
            blur_background: true,
            ..config()
        });
        tap(&mut w, 138.0, 138.0, 0);
        let events: Vec<_> = w.drain_events().collect();
        assert!(events.iter().any(|e| matches!(e, WidgetEvent::BlurRequested(_))));
        assert!(!w.overlay_attached());

        // widget is hidden while the snapshot is being filtered
        let mut surface = RecordingSurface::new();
        w.render_widget(&mut surface).unwrap();
        assert!(surface.ops.is_empty());

        w.collapse(ms(20));
        assert!(w.drain_events().all(|e| e != WidgetEvent::Collapse));

        w.on_blur_ready(Backdrop::new(1, 1, vec![0; 4]), ms(40));
        let events: Vec<_> = w.drain_events().collect();
        let attached = events.iter().position(|e| *e == WidgetEvent::OverlayAttached);
        let collapse = events.iter().position(|e| *e == WidgetEvent::Collapse);
        assert!(attached.unwrap() < collapse.unwrap());
    }

    #[test]
    fn widget_reappears_after_re_expand_outlasting_the_blur() {
        let mut w = widget(WidgetConfig {
            expand_duration_ms: 200,
            rotate_duration_ms: 600,
            rotate_degrees: 45.0,
            blur_background: true,
            ..config()
        });
        tap(&mut w, 138.0, 138.0, 0);
        w.on_blur_ready(Backdrop::new(1, 1, vec![0; 4]), ms(10));
        run_until(&mut w, 15, 700);
        assert_eq!(w.phase(), Phase::Expanded);

        // the blur is gone by 1250 but the rotation keeps the overlay up
        w.collapse(ms(1000));
        run_until(&mut w, 1005, 1250);
        assert!(w.overlay_attached());
        w.drain_events().count();

        w.expand(ms(1300));
        assert!(w
            .drain_events()
            .all(|e| !matches!(e, WidgetEvent::BlurRequested(_))));
        run_until(&mut w, 1305, 1950);
        w.collapse(ms(2000));
        run_until(&mut w, 2005, 2700);
        assert_eq!(w.phase(), Phase::Idle);
        assert!(!w.overlay_attached());

        let mut surface = RecordingSurface::new();
        w.render_widget(&mut surface).unwrap();
        assert!(!surface.ops.is_empty());
    }

    #[test]
    fn overlay_draws_subs_before_primary() {
        let mut w = widget(WidgetConfig {
            rotate_degrees: 45.0,
            mask_color: color::with_alpha(color::BLACK, 0.5).into(),
            ..config()
        });
        tap(&mut w, 138.0, 138.0, 0);
        run_until(&mut w, 15, 400);

        let mut surface = RecordingSurface::new();
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        w.render_overlay(&mut surface, viewport).unwrap();

        assert!(matches!(surface.ops[0], DrawOp::Rect { rect, .. } if rect == viewport));
        let ellipses = surface.ellipses();
        assert_eq!(ellipses.len(), 3);
        assert_eq!(ellipses[2], w.rects()[0]);
        assert!(surface.ops.iter().any(
            |op| matches!(op, DrawOp::Rotate { degrees, .. } if (*degrees - 45.0).abs() < 1e-9)
        ));
        assert_eq!(surface.texts().len(), 1);
    }
}
