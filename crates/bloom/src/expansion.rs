//! Expand/collapse state machine.
//!
//! The controller only tracks phases and progress. Everything with a visible
//! side effect comes back as a [`Command`] for the owning widget to carry out,
//! in the order returned.

use crate::blur::{Backdrop, BlurCompositor, BlurPhase, BlurRequest, BlurTick};
use crate::config::WidgetConfig;
use crate::events::{Layer, WidgetEvent};
use crate::timeline::{Easing, Timeline};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Expanding,
    Expanded,
    Collapsing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    RequestBlur(BlurRequest),
    AttachOverlay,
    /// Remove the overlay and put the widget-local rects back.
    DetachOverlay,
    ResetRipple,
    Notify(WidgetEvent),
    Redraw(Layer),
}

#[derive(Debug)]
pub struct ExpansionController {
    phase: Phase,
    expand: Timeline,
    collapse: Timeline,
    rotate: Option<Timeline>,
    progress: f64,
    rotate_progress: f64,
    overlay_attached: bool,
    attach_pending: bool,
    collapse_queued: bool,
    blur: Option<BlurCompositor>,
}

impl ExpansionController {
    pub fn new(config: &WidgetConfig) -> Self {
        let expand_duration = config.expand_duration();
        Self {
            phase: Phase::Idle,
            expand: Timeline::new(expand_duration, Easing::overshoot()),
            collapse: Timeline::new(expand_duration, Easing::anticipate()),
            rotate: config
                .has_rotation()
                .then(|| Timeline::new(config.rotate_duration(), Easing::overshoot())),
            progress: 0.0,
            rotate_progress: 0.0,
            overlay_attached: false,
            attach_pending: false,
            collapse_queued: false,
            blur: config
                .blur_background
                .then(|| BlurCompositor::new(config.blur_radius(), expand_duration)),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Shared expand/collapse progress, 0 when collapsed and 1 when expanded.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn rotate_progress(&self) -> f64 {
        self.rotate_progress
    }

    pub fn overlay_attached(&self) -> bool {
        self.overlay_attached
    }

    pub fn blur(&self) -> Option<&BlurCompositor> {
        self.blur.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.expand.is_running()
            || self.collapse.is_running()
            || self.rotate.as_ref().is_some_and(Timeline::is_running)
            || self
                .blur
                .as_ref()
                .is_some_and(|b| matches!(b.phase(), BlurPhase::FadingIn | BlurPhase::FadingOut))
    }

    pub fn set_expand_easing(&mut self, easing: Easing) {
        self.expand.set_easing(easing);
    }

    pub fn set_collapse_easing(&mut self, easing: Easing) {
        self.collapse.set_easing(easing);
    }

    fn start_rotate(&mut self, now: Duration, expanding: bool) {
        let Some(rotate) = self.rotate.as_mut() else {
            return;
        };
        rotate.cancel();
        if expanding {
            rotate.set_easing(Easing::overshoot());
            rotate.start(now, 0.0, 1.0);
        } else {
            rotate.set_easing(Easing::anticipate());
            rotate.start(now, 1.0, 0.0);
        }
    }

    pub fn expand(&mut self, now: Duration) -> Vec<Command> {
        if matches!(self.phase, Phase::Expanding | Phase::Expanded) {
            log::trace!("expand ignored in {:?}", self.phase);
            return Vec::new();
        }
        let mut out = Vec::new();

        if self.collapse.cancel() {
            log::debug!("collapse interrupted by expand");
        }
        self.collapse_queued = false;
        self.expand.start(now, 0.0, 1.0);
        self.start_rotate(now, true);
        self.phase = Phase::Expanding;

        // A hidden compositor on a still-attached overlay would enter Computing
        // with nobody asked to deliver the backdrop.
        let request = match self.blur.as_mut() {
            Some(blur) if self.overlay_attached && blur.phase() == BlurPhase::Hidden => {
                log::debug!("re-expanding before detach, blur skipped");
                None
            }
            Some(blur) => blur.show(now),
            None => None,
        };
        if !self.overlay_attached && !self.attach_pending {
            match request {
                Some(request) => {
                    self.attach_pending = true;
                    out.push(Command::RequestBlur(request));
                }
                None => {
                    self.overlay_attached = true;
                    out.push(Command::AttachOverlay);
                }
            }
        }
        out.push(Command::Notify(WidgetEvent::Expand));
        out.push(Command::Redraw(Layer::Widget));
        out
    }

    pub fn collapse(&mut self, now: Duration) -> Vec<Command> {
        if matches!(self.phase, Phase::Idle | Phase::Collapsing) {
            log::trace!("collapse ignored in {:?}", self.phase);
            return Vec::new();
        }
        if self.attach_pending {
            log::debug!("collapse queued until the backdrop is ready");
            self.collapse_queued = true;
            return Vec::new();
        }

        self.expand.cancel();
        self.collapse.start(now, 1.0, 0.0);
        self.start_rotate(now, false);
        self.phase = Phase::Collapsing;
        if let Some(blur) = self.blur.as_mut() {
            blur.hide(now);
        }
        vec![
            Command::ResetRipple,
            Command::Notify(WidgetEvent::Collapse),
            Command::Redraw(Layer::Overlay),
        ]
    }

    /// The host finished filtering the snapshot requested by [`Command::RequestBlur`].
    pub fn on_blur_ready(&mut self, backdrop: Backdrop, now: Duration) -> Vec<Command> {
        let Some(blur) = self.blur.as_mut() else {
            log::debug!("backdrop delivered but blur is disabled");
            return Vec::new();
        };
        if !blur.install(backdrop, now) {
            return Vec::new();
        }

        let mut out = Vec::new();
        if self.attach_pending {
            self.attach_pending = false;
            self.overlay_attached = true;
            out.push(Command::AttachOverlay);
        }
        out.push(Command::Redraw(Layer::Overlay));
        if self.collapse_queued {
            self.collapse_queued = false;
            out.extend(self.collapse(now));
        }
        out
    }

    pub fn tick(&mut self, now: Duration) -> Vec<Command> {
        let mut out = Vec::new();
        let mut changed = false;

        if let Some(frame) = self.expand.advance(now) {
            self.progress = frame.value;
            changed = true;
            if frame.finished && self.phase == Phase::Expanding {
                log::debug!("expanded");
                self.phase = Phase::Expanded;
            }
        }
        if let Some(frame) = self.collapse.advance(now) {
            self.progress = frame.value;
            changed = true;
        }
        if let Some(frame) = self.rotate.as_mut().and_then(|r| r.advance(now)) {
            self.rotate_progress = frame.value;
            changed = true;
        }
        match self.blur.as_mut().and_then(|b| b.tick(now)) {
            Some(BlurTick::Faded) => changed = true,
            Some(BlurTick::Removed) => out.push(Command::Redraw(Layer::Widget)),
            None => {}
        }

        let settled =
            !self.collapse.is_running() && !self.rotate.as_ref().is_some_and(Timeline::is_running);
        if self.phase == Phase::Collapsing && settled {
            log::debug!("collapsed");
            self.phase = Phase::Idle;
            self.progress = 0.0;
            self.rotate_progress = 0.0;
            if self.overlay_attached {
                self.overlay_attached = false;
                out.push(Command::DetachOverlay);
            }
            out.push(Command::Notify(WidgetEvent::CollapseFinished));
            out.push(Command::Redraw(Layer::Widget));
        } else if changed && self.overlay_attached {
            out.push(Command::Redraw(Layer::Overlay));
        }
        out
    }
}
