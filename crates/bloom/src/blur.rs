//! Blurred backdrop shown behind an expanded widget.
//!
//! The filter itself is pure and `Send`, so hosts can run it on a worker
//! thread; everything else here lives on the UI thread.

use crate::timeline::{Easing, Timeline};
use image::{RgbaImage, imageops};
use std::time::Duration;

pub const DEFAULT_BLUR_RADIUS: f64 = 10.0;
pub const MAX_BLUR_RADIUS: f64 = 25.0;

const CHANNELS: usize = 4;

/// Substitutes the default for radii outside `(0, 25]`.
pub fn clamp_radius(radius: f64) -> f64 {
    if radius <= 0.0 || radius > MAX_BLUR_RADIUS || radius.is_nan() {
        DEFAULT_BLUR_RADIUS
    } else {
        radius
    }
}

/// A snapshot of the root surface, four bytes per pixel in any channel order.
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Backdrop {
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width * height * CHANNELS);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Gaussian-style blur. Radii outside `(0, 25]` use the default.
    pub fn blurred(self, radius: f64) -> Self {
        if self.width == 0 || self.height == 0 {
            return self;
        }
        let (width, height) = (self.width, self.height);
        let Some(image) = RgbaImage::from_raw(width as u32, height as u32, self.pixels) else {
            log::warn!("backdrop buffer does not match {width}x{height}, dropped");
            return Self::new(0, 0, Vec::new());
        };
        let blurred = imageops::fast_blur(&image, sigma_for_radius(clamp_radius(radius)));
        Self::new(width, height, blurred.into_raw())
    }
}

/// Standard deviation matching a blur radius in pixels.
fn sigma_for_radius(radius: f64) -> f32 {
    (0.4 * radius + 0.6) as f32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurRequest {
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurPhase {
    #[default]
    Hidden,
    /// Waiting for the host to deliver the filtered snapshot.
    Computing,
    FadingIn,
    Shown,
    FadingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurTick {
    Faded,
    /// Fade-out finished and the backdrop is gone; the live widget may show again.
    Removed,
}

/// Owns the blurred backdrop and its cross-fade.
#[derive(Debug)]
pub struct BlurCompositor {
    radius: f64,
    phase: BlurPhase,
    backdrop: Option<Backdrop>,
    fade: Timeline,
}

impl BlurCompositor {
    pub fn new(radius: f64, fade_duration: Duration) -> Self {
        Self {
            radius: clamp_radius(radius),
            phase: BlurPhase::Hidden,
            backdrop: None,
            fade: Timeline::new(fade_duration, Easing::AccelerateDecelerate),
        }
    }

    pub fn phase(&self) -> BlurPhase {
        self.phase
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_computing(&self) -> bool {
        self.phase == BlurPhase::Computing
    }

    /// The live widget stays hidden from the snapshot until the fade-out ends.
    pub fn hides_widget(&self) -> bool {
        self.phase != BlurPhase::Hidden
    }

    pub fn backdrop(&self) -> Option<(&Backdrop, f64)> {
        self.backdrop.as_ref().map(|b| (b, self.fade.value()))
    }

    /// Begins showing the blur. The host must snapshot, filter and call
    /// [`install`](Self::install).
    pub fn show(&mut self, now: Duration) -> Option<BlurRequest> {
        match self.phase {
            BlurPhase::Hidden => {
                self.phase = BlurPhase::Computing;
                Some(BlurRequest {
                    radius: self.radius,
                })
            }
            BlurPhase::FadingOut => {
                // the old backdrop is still on screen, fade it back in
                let from = self.fade.value();
                self.fade.cancel();
                self.fade.start(now, from, 1.0);
                self.phase = BlurPhase::FadingIn;
                None
            }
            _ => None,
        }
    }

    pub fn install(&mut self, backdrop: Backdrop, now: Duration) -> bool {
        if self.phase != BlurPhase::Computing {
            log::debug!("dropping blurred backdrop delivered in {:?}", self.phase);
            return false;
        }
        self.backdrop = Some(backdrop);
        self.phase = BlurPhase::FadingIn;
        self.fade.start(now, 0.0, 1.0);
        true
    }

    pub fn hide(&mut self, now: Duration) {
        match self.phase {
            BlurPhase::FadingIn | BlurPhase::Shown => {
                let from = self.fade.value();
                self.fade.cancel();
                self.fade.start(now, from, 0.0);
                self.phase = BlurPhase::FadingOut;
            }
            BlurPhase::Computing => {
                log::debug!("blur hide requested while computing; ignored");
            }
            _ => {}
        }
    }

    pub fn tick(&mut self, now: Duration) -> Option<BlurTick> {
        let frame = self.fade.advance(now)?;
        if !frame.finished {
            return Some(BlurTick::Faded);
        }
        match self.phase {
            BlurPhase::FadingIn => {
                self.phase = BlurPhase::Shown;
                Some(BlurTick::Faded)
            }
            BlurPhase::FadingOut => {
                self.phase = BlurPhase::Hidden;
                self.backdrop = None;
                Some(BlurTick::Removed)
            }
            _ => Some(BlurTick::Faded),
        }
    }
}
