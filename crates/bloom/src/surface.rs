//! Drawing primitives the widgets render through.

use crate::blur::Backdrop;
use crate::button::IconHandle;
use crate::color::Color;
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    /// Distance above the baseline to the tallest glyph; negative.
    pub top: f64,
    pub ascent: f64,
    pub descent: f64,
    /// Distance below the baseline to the lowest glyph; positive.
    pub bottom: f64,
}

impl FontMetrics {
    pub fn line_height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
}

/// A canvas the host hands to the widget for one render pass.
///
/// `save`/`restore` bracket transform and clip changes the same way a cairo
/// context does.
pub trait Surface {
    type Error: std::fmt::Display;

    fn save(&mut self) -> Result<(), Self::Error>;
    fn restore(&mut self) -> Result<(), Self::Error>;
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate_about(&mut self, center: Point, degrees: f64);
    fn clip_circle(&mut self, center: Point, radius: f64);

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error>;
    fn fill_ellipse(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error>;
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color)
    -> Result<(), Self::Error>;
    /// Soft shadow: solid `color` out to `inner`, fading to nothing at `outer`.
    fn fill_radial_shadow(
        &mut self,
        center: Point,
        inner: f64,
        outer: f64,
        color: Color,
    ) -> Result<(), Self::Error>;

    fn font_metrics(&mut self, size: f64) -> FontMetrics;
    /// Draws `text` horizontally centered on `center_x` with its baseline at `baseline`.
    fn draw_text(
        &mut self,
        text: &str,
        center_x: f64,
        baseline: f64,
        style: TextStyle,
    ) -> Result<(), Self::Error>;
    fn draw_icon(&mut self, icon: &IconHandle, rect: Rect) -> Result<(), Self::Error>;
    fn draw_backdrop(&mut self, backdrop: &Backdrop, alpha: f64) -> Result<(), Self::Error>;
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate { center: Point, degrees: f64 },
    ClipCircle { center: Point, radius: f64 },
    Rect { rect: Rect, color: Color },
    Ellipse { rect: Rect, color: Color },
    Circle { center: Point, radius: f64, color: Color },
    Shadow { center: Point, inner: f64, outer: f64 },
    Text { text: String, x: f64, baseline: f64 },
    Icon { icon: IconHandle, rect: Rect },
    Backdrop { alpha: f64 },
}

/// Records draw calls instead of painting; used to check render passes.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    pub metrics: FontMetrics,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            metrics: FontMetrics {
                top: -10.0,
                ascent: -9.0,
                descent: 3.0,
                bottom: 4.0,
            },
        }
    }

    pub fn texts(&self) -> Vec<(&str, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, baseline, .. } => Some((text.as_str(), *baseline)),
                _ => None,
            })
            .collect()
    }

    pub fn ellipses(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Ellipse { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    type Error = std::convert::Infallible;

    fn save(&mut self) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Save);
        Ok(())
    }

    fn restore(&mut self) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Restore);
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate(dx, dy));
    }

    fn rotate_about(&mut self, center: Point, degrees: f64) {
        self.ops.push(DrawOp::Rotate { center, degrees });
    }

    fn clip_circle(&mut self, center: Point, radius: f64) {
        self.ops.push(DrawOp::ClipCircle { center, radius });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Rect { rect, color });
        Ok(())
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Ellipse { rect, color });
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn fill_radial_shadow(
        &mut self,
        center: Point,
        inner: f64,
        outer: f64,
        _color: Color,
    ) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Shadow {
            center,
            inner,
            outer,
        });
        Ok(())
    }

    fn font_metrics(&mut self, _size: f64) -> FontMetrics {
        self.metrics
    }

    fn draw_text(
        &mut self,
        text: &str,
        center_x: f64,
        baseline: f64,
        _style: TextStyle,
    ) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x: center_x,
            baseline,
        });
        Ok(())
    }

    fn draw_icon(&mut self, icon: &IconHandle, rect: Rect) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Icon {
            icon: icon.clone(),
            rect,
        });
        Ok(())
    }

    fn draw_backdrop(&mut self, _backdrop: &Backdrop, alpha: f64) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Backdrop { alpha });
        Ok(())
    }
}
