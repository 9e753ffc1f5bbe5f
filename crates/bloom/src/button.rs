use crate::color::{self, Color};
use crate::error::{ConfigurationError, RenderError};
use crate::geometry::Rect;
use crate::surface::{Surface, TextStyle};
use derive_more::{AsRef, Deref, Display, From, Into};
use strum::{Display as StrumDisplay, EnumString};

/// Names an image the host surface knows how to paint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct IconHandle(String);

impl IconHandle {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl From<&str> for IconHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum ButtonVariant {
    Icon,
    Text,
    IconAndText,
}

impl ButtonVariant {
    pub fn shows_text(&self) -> bool {
        matches!(self, Self::Text | Self::IconAndText)
    }

    pub fn shows_icon(&self) -> bool {
        matches!(self, Self::Icon | Self::IconAndText)
    }
}

/// Content and color of one button in a radial set.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonEntity {
    variant: ButtonVariant,
    is_primary: bool,
    text_lines: Vec<String>,
    icon: Option<IconHandle>,
    icon_padding: f64,
    background: Color,
}

impl ButtonEntity {
    fn with_variant(variant: ButtonVariant) -> Self {
        Self {
            variant,
            is_primary: false,
            text_lines: Vec::new(),
            icon: None,
            icon_padding: 0.0,
            background: color::WHITE,
        }
    }

    fn checked_lines<I, S>(lines: I) -> Result<Vec<String>, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return Err(ConfigurationError::MissingText { index: 0 });
        }
        Ok(lines)
    }

    pub fn icon(icon: impl Into<IconHandle>, padding: f64) -> Self {
        let mut button = Self::with_variant(ButtonVariant::Icon);
        button.icon = Some(icon.into());
        button.icon_padding = padding;
        button
    }

    pub fn text<I, S>(lines: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut button = Self::with_variant(ButtonVariant::Text);
        button.text_lines = Self::checked_lines(lines)?;
        Ok(button)
    }

    pub fn icon_and_text<I, S>(
        icon: impl Into<IconHandle>,
        padding: f64,
        lines: I,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut button = Self::icon(icon, padding);
        button.variant = ButtonVariant::IconAndText;
        button.text_lines = Self::checked_lines(lines)?;
        Ok(button)
    }

    /// Icon with a single numeric line on top, as used by board nodes.
    pub fn icon_and_amount(icon: impl Into<IconHandle>, padding: f64, amount: i64) -> Self {
        let mut button = Self::icon(icon, padding);
        button.variant = ButtonVariant::IconAndText;
        button.text_lines = vec![amount.to_string()];
        button
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Independent copy, used when selection mode clones the primary.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Takes over the content and color of `other`, keeping this button's role.
    pub fn adopt_content(&mut self, other: &ButtonEntity) {
        self.variant = other.variant;
        if other.variant.shows_icon() {
            self.icon = other.icon.clone();
        }
        if other.variant.shows_text() {
            self.text_lines = other.text_lines.clone();
        }
        self.background = other.background;
    }

    pub fn variant(&self) -> ButtonVariant {
        self.variant
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub(crate) fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }

    pub fn text_lines(&self) -> &[String] {
        &self.text_lines
    }

    pub fn set_text_lines(&mut self, lines: Vec<String>) {
        self.text_lines = lines;
    }

    pub fn icon_handle(&self) -> Option<&IconHandle> {
        self.icon.as_ref()
    }

    pub fn set_icon(&mut self, icon: Option<IconHandle>) {
        self.icon = icon;
    }

    pub fn icon_padding(&self) -> f64 {
        self.icon_padding
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Paints the button into `rect`. `index` only labels errors.
    pub fn draw<S: Surface>(
        &self,
        surface: &mut S,
        rect: Rect,
        text: TextStyle,
        index: usize,
    ) -> Result<(), RenderError> {
        self.paint(surface, rect, text, index, self.background)
    }

    /// Same as [`draw`](Self::draw) with the held-down background.
    pub fn draw_pressed<S: Surface>(
        &self,
        surface: &mut S,
        rect: Rect,
        text: TextStyle,
        index: usize,
    ) -> Result<(), RenderError> {
        self.paint(surface, rect, text, index, color::pressed(self.background))
    }

    fn paint<S: Surface>(
        &self,
        surface: &mut S,
        rect: Rect,
        text: TextStyle,
        index: usize,
        background: Color,
    ) -> Result<(), RenderError> {
        surface
            .fill_ellipse(rect, background)
            .map_err(surface_error)?;

        if self.variant.shows_text() {
            if self.text_lines.is_empty() {
                return Err(ConfigurationError::MissingText { index }.into());
            }
            draw_lines(surface, &self.text_lines, rect, text)?;
        }

        if self.variant.shows_icon() {
            let icon = self
                .icon
                .as_ref()
                .ok_or(ConfigurationError::MissingIcon { index })?;
            surface
                .draw_icon(icon, rect.inset(self.icon_padding))
                .map_err(surface_error)?;
        }
        Ok(())
    }
}

pub(crate) fn surface_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Surface(e.to_string())
}

/// Stacks `lines` so the whole block is vertically centered on `rect`.
fn draw_lines<S: Surface>(
    surface: &mut S,
    lines: &[String],
    rect: Rect,
    style: TextStyle,
) -> Result<(), RenderError> {
    let metrics = surface.font_metrics(style.size);
    let center = rect.center();
    let line_height = metrics.line_height();
    let count = lines.len();

    let total = (count - 1) as f64 * line_height + (metrics.descent - metrics.ascent);
    let offset = total / 2.0 - metrics.bottom;

    for (i, line) in lines.iter().enumerate() {
        let y = -((count - i - 1) as f64) * line_height + offset;
        surface
            .draw_text(line, center.x, center.y + y, style)
            .map_err(surface_error)?;
    }
    Ok(())
}
