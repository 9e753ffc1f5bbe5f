//! Cairo backend for the widget drawing primitives.

use bloom::blur::Backdrop;
use bloom::button::IconHandle;
use bloom::color::Color;
use bloom::geometry::{Point, Rect};
use bloom::surface::{FontMetrics, Surface, TextStyle};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::Path;

pub const ICON_SIZE: i32 = 128;
const FONT_FACE: &str = "Sans";

/// Pixbufs for every icon name the board uses, loaded once at startup.
#[derive(Default)]
pub struct IconCache {
    icons: HashMap<IconHandle, Pixbuf>,
}

impl IconCache {
    pub fn load<'a>(dir: &Path, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut icons = HashMap::new();
        for name in names {
            let path = dir.join(format!("{name}.png"));
            match Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true) {
                Ok(pixbuf) => {
                    icons.insert(IconHandle::new(name), pixbuf);
                }
                Err(e) => log::warn!("Icon '{}' unavailable ({}): {}", name, path.display(), e),
            }
        }
        Self { icons }
    }

    pub fn get(&self, icon: &IconHandle) -> Option<&Pixbuf> {
        self.icons.get(icon)
    }
}

/// Identifies the pixel buffer a cached surface was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BackdropKey {
    pixels: usize,
    len: usize,
    width: usize,
    height: usize,
}

impl BackdropKey {
    fn of(backdrop: &Backdrop) -> Self {
        Self {
            pixels: backdrop.pixels.as_ptr() as usize,
            len: backdrop.pixels.len(),
            width: backdrop.width,
            height: backdrop.height,
        }
    }
}

/// Keeps the cairo copy of the backdrop on screen so fades only repaint it.
///
/// Keys are buffer addresses, so the owner must [`clear`](Self::clear) the
/// cache whenever a new backdrop is delivered.
#[derive(Default)]
pub struct BackdropCache {
    current: RefCell<Option<(BackdropKey, cairo::ImageSurface)>>,
}

impl BackdropCache {
    pub fn clear(&self) {
        self.current.borrow_mut().take();
    }

    pub fn is_cached(&self, backdrop: &Backdrop) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|(key, _)| *key == BackdropKey::of(backdrop))
    }

    fn surface(&self, backdrop: &Backdrop) -> Result<cairo::ImageSurface, cairo::Error> {
        let key = BackdropKey::of(backdrop);
        if let Some((cached, image)) = self.current.borrow().as_ref() {
            if *cached == key {
                return Ok(image.clone());
            }
        }
        let image = backdrop_surface(backdrop)?;
        log::debug!("backdrop surface created, {}x{}", backdrop.width, backdrop.height);
        *self.current.borrow_mut() = Some((key, image.clone()));
        Ok(image)
    }
}

/// Borrows a cairo context for one draw callback.
pub struct CairoSurface<'a> {
    cr: &'a cairo::Context,
    icons: &'a IconCache,
    backdrops: Option<&'a BackdropCache>,
}

impl<'a> CairoSurface<'a> {
    pub fn new(cr: &'a cairo::Context, icons: &'a IconCache) -> Self {
        Self {
            cr,
            icons,
            backdrops: None,
        }
    }

    pub fn with_backdrops(mut self, backdrops: &'a BackdropCache) -> Self {
        self.backdrops = Some(backdrops);
        self
    }

    fn set_color(&self, color: Color) {
        let (r, g, b, a) = color.into_components();
        self.cr.set_source_rgba(r, g, b, a);
    }

    /// Unit circle scaled into `rect`; the transform is restored, the path kept.
    fn ellipse_path(&self, rect: Rect) -> Result<(), cairo::Error> {
        let center = rect.center();
        self.cr.save()?;
        self.cr.translate(center.x, center.y);
        self.cr.scale(rect.width() / 2.0, rect.height() / 2.0);
        self.cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
        self.cr.restore()
    }
}

impl Surface for CairoSurface<'_> {
    type Error = cairo::Error;

    fn save(&mut self) -> Result<(), cairo::Error> {
        self.cr.save()
    }

    fn restore(&mut self) -> Result<(), cairo::Error> {
        self.cr.restore()
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.cr.translate(dx, dy);
    }

    fn rotate_about(&mut self, center: Point, degrees: f64) {
        self.cr.translate(center.x, center.y);
        self.cr.rotate(degrees.to_radians());
        self.cr.translate(-center.x, -center.y);
    }

    fn clip_circle(&mut self, center: Point, radius: f64) {
        self.cr.new_path();
        self.cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        self.cr.clip();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), cairo::Error> {
        self.set_color(color);
        self.cr
            .rectangle(rect.left, rect.top, rect.width(), rect.height());
        self.cr.fill()
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color) -> Result<(), cairo::Error> {
        self.cr.new_path();
        self.ellipse_path(rect)?;
        self.set_color(color);
        self.cr.fill()
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), cairo::Error> {
        self.set_color(color);
        self.cr.new_path();
        self.cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        self.cr.fill()
    }

    fn fill_radial_shadow(
        &mut self,
        center: Point,
        inner: f64,
        outer: f64,
        color: Color,
    ) -> Result<(), cairo::Error> {
        let (r, g, b, a) = color.into_components();
        let gradient = cairo::RadialGradient::new(center.x, center.y, inner, center.x, center.y, outer);
        gradient.add_color_stop_rgba(0.0, r, g, b, a);
        gradient.add_color_stop_rgba(1.0, r, g, b, 0.0);
        self.cr.set_source(&gradient)?;
        self.cr.new_path();
        self.cr.arc(center.x, center.y, outer, 0.0, 2.0 * PI);
        self.cr.fill()
    }

    fn font_metrics(&mut self, size: f64) -> FontMetrics {
        self.cr
            .select_font_face(FONT_FACE, cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        self.cr.set_font_size(size);
        match self.cr.font_extents() {
            Ok(extents) => FontMetrics {
                top: -extents.ascent(),
                ascent: -extents.ascent(),
                descent: extents.descent(),
                bottom: extents.descent(),
            },
            Err(e) => {
                log::warn!("No font extents for size {size}: {e}");
                FontMetrics {
                    top: -size,
                    ascent: -size * 0.8,
                    descent: size * 0.2,
                    bottom: size * 0.25,
                }
            }
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        center_x: f64,
        baseline: f64,
        style: TextStyle,
    ) -> Result<(), cairo::Error> {
        self.cr
            .select_font_face(FONT_FACE, cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        self.cr.set_font_size(style.size);
        self.set_color(style.color);
        let extents = self.cr.text_extents(text)?;
        self.cr
            .move_to(center_x - (extents.width() / 2.0 + extents.x_bearing()), baseline);
        self.cr.show_text(text)?;
        Ok(())
    }

    fn draw_icon(&mut self, icon: &IconHandle, rect: Rect) -> Result<(), cairo::Error> {
        let Some(pixbuf) = self.icons.get(icon) else {
            log::trace!("no pixbuf for {icon:?}, skipped");
            return Ok(());
        };
        let (w, h) = (pixbuf.width() as f64, pixbuf.height() as f64);
        if w <= 0.0 || h <= 0.0 {
            return Ok(());
        }
        self.cr.save()?;
        self.cr.translate(rect.left, rect.top);
        self.cr.scale(rect.width() / w, rect.height() / h);
        self.cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        self.cr.paint()?;
        self.cr.restore()
    }

    fn draw_backdrop(&mut self, backdrop: &Backdrop, alpha: f64) -> Result<(), cairo::Error> {
        if backdrop.width == 0 || backdrop.height == 0 {
            return Ok(());
        }
        let image = match self.backdrops {
            Some(cache) => cache.surface(backdrop)?,
            None => backdrop_surface(backdrop)?,
        };
        self.cr.set_source_surface(&image, 0.0, 0.0)?;
        self.cr.paint_with_alpha(alpha)
    }
}

fn backdrop_surface(backdrop: &Backdrop) -> Result<cairo::ImageSurface, cairo::Error> {
    let width = backdrop.width as i32;
    let height = backdrop.height as i32;
    let stride = cairo::Format::ARgb32.stride_for_width(backdrop.width as u32)?;
    cairo::ImageSurface::create_for_data(
        backdrop.pixels.clone(),
        cairo::Format::ARgb32,
        width,
        height,
        stride,
    )
}

/// Copies what `paint` draws on a `width`x`height` canvas into a [`Backdrop`].
pub fn snapshot(
    width: i32,
    height: i32,
    paint: impl FnOnce(&cairo::Context) -> anyhow::Result<()>,
) -> anyhow::Result<Backdrop> {
    let mut image = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
    {
        let cr = cairo::Context::new(&image)?;
        paint(&cr)?;
    }
    image.flush();
    let stride = image.stride() as usize;
    let row = width as usize * 4;
    let data = image
        .data()
        .map_err(|e| anyhow::anyhow!("snapshot surface still borrowed: {e}"))?;
    let mut pixels = Vec::with_capacity(row * height as usize);
    for line in data.chunks(stride).take(height as usize) {
        pixels.extend_from_slice(&line[..row]);
    }
    Ok(Backdrop::new(width as usize, height as usize, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backdrop(value: u8) -> Backdrop {
        Backdrop::new(2, 2, vec![value; 16])
    }

    #[test]
    fn backdrop_surface_is_reused_until_cleared() {
        let cache = BackdropCache::default();
        let first = backdrop(10);
        assert!(!cache.is_cached(&first));

        let a = cache.surface(&first).unwrap();
        let b = cache.surface(&first).unwrap();
        assert!(cache.is_cached(&first));
        assert_eq!((a.width(), a.height()), (b.width(), b.height()));

        let second = backdrop(20);
        assert!(!cache.is_cached(&second));
        cache.surface(&second).unwrap();
        assert!(cache.is_cached(&second));
        assert!(!cache.is_cached(&first));

        cache.clear();
        assert!(!cache.is_cached(&second));
    }

    #[test]
    fn cached_backdrop_paints_onto_context() {
        let icons = IconCache::default();
        let cache = BackdropCache::default();
        let target = cairo::ImageSurface::create(cairo::Format::ARgb32, 2, 2).unwrap();
        let cr = cairo::Context::new(&target).unwrap();
        let mut surface = CairoSurface::new(&cr, &icons).with_backdrops(&cache);

        let shown = Backdrop::new(2, 2, vec![255; 16]);
        surface.draw_backdrop(&shown, 0.5).unwrap();
        surface.draw_backdrop(&shown, 1.0).unwrap();
        assert!(cache.is_cached(&shown));

        // zero-size backdrops never reach the cache
        surface.draw_backdrop(&Backdrop::new(0, 0, Vec::new()), 1.0).unwrap();
        assert!(cache.is_cached(&shown));
    }
}
