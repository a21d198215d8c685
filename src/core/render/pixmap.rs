//=========================================================================
// Pixmap Surface
//=========================================================================
//
// CPU render backend on a `tiny-skia` pixmap.
//
// - Rectangles: tiny-skia fill (no anti-aliasing, pixel aligned)
// - Images: premultiplied copy, scaled into the target rect
// - Text: fontdue layout, coverage blended glyph by glyph
//
// Presenting a frame bumps the frame counter, hands the pixmap to the
// window through the frame slot and, if configured, writes it as PNG.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use fontdue::layout::{
    CoordinateSystem, HorizontalAlign, Layout, LayoutSettings, TextStyle, VerticalAlign,
};
use log::{debug, trace};
use tiny_skia::{
    Color, ColorU8, FilterQuality, Paint, Pixmap, PixmapPaint, PremultipliedColorU8, Transform,
};

//=== Internal Dependencies ===============================================

use super::frame_slot::FrameSlot;
use super::{Rect, RenderSurface, Rgba};
use crate::core::assets::{FontAsset, ImageAsset};
use crate::core::error::RenderError;

//=== PixmapSurface =======================================================

/// Fixed-size offscreen drawing surface.
pub struct PixmapSurface {
    pixmap: Pixmap,
    frames_presented: u64,
    snapshot_path: Option<PathBuf>,
    frame_slot: Option<FrameSlot>,
}

impl PixmapSurface {
    //--- Construction -----------------------------------------------------

    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::SurfaceCreation { width, height })?;
        Ok(Self {
            pixmap,
            frames_presented: 0,
            snapshot_path: None,
            frame_slot: None,
        })
    }

    /// Writes every presented frame to `path` as PNG.
    pub fn with_snapshot_path(mut self, path: Option<PathBuf>) -> Self {
        self.snapshot_path = path;
        self
    }

    /// Publishes every presented frame to `slot` for on-screen display.
    pub(crate) fn with_frame_slot(mut self, slot: FrameSlot) -> Self {
        self.frame_slot = Some(slot);
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Straight-alpha color at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Rgba::rgba(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    //--- Internal Helpers -------------------------------------------------

    /// Source-over blend of `color` scaled by `coverage` at `(x, y)`.
    fn blend(&mut self, x: i32, y: i32, color: Rgba, coverage: u8) {
        let (width, height) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        if coverage == 0 || x < 0 || y < 0 || x >= width || y >= height {
            return;
        }

        let alpha = mul_div_255(color.a, coverage);
        let src = ColorU8::from_rgba(color.r, color.g, color.b, alpha).premultiply();
        let index = (y * width + x) as usize;
        let dst = self.pixmap.pixels_mut()[index];

        let inv = 255 - src.alpha();
        let out = PremultipliedColorU8::from_rgba(
            src.red().saturating_add(mul_div_255(dst.red(), inv)),
            src.green().saturating_add(mul_div_255(dst.green(), inv)),
            src.blue().saturating_add(mul_div_255(dst.blue(), inv)),
            src.alpha().saturating_add(mul_div_255(dst.alpha(), inv)),
        );

        if let Some(out) = out {
            self.pixmap.pixels_mut()[index] = out;
        }
    }
}

fn mul_div_255(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

fn to_skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

//=== RenderSurface Implementation ========================================

impl RenderSurface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self, color: Rgba) {
        self.pixmap
            .fill(Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some(area) = to_skia_rect(rect) else {
            trace!(target: "render", "Skipping empty rect {:?}", rect);
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = false;

        self.pixmap
            .fill_rect(area, &paint, Transform::identity(), None);
    }

    fn draw_image(&mut self, rect: Rect, image: &ImageAsset) {
        if rect.width == 0 || rect.height == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(mut source) = Pixmap::new(image.width(), image.height()) else {
            return;
        };

        for (dst, px) in source.pixels_mut().iter_mut().zip(image.pixels().pixels()) {
            let [r, g, b, a] = px.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }

        let sx = rect.width as f32 / image.width() as f32;
        let sy = rect.height as f32 / image.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };

        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &paint,
            Transform::from_row(sx, 0.0, 0.0, sy, rect.x as f32, rect.y as f32),
            None,
        );
    }

    fn draw_text(&mut self, rect: Rect, text: &str, font: &FontAsset, color: Rgba) {
        if text.is_empty() || rect.width == 0 || rect.height == 0 {
            return;
        }

        // Never taller than the target box
        let px = font.px().min(rect.height as f32).max(1.0);

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: rect.x as f32,
            y: rect.y as f32,
            max_width: Some(rect.width as f32),
            max_height: Some(rect.height as f32),
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Middle,
            ..LayoutSettings::default()
        });
        layout.append(&[font.font()], &TextStyle::new(text, px, 0));

        for glyph in layout.glyphs() {
            let (metrics, coverage) = font.font().rasterize_config(glyph.key);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }

            let origin_x = glyph.x.round() as i32;
            let origin_y = glyph.y.round() as i32;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let x = origin_x + col as i32;
                    let y = origin_y + row as i32;
                    // Clip to the widget box
                    if x < rect.x || x >= rect.right() || y < rect.y || y >= rect.bottom() {
                        continue;
                    }
                    self.blend(x, y, color, coverage[row * metrics.width + col]);
                }
            }
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.frames_presented += 1;

        if let Some(slot) = &self.frame_slot {
            slot.publish(self.pixmap.width(), self.pixmap.height(), self.pixmap.data());
        }

        if let Some(path) = &self.snapshot_path {
            self.pixmap
                .save_png(path)
                .map_err(|e| RenderError::Present(format!("{}: {}", path.display(), e)))?;
            debug!(target: "render", "Frame {} written to {}", self.frames_presented, path.display());
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{box_font, test_font, test_image};

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(matches!(
            PixmapSurface::new(0, 10),
            Err(RenderError::SurfaceCreation { width: 0, height: 10 })
        ));
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut surface = PixmapSurface::new(4, 3).unwrap();
        surface.clear(Rgba::rgb(0, 100, 0));

        assert_eq!(surface.pixel(0, 0), Some(Rgba::rgb(0, 100, 0)));
        assert_eq!(surface.pixel(3, 2), Some(Rgba::rgb(0, 100, 0)));
    }

    #[test]
    fn fill_rect_covers_only_its_area() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.clear(Rgba::WHITE);
        surface.fill_rect(Rect::new(2, 2, 3, 3), Rgba::BLACK);

        assert_eq!(surface.pixel(2, 2), Some(Rgba::BLACK));
        assert_eq!(surface.pixel(4, 4), Some(Rgba::BLACK));
        assert_eq!(surface.pixel(5, 5), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(1, 2), Some(Rgba::WHITE));
    }

    #[test]
    fn later_fill_overwrites_earlier_fill() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.fill_rect(Rect::new(0, 0, 6, 6), Rgba::BLACK);
        surface.fill_rect(Rect::new(3, 3, 6, 6), Rgba::rgb(0x77, 0x77, 0x77));

        assert_eq!(surface.pixel(1, 1), Some(Rgba::BLACK));
        assert_eq!(surface.pixel(4, 4), Some(Rgba::rgb(0x77, 0x77, 0x77)));
    }

    #[test]
    fn image_is_scaled_into_rect() {
        let mut surface = PixmapSurface::new(8, 8).unwrap();
        surface.clear(Rgba::BLACK);
        let handle = test_image(1, 1);
        let image = handle.as_image().unwrap();

        surface.draw_image(Rect::new(2, 2, 4, 4), image);

        assert_eq!(surface.pixel(3, 3), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(0, 0), Some(Rgba::BLACK));
    }

    #[test]
    fn text_with_glyphless_font_leaves_surface_untouched() {
        let mut surface = PixmapSurface::new(20, 10).unwrap();
        surface.clear(Rgba::WHITE);
        let handle = test_font();

        surface.draw_text(Rect::new(0, 0, 20, 10), "bųțțøñ", handle.as_font().unwrap(), Rgba::BLACK);

        assert_eq!(surface.pixel(10, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn text_covers_pixels_and_is_clipped_to_rect() {
        let mut surface = PixmapSurface::new(60, 40).unwrap();
        surface.clear(Rgba::WHITE);
        let handle = box_font();
        let rect = Rect::new(10, 12, 50, 16);

        // Each box glyph is taller than the 16px line and overshoots it
        surface.draw_text(rect, "ab", handle.as_font().unwrap(), Rgba::BLACK);

        assert_eq!(surface.pixel(27, 20), Some(Rgba::BLACK));
        for y in 0..40 {
            for x in 0..60 {
                let inside = x >= 10 && y >= 12 && y < 28;
                if !inside {
                    assert_eq!(surface.pixel(x, y), Some(Rgba::WHITE), "({x}, {y}) outside the rect");
                }
            }
        }
    }

    #[test]
    fn blend_respects_coverage() {
        let mut surface = PixmapSurface::new(2, 1).unwrap();
        surface.clear(Rgba::WHITE);

        surface.blend(0, 0, Rgba::BLACK, 255);
        surface.blend(1, 0, Rgba::BLACK, 0);

        assert_eq!(surface.pixel(0, 0), Some(Rgba::BLACK));
        assert_eq!(surface.pixel(1, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn present_publishes_frame_to_slot() {
        let slot = FrameSlot::new();
        let mut surface = PixmapSurface::new(3, 2).unwrap().with_frame_slot(slot.clone());
        surface.clear(Rgba::rgb(0, 100, 0));

        surface.present().unwrap();

        let (generation, frame) = slot.read_newer(0, |f| f.clone()).unwrap();
        assert_eq!(generation, 1);
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.pixels.len(), 3 * 2 * 4);
        assert_eq!(&frame.pixels[..4], &[0, 100, 0, 255]);
    }

    #[test]
    fn present_counts_frames_and_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut surface = PixmapSurface::new(4, 4)
            .unwrap()
            .with_snapshot_path(Some(path.clone()));

        surface.present().unwrap();
        surface.present().unwrap();

        assert_eq!(surface.frames_presented(), 2);
        assert!(path.exists());
    }
}
