//=========================================================================
// Render Backend Contract
//=========================================================================
//
// The drawing surface widgets paint onto. The shell only relies on the
// primitives below; any backend that provides them can be plugged in.
//
// Primitives:
//   clear → fill_rect / draw_image / draw_text (any order) → present
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod frame_slot;
mod pixmap;

//=== Public API ==========================================================

pub use pixmap::PixmapSurface;
pub(crate) use frame_slot::{FrameSlot, PresentedFrame};

//=== Internal Dependencies ===============================================

use crate::core::assets::{FontAsset, ImageAsset};
use crate::core::error::RenderError;

//=== Rgba ================================================================

/// Straight-alpha 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from `0xRRGGBBAA`.
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: (value >> 24) as u8,
            g: (value >> 16) as u8,
            b: (value >> 8) as u8,
            a: value as u8,
        }
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle in surface pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Strict-interior containment: points on an edge are outside.
    pub fn contains_strict(&self, x: f32, y: f32) -> bool {
        x > self.x as f32 && x < self.right() as f32 && y > self.y as f32 && y < self.bottom() as f32
    }

    /// Shrinks every side by `amount`; `None` once nothing is left.
    pub fn inset(&self, amount: u32) -> Option<Self> {
        let twice = amount.checked_mul(2)?;
        if twice >= self.width || twice >= self.height {
            return None;
        }
        Some(Self::new(
            self.x + amount as i32,
            self.y + amount as i32,
            self.width - twice,
            self.height - twice,
        ))
    }
}

//=== RenderSurface =======================================================

/// Drawing surface supplied by the rendering backend.
///
/// Widgets only ever call the draw primitives; `clear` and `present`
/// belong to the scene's render pass.
pub trait RenderSurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Rgba);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Draws `image` scaled into `rect`.
    fn draw_image(&mut self, rect: Rect, image: &ImageAsset);

    /// Draws a UTF-8 label laid out inside `rect`.
    fn draw_text(&mut self, rect: Rect, text: &str, font: &FontAsset, color: Rgba);

    /// Finishes the frame.
    fn present(&mut self) -> Result<(), RenderError>;
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_is_outside() {
        let rect = Rect::new(130, 70, 100, 40);
        assert!(!rect.contains_strict(130.0, 70.0));
    }

    #[test]
    fn just_inside_corner_is_inside() {
        let rect = Rect::new(130, 70, 100, 40);
        assert!(rect.contains_strict(131.0, 71.0));
    }

    #[test]
    fn far_edges_are_outside() {
        let rect = Rect::new(130, 70, 100, 40);
        assert!(!rect.contains_strict(230.0, 90.0));
        assert!(!rect.contains_strict(180.0, 110.0));
        assert!(rect.contains_strict(229.5, 109.5));
    }

    #[test]
    fn zero_width_rect_contains_nothing() {
        let flat = Rect::new(10, 10, 0, 5);
        assert!(!flat.contains_strict(10.0, 12.0));
    }

    #[test]
    fn inset_shrinks_each_side() {
        let rect = Rect::new(130, 70, 100, 40);
        assert_eq!(rect.inset(1), Some(Rect::new(131, 71, 98, 38)));
        assert_eq!(rect.inset(0), Some(rect));
        assert_eq!(rect.inset(20), None);
    }

    #[test]
    fn color_from_packed_value() {
        assert_eq!(Rgba::from_u32(0x777777ff), Rgba::rgb(0x77, 0x77, 0x77));
        assert_eq!(Rgba::from_u32(0x000000ff), Rgba::BLACK);
    }
}
