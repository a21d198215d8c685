//=========================================================================
// Image View
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::Widget;
use crate::core::assets::AssetStore;
use crate::core::render::{Rect, RenderSurface};
use crate::core::scene::Entity;

//=== ImageView ===========================================================

/// Draws the image stored under `image_key`, scaled into its rect.
///
/// Renders nothing while the image is absent.
#[derive(Debug, Clone)]
pub struct ImageView {
    rect: Rect,
    image_key: String,
}

impl ImageView {
    pub fn new(rect: Rect, image_key: impl Into<String>) -> Self {
        Self {
            rect,
            image_key: image_key.into(),
        }
    }

    pub fn image_key(&self) -> &str {
        &self.image_key
    }
}

impl Widget for ImageView {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn render(&self, surface: &mut dyn RenderSurface, assets: &AssetStore) {
        match assets.image(&self.image_key) {
            Some(image) => surface.draw_image(self.rect, &image),
            None => debug!(target: "scene", "Image '{}' absent, skipped", self.image_key),
        }
    }
}

impl Entity for ImageView {
    fn widget(&self) -> Option<&dyn Widget> {
        Some(self)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{test_font, test_image, DrawCommand, RecordingSurface};

    #[test]
    fn draws_stored_image_into_rect() {
        let assets = AssetStore::new();
        assets.put("logo.png", test_image(8, 4));
        let mut surface = RecordingSurface::new(100, 100);

        ImageView::new(Rect::new(10, 10, 16, 8), "logo.png").render(&mut surface, &assets);

        assert_eq!(
            surface.commands,
            vec![DrawCommand::Image(Rect::new(10, 10, 16, 8), (8, 4))]
        );
    }

    #[test]
    fn absent_image_draws_nothing() {
        let assets = AssetStore::new();
        let mut surface = RecordingSurface::new(100, 100);

        ImageView::new(Rect::new(0, 0, 4, 4), "logo.png").render(&mut surface, &assets);

        assert!(surface.commands.is_empty());
    }

    #[test]
    fn font_under_image_key_is_treated_as_absent() {
        let assets = AssetStore::new();
        assets.put("logo.png", test_font());
        let mut surface = RecordingSurface::new(100, 100);

        ImageView::new(Rect::new(0, 0, 4, 4), "logo.png").render(&mut surface, &assets);

        assert!(surface.commands.is_empty());
    }

    #[test]
    fn image_view_is_not_a_listener() {
        let mut view = ImageView::new(Rect::new(0, 0, 1, 1), "logo.png");
        assert!(view.listener().is_none());
        assert!(view.widget().is_some());
    }
}
