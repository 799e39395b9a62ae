//! Shared data and capabilities for everything drawn on the slope

use serde::{Deserialize, Serialize};

use super::assets::{ImageKey, ImageProvider, ImageSize};
use super::geometry::{Position, Rect};

/// Position plus the sprite currently shown there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub position: Position,
    pub image: ImageKey,
}

impl Sprite {
    pub fn new(position: Position, image: ImageKey) -> Self {
        Self { position, image }
    }
}

/// One drawable as the render surface sees it, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub image: ImageKey,
    /// Top-left corner on screen
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Capability every game object has: a sprite anchored at its center.
pub trait Entity {
    fn sprite(&self) -> &Sprite;

    #[inline]
    fn position(&self) -> Position {
        self.sprite().position
    }

    #[inline]
    fn image(&self) -> ImageKey {
        self.sprite().image
    }

    /// Size of the current image, `None` if the provider doesn't have it
    fn image_size(&self, images: &dyn ImageProvider) -> Option<ImageSize> {
        images.image_size(self.image())
    }

    /// Full image rectangle centered on the position
    fn bounds(&self, images: &dyn ImageProvider) -> Option<Rect> {
        let size = self.image_size(images)?;
        Some(Rect::centered(self.position(), size.width, size.height))
    }

    /// Whether the entity should be drawn this frame
    fn is_visible(&self) -> bool {
        true
    }

    /// Screen-space draw command relative to the camera's top-left corner
    fn render_item(&self, camera: &Rect, images: &dyn ImageProvider) -> Option<RenderItem> {
        if !self.is_visible() {
            return None;
        }
        let Some(size) = self.image_size(images) else {
            log::debug!("No image for {}, skipping draw", self.image().as_str());
            return None;
        };
        let pos = self.position();
        Some(RenderItem {
            image: self.image(),
            x: pos.x - size.width / 2.0 - camera.left,
            y: pos.y - size.height / 2.0 - camera.top,
            width: size.width,
            height: size.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::assets::ImageAtlas;
    use glam::Vec2;

    struct Marker(Sprite);

    impl Entity for Marker {
        fn sprite(&self) -> &Sprite {
            &self.0
        }
    }

    #[test]
    fn test_bounds_centered_on_position() {
        let mut atlas = ImageAtlas::new();
        atlas.insert(ImageKey::Tree, ImageSize::new(20.0, 40.0));
        let marker = Marker(Sprite::new(Vec2::new(100.0, 50.0), ImageKey::Tree));

        let bounds = marker.bounds(&atlas).unwrap();
        assert_eq!(bounds, Rect::new(90.0, 30.0, 110.0, 70.0));
    }

    #[test]
    fn test_missing_image_has_no_bounds() {
        let atlas = ImageAtlas::new();
        let marker = Marker(Sprite::new(Vec2::ZERO, ImageKey::Rock1));
        assert!(marker.bounds(&atlas).is_none());
        assert!(marker.render_item(&Rect::default(), &atlas).is_none());
    }

    #[test]
    fn test_render_item_is_camera_relative() {
        let mut atlas = ImageAtlas::new();
        atlas.insert(ImageKey::Rock2, ImageSize::new(10.0, 10.0));
        let marker = Marker(Sprite::new(Vec2::new(500.0, 300.0), ImageKey::Rock2));
        let camera = Rect::new(400.0, 200.0, 800.0, 600.0);

        let item = marker.render_item(&camera, &atlas).unwrap();
        assert_eq!(item.image, ImageKey::Rock2);
        assert_eq!((item.x, item.y), (95.0, 95.0));
    }
}
