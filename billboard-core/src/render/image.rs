use crate::assets::decode::LoadedImage;
use crate::foundation::error::BillboardResult;
use crate::render::Renderer;
use crate::render::scroll::{ScrollState, draw_scrolled_image};
use crate::surface::Surface;

/// Draws a bitmap sliding in from the left until its offset reaches the surface width.
pub struct ImageRenderer {
    image: LoadedImage,
    scroll: ScrollState,
}

impl ImageRenderer {
    /// Renderer for a surface `surface_width` pixels wide.
    pub fn new(image: LoadedImage, surface_width: u32, step_px: f64) -> BillboardResult<Self> {
        Ok(Self {
            image,
            scroll: ScrollState::new(step_px, f64::from(surface_width))?,
        })
    }

    /// Scroll state.
    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }
}

impl Renderer for ImageRenderer {
    fn render(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        draw_scrolled_image(surface, &self.image, self.scroll.x());
    }

    fn update(&mut self) -> bool {
        self.scroll.advance()
    }
}
