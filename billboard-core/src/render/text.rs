use std::sync::Arc;

use crate::assets::decode::LoadedImage;
use crate::foundation::core::Rect;
use crate::foundation::error::BillboardResult;
use crate::render::Renderer;
use crate::render::scroll::{ScrollState, draw_scrolled_image};
use crate::surface::{CompositeMode, Surface, SurfaceMeasure};
use crate::text::customization::TextCustomization;
use crate::text::layout::FinalText;

/// Draws laid-out text that is only visible left of the scroll offset, with the bitmap on top.
pub struct TextRenderer {
    runs: Arc<[FinalText]>,
    image: LoadedImage,
    scroll: ScrollState,
}

impl TextRenderer {
    /// Lay out `text` against `surface` and bind the result.
    pub fn new(
        text: &mut TextCustomization,
        surface: &mut dyn Surface,
        image: LoadedImage,
        step_px: f64,
    ) -> BillboardResult<Self> {
        let key = surface.layout_key();
        let width = surface.width();
        let runs = text.final_text(&mut SurfaceMeasure::new(surface), key)?;
        Ok(Self {
            runs,
            image,
            scroll: ScrollState::new(step_px, f64::from(width))?,
        })
    }

    /// Laid-out words this renderer draws.
    pub fn runs(&self) -> &[FinalText] {
        &self.runs
    }

    /// Scroll state.
    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        let x = self.scroll.x();
        let hidden = Rect::new(
            x,
            0.0,
            f64::from(surface.width()),
            f64::from(surface.height()),
        );
        for run in self.runs.iter() {
            surface.save();
            surface.set_composite_mode(CompositeMode::DestinationOver);
            surface.set_font(run.font.clone());
            surface.set_fill_color(run.color);
            surface.fill_text(&run.word, run.x(), run.y());
            surface.set_composite_mode(CompositeMode::DestinationOut);
            surface.fill_rect(hidden);
            surface.restore();
        }
        draw_scrolled_image(surface, &self.image, x);
    }

    fn update(&mut self) -> bool {
        self.scroll.advance()
    }
}
