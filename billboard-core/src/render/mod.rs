//! Scene renderers driven by the frame pacer.
//!
//! A [`Renderer`] owns its animation state. [`Renderer::update`] advances it by one logical step,
//! [`Renderer::render`] clears the surface and redraws the whole scene.

use serde::{Deserialize, Serialize};

use crate::assets::decode::LoadedImage;
use crate::foundation::error::{BillboardError, BillboardResult};
use crate::surface::Surface;
use crate::text::customization::TextCustomization;

/// Bitmap scrolling in from the left.
pub mod image;
/// Scroll offset shared by both renderers.
pub mod scroll;
/// Text block revealed behind the scrolling bitmap.
pub mod text;

pub use image::ImageRenderer;
pub use scroll::{ScrollPhase, ScrollState};
pub use text::TextRenderer;

/// One animated scene.
pub trait Renderer {
    /// Clear `surface` and draw the current state.
    fn render(&mut self, surface: &mut dyn Surface);

    /// Advance one step; returns whether blur should be active this frame.
    fn update(&mut self) -> bool;
}

/// Which scene a banner plays.
///
/// - `Image` scrolls the bitmap only.
/// - `Text` reveals a laid-out text block behind the bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneMode {
    /// [`ImageRenderer`].
    #[default]
    Image,
    /// [`TextRenderer`].
    Text,
}

/// Create the renderer for `mode`.
///
/// `text` is required for [`SceneMode::Text`] and laid out against `surface` here, so layout
/// errors surface before the first frame.
#[tracing::instrument(
    level = "debug",
    skip(image, text, surface),
    fields(width = surface.width(), height = surface.height())
)]
pub fn create_renderer(
    mode: SceneMode,
    image: LoadedImage,
    text: Option<&mut TextCustomization>,
    surface: &mut dyn Surface,
    step_px: f64,
) -> BillboardResult<Box<dyn Renderer>> {
    match mode {
        SceneMode::Image => Ok(Box::new(ImageRenderer::new(
            image,
            surface.width(),
            step_px,
        )?)),
        SceneMode::Text => {
            let text = text.ok_or_else(|| {
                BillboardError::validation("text mode requires a text customization")
            })?;
            Ok(Box::new(TextRenderer::new(text, surface, image, step_px)?))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderers.rs"]
mod tests;
