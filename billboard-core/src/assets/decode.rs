use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{BillboardError, BillboardResult};

/// A fully decoded bitmap in premultiplied RGBA8 form.
///
/// Renderers only ever receive images in this state, so nothing draws before loading finished.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl LoadedImage {
    /// Wrap already-premultiplied pixels, checking the buffer size.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> BillboardResult<Self> {
        if width == 0 || height == 0 {
            return Err(BillboardError::asset("image width/height must be non-zero"));
        }
        if data.len() != width as usize * height as usize * 4 {
            return Err(BillboardError::asset("image byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Width after scaling to `target_height` with the aspect ratio kept.
    pub fn width_at_height(&self, target_height: f64) -> f64 {
        f64::from(self.width) * target_height / f64::from(self.height)
    }
}

/// Decode encoded raster bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> BillboardResult<LoadedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    LoadedImage::from_premul_rgba8(width, height, rgba8_premul)
}

/// Parse SVG bytes and rasterize them.
///
/// With `target_height` the SVG is rasterized at that height (aspect ratio kept) so drawing it
/// scaled to the surface does not upsample a small raster.
pub fn decode_svg(bytes: &[u8], target_height: Option<u32>) -> BillboardResult<LoadedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    let (width, height) = svg_raster_size(&tree, target_height)?;
    let data = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    LoadedImage::from_premul_rgba8(width, height, data)
}

/// Read and decode the image at `path`, choosing the decoder from the file extension.
#[tracing::instrument(level = "debug", fields(path = %path.display()))]
pub fn load_image(path: &Path, target_height: Option<u32>) -> BillboardResult<LoadedImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image bytes from '{}'", path.display()))?;
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    let img = if is_svg {
        decode_svg(&bytes, target_height)?
    } else {
        decode_image(&bytes)?
    };
    tracing::debug!(width = img.width, height = img.height, "image loaded");
    Ok(img)
}

fn svg_raster_size(tree: &usvg::Tree, target_height: Option<u32>) -> BillboardResult<(u32, u32)> {
    fn to_px(v: f32) -> BillboardResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(BillboardError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;
    let Some(th) = target_height.filter(|&h| h > 0) else {
        return Ok((base_w, base_h));
    };

    let scale = f64::from(th) / f64::from(size.height());
    let w = (f64::from(size.width()) * scale).ceil().max(1.0) as u32;

    // Avoid pathological allocations.
    const MAX_DIM: u32 = 16_384;
    if w > MAX_DIM || th > MAX_DIM {
        return Err(BillboardError::asset(format!(
            "svg raster size too large: {w}x{th} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, th))
}

fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> BillboardResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BillboardError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
