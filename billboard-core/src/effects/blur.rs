use crate::foundation::error::{BillboardError, BillboardResult};
use crate::surface::FrameRGBA;

/// Separable gaussian blur with a fixed-point (Q16) kernel, reusable across frames.
///
/// Edges clamp to the nearest pixel, so a constant frame stays unchanged.
#[derive(Clone, Debug)]
pub struct GaussianBlur {
    radius: u32,
    kernel: Vec<u32>,
    scratch: Vec<u8>,
}

impl GaussianBlur {
    /// Blur reaching `radius_px` pixels with sigma `radius_px / 2`.
    pub fn new(radius_px: u32) -> BillboardResult<Self> {
        Self::with_sigma(radius_px, (radius_px as f32 / 2.0).max(0.5))
    }

    /// Blur with an explicit sigma.
    pub fn with_sigma(radius_px: u32, sigma: f32) -> BillboardResult<Self> {
        Ok(Self {
            radius: radius_px,
            kernel: gaussian_kernel_q16(radius_px, sigma)?,
            scratch: Vec::new(),
        })
    }

    /// Kernel radius in pixels.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Blur `frame` in place. Only premultiplied frames are accepted.
    pub fn apply(&mut self, frame: &mut FrameRGBA) -> BillboardResult<()> {
        if !frame.premultiplied {
            return Err(BillboardError::render("blur expects a premultiplied frame"));
        }
        let expected_len = (frame.width as usize)
            .checked_mul(frame.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| BillboardError::render("blur buffer size overflow"))?;
        if frame.data.len() != expected_len {
            return Err(BillboardError::render(
                "blur expects data matching width*height*4",
            ));
        }
        if self.radius == 0 || expected_len == 0 {
            return Ok(());
        }

        self.scratch.resize(expected_len, 0);
        horizontal_pass(
            &frame.data,
            &mut self.scratch,
            frame.width,
            frame.height,
            &self.kernel,
        );
        vertical_pass(
            &self.scratch,
            &mut frame.data,
            frame.width,
            frame.height,
            &self.kernel,
        );
        Ok(())
    }
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> BillboardResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BillboardError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(BillboardError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Put the rounding error on the center tap so the weights sum to exactly 1.0.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
