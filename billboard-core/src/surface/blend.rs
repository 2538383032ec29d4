use crate::foundation::error::{BillboardError, BillboardResult};
use crate::foundation::math::mul_div255_u8;
use crate::surface::CompositeMode;

/// Composite premultiplied RGBA8 `src` onto `dst` in place.
pub(crate) fn composite_in_place(
    dst: &mut [u8],
    src: &[u8],
    mode: CompositeMode,
) -> BillboardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BillboardError::render(
            "composite expects equal-length rgba8 buffers",
        ));
    }
    let px = dst.chunks_exact_mut(4).zip(src.chunks_exact(4));
    match mode {
        CompositeMode::SourceOver => {
            for (d, s) in px {
                over(d, s);
            }
        }
        CompositeMode::DestinationOver => {
            for (d, s) in px {
                let da = u16::from(d[3]);
                if da == 255 || s[3] == 0 {
                    continue;
                }
                let inv = 255 - da;
                for c in 0..4 {
                    d[c] = d[c].saturating_add(mul_div255_u8(u16::from(s[c]), inv));
                }
            }
        }
        CompositeMode::DestinationOut => {
            for (d, s) in px {
                let sa = u16::from(s[3]);
                if sa == 0 {
                    continue;
                }
                let inv = 255 - sa;
                for c in d.iter_mut() {
                    *c = mul_div255_u8(u16::from(*c), inv);
                }
            }
        }
    }
    Ok(())
}

fn over(d: &mut [u8], s: &[u8]) {
    let sa = u16::from(s[3]);
    if sa == 0 {
        return;
    }
    let inv = 255 - sa;
    for c in 0..4 {
        d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
    }
}

/// Zero every pixel of `rect` (pixel coordinates, already clamped) in a `width`-wide buffer.
pub(crate) fn clear_rect(data: &mut [u8], width: u32, x0: u32, y0: u32, x1: u32, y1: u32) {
    let stride = width as usize * 4;
    for y in y0..y1 {
        let row = y as usize * stride;
        data[row + x0 as usize * 4..row + x1 as usize * 4].fill(0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/blend.rs"]
mod tests;
