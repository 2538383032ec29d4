use super::*;

fn surface(w: u32, h: u32) -> CpuSurface {
    CpuSurface::new(
        Canvas {
            width: w,
            height: h,
        },
        FontBook::new(),
    )
    .unwrap()
}

#[test]
fn new_surface_is_transparent_and_rejects_empty_canvas() {
    let s = surface(4, 2);
    assert_eq!((s.width(), s.height()), (4, 2));
    assert_eq!(s.pixel(3, 1), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(4, 0), None);
    assert!(
        CpuSurface::new(
            Canvas {
                width: 0,
                height: 2
            },
            FontBook::new()
        )
        .is_err()
    );
}

#[test]
fn fill_rect_uses_current_fill_color() {
    let mut s = surface(8, 8);
    s.set_fill_color(Rgba8::rgb(255, 0, 0));
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 8.0));
    assert_eq!(s.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(6, 1), Some([0, 0, 0, 0]));
}

#[test]
fn destination_over_draws_behind_and_destination_out_erases() {
    let mut s = surface(8, 8);
    s.set_fill_color(Rgba8::rgb(255, 0, 0));
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 8.0));

    s.save();
    s.set_composite_mode(CompositeMode::DestinationOver);
    s.set_fill_color(Rgba8::rgb(0, 0, 255));
    s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    s.restore();
    assert_eq!(s.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(6, 1), Some([0, 0, 255, 255]));

    s.save();
    s.set_composite_mode(CompositeMode::DestinationOut);
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 8.0));
    s.restore();
    assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(3, 1), Some([255, 0, 0, 255]));
}

#[test]
fn clear_region_and_clear() {
    let mut s = surface(4, 4);
    s.set_fill_color(Rgba8::WHITE);
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
    s.clear_region(Rect::new(2.0, 0.0, 4.0, 4.0));
    assert_eq!(s.pixel(1, 0), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(2, 0), Some([0, 0, 0, 0]));

    s.clear();
    assert!(s.snapshot().data.iter().all(|&b| b == 0));
}

#[test]
fn draw_image_scales_source_into_destination() {
    let img = LoadedImage::from_premul_rgba8(
        2,
        1,
        vec![255, 0, 0, 255, 0, 255, 0, 255],
    )
    .unwrap();
    let mut s = surface(8, 4);
    s.draw_image(
        &img,
        Rect::new(0.0, 0.0, 2.0, 1.0),
        Rect::new(0.0, 0.0, 8.0, 4.0),
    );
    assert_eq!(s.pixel(1, 2), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(6, 2), Some([0, 255, 0, 255]));

    let frame = s.snapshot();
    assert_eq!((frame.width, frame.height), (8, 4));
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 8 * 4 * 4);
}

#[test]
fn fill_text_without_fonts_draws_nothing() {
    let mut s = surface(16, 16);
    s.set_font(FontSpec::new("Arial", 12.0));
    s.fill_text("hi", 0.0, 12.0);
    assert!(s.snapshot().data.iter().all(|&b| b == 0));
    assert_eq!(s.measure_text_width("hi"), 0.0);
    assert_eq!(s.line_height(), 12.0 * 1.2);
    assert_eq!(s.layout_key().fonts, 0);
}

fn dejavu_sans() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

fn inked_in(s: &CpuSurface, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> usize {
    ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
        .filter(|&(x, y)| s.pixel(x, y).is_some_and(|p| p[3] > 0))
        .count()
}

#[test]
fn fill_text_inks_glyphs_on_the_baseline() {
    let Some(bytes) = dejavu_sans() else {
        return;
    };
    let mut s = surface(200, 80);
    s.fonts_mut().register("Sans", bytes).unwrap();
    s.set_font(FontSpec::new("Sans", 50.0));
    s.set_fill_color(Rgba8::WHITE);
    s.fill_text("Hola", 10.0, 60.0);

    assert!(inked_in(&s, 0..200, 0..80) > 200);
    // Cap height sits well below the top rows; nothing lands left of the origin.
    assert_eq!(inked_in(&s, 0..200, 0..10), 0);
    assert_eq!(inked_in(&s, 0..8, 0..80), 0);
    let white = (0..80)
        .flat_map(|y| (0..200).map(move |x| (x, y)))
        .filter_map(|(x, y)| s.pixel(x, y))
        .any(|p| p == [255, 255, 255, 255]);
    assert!(white);
}
