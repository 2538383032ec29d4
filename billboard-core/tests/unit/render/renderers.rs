use super::*;
use crate::assets::fonts::FontBook;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Canvas, Rect};
use crate::surface::cpu::CpuSurface;
use crate::surface::{CompositeMode, StateStack};
use crate::text::customization::{LayoutKey, TextCustomizationBuilder};
use crate::text::style::FontSpec;

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Clear(Rect),
    Image { src: Rect, dst: Rect },
    Text {
        word: String,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Rgba8,
        mode: CompositeMode,
    },
    FillRect { rect: Rect, mode: CompositeMode },
    Save,
    Restore,
}

struct MockSurface {
    width: u32,
    height: u32,
    state: StateStack,
    calls: Vec<Call>,
}

impl MockSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: StateStack::default(),
            calls: Vec::new(),
        }
    }
}

impl Surface for MockSurface {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn clear_region(&mut self, rect: Rect) {
        self.calls.push(Call::Clear(rect));
    }
    fn draw_image(&mut self, _image: &LoadedImage, src: Rect, dst: Rect) {
        self.calls.push(Call::Image { src, dst });
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let s = self.state.current();
        self.calls.push(Call::Text {
            word: text.to_owned(),
            x,
            y,
            font: s.font.clone(),
            color: s.fill,
            mode: s.composite,
        });
    }
    fn fill_rect(&mut self, rect: Rect) {
        let mode = self.state.current().composite;
        self.calls.push(Call::FillRect { rect, mode });
    }
    fn set_fill_color(&mut self, color: Rgba8) {
        self.state.current_mut().fill = color;
    }
    fn set_font(&mut self, font: FontSpec) {
        self.state.current_mut().font = font;
    }
    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.state.current_mut().composite = mode;
    }
    fn measure_text_width(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * 10.0
    }
    fn line_height(&mut self) -> f64 {
        f64::from(self.state.current().font.size_px)
    }
    fn save(&mut self) {
        self.state.save();
        self.calls.push(Call::Save);
    }
    fn restore(&mut self) {
        self.state.restore();
        self.calls.push(Call::Restore);
    }
    fn layout_key(&self) -> LayoutKey {
        LayoutKey {
            canvas: Canvas {
                width: self.width,
                height: self.height,
            },
            fonts: 0,
        }
    }
}

fn truck() -> LoadedImage {
    LoadedImage::from_premul_rgba8(20, 10, vec![255; 20 * 10 * 4]).unwrap()
}

#[test]
fn image_renderer_draws_scaled_bitmap_left_of_the_offset() {
    let mut surface = MockSurface::new(400, 50);
    let mut r = ImageRenderer::new(truck(), 400, 4.0).unwrap();
    assert!(r.update());
    r.render(&mut surface);

    assert_eq!(
        surface.calls,
        vec![
            Call::Clear(Rect::new(0.0, 0.0, 400.0, 50.0)),
            Call::Image {
                src: Rect::new(0.0, 0.0, 20.0, 10.0),
                dst: Rect::new(-396.0, 0.0, -296.0, 50.0),
            },
        ]
    );
}

#[test]
fn image_renderer_reports_blur_until_settled() {
    let mut r = ImageRenderer::new(truck(), 400, 4.0).unwrap();
    let results: Vec<bool> = (0..101).map(|_| r.update()).collect();
    assert!(results[..99].iter().all(|&b| b));
    assert!(!results[99]);
    assert!(!results[100]);
    assert_eq!(r.scroll().x(), 400.0);
}

#[test]
fn text_renderer_masks_each_run_right_of_the_offset() {
    let mut text = TextCustomizationBuilder::new("Hi", 10.0, 30.0)
        .right("you")
        .size(20.0_f32)
        .color(Rgba8::rgb(1, 2, 3))
        .padding(5.0_f64)
        .build()
        .unwrap();
    let mut surface = MockSurface::new(100, 40);
    let mut r = TextRenderer::new(&mut text, &mut surface, truck(), 25.0).unwrap();
    assert_eq!(r.runs().len(), 2);
    assert_eq!(r.runs()[1].coordinates, [10.0 + 20.0 + 5.0, 30.0]);

    surface.calls.clear();
    r.update();
    r.render(&mut surface);

    let hidden = Rect::new(25.0, 0.0, 100.0, 40.0);
    let font = FontSpec::new("sans-serif", 20.0);
    let text_call = |word: &str, x: f64| Call::Text {
        word: word.to_owned(),
        x,
        y: 30.0,
        font: font.clone(),
        color: Rgba8::rgb(1, 2, 3),
        mode: CompositeMode::DestinationOver,
    };
    assert_eq!(
        surface.calls,
        vec![
            Call::Clear(Rect::new(0.0, 0.0, 100.0, 40.0)),
            Call::Save,
            text_call("Hi", 10.0),
            Call::FillRect {
                rect: hidden,
                mode: CompositeMode::DestinationOut,
            },
            Call::Restore,
            Call::Save,
            text_call("you", 35.0),
            Call::FillRect {
                rect: hidden,
                mode: CompositeMode::DestinationOut,
            },
            Call::Restore,
            Call::Image {
                src: Rect::new(0.0, 0.0, 20.0, 10.0),
                dst: Rect::new(-75.0, 0.0, 5.0, 40.0),
            },
        ]
    );
    assert_eq!(surface.state.current().composite, CompositeMode::SourceOver);
}

#[test]
fn create_renderer_dispatches_on_mode() {
    let mut surface = MockSurface::new(8, 8);
    let mut r = create_renderer(SceneMode::Image, truck(), None, &mut surface, 4.0).unwrap();
    assert!(r.update());
    assert!(!r.update());

    let err = create_renderer(SceneMode::Text, truck(), None, &mut surface, 4.0)
        .err()
        .unwrap();
    assert!(err.to_string().contains("text mode"));

    let mut text = crate::text::presets::presentation_title();
    assert!(create_renderer(SceneMode::Text, truck(), Some(&mut text), &mut surface, 4.0).is_ok());
    assert!(create_renderer(SceneMode::Image, truck(), None, &mut surface, 0.0).is_err());
}

#[test]
fn scene_mode_parses_snake_case() {
    let m: SceneMode = serde_json::from_str("\"text\"").unwrap();
    assert_eq!(m, SceneMode::Text);
}

#[test]
fn image_renderer_paints_only_the_entered_part_on_a_cpu_surface() {
    let mut surface = CpuSurface::new(
        Canvas {
            width: 8,
            height: 4,
        },
        FontBook::new(),
    )
    .unwrap();
    let img = LoadedImage::from_premul_rgba8(2, 1, vec![0, 0, 255, 255, 0, 0, 255, 255]).unwrap();
    let mut r = ImageRenderer::new(img, 8, 4.0).unwrap();
    r.update();
    r.render(&mut surface);

    assert_eq!(surface.pixel(1, 1), Some([0, 0, 255, 255]));
    assert_eq!(surface.pixel(6, 1), Some([0, 0, 0, 0]));
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

fn inked(surface: &CpuSurface, xs: std::ops::Range<u32>) -> usize {
    (0..surface.height())
        .flat_map(|y| xs.clone().map(move |x| (x, y)))
        .filter(|&(x, y)| surface.pixel(x, y).is_some_and(|p| p[3] > 0))
        .count()
}

#[test]
fn text_renderer_reveals_real_glyphs_as_the_offset_advances() {
    let Some(bytes) = dejavu_sans() else {
        return;
    };
    let mut fonts = FontBook::new();
    fonts.register("Sans", bytes).unwrap();
    let mut surface = CpuSurface::new(
        Canvas {
            width: 200,
            height: 80,
        },
        fonts,
    )
    .unwrap();
    let mut text = TextCustomizationBuilder::new("Hola", 10.0, 60.0)
        .size(50.0_f32)
        .color(Rgba8::WHITE)
        .build()
        .unwrap();
    let clear = LoadedImage::from_premul_rgba8(2, 1, vec![0; 8]).unwrap();
    let mut r = TextRenderer::new(&mut text, &mut surface, clear, 50.0).unwrap();
    assert_eq!(r.runs()[0].x(), 10.0);

    r.render(&mut surface);
    assert_eq!(inked(&surface, 0..200), 0);

    r.update();
    r.render(&mut surface);
    let partial = inked(&surface, 0..50);
    assert!(partial > 0);
    assert_eq!(inked(&surface, 50..200), 0);

    while r.update() {}
    r.render(&mut surface);
    let settled = inked(&surface, 0..200);
    assert!(settled > partial * 2, "settled = {settled}, partial = {partial}");
}
