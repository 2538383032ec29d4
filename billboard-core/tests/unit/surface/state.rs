use super::*;

#[derive(Default)]
struct FixedSurface {
    state: StateStack,
}

impl Surface for FixedSurface {
    fn width(&self) -> u32 {
        100
    }
    fn height(&self) -> u32 {
        50
    }
    fn clear_region(&mut self, _rect: Rect) {}
    fn draw_image(&mut self, _image: &LoadedImage, _src: Rect, _dst: Rect) {}
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) {}
    fn fill_rect(&mut self, _rect: Rect) {}
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
        text.chars().count() as f64 * f64::from(self.state.current().font.size_px)
    }
    fn line_height(&mut self) -> f64 {
        f64::from(self.state.current().font.size_px) * 2.0
    }
    fn save(&mut self) {
        self.state.save();
    }
    fn restore(&mut self) {
        self.state.restore();
    }
    fn layout_key(&self) -> LayoutKey {
        LayoutKey {
            canvas: crate::foundation::core::Canvas {
                width: 100,
                height: 50,
            },
            fonts: 0,
        }
    }
}

#[test]
fn state_stack_restores_saved_state_and_ignores_unbalanced_restore() {
    let mut s = StateStack::default();
    s.current_mut().composite = CompositeMode::DestinationOut;
    s.save();
    s.current_mut().composite = CompositeMode::DestinationOver;
    s.current_mut().fill = Rgba8::WHITE;
    assert_eq!(s.depth(), 1);

    s.restore();
    assert_eq!(s.current().composite, CompositeMode::DestinationOut);
    assert_eq!(s.current().fill, Rgba8::BLACK);

    s.restore();
    assert_eq!(s.depth(), 0);
    assert_eq!(s.current().composite, CompositeMode::DestinationOut);
}

#[test]
fn surface_measure_scopes_font_changes() {
    let mut surface = FixedSurface::default();
    surface.set_font(FontSpec::new("Arial", 3.0));

    let mut m = SurfaceMeasure::new(&mut surface);
    assert_eq!(m.text_width("abcd", &FontSpec::new("Mono", 10.0)), 40.0);
    assert_eq!(m.line_height(&FontSpec::new("Mono", 10.0)), 20.0);

    assert_eq!(surface.state.current().font, FontSpec::new("Arial", 3.0));
    assert_eq!(surface.state.depth(), 0);
}

#[test]
fn composite_mode_serializes_kebab_case() {
    let s = serde_json::to_string(&CompositeMode::DestinationOut).unwrap();
    assert_eq!(s, "\"destination-out\"");
    assert_eq!(CompositeMode::default(), CompositeMode::SourceOver);
}
