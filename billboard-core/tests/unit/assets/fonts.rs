use super::*;

#[test]
fn empty_book_measures_nothing_but_keeps_a_line_height() {
    let mut book = FontBook::new();
    let font = FontSpec::new("Arial", 50.0);
    assert!(book.is_empty());
    assert!(book.shape("Hola", &font, Rgba8::WHITE).is_none());
    assert_eq!(book.text_width("Hola", &font), 0.0);
    assert!((book.line_height(&font) - 60.0).abs() < 1e-9);
}

#[test]
fn register_rejects_non_font_bytes() {
    let mut book = FontBook::new();
    let err = book.register("Arial", b"definitely not a font".to_vec());
    assert!(matches!(err, Err(BillboardError::Asset(_))));
    assert!(!book.has_family("Arial"));
    assert_eq!(book.generation(), 0);
}

#[test]
fn fallback_must_name_a_registered_family() {
    let mut book = FontBook::new();
    assert!(book.set_fallback("Arial").is_err());
}

#[test]
fn load_reports_missing_files() {
    let mut book = FontBook::new();
    let err = book
        .load("Arial", Path::new("target/does-not-exist.ttf"))
        .unwrap_err();
    assert!(err.to_string().contains("does-not-exist.ttf"));
}

#[test]
fn brush_copies_channels() {
    let b = TextBrushRgba8::from(Rgba8 {
        r: 1,
        g: 2,
        b: 3,
        a: 4,
    });
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 4));
}

const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/local/share/fonts",
    "/Library/Fonts",
];

fn system_font(file: &str) -> Option<Vec<u8>> {
    FONT_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(file))
        .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn registered_face_shapes_and_measures() {
    let Some(bytes) = system_font("DejaVuSans.ttf") else {
        return;
    };
    let mut book = FontBook::new();
    book.register("Sans", bytes).unwrap();
    assert!(book.has_family("Sans"));
    assert_eq!(book.generation(), 1);

    let font = FontSpec::new("Sans", 50.0);
    let narrow = book.text_width("iiii", &font);
    let wide = book.text_width("WWWW", &font);
    assert!(narrow > 20.0, "narrow = {narrow}");
    assert!(wide > narrow * 2.0, "wide = {wide}, narrow = {narrow}");

    let line = book.line_height(&font);
    assert!((50.0..75.0).contains(&line), "line = {line}");

    let shaped = book.shape("Hola", &font, Rgba8::WHITE).unwrap();
    assert!(shaped.baseline > 30.0 && shaped.baseline < 60.0);
    assert!(shaped.layout.width() > 0.0);

    let bigger = book.text_width("iiii", &FontSpec::new("Sans", 100.0));
    assert!((bigger - 2.0 * narrow).abs() < 1.0);
}

#[test]
fn unknown_families_use_the_fallback_face() {
    let Some(bytes) = system_font("DejaVuSans.ttf") else {
        return;
    };
    let mut book = FontBook::new();
    book.register("Sans", bytes).unwrap();

    let own = book.text_width("Hola", &FontSpec::new("Sans", 40.0));
    let fallback = book.text_width("Hola", &FontSpec::new("Arial", 40.0));
    assert!(own > 0.0);
    assert_eq!(own, fallback);
}

#[test]
fn monospace_face_gives_equal_advances() {
    let (Some(sans), Some(mono)) = (
        system_font("DejaVuSans.ttf"),
        system_font("DejaVuSansMono.ttf"),
    ) else {
        return;
    };
    let mut book = FontBook::new();
    book.register("Sans", sans).unwrap();
    book.register("Mono", mono).unwrap();
    book.set_fallback("Mono").unwrap();
    assert_eq!(book.generation(), 3);

    let mono_font = FontSpec::new("Mono", 50.0);
    let i = book.text_width("iiii", &mono_font);
    let w = book.text_width("WWWW", &mono_font);
    assert!((i - w).abs() < 0.5, "i = {i}, w = {w}");
    assert!(i > book.text_width("iiii", &FontSpec::new("Sans", 50.0)));
}
