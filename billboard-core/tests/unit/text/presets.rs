use super::*;

#[test]
fn presentation_title_is_valid_and_uses_alternate_family() {
    let t = presentation_title();
    assert!(t.validate().is_ok());
    assert_eq!(t.style().family.resolve_marked(0).unwrap(), "Arial");
    assert_eq!(t.style().family.resolve_marked(3).unwrap(), "Noto Sans Mono");
    assert_eq!(t.style().family.resolve_marked(4).unwrap(), "Noto Sans Mono");
}

#[test]
fn presentation_title_survives_json() {
    let t = presentation_title();
    let json = serde_json::to_string(&t).unwrap();
    assert!(json.contains(ALTERNATE_FAMILY_KEYWORD));

    let back: TextCustomization = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
    assert_eq!(
        back.style().family.resolve_marked(3).unwrap(),
        "Noto Sans Mono"
    );
    assert_eq!(
        back.style().color.value_for(3),
        Some(&Rgba8::rgb(0xff, 0xc1, 0x07))
    );
}
