use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BillboardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BillboardError::asset("x")
            .to_string()
            .contains("asset error:")
    );
    assert!(
        BillboardError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        BillboardError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn layout_errors_convert_and_keep_their_message() {
    let err: BillboardError = LayoutError::FirstDirectiveNotAbsolute { got: "right" }.into();
    let msg = err.to_string();
    assert!(msg.starts_with("layout error:"));
    assert!(msg.contains("first directive must be absolute"));

    let err: BillboardError = LayoutError::MissingDirective {
        index: 3,
        word: "hola".to_string(),
    }
    .into();
    assert!(err.to_string().contains("missing directive"));
    assert!(matches!(
        err,
        BillboardError::Layout(LayoutError::MissingDirective { index: 3, .. })
    ));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BillboardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
