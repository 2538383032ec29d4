use super::*;

#[test]
fn parse_hex_accepts_both_lengths() {
    assert_eq!(Rgba8::parse_hex("#ff3366").unwrap(), Rgba8::rgb(255, 51, 102));
    assert_eq!(
        Rgba8::parse_hex("FF336680").unwrap(),
        Rgba8 {
            r: 255,
            g: 51,
            b: 102,
            a: 128
        }
    );
    assert!(Rgba8::parse_hex("#fff").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
}

#[test]
fn serde_reads_hex_and_arrays_and_writes_hex() {
    let c: Rgba8 = serde_json::from_str("\"#0a0b0c\"").unwrap();
    assert_eq!(c, Rgba8::rgb(10, 11, 12));

    let c: Rgba8 = serde_json::from_str("[1, 2, 3, 4]").unwrap();
    assert_eq!(c.a, 4);
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#01020304\"");

    assert!(serde_json::from_str::<Rgba8>("[1, 2]").is_err());
}

#[test]
fn to_premul_scales_channels() {
    let p = Rgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 0,
    }
    .to_premul();
    assert_eq!(p.to_array(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::WHITE.to_premul().to_array(), [255, 255, 255, 255]);
}
