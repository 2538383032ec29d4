use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(144, 0).is_err());
}

#[test]
fn fps_frame_duration_matches_rate() {
    let fps = Fps::new(144, 1).unwrap();
    let d = fps.frame_duration();
    assert!((d.as_secs_f64() - 1.0 / 144.0).abs() < 1e-9);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert!((ntsc.as_f64() - 29.97).abs() < 0.001);
}

#[test]
fn canvas_validate_bounds() {
    assert!(
        Canvas {
            width: 400,
            height: 120
        }
        .validate()
        .is_ok()
    );
    assert!(
        Canvas {
            width: 0,
            height: 120
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 70_000,
            height: 1
        }
        .validate()
        .is_err()
    );
}

#[test]
fn premultiply_rounds_half_up() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
