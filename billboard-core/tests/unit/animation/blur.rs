use super::*;

#[test]
fn clones_share_the_flag_and_last_write_wins() {
    let mut writer = BlurSignal::new();
    let reader = writer.clone();
    assert!(!reader.should_blur());

    writer.set_should_blur(true);
    assert!(reader.should_blur());
    writer.set_should_blur(true);
    writer.set_should_blur(false);
    assert!(!reader.should_blur());
}

#[test]
fn signal_is_usable_from_another_thread() {
    let mut writer = BlurSignal::new();
    let reader = writer.clone();
    writer.set_should_blur(true);
    let seen = std::thread::spawn(move || reader.should_blur()).join().unwrap();
    assert!(seen);
}
