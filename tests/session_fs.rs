use chrono::NaiveDate;
use image::{Rgba, RgbaImage};
use recolor_lib::{Color, EditSession, FsImageStore, ImageStore, RecolorParams, RecolorSettings};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_open_apply_undo_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sprite.png");
    let mut img = RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]));
    img.put_pixel(0, 0, Rgba([200, 100, 50, 0]));
    img.put_pixel(3, 3, Rgba([0, 0, 0, 255]));
    img.save(&path).unwrap();

    let store = FsImageStore;
    let gray = |_: &Path| Color::NEUTRAL_GRAY;
    let mut session = EditSession::open(&path, &store, &gray, Some(10)).unwrap();
    assert_eq!(session.reference(), Color::NEUTRAL_GRAY);

    assert_eq!(session.pick_source(1, 1).unwrap(), Color::new(200, 100, 50));
    let params = RecolorParams::new(Color::new(0, 0, 255), 1.0, 0.3).unwrap();
    session.apply(&params);

    let current = session.current();
    assert_eq!(current.get_pixel(1, 1), &Rgba([0, 0, 255, 255]));
    assert_eq!(current.get_pixel(0, 0), &Rgba([200, 100, 50, 0]));
    assert_eq!(current.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));

    assert!(session.undo());
    assert_eq!(session.current(), session.original());
    assert!(session.redo());

    let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let saved = session.save(&store, params.target(), date).unwrap();
    assert_eq!(saved, dir.path().join("0000FF - 2024-12-31").join("sprite_colored.png"));

    let reloaded = store.load(&saved).unwrap();
    assert_eq!(reloaded.get_pixel(1, 1), &Rgba([0, 0, 255, 255]));
    // Saving doesn't add a history entry
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_open_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let store = FsImageStore;
    let gray = |_: &Path| Color::NEUTRAL_GRAY;
    let err = EditSession::open(&dir.path().join("nope.png"), &store, &gray, None)
        .err()
        .unwrap();
    assert_eq!(err.kind(), recolor_lib::ErrorKind::ImageLoadError);
}

#[test]
fn test_settings_drive_session_params() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("conf").join("recolor.json");
    let settings = RecolorSettings {
        target: Color::new(0, 255, 0),
        intensity: 1.0,
        source: Some(Color::new(9, 9, 9)),
        ..Default::default()
    };
    settings.save(&config).unwrap();

    let loaded = RecolorSettings::load(&config).unwrap();
    let mut session = EditSession::from_image(
        Path::new("x.png"),
        RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255])),
        Color::NEUTRAL_GRAY,
        loaded.history_limit,
    );
    session.set_source(loaded.source);
    session.apply(&loaded.params().unwrap());
    assert_eq!(session.current().get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
}
