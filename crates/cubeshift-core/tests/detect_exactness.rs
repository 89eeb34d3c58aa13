use cubeshift_core::layout::canvas_size;
use cubeshift_core::prelude::*;
use cubeshift_core::suggest_equirect_face_size;

#[test]
fn every_grid_layout_detects_at_its_own_canvas_size() {
    for layout in CubeLayout::GRIDS {
        for face_size in [1u32, 2, 17, 100] {
            let (w, h) = canvas_size(layout, face_size).expect("canvas");
            let info = detect_format(w as i64, h as i64)
                .unwrap_or_else(|| panic!("{layout} at {face_size} not detected"));
            assert_eq!(info.layout, layout, "layout mismatch at face_size={face_size}");
            assert_eq!(info.face_size, face_size);
            assert_eq!((info.width, info.height), (w, h));
        }
    }
}

#[test]
fn reference_dimensions_from_the_detector_contract() {
    let cases = [
        (400, 300, CubeLayout::HorizontalCross),
        (300, 400, CubeLayout::VerticalCross),
        (200, 300, CubeLayout::Column2x3),
        (300, 200, CubeLayout::Row3x2),
        (600, 100, CubeLayout::Row6x1),
        (100, 600, CubeLayout::Column1x6),
    ];
    for (w, h, layout) in cases {
        let info = detect_format(w, h).expect("detected");
        assert_eq!(info.layout, layout);
        assert_eq!(info.face_size, 100);
        assert_eq!(info.width as i64, w);
        assert_eq!(info.height as i64, h);
    }
}

#[test]
fn zero_and_negative_dimensions_are_not_detected() {
    assert_eq!(detect_format(0, 0), None);
    assert_eq!(detect_format(-100, 100), None);
    assert_eq!(detect_format(100, -100), None);
    assert_eq!(detect_format(-400, -300), None);
    assert_eq!(detect_format(0, 600), None);
}

#[test]
fn inconsistent_face_sizes_are_not_detected() {
    assert_eq!(detect_format(200, 100), None);
    assert_eq!(detect_format(100, 100), None);
    assert_eq!(detect_format(401, 300), None);
    assert_eq!(detect_format(400, 299), None);
    assert_eq!(detect_format(1920, 1080), None);
}

#[test]
fn equirect_face_size_hint_inverts_the_panorama_width() {
    assert_eq!(suggest_equirect_face_size(800, 400), Some(100));
    assert_eq!(suggest_equirect_face_size(8, 4), Some(1));
    // not 2:1
    assert_eq!(suggest_equirect_face_size(800, 300), None);
    // 2:1 but width not a multiple of 8
    assert_eq!(suggest_equirect_face_size(100, 50), None);
    assert_eq!(suggest_equirect_face_size(0, 0), None);
}
