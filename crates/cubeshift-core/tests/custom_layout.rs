use cubeshift_core::compositing::rotate_face;
use cubeshift_core::prelude::*;
use cubeshift_core::{compose_custom_from_set, compose_custom_layout_with};
use image::{Rgba, RgbaImage};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn solid(size: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(size, size, Rgba(rgba))
}

/// 3x3 face with a distinct value per pixel: r = x, g = y.
fn coords(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| Rgba([x as u8, y as u8, 0, 255]))
}

#[test]
fn canvas_is_the_bounding_box_of_placed_cells() {
    let a = solid(4, RED);
    let b = solid(4, GREEN);
    let entries = [
        CustomFace {
            image: &a,
            placement: CustomPlacement::new(Face::Front, -1, 2),
        },
        CustomFace {
            image: &b,
            placement: CustomPlacement::new(Face::Back, 2, 0),
        },
    ];
    let out = compose_custom_layout(&entries, 4).expect("compose");
    // x spans cells -1..=2, y spans 0..=2
    assert_eq!(out.dimensions(), (16, 12));
    assert_eq!(out.get_pixel(0, 8).0, RED);
    assert_eq!(out.get_pixel(12, 0).0, GREEN);
    // gaps between faces stay transparent
    assert_eq!(out.get_pixel(6, 6).0, [0, 0, 0, 0]);
}

#[test]
fn later_entries_win_on_overlap() {
    let a = solid(2, RED);
    let b = solid(2, BLUE);
    let first = CustomFace {
        image: &a,
        placement: CustomPlacement::new(Face::Top, 0, 0),
    };
    let second = CustomFace {
        image: &b,
        placement: CustomPlacement::new(Face::Bottom, 0, 0),
    };
    let out = compose_custom_layout(&[first, second], 2).expect("compose");
    assert_eq!(out.dimensions(), (2, 2));
    assert!(out.pixels().all(|p| p.0 == BLUE));

    let out = compose_custom_layout(&[second, first], 2).expect("compose");
    assert!(out.pixels().all(|p| p.0 == RED));
}

#[test]
fn right_angle_rotations_are_exact_and_clockwise() {
    let face = coords(3);
    let r90 = rotate_face(&face, 90.0, RotationFilter::Bilinear);
    // the source top-left corner moves to the top-right
    assert_eq!(r90.get_pixel(2, 0).0, face.get_pixel(0, 0).0);
    assert_eq!(r90.get_pixel(0, 0).0, face.get_pixel(0, 2).0);
    let r180 = rotate_face(&face, 180.0, RotationFilter::Nearest);
    assert_eq!(r180.get_pixel(0, 0).0, face.get_pixel(2, 2).0);
    let r270 = rotate_face(&face, -90.0, RotationFilter::Nearest);
    assert_eq!(r270.get_pixel(0, 2).0, face.get_pixel(0, 0).0);
    assert_eq!(rotate_face(&face, 360.0, RotationFilter::Nearest), face);
    // four quarter turns come back to the start
    let mut spun = face.clone();
    for _ in 0..4 {
        spun = rotate_face(&spun, 90.0, RotationFilter::Nearest);
    }
    assert_eq!(spun, face);
}

#[test]
fn rotated_faces_are_drawn_rotated_in_place() {
    let set = FaceSet::from_fn(|_| coords(3)).expect("faces");
    let placements = [
        CustomPlacement::new(Face::Front, 0, 0),
        CustomPlacement::new(Face::Right, 1, 0).rotated(90.0),
    ];
    let out = compose_custom_from_set(&set, &placements).expect("compose");
    assert_eq!(out.dimensions(), (6, 3));
    let expected = rotate_face(set.get(Face::Right), 90.0, RotationFilter::Nearest);
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(out.get_pixel(3 + x, y), expected.get_pixel(x, y));
            assert_eq!(out.get_pixel(x, y), set.get(Face::Front).get_pixel(x, y));
        }
    }
}

#[test]
fn arbitrary_rotation_keeps_the_center_and_clears_rotated_out_corners() {
    let face = solid(8, GREEN);
    let rotated = rotate_face(&face, 45.0, RotationFilter::Bilinear);
    assert_eq!(rotated.dimensions(), (8, 8));
    assert_eq!(rotated.get_pixel(4, 4).0, GREEN);
    assert_eq!(rotated.get_pixel(0, 0).0[3], 0);
    assert_eq!(rotated.get_pixel(7, 7).0[3], 0);
}

#[test]
fn rotated_out_corners_do_not_erase_earlier_faces() {
    let under = solid(8, RED);
    let over = solid(8, BLUE);
    let entries = [
        CustomFace {
            image: &under,
            placement: CustomPlacement::new(Face::Front, 0, 0),
        },
        CustomFace {
            image: &over,
            placement: CustomPlacement::new(Face::Back, 0, 0).rotated(45.0),
        },
    ];
    let cfg = ConvertConfig::builder()
        .rotation_filter(RotationFilter::Nearest)
        .build();
    let out = compose_custom_layout_with(&entries, 8, &cfg).expect("compose");
    assert_eq!(out.get_pixel(0, 0).0, RED);
    assert_eq!(out.get_pixel(4, 4).0, BLUE);
}

#[test]
fn transparent_pixels_inside_a_rotated_face_still_overwrite() {
    let under = solid(8, RED);
    let mut over = solid(8, BLUE);
    for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
        over.put_pixel(x, y, Rgba([0, 0, 0, 0]));
    }
    let cfg = ConvertConfig::builder()
        .rotation_filter(RotationFilter::Nearest)
        .build();
    for degrees in [90.0, 89.0] {
        let entries = [
            CustomFace {
                image: &under,
                placement: CustomPlacement::new(Face::Front, 0, 0),
            },
            CustomFace {
                image: &over,
                placement: CustomPlacement::new(Face::Back, 0, 0).rotated(degrees),
            },
        ];
        let out = compose_custom_layout_with(&entries, 8, &cfg).expect("compose");
        assert_eq!(out.get_pixel(4, 4).0, [0, 0, 0, 0], "at {degrees} degrees");
        assert_eq!(out.get_pixel(3, 3).0, [0, 0, 0, 0], "at {degrees} degrees");
        assert_eq!(out.get_pixel(1, 6).0, BLUE, "at {degrees} degrees");
    }
}

#[test]
fn invalid_custom_layouts_are_rejected() {
    let a = solid(4, RED);
    let small = solid(3, RED);

    assert!(matches!(
        compose_custom_layout(&[], 4),
        Err(CubemapError::InvalidInput(_))
    ));

    let dup = [
        CustomFace {
            image: &a,
            placement: CustomPlacement::new(Face::Top, 0, 0),
        },
        CustomFace {
            image: &a,
            placement: CustomPlacement::new(Face::Top, 1, 0),
        },
    ];
    assert!(matches!(
        compose_custom_layout(&dup, 4),
        Err(CubemapError::InvalidInput(msg)) if msg.contains("top")
    ));

    let wrong_size = [CustomFace {
        image: &small,
        placement: CustomPlacement::new(Face::Left, 0, 0),
    }];
    assert!(matches!(
        compose_custom_layout(&wrong_size, 4),
        Err(CubemapError::InconsistentFaceSizes { expected: 4, found: (3, 3) })
    ));

    let nan = [CustomFace {
        image: &a,
        placement: CustomPlacement::new(Face::Left, 0, 0).rotated(f32::NAN),
    }];
    assert!(matches!(
        compose_custom_layout(&nan, 4),
        Err(CubemapError::InvalidInput(_))
    ));
}

#[test]
fn placements_deserialize_from_short_field_names() {
    let json = r#"[{"face":"front","x":1,"y":0,"rotation":90},{"face":"top","grid_x":1,"grid_y":-1}]"#;
    let parsed: Vec<CustomPlacement> = serde_json::from_str(json).expect("parse");
    assert_eq!(parsed[0], CustomPlacement::new(Face::Front, 1, 0).rotated(90.0));
    assert_eq!(parsed[1], CustomPlacement::new(Face::Top, 1, -1));
}
