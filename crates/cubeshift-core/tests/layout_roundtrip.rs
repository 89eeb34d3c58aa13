use cubeshift_core::layout::{canvas_size, face_cells, placements};
use cubeshift_core::prelude::*;
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn face_color(face: Face) -> [u8; 4] {
    match face {
        Face::Front => [255, 0, 0, 255],
        Face::Back => [0, 255, 0, 255],
        Face::Left => [0, 0, 255, 255],
        Face::Right => [255, 255, 0, 255],
        Face::Top => [0, 255, 255, 255],
        Face::Bottom => [255, 0, 255, 255],
    }
}

fn solid_faces(face_size: u32) -> FaceSet {
    FaceSet::from_fn(|f| RgbaImage::from_pixel(face_size, face_size, Rgba(face_color(f))))
        .expect("faces")
}

fn noisy_faces(face_size: u32, seed: u64) -> FaceSet {
    let mut rng = StdRng::seed_from_u64(seed);
    FaceSet::from_fn(|_| {
        RgbaImage::from_fn(face_size, face_size, |_, _| {
            Rgba([
                rng.gen_range(0..=255),
                rng.gen_range(0..=255),
                rng.gen_range(0..=255),
                rng.gen_range(1..=255),
            ])
        })
    })
    .expect("faces")
}

#[test]
fn pack_then_unpack_is_byte_exact_for_every_grid_layout() {
    for layout in CubeLayout::GRIDS {
        for face_size in [1u32, 2, 17] {
            let faces = solid_faces(face_size);
            let packed = compose_layout(&faces, layout, face_size).expect("compose");
            let (w, h) = canvas_size(layout, face_size).expect("canvas");
            assert_eq!(packed.dimensions(), (w, h));
            let info = LayoutInfo {
                layout,
                face_size,
                width: w,
                height: h,
            };
            let back = extract_faces(&packed, &info).expect("extract");
            assert_eq!(back, faces, "round trip mismatch for {layout} at {face_size}");
        }
    }
}

#[test]
fn noisy_faces_survive_the_round_trip() {
    let faces = noisy_faces(9, 7);
    for layout in CubeLayout::GRIDS {
        let packed = compose_layout(&faces, layout, 9).expect("compose");
        let info = detect_format(packed.width() as i64, packed.height() as i64).expect("detect");
        assert_eq!(info.layout, layout);
        let back = extract_faces(&packed, &info).expect("extract");
        assert_eq!(back, faces);
    }
}

#[test]
fn horizontal_cross_400x300_scenario() {
    let faces = solid_faces(100);
    let original = compose_layout(&faces, CubeLayout::HorizontalCross, 100).expect("compose");
    assert_eq!(original.dimensions(), (400, 300));

    let info = detect_format(400, 300).expect("detect");
    assert_eq!(info.layout, CubeLayout::HorizontalCross);
    assert_eq!(info.face_size, 100);

    let extracted = extract_faces(&original, &info).expect("extract");
    let recomposed = compose_layout(&extracted, CubeLayout::HorizontalCross, 100).expect("compose");
    assert_eq!(recomposed, original);
}

#[test]
fn faces_land_on_their_documented_cells() {
    let faces = solid_faces(4);
    for layout in CubeLayout::GRIDS {
        let packed = compose_layout(&faces, layout, 4).expect("compose");
        for (face, col, row) in face_cells(layout).expect("cells") {
            // sample the cell center
            let px = packed.get_pixel(col * 4 + 2, row * 4 + 2).0;
            assert_eq!(px, face_color(face), "{face} misplaced in {layout}");
        }
    }
}

#[test]
fn horizontal_cross_cell_table() {
    let p = placements(CubeLayout::HorizontalCross, 10).expect("placements");
    assert_eq!((p.get(Face::Left).x, p.get(Face::Left).y), (0, 10));
    assert_eq!((p.get(Face::Front).x, p.get(Face::Front).y), (10, 10));
    assert_eq!((p.get(Face::Right).x, p.get(Face::Right).y), (20, 10));
    assert_eq!((p.get(Face::Back).x, p.get(Face::Back).y), (30, 10));
    assert_eq!((p.get(Face::Top).x, p.get(Face::Top).y), (10, 0));
    assert_eq!((p.get(Face::Bottom).x, p.get(Face::Bottom).y), (10, 20));
    assert_eq!(p.rect(Face::Back), Rect::new(30, 10, 10, 10));
}

#[test]
fn strip_layouts_use_right_left_top_bottom_front_back_order() {
    let order = [
        Face::Right,
        Face::Left,
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
    ];
    let row = placements(CubeLayout::Row6x1, 5).expect("row");
    let col = placements(CubeLayout::Column1x6, 5).expect("col");
    for (i, face) in order.iter().enumerate() {
        assert_eq!((row.get(*face).x, row.get(*face).y), (i as u32 * 5, 0));
        assert_eq!((col.get(*face).x, col.get(*face).y), (0, i as u32 * 5));
    }
}

#[test]
fn unused_cross_cells_are_transparent() {
    let faces = solid_faces(3);
    let hcross = compose_layout(&faces, CubeLayout::HorizontalCross, 3).expect("compose");
    for (x, y) in [(0, 0), (8, 0), (11, 2), (0, 8), (6, 6), (11, 8)] {
        assert_eq!(hcross.get_pixel(x, y).0, [0, 0, 0, 0], "({x},{y}) not blank");
    }
    let vcross = compose_layout(&faces, CubeLayout::VerticalCross, 3).expect("compose");
    for (x, y) in [(0, 0), (8, 0), (0, 11), (8, 11), (2, 6)] {
        assert_eq!(vcross.get_pixel(x, y).0, [0, 0, 0, 0], "({x},{y}) not blank");
    }
}

#[test]
fn extraction_ignores_pixels_beyond_the_canvas() {
    let faces = solid_faces(4);
    let packed = compose_layout(&faces, CubeLayout::Row3x2, 4).expect("compose");
    let mut bigger = RgbaImage::from_pixel(14, 9, Rgba([9, 9, 9, 255]));
    image::imageops::replace(&mut bigger, &packed, 0, 0);
    let info = LayoutInfo {
        layout: CubeLayout::Row3x2,
        face_size: 4,
        width: 12,
        height: 8,
    };
    assert_eq!(extract_faces(&bigger, &info).expect("extract"), faces);
}

#[test]
fn extracted_faces_are_independent_copies() {
    let faces = solid_faces(2);
    let mut packed = compose_layout(&faces, CubeLayout::Row6x1, 2).expect("compose");
    let info = detect_format(12, 2).expect("detect");
    let extracted = extract_faces(&packed, &info).expect("extract");
    packed.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
    assert_eq!(extracted.get(Face::Right).get_pixel(0, 0).0, face_color(Face::Right));
}

#[test]
fn face_rects_are_disjoint_and_inside_the_canvas() {
    for layout in CubeLayout::GRIDS {
        let p = placements(layout, 7).expect("placements");
        assert_eq!(p.face_size(), 7);
        let (w, h) = canvas_size(layout, 7).expect("canvas");
        let canvas = Rect::new(0, 0, w, h);
        let rects: Vec<Rect> = p.iter().map(|(f, _)| p.rect(f)).collect();
        for (i, a) in rects.iter().enumerate() {
            assert!(canvas.contains(a), "{layout}: {a:?} outside {canvas:?}");
            for b in &rects[i + 1..] {
                let overlap = a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom();
                assert!(!overlap, "{layout}: {a:?} overlaps {b:?}");
            }
        }
    }
}
