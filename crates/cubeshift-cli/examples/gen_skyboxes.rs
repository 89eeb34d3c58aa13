use cubeshift_core::prelude::*;
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};

// --- 3x5 bitmap font for digits '0'..'9' ---
const FONT_3X5: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b010, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

/// Draws `digit` centered, scaled to about half the face.
fn draw_digit(img: &mut RgbaImage, digit: usize, color: [u8; 4]) {
    let size = img.width().min(img.height());
    let scale = (size / 10).max(1);
    let x0 = (img.width().saturating_sub(3 * scale)) / 2;
    let y0 = (img.height().saturating_sub(5 * scale)) / 2;
    for (row_i, row) in FONT_3X5[digit % 10].iter().enumerate() {
        for col in 0..3u32 {
            if (row >> (2 - col)) & 1 == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x0 + col * scale + dx;
                    let py = y0 + row_i as u32 * scale + dy;
                    if px < img.width() && py < img.height() {
                        img.put_pixel(px, py, Rgba(color));
                    }
                }
            }
        }
    }
}

/// Faces with a per-face tint, light noise, a border and the face index.
fn labeled_faces(face_size: u32, rng: &mut impl Rng) -> anyhow::Result<FaceSet> {
    let tints: [[u8; 3]; 6] = [
        [220, 60, 60],
        [60, 200, 60],
        [60, 80, 220],
        [220, 200, 60],
        [60, 200, 210],
        [200, 60, 200],
    ];
    let faces = FaceSet::from_fn(|face| {
        let [r, g, b] = tints[face.index()];
        let mut img = RgbaImage::from_fn(face_size, face_size, |x, y| {
            if x == 0 || y == 0 || x + 1 == face_size || y + 1 == face_size {
                return Rgba([255, 255, 255, 255]);
            }
            let n: i16 = rng.gen_range(-12..=12);
            let ch = |c: u8| (c as i16 + n).clamp(0, 255) as u8;
            Rgba([ch(r), ch(g), ch(b), 255])
        });
        draw_digit(&mut img, face.index(), [20, 20, 20, 255]);
        img
    })?;
    Ok(faces)
}

fn save(img: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    img.save(path)?;
    println!("  {} ({}x{})", path.display(), img.width(), img.height());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Usage: cargo run -p cubeshift-cli --example gen_skyboxes -- [out_root] [face_size]
    // Default out_root: assets/generated, face_size: 128
    let mut args = std::env::args().skip(1);
    let out_root = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/generated"));
    let face_size: u32 = match args.next() {
        Some(s) => s.parse()?,
        None => 128,
    };
    fs::create_dir_all(&out_root)?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(0xC0BE);
    let faces = labeled_faces(face_size, &mut rng)?;

    println!("Generating skyboxes at face size {face_size}:");
    for layout in CubeLayout::GRIDS {
        let img = compose_layout(&faces, layout, face_size)?;
        save(&img, &out_root.join(format!("skybox_{}.png", layout.as_str())))?;
    }
    let pano = to_equirectangular(&faces, face_size)?;
    save(&pano, &out_root.join("skybox_equirectangular.png"))?;

    // A sample placements file for `cubeshift custom`
    fs::write(
        out_root.join("placements.yaml"),
        "# draw order: later entries win where they overlap\n\
         - { face: top, x: 1, y: 0 }\n\
         - { face: left, x: 0, y: 1 }\n\
         - { face: front, x: 1, y: 1 }\n\
         - { face: right, x: 2, y: 1 }\n\
         - { face: back, x: 3, y: 1, rotation: 180 }\n\
         - { face: bottom, x: 1, y: 2, rotation: 45 }\n",
    )?;
    println!("Generated assets under {}", out_root.display());
    Ok(())
}
