//! Face sampling at continuous coordinates.
//!
//! `u, v` are face-local in `[0, 1]`. Pixel `i` covers `[i, i + 1)` in pixel
//! space, so its center sits at `(i + 0.5) / size`.

use image::RgbaImage;

/// Catmull-Rom weights for the four taps around a sample with fractional
/// offset `t` from the base pixel (taps at -1, 0, +1, +2).
pub fn cubic_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

#[inline]
fn texel(face: &RgbaImage, x: i64, y: i64) -> [u8; 4] {
    let max_x = face.width() as i64 - 1;
    let max_y = face.height() as i64 - 1;
    let cx = x.clamp(0, max_x) as u32;
    let cy = y.clamp(0, max_y) as u32;
    face.get_pixel(cx, cy).0
}

/// Bicubic (Catmull-Rom) sample of `face` at `(u, v)`.
///
/// Neighbors outside the face are clamped to the nearest edge pixel. Each
/// channel is clamped to `0..=255` and rounded. The face must be non-empty.
pub fn sample_bicubic(face: &RgbaImage, u: f64, v: f64) -> [u8; 4] {
    bicubic(face, u, v, |x, y| texel(face, x, y))
}

/// Like [`sample_bicubic`] but horizontal taps wrap around, for panoramas
/// whose left and right edges meet. Vertical taps still clamp.
pub fn sample_bicubic_wrap_x(image: &RgbaImage, u: f64, v: f64) -> [u8; 4] {
    let w = image.width() as i64;
    bicubic(image, u, v, |x, y| texel(image, x.rem_euclid(w), y))
}

fn bicubic<F>(image: &RgbaImage, u: f64, v: f64, tap: F) -> [u8; 4]
where
    F: Fn(i64, i64) -> [u8; 4],
{
    let px = u * image.width() as f64 - 0.5;
    let py = v * image.height() as f64 - 0.5;
    let bx = px.floor();
    let by = py.floor();
    let wx = cubic_weights(px - bx);
    let wy = cubic_weights(py - by);
    let (bx, by) = (bx as i64, by as i64);

    let mut acc = [0.0f64; 4];
    for (j, wyj) in wy.iter().enumerate() {
        for (i, wxi) in wx.iter().enumerate() {
            let p = tap(bx - 1 + i as i64, by - 1 + j as i64);
            let w = wxi * wyj;
            for c in 0..4 {
                acc[c] += p[c] as f64 * w;
            }
        }
    }
    acc.map(|c| c.clamp(0.0, 255.0).round() as u8)
}

/// Nearest-neighbor sample at `(u, v)` in `[0, 1]`, clamped to the image.
pub fn sample_nearest(image: &RgbaImage, u: f64, v: f64) -> [u8; 4] {
    let x = (u * image.width() as f64).floor() as i64;
    let y = (v * image.height() as f64).floor() as i64;
    texel(image, x, y)
}
