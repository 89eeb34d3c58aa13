use crate::config::RotationFilter;
use image::{Rgba, RgbaImage, imageops};

/// Copy the `(sx, sy, sw, sh)` rectangle of `src` into `canvas` with its
/// top-left at `(dx, dy)`. Pixels falling outside `canvas` are dropped.
#[allow(clippy::too_many_arguments)]
pub fn blit_rgba(
    src: &RgbaImage,
    canvas: &mut RgbaImage,
    dx: u32,
    dy: u32,
    sx: u32,
    sy: u32,
    sw: u32,
    sh: u32,
) {
    let (cw, ch) = canvas.dimensions();
    let (iw, ih) = src.dimensions();
    let sw = sw.min(iw.saturating_sub(sx));
    let sh = sh.min(ih.saturating_sub(sy));
    for yy in 0..sh {
        if dy + yy >= ch {
            break;
        }
        for xx in 0..sw {
            if dx + xx >= cw {
                break;
            }
            canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(sx + xx, sy + yy));
        }
    }
}

/// Deep copy of the `size x size` square at `(x, y)`.
pub fn crop_square(src: &RgbaImage, x: u32, y: u32, size: u32) -> RgbaImage {
    let mut out = RgbaImage::new(size, size);
    blit_rgba(src, &mut out, 0, 0, x, y, size, size);
    out
}

/// Quarter turns (0..4) when `degrees` is a multiple of 90.
pub fn quarter_turns(degrees: f32) -> Option<u32> {
    let d = degrees.rem_euclid(360.0);
    let k = (d / 90.0).round();
    if (d - k * 90.0).abs() < 1e-3 {
        Some(k as u32 % 4)
    } else {
        None
    }
}

/// Rotate a square face clockwise by `degrees` about its center.
///
/// The result keeps the source dimensions. Right angles are exact pixel
/// permutations; other angles resample with `filter`, and pixels whose
/// source falls outside the face are fully transparent.
pub fn rotate_face(face: &RgbaImage, degrees: f32, filter: RotationFilter) -> RgbaImage {
    match quarter_turns(degrees) {
        Some(0) => face.clone(),
        Some(1) => imageops::rotate90(face),
        Some(2) => imageops::rotate180(face),
        Some(3) => imageops::rotate270(face),
        _ => rotate_arbitrary(face, degrees as f64, filter),
    }
}

/// Draws `face` rotated clockwise by `degrees` about its center into the
/// face-sized square of `canvas` at `(dx, dy)`.
///
/// Only pixels whose source lies inside the face are written, and those
/// overwrite the canvas whatever their alpha. Pixels a rotation moves in from
/// outside the face keep what is already on the canvas.
pub fn draw_rotated(
    face: &RgbaImage,
    canvas: &mut RgbaImage,
    dx: u32,
    dy: u32,
    degrees: f32,
    filter: RotationFilter,
) {
    let (w, h) = face.dimensions();
    match quarter_turns(degrees) {
        Some(0) => return blit_rgba(face, canvas, dx, dy, 0, 0, w, h),
        Some(_) => {
            let rotated = rotate_face(face, degrees, filter);
            return blit_rgba(&rotated, canvas, dx, dy, 0, 0, w, h);
        }
        None => {}
    }
    let rot = Rotation::new(w, h, degrees as f64);
    let (cw, ch) = canvas.dimensions();
    for y in 0..h.min(ch.saturating_sub(dy)) {
        for x in 0..w.min(cw.saturating_sub(dx)) {
            if let Some(px) = rot.sample(face, x, y, filter) {
                canvas.put_pixel(dx + x, dy + y, px);
            }
        }
    }
}

fn rotate_arbitrary(face: &RgbaImage, degrees: f64, filter: RotationFilter) -> RgbaImage {
    let (w, h) = face.dimensions();
    let rot = Rotation::new(w, h, degrees);
    let mut out = RgbaImage::new(w, h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        if let Some(p) = rot.sample(face, x, y, filter) {
            *px = p;
        }
    }
    out
}

/// Inverse mapping of a clockwise rotation about the center of a `w x h` face.
struct Rotation {
    w: f64,
    h: f64,
    sin: f64,
    cos: f64,
}

impl Rotation {
    fn new(w: u32, h: u32, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            w: w as f64,
            h: h as f64,
            sin,
            cos,
        }
    }

    /// Source pixel for destination `(x, y)`; None when it falls outside the face.
    fn sample(&self, face: &RgbaImage, x: u32, y: u32, filter: RotationFilter) -> Option<Rgba<u8>> {
        let (cx, cy) = (self.w / 2.0, self.h / 2.0);
        let ox = x as f64 + 0.5 - cx;
        let oy = y as f64 + 0.5 - cy;
        let sx = ox * self.cos + oy * self.sin + cx;
        let sy = -ox * self.sin + oy * self.cos + cy;
        if sx < 0.0 || sy < 0.0 || sx >= self.w || sy >= self.h {
            return None;
        }
        Some(match filter {
            RotationFilter::Nearest => *face.get_pixel(sx as u32, sy as u32),
            RotationFilter::Bilinear => sample_bilinear(face, sx - 0.5, sy - 0.5),
        })
    }
}

/// Bilinear sample at pixel-space `(x, y)` (pixel centers on integers),
/// clamping taps to the image edge.
fn sample_bilinear(img: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let max_x = img.width() as i64 - 1;
    let max_y = img.height() as i64 - 1;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let tap = |xi: i64, yi: i64| img.get_pixel(xi.clamp(0, max_x) as u32, yi.clamp(0, max_y) as u32).0;
    let (x0, y0) = (x0 as i64, y0 as i64);
    let p00 = tap(x0, y0);
    let p10 = tap(x0 + 1, y0);
    let p01 = tap(x0, y0 + 1);
    let p11 = tap(x0 + 1, y0 + 1);
    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}
