//! Cube faces <-> equirectangular panorama.
//!
//! Axis convention: +X right, -X left, +Y top, -Y bottom, +Z front, -Z back.
//! Longitude 0 points at +Z so the front face lands in the middle of the
//! panorama; latitude runs from +Y (top row) to -Y (bottom row).

use crate::config::{ConvertConfig, EquirectSampling};
use crate::error::{CubemapError, Result};
use crate::interpolation::{sample_bicubic, sample_bicubic_wrap_x, sample_nearest};
use crate::model::{Face, FaceSet};
use glam::DVec3;
use image::RgbaImage;
use std::f64::consts::{PI, TAU};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Direction (not normalized) through face-local `(u, v)`.
pub fn face_uv_to_direction(face: Face, u: f64, v: f64) -> DVec3 {
    let a = 2.0 * u - 1.0;
    let b = 1.0 - 2.0 * v;
    match face {
        Face::Front => DVec3::new(a, b, 1.0),
        Face::Back => DVec3::new(-a, b, -1.0),
        Face::Left => DVec3::new(-1.0, b, a),
        Face::Right => DVec3::new(1.0, b, -a),
        Face::Top => DVec3::new(a, 1.0, -b),
        Face::Bottom => DVec3::new(a, -1.0, b),
    }
}

/// Face hit by `dir` and the face-local `(u, v)` of the hit.
///
/// The dominant axis is the largest absolute component. Ties go to X, then
/// Y, then Z, which decides pixels lying exactly on a cube edge.
pub fn direction_to_face_uv(dir: DVec3) -> (Face, f64, f64) {
    let abs = dir.abs();
    if abs.max_element() == 0.0 {
        return (Face::Front, 0.5, 0.5);
    }
    if abs.x >= abs.y && abs.x >= abs.z {
        if dir.x > 0.0 {
            (Face::Right, (-dir.z / abs.x + 1.0) * 0.5, (-dir.y / abs.x + 1.0) * 0.5)
        } else {
            (Face::Left, (dir.z / abs.x + 1.0) * 0.5, (-dir.y / abs.x + 1.0) * 0.5)
        }
    } else if abs.y >= abs.x && abs.y >= abs.z {
        if dir.y > 0.0 {
            (Face::Top, (dir.x / abs.y + 1.0) * 0.5, (dir.z / abs.y + 1.0) * 0.5)
        } else {
            (Face::Bottom, (dir.x / abs.y + 1.0) * 0.5, (-dir.z / abs.y + 1.0) * 0.5)
        }
    } else if dir.z > 0.0 {
        (Face::Front, (dir.x / abs.z + 1.0) * 0.5, (-dir.y / abs.z + 1.0) * 0.5)
    } else {
        (Face::Back, (-dir.x / abs.z + 1.0) * 0.5, (-dir.y / abs.z + 1.0) * 0.5)
    }
}

/// Unit direction for panorama coordinates `(u, v)` in `[0, 1)`.
pub fn equirect_uv_to_direction(u: f64, v: f64) -> DVec3 {
    let theta = (u - 0.5) * TAU;
    let phi = v * PI;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    DVec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
}

/// Panorama coordinates `(u, v)` for a unit direction, `u` wrapped into `[0, 1)`.
pub fn direction_to_equirect_uv(dir: DVec3) -> (f64, f64) {
    let theta = dir.x.atan2(dir.z);
    let phi = dir.y.clamp(-1.0, 1.0).acos();
    ((theta / TAU + 0.5).rem_euclid(1.0), phi / PI)
}

/// Renders `faces` as an `8 * face_size x 4 * face_size` panorama.
pub fn to_equirectangular(faces: &FaceSet, face_size: u32) -> Result<RgbaImage> {
    to_equirectangular_with(faces, face_size, &ConvertConfig::default())
}

/// Like [`to_equirectangular`]; the panorama is `4k x 2k` face sizes with
/// `k = cfg.equirect_oversample`.
#[instrument(skip_all, fields(face_size = face_size))]
pub fn to_equirectangular_with(
    faces: &FaceSet,
    face_size: u32,
    cfg: &ConvertConfig,
) -> Result<RgbaImage> {
    cfg.validate()?;
    faces.ensure_face_size(face_size)?;
    let (w, h) = cfg.equirect_size(face_size)?;
    debug!(w, h, "projecting cube to equirectangular");

    let mut out = RgbaImage::new(w, h);
    fill_rows(&mut out, cfg.parallel, |y, row| {
        let v = y as f64 / h as f64;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let u = x as f64 / w as f64;
            let (face, fu, fv) = direction_to_face_uv(equirect_uv_to_direction(u, v));
            px.copy_from_slice(&sample_bicubic(faces.get(face), fu, fv));
        }
    });
    Ok(out)
}

/// Resamples an equirectangular `image` into six `face_size` faces.
///
/// Uses nearest-neighbor lookups into the panorama; see
/// [`from_equirectangular_with`] for bicubic.
pub fn from_equirectangular(image: &RgbaImage, face_size: u32) -> Result<FaceSet> {
    from_equirectangular_with(image, face_size, &ConvertConfig::default())
}

#[instrument(skip_all, fields(face_size = face_size))]
pub fn from_equirectangular_with(
    image: &RgbaImage,
    face_size: u32,
    cfg: &ConvertConfig,
) -> Result<FaceSet> {
    cfg.validate()?;
    let (iw, ih) = image.dimensions();
    if face_size == 0 || iw == 0 || ih == 0 {
        return Err(CubemapError::InvalidDimensions {
            width: iw as u64,
            height: ih as u64,
        });
    }
    debug!(iw, ih, sampling = ?cfg.equirect_sampling, "projecting equirectangular to cube");

    let n = face_size as f64;
    let faces = Face::ALL.map(|face| {
        let mut img = RgbaImage::new(face_size, face_size);
        fill_rows(&mut img, cfg.parallel, |y, row| {
            let v = (y as f64 + 0.5) / n;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let u = (x as f64 + 0.5) / n;
                let dir = face_uv_to_direction(face, u, v).normalize();
                let (eu, ev) = direction_to_equirect_uv(dir);
                let rgba = match cfg.equirect_sampling {
                    EquirectSampling::Nearest => sample_nearest(image, eu, ev),
                    EquirectSampling::Bicubic => sample_bicubic_wrap_x(image, eu, ev),
                };
                px.copy_from_slice(&rgba);
            }
        });
        img
    });
    FaceSet::from_array(faces)
}

/// Runs `f(y, row_bytes)` for every row, on rayon's pool when requested and
/// compiled in.
fn fill_rows<F>(img: &mut RgbaImage, parallel: bool, f: F)
where
    F: Fn(u32, &mut [u8]) + Send + Sync,
{
    let row_len = img.width() as usize * 4;
    if row_len == 0 {
        return;
    }
    let buf: &mut [u8] = img;

    #[cfg(feature = "parallel")]
    {
        if parallel {
            buf.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| f(y as u32, row));
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for (y, row) in buf.chunks_mut(row_len).enumerate() {
        f(y as u32, row);
    }
}
