//! Unpacking packed cubemaps into faces and packing faces back.

use crate::compositing::{blit_rgba, crop_square, draw_rotated};
use crate::config::ConvertConfig;
use crate::error::{CubemapError, Result};
use crate::layout::{canvas_size, placements};
use crate::model::{CubeLayout, CustomPlacement, FaceSet, LayoutInfo, Rect};
use image::RgbaImage;
use tracing::debug;

/// Copies the six faces of a grid-packed `image` into a `FaceSet`.
///
/// Fails for `Equirectangular` (use the projector) and when `image` is
/// smaller than the layout's canvas at `info.face_size`. Extra pixels to the
/// right or below the canvas are ignored.
pub fn extract_faces(image: &RgbaImage, info: &LayoutInfo) -> Result<FaceSet> {
    if !info.layout.is_grid() {
        return Err(CubemapError::UnsupportedOperationForLayout(info.layout));
    }
    if info.face_size == 0 {
        return Err(CubemapError::InvalidDimensions {
            width: info.width as u64,
            height: info.height as u64,
        });
    }
    let required = canvas_size(info.layout, info.face_size)?;
    let actual = image.dimensions();
    let bounds = Rect::new(0, 0, actual.0, actual.1);
    if !bounds.contains(&Rect::new(0, 0, required.0, required.1)) {
        return Err(CubemapError::BufferTooSmall { required, actual });
    }
    let places = placements(info.layout, info.face_size)?;
    FaceSet::from_fn(|face| {
        let p = places.get(face);
        crop_square(image, p.x, p.y, info.face_size)
    })
}

/// Packs `faces` into `layout`. Unused cross cells stay transparent.
pub fn compose_layout(faces: &FaceSet, layout: CubeLayout, face_size: u32) -> Result<RgbaImage> {
    if !layout.is_grid() {
        return Err(CubemapError::UnsupportedOperationForLayout(layout));
    }
    faces.ensure_face_size(face_size)?;
    let (w, h) = canvas_size(layout, face_size)?;
    let places = placements(layout, face_size)?;
    let mut canvas = RgbaImage::new(w, h);
    for (face, img) in faces.iter() {
        let p = places.get(face);
        blit_rgba(img, &mut canvas, p.x, p.y, 0, 0, face_size, face_size);
    }
    debug!(%layout, w, h, "composed layout");
    Ok(canvas)
}

/// Packs `faces` into every grid layout except `source`, in
/// `CubeLayout::GRIDS` order. Equirectangular output is the projector's job.
pub fn convert_to_all_layouts(
    faces: &FaceSet,
    source: CubeLayout,
    face_size: u32,
) -> Result<Vec<(CubeLayout, RgbaImage)>> {
    let mut out = Vec::with_capacity(CubeLayout::GRIDS.len());
    for layout in CubeLayout::GRIDS {
        if layout == source {
            continue;
        }
        out.push((layout, compose_layout(faces, layout, face_size)?));
    }
    Ok(out)
}

/// A face image and where it goes in a custom layout.
#[derive(Debug, Clone, Copy)]
pub struct CustomFace<'a> {
    pub image: &'a RgbaImage,
    pub placement: CustomPlacement,
}

/// Composes a user-defined layout.
///
/// The canvas is the bounding box of all placed cells. Faces are drawn in
/// slice order, so a later face wins wherever it overlaps an earlier one.
/// Where a non-right-angle rotation pulls in pixels from outside the face
/// square, the canvas keeps what is already there.
pub fn compose_custom_layout(entries: &[CustomFace<'_>], face_size: u32) -> Result<RgbaImage> {
    compose_custom_layout_with(entries, face_size, &ConvertConfig::default())
}

pub fn compose_custom_layout_with(
    entries: &[CustomFace<'_>],
    face_size: u32,
    cfg: &ConvertConfig,
) -> Result<RgbaImage> {
    cfg.validate()?;
    validate_custom(entries, face_size)?;
    let fs = face_size as i64;
    let min_x = entries.iter().map(|e| e.placement.grid_x as i64).min().unwrap_or(0) * fs;
    let min_y = entries.iter().map(|e| e.placement.grid_y as i64).min().unwrap_or(0) * fs;
    let max_x = entries.iter().map(|e| e.placement.grid_x as i64).max().unwrap_or(0) * fs + fs;
    let max_y = entries.iter().map(|e| e.placement.grid_y as i64).max().unwrap_or(0) * fs + fs;
    let (w, h) = (max_x - min_x, max_y - min_y);
    let (Ok(w), Ok(h)) = (u32::try_from(w), u32::try_from(h)) else {
        return Err(CubemapError::InvalidDimensions {
            width: w as u64,
            height: h as u64,
        });
    };
    debug!(faces = entries.len(), w, h, "composing custom layout");

    let mut canvas = RgbaImage::new(w, h);
    for entry in entries {
        let p = &entry.placement;
        let dx = (p.grid_x as i64 * fs - min_x) as u32;
        let dy = (p.grid_y as i64 * fs - min_y) as u32;
        draw_rotated(entry.image, &mut canvas, dx, dy, p.rotation_degrees, cfg.rotation_filter);
    }
    Ok(canvas)
}

/// Custom layout drawing each placement's face from `faces`.
pub fn compose_custom_from_set(faces: &FaceSet, placements: &[CustomPlacement]) -> Result<RgbaImage> {
    compose_custom_from_set_with(faces, placements, &ConvertConfig::default())
}

pub fn compose_custom_from_set_with(
    faces: &FaceSet,
    placements: &[CustomPlacement],
    cfg: &ConvertConfig,
) -> Result<RgbaImage> {
    let entries: Vec<CustomFace<'_>> = placements
        .iter()
        .map(|p| CustomFace {
            image: faces.get(p.face),
            placement: *p,
        })
        .collect();
    compose_custom_layout_with(&entries, faces.face_size(), cfg)
}

fn validate_custom(entries: &[CustomFace<'_>], face_size: u32) -> Result<()> {
    if entries.is_empty() {
        return Err(CubemapError::InvalidInput("custom layout has no faces".into()));
    }
    if face_size == 0 {
        return Err(CubemapError::InvalidDimensions { width: 0, height: 0 });
    }
    let mut seen = [false; 6];
    for e in entries {
        let face = e.placement.face;
        if std::mem::replace(&mut seen[face.index()], true) {
            return Err(CubemapError::InvalidInput(format!(
                "face {face} is placed more than once"
            )));
        }
        if !e.placement.rotation_degrees.is_finite() {
            return Err(CubemapError::InvalidInput(format!(
                "face {face} has a non-finite rotation"
            )));
        }
        if e.image.dimensions() != (face_size, face_size) {
            return Err(CubemapError::InconsistentFaceSizes {
                expected: face_size,
                found: e.image.dimensions(),
            });
        }
    }
    Ok(())
}
