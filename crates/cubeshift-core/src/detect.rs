use crate::layout::grid_size;
use crate::model::{CubeLayout, LayoutInfo};
use tracing::trace;

/// Infers the grid layout of a `width x height` image.
///
/// Layouts are tried in `CubeLayout::GRIDS` order and the first one that
/// splits both dimensions into the same whole face size wins. Returns `None`
/// when nothing fits, including for zero or negative dimensions.
pub fn detect_format(width: i64, height: i64) -> Option<LayoutInfo> {
    if width <= 0 || height <= 0 {
        return None;
    }
    for layout in CubeLayout::GRIDS {
        let Ok((cols, rows)) = grid_size(layout) else {
            continue;
        };
        let (cols, rows) = (cols as i64, rows as i64);
        if width % cols != 0 || height % rows != 0 {
            continue;
        }
        let face_size = width / cols;
        if face_size != height / rows {
            continue;
        }
        let (Ok(face_size), Ok(w), Ok(h)) = (
            u32::try_from(face_size),
            u32::try_from(width),
            u32::try_from(height),
        ) else {
            return None;
        };
        trace!(?layout, face_size, "layout matched");
        return Some(LayoutInfo {
            layout,
            face_size,
            width: w,
            height: h,
        });
    }
    None
}

/// Face size to use when unpacking a 2:1 panorama.
///
/// Mirrors the projector's `8 * face_size` output width, so a panorama
/// produced from a cube converts back at its original resolution.
pub fn suggest_equirect_face_size(width: u32, height: u32) -> Option<u32> {
    if width == 0 || height == 0 || width != height.checked_mul(2)? || width % 8 != 0 {
        return None;
    }
    Some(width / 8)
}
