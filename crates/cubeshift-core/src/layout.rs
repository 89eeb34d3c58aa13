//! Fixed cell geometry of the grid packings.
//!
//! Every grid layout is a `cols x rows` grid of face-sized cells; six of the
//! cells hold faces and the rest (cross layouts only) stay transparent. The
//! cell assignment below is what other tools expect, so unpacking and
//! packing agree pixel for pixel.

use crate::error::{CubemapError, Result};
use crate::model::{CubeLayout, Face, FacePlacements, Placement};

/// `(face, column, row)` for each face of a grid layout.
pub type FaceCells = [(Face, u32, u32); 6];

/// Grid size in cells `(columns, rows)`.
pub fn grid_size(layout: CubeLayout) -> Result<(u32, u32)> {
    match layout {
        CubeLayout::HorizontalCross => Ok((4, 3)),
        CubeLayout::VerticalCross => Ok((3, 4)),
        CubeLayout::Column2x3 => Ok((2, 3)),
        CubeLayout::Row3x2 => Ok((3, 2)),
        CubeLayout::Column1x6 => Ok((1, 6)),
        CubeLayout::Row6x1 => Ok((6, 1)),
        CubeLayout::Equirectangular => Err(CubemapError::UnsupportedOperationForLayout(layout)),
    }
}

/// Cell occupied by each face.
pub fn face_cells(layout: CubeLayout) -> Result<FaceCells> {
    use Face::*;
    match layout {
        //       [top]
        // [left][front][right][back]
        //       [bottom]
        CubeLayout::HorizontalCross => Ok([
            (Front, 1, 1),
            (Back, 3, 1),
            (Left, 0, 1),
            (Right, 2, 1),
            (Top, 1, 0),
            (Bottom, 1, 2),
        ]),
        //       [top]
        // [left][front][right]
        //       [bottom]
        //       [back]
        CubeLayout::VerticalCross => Ok([
            (Front, 1, 1),
            (Back, 1, 3),
            (Left, 0, 1),
            (Right, 2, 1),
            (Top, 1, 0),
            (Bottom, 1, 2),
        ]),
        // [right][left]
        // [top][bottom]
        // [front][back]
        CubeLayout::Column2x3 => Ok([
            (Front, 0, 2),
            (Back, 1, 2),
            (Left, 1, 0),
            (Right, 0, 0),
            (Top, 0, 1),
            (Bottom, 1, 1),
        ]),
        // [right][left][top]
        // [bottom][front][back]
        CubeLayout::Row3x2 => Ok([
            (Front, 1, 1),
            (Back, 2, 1),
            (Left, 1, 0),
            (Right, 0, 0),
            (Top, 2, 0),
            (Bottom, 0, 1),
        ]),
        // right, left, top, bottom, front, back from top to bottom
        CubeLayout::Column1x6 => Ok([
            (Front, 0, 4),
            (Back, 0, 5),
            (Left, 0, 1),
            (Right, 0, 0),
            (Top, 0, 2),
            (Bottom, 0, 3),
        ]),
        // right, left, top, bottom, front, back from left to right
        CubeLayout::Row6x1 => Ok([
            (Front, 4, 0),
            (Back, 5, 0),
            (Left, 1, 0),
            (Right, 0, 0),
            (Top, 2, 0),
            (Bottom, 3, 0),
        ]),
        CubeLayout::Equirectangular => Err(CubemapError::UnsupportedOperationForLayout(layout)),
    }
}

/// Pixel origin of every face for `layout` at `face_size`.
pub fn placements(layout: CubeLayout, face_size: u32) -> Result<FacePlacements> {
    // Validates the product for the largest cell index as well.
    canvas_size(layout, face_size)?;
    let mut origins = [Placement { x: 0, y: 0 }; 6];
    for (face, col, row) in face_cells(layout)? {
        origins[face.index()] = Placement {
            x: col * face_size,
            y: row * face_size,
        };
    }
    Ok(FacePlacements { face_size, origins })
}

/// Canvas dimensions `(width, height)` of `layout` at `face_size`.
pub fn canvas_size(layout: CubeLayout, face_size: u32) -> Result<(u32, u32)> {
    let (cols, rows) = grid_size(layout)?;
    let overflow = || CubemapError::InvalidDimensions {
        width: cols as u64 * face_size as u64,
        height: rows as u64 * face_size as u64,
    };
    let w = cols.checked_mul(face_size).ok_or_else(overflow)?;
    let h = rows.checked_mul(face_size).ok_or_else(overflow)?;
    Ok((w, h))
}
