use crate::error::{CubemapError, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// One side of the cube.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    /// All faces in canonical order. `FaceSet` storage and iteration follow it.
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];

    pub fn index(self) -> usize {
        match self {
            Face::Front => 0,
            Face::Back => 1,
            Face::Left => 2,
            Face::Right => 3,
            Face::Top => 4,
            Face::Bottom => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Left => "left",
            Face::Right => "right",
            Face::Top => "top",
            Face::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Face {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "front" | "pz" | "+z" => Ok(Self::Front),
            "back" | "nz" | "-z" => Ok(Self::Back),
            "left" | "nx" | "-x" => Ok(Self::Left),
            "right" | "px" | "+x" => Ok(Self::Right),
            "top" | "py" | "+y" => Ok(Self::Top),
            "bottom" | "ny" | "-y" => Ok(Self::Bottom),
            _ => Err(format!("unknown face: {s}")),
        }
    }
}

/// Supported cubemap representations: six grid packings plus the
/// equirectangular panorama.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CubeLayout {
    /// 4x3 cross: top/bottom above and below front, back on the far right.
    #[serde(rename = "horizontal_cross")]
    HorizontalCross,
    /// 3x4 cross: back hangs below bottom.
    #[serde(rename = "vertical_cross")]
    VerticalCross,
    /// 2 columns by 3 rows.
    #[serde(rename = "column_2x3")]
    Column2x3,
    /// 3 columns by 2 rows.
    #[serde(rename = "row_3x2")]
    Row3x2,
    /// Single column of six faces.
    #[serde(rename = "column_1x6")]
    Column1x6,
    /// Single row of six faces.
    #[serde(rename = "row_6x1")]
    Row6x1,
    /// Latitude/longitude panorama, 2:1.
    #[serde(rename = "equirectangular")]
    Equirectangular,
}

impl CubeLayout {
    /// Grid packings in detection priority order.
    pub const GRIDS: [CubeLayout; 6] = [
        CubeLayout::HorizontalCross,
        CubeLayout::VerticalCross,
        CubeLayout::Column2x3,
        CubeLayout::Row3x2,
        CubeLayout::Row6x1,
        CubeLayout::Column1x6,
    ];

    pub const ALL: [CubeLayout; 7] = [
        CubeLayout::HorizontalCross,
        CubeLayout::VerticalCross,
        CubeLayout::Column2x3,
        CubeLayout::Row3x2,
        CubeLayout::Row6x1,
        CubeLayout::Column1x6,
        CubeLayout::Equirectangular,
    ];

    pub fn is_grid(self) -> bool {
        !matches!(self, CubeLayout::Equirectangular)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CubeLayout::HorizontalCross => "horizontal_cross",
            CubeLayout::VerticalCross => "vertical_cross",
            CubeLayout::Column2x3 => "column_2x3",
            CubeLayout::Row3x2 => "row_3x2",
            CubeLayout::Column1x6 => "column_1x6",
            CubeLayout::Row6x1 => "row_6x1",
            CubeLayout::Equirectangular => "equirectangular",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            CubeLayout::HorizontalCross => "Horizontal Cross (4x3)",
            CubeLayout::VerticalCross => "Vertical Cross (3x4)",
            CubeLayout::Column2x3 => "2x3 Grid",
            CubeLayout::Row3x2 => "3x2 Grid",
            CubeLayout::Column1x6 => "1x6 Column",
            CubeLayout::Row6x1 => "6x1 Row",
            CubeLayout::Equirectangular => "Equirectangular (2:1)",
        }
    }
}

impl fmt::Display for CubeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CubeLayout {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "horizontal_cross" | "hcross" | "4x3" => Ok(Self::HorizontalCross),
            "vertical_cross" | "vcross" | "3x4" => Ok(Self::VerticalCross),
            "column_2x3" | "2x3" => Ok(Self::Column2x3),
            "row_3x2" | "3x2" => Ok(Self::Row3x2),
            "column_1x6" | "1x6" => Ok(Self::Column1x6),
            "row_6x1" | "6x1" => Ok(Self::Row6x1),
            "equirectangular" | "equirect" | "latlong" => Ok(Self::Equirectangular),
            _ => Err(format!("unknown layout: {s}")),
        }
    }
}

/// Result of format detection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub layout: CubeLayout,
    pub face_size: u32,
    pub width: u32,
    pub height: u32,
}

/// Pixel-space origin of a face within a packed image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Face origins for one (layout, face size) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacePlacements {
    pub(crate) face_size: u32,
    pub(crate) origins: [Placement; 6],
}

impl FacePlacements {
    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    pub fn get(&self, face: Face) -> Placement {
        self.origins[face.index()]
    }

    /// Full square occupied by `face`.
    pub fn rect(&self, face: Face) -> Rect {
        let p = self.get(face);
        Rect::new(p.x, p.y, self.face_size, self.face_size)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Face, Placement)> + '_ {
        Face::ALL.iter().map(move |f| (*f, self.get(*f)))
    }
}

/// Caller-defined placement of one face on an arbitrary grid.
///
/// Grid coordinates are in face cells and may be negative; the composed
/// canvas is the bounding box of every placed cell. Rotation is clockwise in
/// degrees about the face center.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CustomPlacement {
    pub face: Face,
    #[serde(alias = "x")]
    pub grid_x: i32,
    #[serde(alias = "y")]
    pub grid_y: i32,
    #[serde(default, alias = "rotation")]
    pub rotation_degrees: f32,
}

impl CustomPlacement {
    pub fn new(face: Face, grid_x: i32, grid_y: i32) -> Self {
        Self {
            face,
            grid_x,
            grid_y,
            rotation_degrees: 0.0,
        }
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }
}

/// The six faces of a cube, all square with one shared side length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceSet {
    faces: [RgbaImage; 6],
    face_size: u32,
}

impl FaceSet {
    pub fn new(
        front: RgbaImage,
        back: RgbaImage,
        left: RgbaImage,
        right: RgbaImage,
        top: RgbaImage,
        bottom: RgbaImage,
    ) -> Result<Self> {
        Self::from_array([front, back, left, right, top, bottom])
    }

    /// Builds a set from faces in `Face::ALL` order.
    pub fn from_array(faces: [RgbaImage; 6]) -> Result<Self> {
        let face_size = faces[0].width();
        if face_size == 0 {
            return Err(CubemapError::InvalidDimensions {
                width: faces[0].width() as u64,
                height: faces[0].height() as u64,
            });
        }
        for img in &faces {
            if img.dimensions() != (face_size, face_size) {
                return Err(CubemapError::InconsistentFaceSizes {
                    expected: face_size,
                    found: img.dimensions(),
                });
            }
        }
        Ok(Self { faces, face_size })
    }

    /// Builds a set by asking `f` for each face in `Face::ALL` order.
    pub fn from_fn<F>(mut f: F) -> Result<Self>
    where
        F: FnMut(Face) -> RgbaImage,
    {
        Self::from_array(Face::ALL.map(&mut f))
    }

    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    pub fn get(&self, face: Face) -> &RgbaImage {
        &self.faces[face.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Face, &RgbaImage)> + '_ {
        Face::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    pub fn into_array(self) -> [RgbaImage; 6] {
        self.faces
    }

    /// Returns `InconsistentFaceSizes` unless `face_size` matches this set.
    pub(crate) fn ensure_face_size(&self, face_size: u32) -> Result<()> {
        if face_size != self.face_size {
            return Err(CubemapError::InconsistentFaceSizes {
                expected: face_size,
                found: (self.face_size, self.face_size),
            });
        }
        Ok(())
    }
}

/// Wraps a decoded RGBA8 byte vector (row-major, top-left origin).
pub fn pixel_buffer_from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<RgbaImage> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(CubemapError::InvalidDimensions {
            width: width as u64,
            height: height as u64,
        })?;
    let actual = pixels.len();
    RgbaImage::from_raw(width, height, pixels)
        .filter(|_| actual == expected)
        .ok_or(CubemapError::InvalidBuffer { expected, actual })
}
