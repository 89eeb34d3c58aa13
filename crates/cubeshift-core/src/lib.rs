//! Core library for cubemap layout conversion.
//!
//! - Detection: `detect_format` infers the packing (cross, grid, strip) and face size from image dimensions
//! - Layouts: `extract_faces` / `compose_layout` move faces in and out of packed images; custom grids with rotation
//! - Projection: `to_equirectangular` / `from_equirectangular` resample between cube faces and a 2:1 panorama
//! - Pipeline: `convert_image` runs detect -> extract -> every target layout in one call
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use cubeshift_core::{ConvertConfig, CubeLayout, convert_image};
//! # fn main() -> anyhow::Result<()> {
//! let img = ImageReader::open("skybox.png")?.decode()?.to_rgba8();
//! let cfg = ConvertConfig::builder().target(CubeLayout::Equirectangular).build();
//! let out = convert_image(&img, &cfg)?;
//! println!("{} -> {} outputs", out.source.layout, out.outputs.len());
//! # Ok(()) }
//! ```

pub mod compose;
pub mod compositing;
pub mod config;
pub mod detect;
pub mod error;
pub mod export;
pub mod interpolation;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod projection;

pub use compose::*;
pub use config::*;
pub use detect::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use pipeline::*;
pub use projection::*;

/// Convenience prelude for common types and functions.
/// Importing `cubeshift_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{ConvertConfig, ConvertConfigBuilder, EquirectSampling, RotationFilter};
    pub use crate::error::CubemapError;
    pub use crate::model::{CubeLayout, CustomPlacement, Face, FaceSet, LayoutInfo, Rect};
    pub use crate::pipeline::{ConvertOutput, ConvertedCubemap};
    pub use crate::{
        CustomFace, compose_custom_layout, compose_layout, convert_image, convert_to_all_layouts,
        detect_format, extract_faces, from_equirectangular, to_equirectangular,
    };
}
