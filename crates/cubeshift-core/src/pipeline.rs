use crate::compose::{compose_layout, extract_faces};
use crate::config::ConvertConfig;
use crate::detect::{detect_format, suggest_equirect_face_size};
use crate::error::{CubemapError, Result};
use crate::layout::canvas_size;
use crate::model::{CubeLayout, FaceSet, LayoutInfo};
use crate::projection::{from_equirectangular_with, to_equirectangular_with};
use image::RgbaImage;
use tracing::{debug, info, instrument};

/// One produced raster. `layout` is None for a custom layout.
#[derive(Debug, Clone)]
pub struct ConvertedCubemap {
    pub layout: Option<CubeLayout>,
    pub width: u32,
    pub height: u32,
    pub rgba: RgbaImage,
}

impl ConvertedCubemap {
    pub fn new(layout: Option<CubeLayout>, rgba: RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        Self {
            layout,
            width,
            height,
            rgba,
        }
    }
}

/// Output of a conversion run: the resolved source, its faces and every
/// requested output.
#[derive(Debug, Clone)]
pub struct ConvertOutput {
    pub source: LayoutInfo,
    pub faces: FaceSet,
    pub outputs: Vec<ConvertedCubemap>,
}

/// Works out what `image` is, honoring `cfg.source_layout` and
/// `cfg.face_size` over detection.
///
/// Without a layout override a `cfg.face_size` must agree with the detected
/// one, otherwise the call fails with `InvalidConfig`.
pub fn resolve_source(image: &RgbaImage, cfg: &ConvertConfig) -> Result<LayoutInfo> {
    let (width, height) = image.dimensions();
    let unrecognized = CubemapError::UnrecognizedLayout { width, height };
    match cfg.source_layout {
        Some(CubeLayout::Equirectangular) => {
            let face_size = cfg
                .face_size
                .or_else(|| suggest_equirect_face_size(width, height))
                .ok_or(unrecognized)?;
            Ok(LayoutInfo {
                layout: CubeLayout::Equirectangular,
                face_size,
                width,
                height,
            })
        }
        Some(layout) => {
            // A grid override with no explicit size takes the largest fit.
            let face_size = match cfg.face_size {
                Some(fs) => fs,
                None => {
                    let (cols, rows) = crate::layout::grid_size(layout)?;
                    (width / cols).min(height / rows)
                }
            };
            if face_size == 0 {
                return Err(unrecognized);
            }
            let (w, h) = canvas_size(layout, face_size)?;
            Ok(LayoutInfo {
                layout,
                face_size,
                width: w,
                height: h,
            })
        }
        None => {
            let info = detect_format(width as i64, height as i64).ok_or(unrecognized)?;
            match cfg.face_size {
                Some(fs) if fs != info.face_size => Err(CubemapError::InvalidConfig(format!(
                    "face_size {fs} does not match detected {} face size {}",
                    info.layout, info.face_size
                ))),
                _ => Ok(info),
            }
        }
    }
}

/// Unpacks `image` according to `info`, dispatching panoramas to the projector.
pub fn faces_from_image(image: &RgbaImage, info: &LayoutInfo, cfg: &ConvertConfig) -> Result<FaceSet> {
    match info.layout {
        CubeLayout::Equirectangular => from_equirectangular_with(image, info.face_size, cfg),
        _ => extract_faces(image, info),
    }
}

/// Layouts produced for `source` when `cfg.targets` is empty: every grid
/// layout but the source, then the panorama unless the source is one.
pub fn default_targets(source: CubeLayout) -> Vec<CubeLayout> {
    CubeLayout::ALL
        .into_iter()
        .filter(|l| *l != source)
        .collect()
}

/// Renders `faces` as `layout`.
pub fn render_layout(faces: &FaceSet, layout: CubeLayout, cfg: &ConvertConfig) -> Result<RgbaImage> {
    match layout {
        CubeLayout::Equirectangular => to_equirectangular_with(faces, faces.face_size(), cfg),
        _ => compose_layout(faces, layout, faces.face_size()),
    }
}

/// Detects (or takes from `cfg`) the layout of `image`, unpacks its faces and
/// produces every target layout.
///
/// Notes:
/// - Detection failure without an override is `UnrecognizedLayout`.
/// - Targets keep the order given in `cfg.targets`; duplicates are dropped.
#[instrument(skip_all)]
pub fn convert_image(image: &RgbaImage, cfg: &ConvertConfig) -> Result<ConvertOutput> {
    cfg.validate()?;

    let source = resolve_source(image, cfg)?;
    info!(layout = %source.layout, face_size = source.face_size, "source resolved");
    let faces = faces_from_image(image, &source, cfg)?;

    let mut targets = if cfg.targets.is_empty() {
        default_targets(source.layout)
    } else {
        cfg.targets.clone()
    };
    let mut seen = Vec::with_capacity(targets.len());
    targets.retain(|t| {
        if seen.contains(t) {
            false
        } else {
            seen.push(*t);
            true
        }
    });

    let mut outputs = Vec::with_capacity(targets.len());
    for layout in targets {
        let rgba = render_layout(&faces, layout, cfg)?;
        debug!(%layout, w = rgba.width(), h = rgba.height(), "rendered target");
        outputs.push(ConvertedCubemap::new(Some(layout), rgba));
    }
    Ok(ConvertOutput {
        source,
        faces,
        outputs,
    })
}
