use crate::model::CubeLayout;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Resampling used when a custom-layout face is rotated by a non-right angle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationFilter {
    Nearest,
    #[default]
    Bilinear,
}

impl FromStr for RotationFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            _ => Err(format!("unknown rotation filter: {s}")),
        }
    }
}

/// How the panorama is sampled when unpacking an equirectangular image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EquirectSampling {
    /// Nearest pixel (the established behavior).
    #[default]
    Nearest,
    /// Catmull-Rom over the panorama; smoother on downscale.
    Bicubic,
}

impl FromStr for EquirectSampling {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bicubic" | "cubic" => Ok(Self::Bicubic),
            _ => Err(format!("unknown equirect sampling: {s}")),
        }
    }
}

/// Conversion settings shared by the pipeline and the `*_with` operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertConfig {
    /// Skip detection and treat the input as this layout.
    #[serde(default)]
    pub source_layout: Option<CubeLayout>,
    /// Face size for an equirectangular source. None derives it from the width.
    #[serde(default)]
    pub face_size: Option<u32>,
    /// Layouts to produce. Empty means every layout other than the source.
    #[serde(default)]
    pub targets: Vec<CubeLayout>,
    /// Resampling for non-right-angle custom rotations.
    #[serde(default)]
    pub rotation_filter: RotationFilter,
    /// Sampling of the panorama when unpacking an equirectangular source.
    #[serde(default)]
    pub equirect_sampling: EquirectSampling,
    /// Panorama size multiplier: output is `4k x 2k` face sizes.
    #[serde(default = "default_equirect_oversample")]
    pub equirect_oversample: u32,
    /// Split projection rows across threads when feature "parallel" is on.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            source_layout: None,
            face_size: None,
            targets: Vec::new(),
            rotation_filter: RotationFilter::default(),
            equirect_sampling: EquirectSampling::default(),
            equirect_oversample: default_equirect_oversample(),
            parallel: default_parallel(),
        }
    }
}

impl ConvertConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::CubemapError;

        if self.equirect_oversample == 0 {
            return Err(CubemapError::InvalidConfig(
                "equirect_oversample must be at least 1".into(),
            ));
        }
        if self.face_size == Some(0) {
            return Err(CubemapError::InvalidConfig(
                "face_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Panorama dimensions produced for `face_size`.
    pub fn equirect_size(&self, face_size: u32) -> crate::error::Result<(u32, u32)> {
        let k = self.equirect_oversample as u64;
        let w = 4 * k * face_size as u64;
        let h = 2 * k * face_size as u64;
        match (u32::try_from(w), u32::try_from(h)) {
            (Ok(w), Ok(h)) => Ok((w, h)),
            _ => Err(crate::error::CubemapError::InvalidDimensions { width: w, height: h }),
        }
    }

    /// Create a fluent builder for `ConvertConfig`.
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder::new()
    }
}

fn default_equirect_oversample() -> u32 {
    2
}
fn default_parallel() -> bool {
    false
}

/// Builder for `ConvertConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct ConvertConfigBuilder {
    cfg: ConvertConfig,
}

impl ConvertConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: ConvertConfig::default(),
        }
    }
    pub fn source_layout(mut self, v: Option<CubeLayout>) -> Self {
        self.cfg.source_layout = v;
        self
    }
    pub fn face_size(mut self, v: Option<u32>) -> Self {
        self.cfg.face_size = v;
        self
    }
    pub fn targets(mut self, v: Vec<CubeLayout>) -> Self {
        self.cfg.targets = v;
        self
    }
    pub fn target(mut self, v: CubeLayout) -> Self {
        self.cfg.targets.push(v);
        self
    }
    pub fn rotation_filter(mut self, v: RotationFilter) -> Self {
        self.cfg.rotation_filter = v;
        self
    }
    pub fn equirect_sampling(mut self, v: EquirectSampling) -> Self {
        self.cfg.equirect_sampling = v;
        self
    }
    pub fn equirect_oversample(mut self, v: u32) -> Self {
        self.cfg.equirect_oversample = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> ConvertConfig {
        self.cfg
    }
}
