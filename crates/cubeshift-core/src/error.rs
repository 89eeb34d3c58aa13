use crate::model::CubeLayout;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CubemapError {
    #[error("Unrecognized cubemap layout for a {width}x{height} image")]
    UnrecognizedLayout { width: u32, height: u32 },
    #[error("Operation is not supported for layout {0:?}")]
    UnsupportedOperationForLayout(CubeLayout),
    #[error("Buffer too small: need {}x{}, got {}x{}", required.0, required.1, actual.0, actual.1)]
    BufferTooSmall {
        required: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Inconsistent face sizes: expected {expected}x{expected}, found {}x{}", found.0, found.1)]
    InconsistentFaceSizes { expected: u32, found: (u32, u32) },
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u64, height: u64 },
    #[error("Pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CubemapError>;
