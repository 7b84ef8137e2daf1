// Copyright @yucwang 2026

pub mod exr_utils;
pub mod png_utils;

use std::fmt;

#[derive(Debug)]
pub enum ImageWriteError {
    Exr(exr::error::Error),
    Image(image::ImageError),
    /// Output path has an extension no writer handles.
    UnsupportedFormat(String),
}

impl fmt::Display for ImageWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageWriteError::Exr(e) => write!(f, "EXR write failed: {}", e),
            ImageWriteError::Image(e) => write!(f, "image write failed: {}", e),
            ImageWriteError::UnsupportedFormat(path) =>
                write!(f, "unsupported output format for '{}', expected .exr or .png", path),
        }
    }
}

impl std::error::Error for ImageWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageWriteError::Exr(e) => Some(e),
            ImageWriteError::Image(e) => Some(e),
            ImageWriteError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<exr::error::Error> for ImageWriteError {
    fn from(e: exr::error::Error) -> Self {
        ImageWriteError::Exr(e)
    }
}

impl From<image::ImageError> for ImageWriteError {
    fn from(e: image::ImageError) -> Self {
        ImageWriteError::Image(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Linear HDR, written before tonemapping.
    Exr,
    /// 8-bit sRGB, written after tonemapping.
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &str) -> Result<Self, ImageWriteError> {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("exr") => Ok(OutputFormat::Exr),
            Some("png") => Ok(OutputFormat::Png),
            _ => Err(ImageWriteError::UnsupportedFormat(path.to_string())),
        }
    }
}
