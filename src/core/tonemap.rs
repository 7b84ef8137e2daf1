// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tonemap {
    Identity,
    /// ACES fitted filmic curve (Narkowicz 2015).
    Filmic,
}

impl Default for Tonemap {
    fn default() -> Self {
        Tonemap::Filmic
    }
}

impl Tonemap {
    pub fn apply(&self, color: Vector3f) -> Vector3f {
        match self {
            Tonemap::Identity => color,
            Tonemap::Filmic => color.map(aces_filmic),
        }
    }
}

fn aces_filmic(x: Float) -> Float {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    ((x * (a * x + b)) / (x * (c * x + d) + e)).max(0.0).min(1.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTonemap(pub String);

impl fmt::Display for UnknownTonemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tonemap: {}", self.0)
    }
}

impl std::error::Error for UnknownTonemap {}

impl FromStr for Tonemap {
    type Err = UnknownTonemap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "none" | "linear" => Ok(Tonemap::Identity),
            "filmic" | "aces" => Ok(Tonemap::Filmic),
            other => Err(UnknownTonemap(other.to_string())),
        }
    }
}
