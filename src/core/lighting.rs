// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::SpectralSample;

/// Connection from a shading point toward one light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    pub direction: Vector3f,
    /// Incident radiance weight for the lane's channel, already divided by
    /// any sampling density. Non-positive weights are skipped.
    pub weight: Float,
    pub distance: Float,
}

/// Starting ray of a light path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightEmission {
    pub origin: Vector3f,
    pub direction: Vector3f,
}

pub trait Lighting: Send + Sync {
    fn light_count(&self) -> usize;

    fn emit_light(&self, index: usize, rng: &mut LcgRng) -> LightEmission;

    fn redirect(&self, position: &Vector3f, index: usize, wav: SpectralSample) -> LightSample;

    /// Radiance arriving along `direction` from outside the scene.
    fn background(&self, direction: &Vector3f, wav: SpectralSample) -> Float;
}
