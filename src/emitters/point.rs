// Copyright @yucwang 2026

use crate::core::lighting::{LightEmission, LightSample};
use crate::core::rng::LcgRng;
use crate::math::constants::Vector3f;
use crate::math::spectrum::{RGBSpectrum, SpectralSample};
use crate::math::warp::sample_uniform_sphere;

/// Isotropic point light with radiant intensity `intensity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3f,
    pub intensity: RGBSpectrum,
}

impl PointLight {
    pub fn new(position: Vector3f, intensity: RGBSpectrum) -> Self {
        Self { position, intensity }
    }

    pub fn emit(&self, rng: &mut LcgRng) -> LightEmission {
        LightEmission { origin: self.position, direction: sample_uniform_sphere(&rng.next_2d()) }
    }

    /// Inverse-square falloff. A shading point sitting on the light gets a
    /// zero weight instead of an infinite one.
    pub fn sample_toward(&self, position: &Vector3f, wav: SpectralSample) -> LightSample {
        let to_light = self.position - position;
        let distance = to_light.norm();
        if !(distance > 0.0) {
            return LightSample { direction: Vector3f::new(0.0, 0.0, 1.0), weight: 0.0, distance: 0.0 };
        }
        LightSample {
            direction: to_light / distance,
            weight: self.intensity.channel(wav) / (distance * distance),
            distance,
        }
    }
}
