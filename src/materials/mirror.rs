// Copyright @yucwang 2026

use crate::core::material::{Material, MaterialSample, ShadingPoint, Side};
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::{RGBSpectrum, SpectralSample};

/// Perfect specular reflector. Being a delta lobe, it never answers a
/// connection query.
pub struct Mirror {
    reflectance: RGBSpectrum,
}

impl Mirror {
    pub fn new(reflectance: RGBSpectrum) -> Self {
        Self { reflectance }
    }
}

pub fn reflect(v: &Vector3f, n: &Vector3f) -> Vector3f {
    2.0 * v.dot(n) * n - v
}

impl Material for Mirror {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn wav_brdf(&self, _shading: &ShadingPoint, _view: &Vector3f, _light: &Vector3f, _wav: SpectralSample) -> Float {
        0.0
    }

    fn wav_sample(&self,
                  shading: &ShadingPoint,
                  view: &Vector3f,
                  _side: Side,
                  _rng: &mut LcgRng,
                  wav: SpectralSample) -> MaterialSample {
        MaterialSample {
            direction: reflect(view, &shading.normal).normalize(),
            weight: self.reflectance.channel(wav),
        }
    }
}
