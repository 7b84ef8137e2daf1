// Copyright @yucwang 2026

use crate::core::material::{Material, MaterialSample, ShadingPoint, Side};
use crate::core::rng::LcgRng;
use crate::core::tangent_frame::TangentFrame;
use crate::math::constants::{Float, Vector3f, INV_PI};
use crate::math::spectrum::{RGBSpectrum, SpectralSample};
use crate::math::warp::sample_cosine_hemisphere;

pub struct LambertianDiffuse {
    albedo: RGBSpectrum,
}

impl LambertianDiffuse {
    pub fn new(albedo: RGBSpectrum) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> RGBSpectrum {
        self.albedo
    }
}

impl Material for LambertianDiffuse {
    fn name(&self) -> &'static str {
        "diffuse"
    }

    fn wav_brdf(&self, shading: &ShadingPoint, view: &Vector3f, light: &Vector3f, wav: SpectralSample) -> Float {
        if view.dot(&shading.normal) <= 0.0 || light.dot(&shading.normal) <= 0.0 {
            return 0.0;
        }
        self.albedo.channel(wav) * INV_PI
    }

    // Cosine-weighted, so brdf * cos / pdf reduces to the albedo.
    fn wav_sample(&self,
                  shading: &ShadingPoint,
                  _view: &Vector3f,
                  _side: Side,
                  rng: &mut LcgRng,
                  wav: SpectralSample) -> MaterialSample {
        let frame = TangentFrame::new(&shading.normal);
        let local = sample_cosine_hemisphere(&rng.next_2d());
        MaterialSample {
            direction: frame.to_world(&local).normalize(),
            weight: self.albedo.channel(wav),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;

    fn shading(normal: Vector3f) -> ShadingPoint {
        ShadingPoint { position: Vector3f::zeros(), normal, texcoord: Vector2f::zeros() }
    }

    #[test]
    fn test_brdf_is_albedo_over_pi() {
        let material = LambertianDiffuse::new(RGBSpectrum::new(0.2, 0.5, 0.8));
        let sp = shading(Vector3f::new(0.0, 1.0, 0.0));
        let view = Vector3f::new(0.0, 1.0, 0.0);
        let light = Vector3f::new(0.6, 0.8, 0.0);
        for c in 0..3 {
            let wav = SpectralSample::from_seed(c as u64);
            let expected = [0.2, 0.5, 0.8][c] * INV_PI;
            assert!((material.wav_brdf(&sp, &view, &light, wav) - expected).abs() < 1e-6);
        }
        let below = Vector3f::new(0.0, -1.0, 0.0);
        assert_eq!(material.wav_brdf(&sp, &view, &below, SpectralSample::from_seed(0)), 0.0);
    }

    #[test]
    fn test_samples_stay_in_the_normal_hemisphere() {
        let material = LambertianDiffuse::new(RGBSpectrum::splat(0.7));
        let n = Vector3f::new(1.0, 2.0, -0.5).normalize();
        let sp = shading(n);
        let mut rng = LcgRng::new(3);
        let mut mean_cos = 0.0;
        let count = 20000;
        for _ in 0..count {
            let s = material.wav_sample(&sp, &n, Side::Front, &mut rng, SpectralSample::from_seed(1));
            let cos = s.direction.dot(&n);
            assert!(cos >= -1e-5);
            assert!((s.direction.norm() - 1.0).abs() < 1e-4);
            assert!((s.weight - 0.7).abs() < 1e-6);
            mean_cos += cos;
        }
        // E[cos] under a cosine-weighted hemisphere is 2/3.
        assert!((mean_cos / count as Float - 2.0 / 3.0).abs() < 0.01);
    }
}
