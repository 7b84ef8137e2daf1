// Copyright @yucwang 2026

use crate::core::material::{Material, MaterialSample, ShadingPoint, Side};
use crate::core::rng::LcgRng;
use crate::materials::mirror::reflect;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::{RGBSpectrum, SpectralSample};

/// Smooth glass-like interface. The side a path arrives from picks the
/// relative index; reflection and refraction are chosen stochastically in
/// proportion to the Fresnel term.
pub struct Dielectric {
    int_ior: Float,
    ext_ior: Float,
    specular_reflectance: RGBSpectrum,
    specular_transmittance: RGBSpectrum,
}

impl Dielectric {
    pub fn new(int_ior: Float, ext_ior: Float) -> Self {
        Self::with_tint(int_ior, ext_ior, RGBSpectrum::splat(1.0), RGBSpectrum::splat(1.0))
    }

    pub fn with_tint(int_ior: Float,
                     ext_ior: Float,
                     specular_reflectance: RGBSpectrum,
                     specular_transmittance: RGBSpectrum) -> Self {
        Self { int_ior, ext_ior, specular_reflectance, specular_transmittance }
    }

    fn indices(&self, side: Side) -> (Float, Float) {
        match side {
            Side::Front => (self.ext_ior, self.int_ior),
            Side::Back => (self.int_ior, self.ext_ior),
        }
    }
}

/// Unpolarized Fresnel reflectance for light arriving at `cos_i > 0` from
/// the `eta_i` medium.
pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let cos_i = cos_i.max(0.0).min(1.0);
    let eta = eta_i / eta_t;
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i).max(0.0);
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    0.5 * (r_parl * r_parl + r_perp * r_perp)
}

/// Refracts `v` (pointing away from the surface, on the `n` side) through
/// the interface. `None` on total internal reflection.
pub fn refract(v: &Vector3f, n: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = v.dot(n).max(-1.0).min(1.0);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i).max(0.0);
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(-eta * v + (eta * cos_i - cos_t) * n)
}

impl Material for Dielectric {
    fn name(&self) -> &'static str {
        "dielectric"
    }

    fn wav_brdf(&self, _shading: &ShadingPoint, _view: &Vector3f, _light: &Vector3f, _wav: SpectralSample) -> Float {
        0.0
    }

    fn wav_sample(&self,
                  shading: &ShadingPoint,
                  view: &Vector3f,
                  side: Side,
                  rng: &mut LcgRng,
                  wav: SpectralSample) -> MaterialSample {
        let n = shading.normal;
        let (eta_i, eta_t) = self.indices(side);
        let cos_i = view.dot(&n);
        let fresnel = fresnel_dielectric(cos_i, eta_i, eta_t);

        if rng.next_f32() < fresnel {
            return MaterialSample {
                direction: reflect(view, &n).normalize(),
                weight: self.specular_reflectance.channel(wav),
            };
        }

        match refract(view, &n, eta_i / eta_t) {
            Some(direction) => MaterialSample {
                direction: direction.normalize(),
                weight: self.specular_transmittance.channel(wav),
            },
            None => MaterialSample {
                direction: reflect(view, &n).normalize(),
                weight: self.specular_reflectance.channel(wav),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;

    fn up() -> ShadingPoint {
        ShadingPoint {
            position: Vector3f::zeros(),
            normal: Vector3f::new(0.0, 0.0, 1.0),
            texcoord: Vector2f::zeros(),
        }
    }

    #[test]
    fn test_fresnel_at_normal_incidence() {
        let r = fresnel_dielectric(1.0, 1.0, 1.5);
        assert!((r - 0.04).abs() < 1e-4);
        assert_eq!(fresnel_dielectric(0.1, 1.5, 1.0), 1.0);
    }

    #[test]
    fn test_normal_incidence_mostly_refracts_straight_through() {
        let glass = Dielectric::new(1.5, 1.0);
        let sp = up();
        let view = Vector3f::new(0.0, 0.0, 1.0);
        let mut rng = LcgRng::new(9);
        let count = 20000;
        let mut reflected = 0;
        for _ in 0..count {
            let s = glass.wav_sample(&sp, &view, Side::Front, &mut rng, SpectralSample::from_seed(0));
            assert!((s.weight - 1.0).abs() < 1e-6);
            if s.direction.z > 0.0 {
                reflected += 1;
            } else {
                assert!((s.direction - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);
            }
        }
        let fraction = reflected as Float / count as Float;
        assert!((fraction - 0.04).abs() < 0.01, "reflected fraction {}", fraction);
    }

    #[test]
    fn test_grazing_exit_is_totally_reflected() {
        let glass = Dielectric::new(1.5, 1.0);
        let sp = up();
        let view = Vector3f::new(0.9, 0.0, 0.2).normalize();
        let mut rng = LcgRng::new(1);
        for _ in 0..100 {
            let s = glass.wav_sample(&sp, &view, Side::Back, &mut rng, SpectralSample::from_seed(0));
            assert!(s.direction.z > 0.0);
        }
    }

    #[test]
    fn test_refraction_bends_toward_the_normal() {
        let view = Vector3f::new(0.6, 0.0, 0.8);
        let t = refract(&view, &Vector3f::new(0.0, 0.0, 1.0), 1.0 / 1.5).unwrap();
        assert!(t.z < 0.0);
        // Snell: sin_t = sin_i / 1.5
        assert!((t.x.abs() - 0.6 / 1.5).abs() < 1e-5);
        assert!((t.norm() - 1.0).abs() < 1e-5);
    }
}
