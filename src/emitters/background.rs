// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::{RGBSpectrum, SpectralSample};

/// Radiance for rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Constant(RGBSpectrum),
    /// Blend from `horizon` to `zenith` by the height of the direction
    /// above the horizon; everything below it sees `ground`.
    Sky { zenith: RGBSpectrum, horizon: RGBSpectrum, ground: RGBSpectrum },
}

impl Default for Background {
    fn default() -> Self {
        Background::Constant(RGBSpectrum::splat(0.0))
    }
}

impl Background {
    pub fn eval(&self, direction: &Vector3f, wav: SpectralSample) -> Float {
        match self {
            Background::Constant(radiance) => radiance.channel(wav),
            Background::Sky { zenith, horizon, ground } => {
                let len = direction.norm();
                if !(len > 0.0) {
                    return 0.0;
                }
                let up = direction.y / len;
                if up < 0.0 {
                    return ground.channel(wav);
                }
                let h = horizon.channel(wav);
                h + (zenith.channel(wav) - h) * up
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let bg = Background::Constant(RGBSpectrum::new(0.1, 0.2, 0.3));
        assert!((bg.eval(&Vector3f::new(1.0, -3.0, 0.0), SpectralSample::from_seed(2)) - 0.3).abs() < 1e-6);
        assert_eq!(Background::default().eval(&Vector3f::x(), SpectralSample::from_seed(0)), 0.0);
    }

    #[test]
    fn test_sky_gradient() {
        let bg = Background::Sky {
            zenith: RGBSpectrum::splat(1.0),
            horizon: RGBSpectrum::splat(0.5),
            ground: RGBSpectrum::splat(0.1),
        };
        let wav = SpectralSample::from_seed(0);
        assert!((bg.eval(&Vector3f::new(0.0, 4.0, 0.0), wav) - 1.0).abs() < 1e-6);
        assert!((bg.eval(&Vector3f::new(1.0, 0.0, 0.0), wav) - 0.5).abs() < 1e-6);
        assert!((bg.eval(&Vector3f::new(0.0, -1.0, 0.0), wav) - 0.1).abs() < 1e-6);
    }
}
