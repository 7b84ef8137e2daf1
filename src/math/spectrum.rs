// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

use std::ops;

pub const SPECTRAL_CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBSpectrum {
    rgb: Vector3f
}

impl Default for RGBSpectrum {
    fn default() -> Self {
        Self { rgb: Vector3f::new(0.0f32, 0.0f32, 0.0f32) }
    }
}

impl ops::Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, index: usize) -> &Float {
        &self.rgb[index]
    }
}

impl ops::Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb * rhs }
    }
}

impl RGBSpectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b) }
    }

    pub fn splat(v: Float) -> Self {
        Self::new(v, v, v)
    }

    pub fn rgb(&self) -> Vector3f {
        self.rgb
    }

    /// Value of the channel a path is currently carrying.
    pub fn channel(&self, sample: SpectralSample) -> Float {
        self.rgb[sample.channel()]
    }
}

/// The single colour channel a path transports. Paths pick one channel
/// at start and carry a scalar throughput for it, which is converted back
/// to RGB with [`SpectralSample::to_rgb`] when the path contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralSample {
    channel: usize,
}

impl SpectralSample {
    pub fn from_seed(seed: u64) -> Self {
        Self { channel: (seed % SPECTRAL_CHANNELS as u64) as usize }
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    // Scaled by the channel count so that averaging over uniformly picked
    // channels reproduces the full colour.
    pub fn to_rgb(&self, value: Float) -> Vector3f {
        let mut rgb = Vector3f::zeros();
        rgb[self.channel] = value * SPECTRAL_CHANNELS as Float;
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_cycles_with_seed() {
        assert_eq!(SpectralSample::from_seed(0).channel(), 0);
        assert_eq!(SpectralSample::from_seed(1).channel(), 1);
        assert_eq!(SpectralSample::from_seed(2).channel(), 2);
        assert_eq!(SpectralSample::from_seed(3).channel(), 0);
        assert_eq!(SpectralSample::from_seed(u64::MAX).channel(), (u64::MAX % 3) as usize);
    }

    #[test]
    fn test_to_rgb_average_is_unbiased() {
        let color = RGBSpectrum::new(0.2, 0.5, 0.8);
        let mut mean = Vector3f::zeros();
        for seed in 0..3 {
            let sample = SpectralSample::from_seed(seed);
            mean += sample.to_rgb(color.channel(sample));
        }
        mean /= 3.0;
        assert!((mean - color.rgb()).norm() < 1e-6);
    }
}
