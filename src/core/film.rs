// Copyright @yucwang 2026

use crate::core::atomic_float::AtomicFloat;
use crate::core::tonemap::Tonemap;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Shown for pixels whose mean is not a finite number.
pub const NAN_COLOR: [Float; 3] = [0.9, 0.4, 0.9];

const CHECKER_SIZE: usize = 8;
const CHECKER_DARK: Float = 0.4;
const CHECKER_LIGHT: Float = 0.9;

#[derive(Debug, Default)]
struct FilmPixel {
    sum: [AtomicFloat; 3],
    count: AtomicU32,
}

/// Per-pixel radiance sums and sample counts. Samples are added through
/// `&self` so that worker threads can write into the same film; sums and
/// counts are only ever reset together by [`Film::clear`].
///
/// Pixel `(0, 0)` is the bottom-left corner, matching normalized device
/// coordinates.
pub struct Film {
    width: usize,
    height: usize,
    pixels: Vec<FilmPixel>,
    total_samples: AtomicU64,
}

impl Film {
    pub fn new(width: usize, height: usize) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        pixels.resize_with(width * height, FilmPixel::default);
        Self { width, height, pixels, total_samples: AtomicU64::new(0) }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.iter_mut() {
            *pixel = FilmPixel::default();
        }
        self.total_samples = AtomicU64::new(0);
    }

    /// Adds one sample's radiance to pixel `(x, y)` and bumps its count.
    pub fn add_sample(&self, x: usize, y: usize, rgb: &Vector3f) {
        let pixel = &self.pixels[x + self.width * y];
        for c in 0..3 {
            pixel.sum[c].add(rgb[c]);
        }
        pixel.count.fetch_add(1, Ordering::Relaxed);
        self.total_samples.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds a sample at the pixel covering the normalized device
    /// coordinate `ndc`.
    pub fn splat_ndc(&self, ndc: &Vector2f, rgb: &Vector3f) {
        let (x, y) = ndc_to_pixel(ndc, self.width, self.height);
        self.add_sample(x, y, rgb);
    }

    pub fn sample_count(&self, x: usize, y: usize) -> u32 {
        self.pixels[x + self.width * y].count.load(Ordering::Relaxed)
    }

    pub fn radiance_sum(&self, x: usize, y: usize) -> Vector3f {
        let pixel = &self.pixels[x + self.width * y];
        Vector3f::new(pixel.sum[0].load(), pixel.sum[1].load(), pixel.sum[2].load())
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples.load(Ordering::Relaxed)
    }

    /// Mean radiance of a pixel before tonemapping, with the checkerboard
    /// placeholder for unsampled pixels and [`NAN_COLOR`] for poisoned ones.
    pub fn resolve_pixel(&self, x: usize, y: usize) -> Vector3f {
        let count = self.sample_count(x, y);
        let value = if count != 0 {
            self.radiance_sum(x, y) / count as Float
        } else {
            checker(x, y)
        };
        if value.iter().all(|c| c.is_finite()) {
            value
        } else {
            Vector3f::new(NAN_COLOR[0], NAN_COLOR[1], NAN_COLOR[2])
        }
    }

    /// Tonemapped snapshot, flipped so row 0 is the top of the image.
    /// Must not race with an in-flight pass.
    pub fn resolve(&self, tonemap: Tonemap) -> Bitmap {
        let mut bitmap = Bitmap::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                bitmap[(x, self.height - 1 - y)] = tonemap.apply(self.resolve_pixel(x, y));
            }
        }
        bitmap
    }
}

/// Pixel covering a normalized device coordinate in [-1, 1]^2. Inputs on
/// or past the upper edge land in the last row/column.
pub fn ndc_to_pixel(ndc: &Vector2f, width: usize, height: usize) -> (usize, usize) {
    let to_index = |v: Float, res: usize| -> usize {
        let i = ((v * 0.5 + 0.5) * res as Float).floor();
        if i > 0.0 {
            (i as usize).min(res - 1)
        } else {
            0
        }
    };
    (to_index(ndc.x, width), to_index(ndc.y, height))
}

fn checker(x: usize, y: usize) -> Vector3f {
    let v = if (x / CHECKER_SIZE + y / CHECKER_SIZE) % 2 == 0 { CHECKER_DARK } else { CHECKER_LIGHT };
    Vector3f::new(v, v, v)
}
