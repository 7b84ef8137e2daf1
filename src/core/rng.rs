// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generator for one lane of one pass. Seeds are scrambled so that
    /// neighbouring lanes and consecutive passes do not start on
    /// correlated LCG states.
    pub fn for_lane(seed: u64, pass_id: u64, lane: u64, stream: u64) -> Self {
        let mut h = mix64(seed ^ stream.wrapping_mul(0xD1B5_4A32_D192_ED03));
        h = mix64(h ^ pass_id);
        h = mix64(h ^ lane);
        Self::new(h)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() >> 8) as Float * (1.0 / (1u32 << 24) as Float)
    }

    pub fn next_2d(&mut self) -> Vector2f {
        let u = self.next_f32();
        let v = self.next_f32();
        Vector2f::new(u, v)
    }

    /// Uniform integer in [0, bound). `bound` must be positive.
    pub fn next_index(&mut self, bound: usize) -> usize {
        ((self.next_u32() as u64 * bound as u64) >> 32) as usize
    }
}

// splitmix64 finalizer
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_f32_range() {
        let mut rng = LcgRng::new(7);
        for _ in 0..10000 {
            let v = rng.next_f32();
            assert!(v >= 0.0 && v < 1.0);
        }
    }

    #[test]
    fn test_next_index_range() {
        let mut rng = LcgRng::new(11);
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let i = rng.next_index(5);
            assert!(i < 5);
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_lane_streams_differ() {
        let mut a = LcgRng::for_lane(0, 1, 0, 0);
        let mut b = LcgRng::for_lane(0, 1, 1, 0);
        let mut c = LcgRng::for_lane(0, 2, 0, 0);
        let mut d = LcgRng::for_lane(0, 1, 0, 1);
        let first = a.next_u32();
        assert_ne!(first, b.next_u32());
        assert_ne!(first, c.next_u32());
        assert_ne!(first, d.next_u32());
    }

    #[test]
    fn test_mean_is_about_half() {
        let mut rng = LcgRng::for_lane(3, 4, 5, 6);
        let n = 100000;
        let mean: f64 = (0..n).map(|_| rng.next_f32() as f64).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.01);
    }
}
