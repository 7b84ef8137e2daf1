// Copyright @yucwang 2026

use crate::math::constants::Float;
use std::sync::atomic::{AtomicU32, Ordering};

/// `f32` with a lock-free additive update, stored as its bit pattern.
#[derive(Debug, Default)]
pub struct AtomicFloat {
    bits: AtomicU32,
}

impl AtomicFloat {
    pub fn new(v: Float) -> Self {
        Self { bits: AtomicU32::new(v.to_bits()) }
    }

    pub fn load(&self) -> Float {
        Float::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn store(&self, v: Float) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn add(&self, v: Float) {
        let mut old_bits = self.bits.load(Ordering::Relaxed);
        loop {
            let new_bits = (Float::from_bits(old_bits) + v).to_bits();
            match self.bits.compare_exchange_weak(old_bits, new_bits,
                                                  Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(current) => old_bits = current,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AtomicFloat;
    use std::thread;

    #[test]
    fn test_concurrent_adds() {
        let value = AtomicFloat::new(0.0);
        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        value.add(0.5);
                    }
                });
            }
        });
        assert_eq!(value.load(), 2000.0);
    }

    #[test]
    fn test_store_resets() {
        let value = AtomicFloat::new(3.0);
        value.add(1.0);
        value.store(0.0);
        assert_eq!(value.load(), 0.0);
    }
}
