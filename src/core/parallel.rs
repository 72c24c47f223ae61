use std::sync::atomic::{AtomicU32, Ordering};
use crate::core::common::Float;

/// `f32` that supports lock-free accumulation from many threads.
pub struct AtomicFloat {
    bits: AtomicU32
}

impl AtomicFloat {
    pub fn new(v: Float) -> Self {
        Self {
            bits: AtomicU32::new(v.to_bits())
        }
    }

    pub fn add(&self, v: Float) {
        let mut oldbits = self.bits.load(Ordering::Relaxed);

        loop {
            let newbits = (Float::from_bits(oldbits) + v).to_bits();

            match self.bits.compare_exchange_weak(oldbits, newbits, Ordering::SeqCst, Ordering::Relaxed) {
                Ok(_) => break,
                Err(x) => oldbits = x
            }
        }
    }

    pub fn get(&self) -> Float {
        Float::from_bits(self.bits.load(Ordering::SeqCst))
    }

    pub fn reset(&self) {
        self.bits.store(0, Ordering::SeqCst)
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self {
            bits: AtomicU32::new(0)
        }
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        let bits = self.bits.load(Ordering::SeqCst);

        Self {
            bits: AtomicU32::new(bits)
        }
    }
}
