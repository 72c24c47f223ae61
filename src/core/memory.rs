use bumpalo::Bump;
use bumpalo::collections::Vec as BumpVec;
use crate::core::error::BptError;

/// Per-thread bump arena sized to the worst-case path. Scatter functions and
/// vertex lists live here for one pixel and are reclaimed together by
/// `reset`. Allocations that spill past the initial chunk are reported as
/// `ArenaExhausted`.
pub struct ScratchArena {
    bump    : Bump,
    capacity: usize,
    baseline: usize
}

impl ScratchArena {
    pub fn new(capacity: usize) -> Self {
        let bump = Bump::with_capacity(capacity);
        let baseline = bump.allocated_bytes();

        Self { bump, capacity, baseline }
    }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn alloc<T>(&self, val: T) -> Result<&T, BptError> {
        let r = self.bump.alloc(val);
        self.check()?;

        Ok(r)
    }

    pub fn vec<T>(&self, capacity: usize) -> Result<BumpVec<T>, BptError> {
        let v = BumpVec::with_capacity_in(capacity, &self.bump);
        self.check()?;

        Ok(v)
    }

    pub fn check(&self) -> Result<(), BptError> {
        if self.bump.allocated_bytes() > self.baseline {
            Err(BptError::ArenaExhausted { capacity: self.capacity })
        } else {
            Ok(())
        }
    }

    /// Frees everything allocated since the last reset. A bump that grew
    /// past its initial chunk is rebuilt at the configured capacity, so every
    /// overflow is reported.
    pub fn reset(&mut self) {
        self.bump.reset();

        if self.bump.allocated_bytes() > self.baseline {
            self.bump = Bump::with_capacity(self.capacity);
            self.baseline = self.bump.allocated_bytes();
        }
    }
}
