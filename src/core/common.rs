use std::sync::{Arc, Weak};
use std::path::PathBuf;
use lazy_static::lazy_static;
use indicatif::ProgressBar;
use parking_lot::RwLock;
use crate::core::error::BptError;

lazy_static! {
    static ref PB: RwLock<Option<Weak<ProgressBar>>> = RwLock::new(None);
}

pub fn set_progress_bar(pb: Option<Weak<ProgressBar>>) {
    *PB.write() = pb;
}

pub fn get_progress_bar() -> Option<Arc<ProgressBar>> {
    PB.read().as_ref()?.upgrade()
}

pub type Float = f32;

pub const PI                : Float = 3.14159265358979323846;
pub const INV_PI            : Float = 0.31830988618379067154;
pub const INV4_PI           : Float = 0.07957747154594766788;
pub const INFINITY          : Float = std::f32::INFINITY;
pub const RAY_EPSILON       : Float = 0.0001;
pub const SHADOW_EPSILON    : Float = 0.0001;

#[inline]
pub fn clamp<T: PartialOrd>(val: T, low: T, high: T) -> T {
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 { return 12.92 * value; }

    1.055 * value.powf(1.0 / 2.4) - 0.055
}

/// Kahan-compensated running sum. Used where many small ratios are
/// accumulated into one reciprocal weight.
#[derive(Debug, Default, Copy, Clone)]
pub struct CompensatedSum {
    sum : Float,
    comp: Float
}

impl CompensatedSum {
    pub fn new(init: Float) -> Self {
        Self { sum: init, comp: 0.0 }
    }

    pub fn add(&mut self, v: Float) {
        let y = v - self.comp;
        let t = self.sum + y;
        self.comp = if t.is_finite() { (t - self.sum) - y } else { 0.0 };
        self.sum = t;
    }

    pub fn result(&self) -> Float { self.sum }
}

/// Whether the last round of a render whose sample count is not a power
/// of two gets exported.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CheckpointPolicy {
    pub export_final: bool
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self { export_final: true }
    }
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width           : usize,
    pub height          : usize,
    pub tile_width      : usize,
    pub tile_height     : usize,
    pub spp             : u32,
    pub nthreads        : usize,
    pub seed            : u64,
    pub time_start      : Float,
    pub time_end        : Float,
    pub brightness      : Float,
    pub max_vertices    : usize,
    pub arena_capacity  : usize,
    pub checkpoint      : CheckpointPolicy,
    pub quiet           : bool,
    pub outdir          : PathBuf
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            tile_width: 16,
            tile_height: 16,
            spp: 16,
            nthreads: 0,
            seed: 591_835_103,
            time_start: 0.0,
            time_end: 0.0,
            brightness: 1.0,
            max_vertices: 64,
            arena_capacity: 1 << 16,
            checkpoint: CheckpointPolicy::default(),
            quiet: false,
            outdir: PathBuf::from(".")
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), BptError> {
        if self.width == 0 || self.height == 0 {
            return Err(BptError::InvalidSettings(
                format!("image resolution {}x{} is empty", self.width, self.height)));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(BptError::InvalidSettings("tile size must be positive".to_owned()));
        }
        if self.spp == 0 {
            return Err(BptError::InvalidSettings("samples per pixel must be positive".to_owned()));
        }
        if self.time_end < self.time_start {
            return Err(BptError::InvalidSettings(
                format!("shutter closes ({}) before it opens ({})", self.time_end, self.time_start)));
        }
        if self.max_vertices < 2 {
            return Err(BptError::InvalidSettings("subpaths need room for at least two vertices".to_owned()));
        }

        Ok(())
    }

    /// Worker count with 0 resolved to the number of CPUs.
    pub fn thread_count(&self) -> usize {
        match self.nthreads {
            0 => num_cpus::get(),
            n => n
        }
    }
}
