//! Bidirectional path tracing.
//!
//! For every pixel sample a light subpath and an eye subpath are traced
//! into per-thread vertex lists, then every light vertex is connected to
//! every eye vertex. Each connection is weighted against all other ways of
//! producing the same path with the power heuristic.

pub mod mis;
pub mod vertex;
pub mod walker;
pub mod connection;
pub mod kernel;
pub mod scheduler;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use crate::core::camera::Camera;
use crate::core::common::{Float, RenderSettings};
use crate::core::error::BptError;
use crate::core::scene::RenderScene;
use crate::core::sensor::{CheckpointSink, ImageSensor};
use scheduler::TileScheduler;

pub fn init_stats() {
    walker::init_stats();
    connection::init_stats();
    scheduler::init_stats();
}

/// Per-sample state shared by the walker and the connection evaluator.
pub struct PixelContext<'s, S: ?Sized> {
    pub scene       : &'s S,
    pub sensor      : &'s ImageSensor,
    /// Raster position of the sample.
    pub px          : Float,
    pub py          : Float,
    /// Hero wavelength index handed to scattering queries.
    pub wl_hint     : usize,
    pub time        : Float,
    pub thread_id   : usize,
    pub max_vertices: usize
}

pub struct BptIntegrator {
    settings: RenderSettings,
    cancel  : Arc<AtomicBool>
}

impl BptIntegrator {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            cancel: Arc::new(AtomicBool::new(false))
        }
    }

    pub fn settings(&self) -> &RenderSettings { &self.settings }

    /// Flag that stops the render once the round in flight has finished.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Renders into `sensor`, exporting checkpoints through `sink`. Returns
    /// the number of sample rounds that completed.
    pub fn render<S, C>(
        &self, scene: &S, camera: &C, sensor: &ImageSensor,
        sink: &dyn CheckpointSink) -> Result<u32, BptError>
        where S: RenderScene + ?Sized, C: Camera + ?Sized {
        TileScheduler::new(&self.settings, self.cancel.clone()).run(scene, camera, sensor, sink)
    }
}
