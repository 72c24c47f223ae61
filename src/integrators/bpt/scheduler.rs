use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use crossbeam::crossbeam_channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use parking_lot::Mutex;
use rayon::prelude::*;
use crate::stat_counter;
use crate::core::camera::Camera;
use crate::core::common::{Float, CheckpointPolicy, RenderSettings, set_progress_bar};
use crate::core::error::BptError;
use crate::core::memory::ScratchArena;
use crate::core::rng::RNG;
use crate::core::scene::RenderScene;
use crate::core::sensor::{CheckpointSink, ImageSensor};
use crate::samplers::independent::IndependentLightPathSampler;
use super::kernel::RenderJob;

stat_counter!("BPT/Failed tiles", nfailed_tiles);
stat_counter!("BPT/Checkpoint exports", ncheckpoints);

pub fn init_stats() {
    nfailed_tiles::init();
    ncheckpoints::init();
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tile {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize
}

impl Tile {
    pub fn area(&self) -> usize {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// Covers the image with `tile_width x tile_height` tiles in row-major
/// order; tiles on the right and bottom edges are clipped.
pub fn make_tiles(width: usize, height: usize, tile_width: usize, tile_height: usize) -> Vec<Tile> {
    let nx = (width + tile_width - 1) / tile_width;
    let ny = (height + tile_height - 1) / tile_height;

    (0..nx * ny)
        .map(|i| {
            let (tx, ty) = (i % nx, i / nx);
            let x0 = tx * tile_width;
            let y0 = ty * tile_height;

            Tile {
                x0,
                y0,
                x1: std::cmp::min(x0 + tile_width, width),
                y1: std::cmp::min(y0 + tile_height, height)
            }
        })
        .collect()
}

/// Whether the sensor is exported once `count` rounds have completed.
pub fn is_checkpoint(count: u32, spp: u32, policy: &CheckpointPolicy) -> bool {
    count.is_power_of_two() || (count == spp && policy.export_final)
}

/// Sample counts at which a render of `spp` rounds exports.
pub fn checkpoint_schedule(spp: u32, policy: &CheckpointPolicy) -> Vec<u32> {
    (1..=spp).filter(|c| is_checkpoint(*c, spp, policy)).collect()
}

/// State owned by one worker thread for the whole render. It is locked by
/// exactly one thread at a time, so the lock is never contended.
struct ThreadContext {
    arena   : ScratchArena,
    sampler : IndependentLightPathSampler
}

enum TileReport {
    Finished,
    Failed(Tile, BptError)
}

/// Runs sample rounds over a pool of workers. Each round renders every
/// tile once; the pool is drained before the next round starts so that
/// checkpoints see a consistent sensor.
pub struct TileScheduler<'r> {
    settings: &'r RenderSettings,
    cancel  : Arc<AtomicBool>
}

impl<'r> TileScheduler<'r> {
    pub fn new(settings: &'r RenderSettings, cancel: Arc<AtomicBool>) -> Self {
        Self { settings, cancel }
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Renders up to `settings.spp` rounds and returns how many completed.
    /// Cancellation takes effect between rounds; a round in flight always
    /// finishes, so the sensor holds exactly the returned number of rounds.
    pub fn run<S, C>(
        &self, scene: &S, camera: &C, sensor: &ImageSensor,
        sink: &dyn CheckpointSink) -> Result<u32, BptError>
        where S: RenderScene + ?Sized, C: Camera + ?Sized {
        let settings = self.settings;
        settings.validate()?;

        let nthreads = settings.thread_count();
        if sensor.width() != settings.width || sensor.height() != settings.height {
            return Err(BptError::InvalidSettings(format!(
                "sensor is {}x{} but the render is {}x{}",
                sensor.width(), sensor.height(), settings.width, settings.height)));
        }
        if sensor.num_separated() < nthreads {
            return Err(BptError::InvalidSettings(format!(
                "sensor has {} splat buffers for {} threads", sensor.num_separated(), nthreads)));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(nthreads)
            .build()
            .map_err(|e| BptError::ThreadPool(e.to_string()))?;

        let mut top_rng = RNG::new(settings.seed);
        let contexts = (0..nthreads)
            .map(|_| Mutex::new(ThreadContext {
                arena: ScratchArena::new(settings.arena_capacity),
                sampler: IndependentLightPathSampler::new(top_rng.uniform_u32() as u64)
            }))
            .collect::<Vec<_>>();

        let tiles = make_tiles(settings.width, settings.height, settings.tile_width, settings.tile_height);
        let job = RenderJob::new(scene, camera, sensor, settings);

        info!(
            "Bidirectional path tracing: {} spp, {} tiles, {} threads",
            settings.spp, tiles.len(), nthreads);

        let pb = Arc::new(if settings.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(settings.spp as u64 * tiles.len() as u64)
        });
        pb.set_style(ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{wide_bar}] {percent}% [{pos}/{len}] ({eta})"));
        set_progress_bar(Some(Arc::downgrade(&pb)));

        let mut completed = 0;

        for round in 0..settings.spp {
            if self.cancelled() {
                warn!("Render cancelled before round {}", round + 1);
                break;
            }

            let (sendt, recvt) = bounded(tiles.len());

            pool.install(|| {
                tiles
                    .par_iter()
                    .for_each(|tile| {
                        let tid = rayon::current_thread_index().unwrap_or(0);
                        let mut tctx = contexts[tid % contexts.len()].lock();

                        let report = match render_tile(&job, tile, tid, &mut tctx) {
                            Ok(()) => TileReport::Finished,
                            Err(e) => TileReport::Failed(*tile, e)
                        };

                        if sendt.send(report).is_err() {
                            error!("Tile report channel closed");
                        }
                    });
            });
            drop(sendt);

            for report in recvt.iter() {
                match report {
                    TileReport::Finished => pb.inc(1),
                    TileReport::Failed(tile, e) => {
                        error!("Tile {:?} failed in round {}: {}", tile, round + 1, e);
                        nfailed_tiles::inc();
                        pb.inc(1);
                    }
                }
            }

            completed = round + 1;

            if is_checkpoint(completed, settings.spp, &settings.checkpoint) {
                let scale = settings.brightness / completed as Float;

                info!("{} samples: exporting checkpoint", completed);
                match sink.export(sensor, completed, scale) {
                    Ok(()) => ncheckpoints::inc(),
                    Err(e) => error!("{}", e)
                }
            }
        }

        info!("Rendering finished after {} rounds", completed);
        pb.finish_and_clear();
        set_progress_bar(None);

        Ok(completed)
    }
}

fn render_tile<S, C>(
    job: &RenderJob<'_, S, C>, tile: &Tile, thread_id: usize,
    tctx: &mut ThreadContext) -> Result<(), BptError>
    where S: RenderScene + ?Sized, C: Camera + ?Sized {
    let ThreadContext { arena, sampler } = tctx;

    for y in tile.y0..tile.y1 {
        for x in tile.x0..tile.x1 {
            let result = job.render_pixel(x, y, thread_id, &mut *sampler, &*arena);
            arena.reset();
            result?;
        }
    }

    Ok(())
}
