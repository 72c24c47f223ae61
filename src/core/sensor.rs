use std::path::{Path, PathBuf};
use anyhow::Result;
use log::{debug, info};
use parking_lot::Mutex;
use crate::stat_counter;
use crate::core::common::Float;
use crate::core::error::BptError;
use crate::core::imageio::write_image;
use crate::core::parallel::AtomicFloat;
use crate::core::spectrum::{SampledSpectrum, WavelengthSamples, xyz_to_rgb};

stat_counter!("Sensor/Rejected sensor contributions", nrejected_contributions);
stat_counter!("Sensor/Splatted contributions", nsplats);

pub fn init_stats() {
    nrejected_contributions::init();
    nsplats::init();
}

/// Per-pixel CIE XYZ accumulation. Contributions at the pixel being rendered
/// go to a shared buffer of atomic floats; splats from connections at the
/// lens go to one buffer per worker thread and are merged on read.
pub struct ImageSensor {
    width       : usize,
    height      : usize,
    pixels      : Vec<[AtomicFloat; 3]>,
    separated   : Vec<Mutex<Vec<[Float; 3]>>>
}

impl ImageSensor {
    pub fn new(width: usize, height: usize, nthreads: usize) -> Self {
        let npixels = width * height;
        let pixels = (0..npixels).map(|_| Default::default()).collect();
        let separated = (0..nthreads.max(1))
            .map(|_| Mutex::new(vec![[0.0; 3]; npixels]))
            .collect();

        info!("Created {}x{} sensor with {} splat buffers", width, height, nthreads.max(1));

        Self { width, height, pixels, separated }
    }

    pub fn width(&self) -> usize { self.width }

    pub fn height(&self) -> usize { self.height }

    pub fn num_separated(&self) -> usize { self.separated.len() }

    fn offset(&self, px: Float, py: Float) -> Option<usize> {
        if !(px >= 0.0 && py >= 0.0) { return None; }

        let (x, y) = (px as usize, py as usize);
        if x >= self.width || y >= self.height { return None; }

        Some(y * self.width + x)
    }

    fn to_xyz(
        &self, px: Float, py: Float, wls: &WavelengthSamples,
        contribution: &SampledSpectrum) -> Option<[Float; 3]> {
        if contribution.has_nans() || contribution.has_infs() || contribution.has_negative() {
            debug!("Ignoring contribution {:?} at ({}, {})", contribution.c, px, py);
            nrejected_contributions::inc();
            return None;
        }

        Some(contribution.to_xyz(wls))
    }

    /// Accumulates into the shared buffer. Returns false if the value was
    /// rejected or fell outside the image.
    pub fn add(&self, px: Float, py: Float, wls: &WavelengthSamples, contribution: &SampledSpectrum) -> bool {
        let xyz = match self.to_xyz(px, py, wls, contribution) {
            Some(xyz) => xyz,
            None => return false
        };
        let offset = match self.offset(px, py) {
            Some(o) => o,
            None => return false
        };

        for (p, v) in self.pixels[offset].iter().zip(xyz.iter()) {
            p.add(*v);
        }

        true
    }

    /// Accumulates into the buffer owned by worker `thread_id`.
    pub fn add_separated(
        &self, thread_id: usize, px: Float, py: Float,
        wls: &WavelengthSamples, contribution: &SampledSpectrum) -> bool {
        let xyz = match self.to_xyz(px, py, wls, contribution) {
            Some(xyz) => xyz,
            None => return false
        };
        let (offset, buffer) = match (self.offset(px, py), self.separated.get(thread_id)) {
            (Some(o), Some(b)) => (o, b),
            _ => return false
        };

        nsplats::inc();
        let mut buf = buffer.lock();
        for (p, v) in buf[offset].iter_mut().zip(xyz.iter()) {
            *p += *v;
        }

        true
    }

    /// Merged XYZ value of one pixel, unscaled.
    pub fn pixel_xyz(&self, x: usize, y: usize) -> [Float; 3] {
        let offset = y * self.width + x;
        let mut xyz = [
            self.pixels[offset][0].get(),
            self.pixels[offset][1].get(),
            self.pixels[offset][2].get()
        ];

        for buffer in &self.separated {
            let buf = buffer.lock();
            for (i, v) in xyz.iter_mut().enumerate() {
                *v += buf[offset][i];
            }
        }

        xyz
    }

    /// Linear sRGB image, row major, three floats per pixel. The
    /// accumulation buffers are left untouched.
    pub fn snapshot(&self, scale: Float) -> Vec<Float> {
        let mut xyz = vec![0.0; 3 * self.pixels.len()];

        for (i, p) in self.pixels.iter().enumerate() {
            for c in 0..3 {
                xyz[3 * i + c] = p[c].get();
            }
        }

        for buffer in &self.separated {
            let buf = buffer.lock();
            for (i, p) in buf.iter().enumerate() {
                for c in 0..3 {
                    xyz[3 * i + c] += p[c];
                }
            }
        }

        let mut rgb = Vec::with_capacity(xyz.len());
        for p in xyz.chunks(3) {
            let c = xyz_to_rgb(&[p[0] * scale, p[1] * scale, p[2] * scale]);
            rgb.extend_from_slice(&c);
        }

        rgb
    }

    pub fn save_image<P: AsRef<Path>>(&self, path: P, scale: Float) -> Result<()> {
        let rgb = self.snapshot(scale);
        info!("Writing image {}", path.as_ref().display());

        write_image(path, &rgb, self.width, self.height)
    }

    pub fn clear(&self) {
        for p in &self.pixels {
            for c in p { c.reset(); }
        }

        for buffer in &self.separated {
            for p in buffer.lock().iter_mut() { *p = [0.0; 3]; }
        }
    }
}

/// Receives the sensor at sample-round boundaries.
pub trait CheckpointSink: Sync {
    fn export(&self, sensor: &ImageSensor, sample_count: u32, scale: Float) -> Result<(), BptError>;
}

/// Writes `NNN.<ext>` files into a directory.
#[derive(Debug, Clone)]
pub struct ImageFileSink {
    pub outdir  : PathBuf,
    pub ext     : String
}

impl ImageFileSink {
    pub fn new<P: Into<PathBuf>>(outdir: P, ext: &str) -> Self {
        Self { outdir: outdir.into(), ext: ext.to_owned() }
    }

    pub fn filename(&self, sample_count: u32) -> PathBuf {
        self.outdir.join(format!("{:03}.{}", sample_count, self.ext))
    }
}

impl CheckpointSink for ImageFileSink {
    fn export(&self, sensor: &ImageSensor, sample_count: u32, scale: Float) -> Result<(), BptError> {
        let path = self.filename(sample_count);

        sensor
            .save_image(&path, scale)
            .map_err(|e| BptError::Checkpoint(format!("{:#}", e)))
    }
}

/// Sink that drops every checkpoint.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSink;

impl CheckpointSink for NullSink {
    fn export(&self, _sensor: &ImageSensor, _sample_count: u32, _scale: Float) -> Result<(), BptError> {
        Ok(())
    }
}
