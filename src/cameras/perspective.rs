use crate::core::common::Float;
use crate::core::camera::{Camera, Idf, LensPosQuery, LensPosition};
use crate::core::ddf::*;
use crate::core::error::BptError;
use crate::core::geometry::frame::ReferenceFrame;
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::{Point2f, Point3f};
use crate::core::geometry::vector::Vector3f;
use crate::core::interaction::{SurfacePoint, ObjectChain};
use crate::core::memory::ScratchArena;
use crate::core::spectrum::SampledSpectrum;

/// Pinhole camera looking down its local +z axis.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Point3f,
    frame       : ReferenceFrame,
    idf         : PerspectiveIdf
}

impl PerspectiveCamera {
    /// `fovy` is the full vertical field of view in degrees.
    pub fn new(
        position: Point3f, look_at: Point3f, up: Vector3f,
        fovy: Float, width: usize, height: usize) -> Self {
        let forward = (look_at - position).normalize();
        let right = forward.cross(&up).normalize();
        let cam_up = right.cross(&forward);
        let half_height = (fovy.to_radians() / 2.0).tan();
        let aspect = width as Float / height as Float;

        Self {
            position,
            frame: ReferenceFrame::new(right, cam_up, forward),
            idf: PerspectiveIdf::new(aspect * half_height, half_height, width, height)
        }
    }

    pub fn idf(&self) -> &PerspectiveIdf { &self.idf }

    pub fn lens_point(&self) -> SurfacePoint {
        SurfacePoint {
            p: self.position,
            at_infinity: false,
            gnormal: Normal3f::from(self.frame.z),
            shading_frame: self.frame,
            obj: ObjectChain::default()
        }
    }
}

impl Camera for PerspectiveCamera {
    fn sample_lens_position<'a>(
        &self, _query: &LensPosQuery, _u_lens: &[Float; 2],
        arena: &'a ScratchArena) -> Result<LensPosition<'a>, BptError> {
        let idf = arena.alloc(self.idf)?;

        Ok(LensPosition {
            pt: self.lens_point(),
            area_pdf: 1.0,
            pos_type: DELTA_POSITION,
            we0: SampledSpectrum::new(1.0),
            idf,
            pixels: idf
        })
    }
}

/// Importance of a pinhole: `1 / (A cos^4)` over the image plane at unit
/// distance, whose area is `A`. Sampling is uniform over that plane, so the
/// directional density is `1 / (A cos^3)`.
#[derive(Debug, Copy, Clone)]
pub struct PerspectiveIdf {
    half_width  : Float,
    half_height : Float,
    area        : Float,
    width       : usize,
    height      : usize
}

impl PerspectiveIdf {
    pub fn new(half_width: Float, half_height: Float, width: usize, height: usize) -> Self {
        Self {
            half_width,
            half_height,
            area: 4.0 * half_width * half_height,
            width,
            height
        }
    }

    fn on_image(&self, dir: &Vector3f) -> bool {
        if dir.z <= 0.0 { return false; }

        (dir.x / dir.z).abs() <= self.half_width && (dir.y / dir.z).abs() <= self.half_height
    }
}

impl Ddf for PerspectiveIdf {
    fn sample(&self, _query: &DdfQuery, smp: &DdfSample) -> DdfSampleResult {
        let x = self.half_width * (2.0 * smp.u_dir[0] - 1.0);
        let y = self.half_height * (1.0 - 2.0 * smp.u_dir[1]);
        let dir = Vector3f::new(x, y, 1.0).normalize();
        let cos = dir.z;

        DdfSampleResult {
            dir_local: dir,
            value: SampledSpectrum::new(1.0 / (self.area * cos * cos * cos * cos)),
            dir_pdf: 1.0 / (self.area * cos * cos * cos),
            sampled_type: ACQUISITION,
            reverse: ReverseInfo::default()
        }
    }

    fn evaluate(&self, _query: &DdfQuery, dir: &Vector3f) -> (SampledSpectrum, SampledSpectrum) {
        if !self.on_image(dir) {
            return (SampledSpectrum::zero(), SampledSpectrum::zero());
        }
        let cos = dir.z;

        (SampledSpectrum::new(1.0 / (self.area * cos * cos * cos * cos)), SampledSpectrum::zero())
    }

    fn evaluate_pdf(&self, _query: &DdfQuery, dir: &Vector3f) -> (Float, Float) {
        if !self.on_image(dir) { return (0.0, 0.0); }
        let cos = dir.z;

        (1.0 / (self.area * cos * cos * cos), 0.0)
    }
}

impl Idf for PerspectiveIdf {
    fn calculate_pixel(&self, dir_local: &Vector3f) -> Option<Point2f> {
        if !self.on_image(dir_local) { return None; }

        let sx = (dir_local.x / dir_local.z / self.half_width + 1.0) / 2.0;
        let sy = (1.0 - dir_local.y / dir_local.z / self.half_height) / 2.0;

        Some(Point2f::new(sx * self.width as Float, sy * self.height as Float))
    }
}
