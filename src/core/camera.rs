use crate::core::common::Float;
use crate::core::ddf::{Ddf, DirectionType};
use crate::core::error::BptError;
use crate::core::geometry::point::Point2f;
use crate::core::geometry::vector::Vector3f;
use crate::core::interaction::SurfacePoint;
use crate::core::memory::ScratchArena;
use crate::core::spectrum::{SampledSpectrum, WavelengthSamples};

#[derive(Debug, Copy, Clone)]
pub struct LensPosQuery {
    pub time: Float,
    pub wls : WavelengthSamples
}

/// Back-projection of a lens-local direction to raster coordinates.
pub trait Idf {
    fn calculate_pixel(&self, dir_local: &Vector3f) -> Option<Point2f>;
}

/// Origin of an eye subpath. `idf` and `pixels` refer to the same arena
/// object: the first drives sampling, the second splatting.
pub struct LensPosition<'a> {
    pub pt          : SurfacePoint,
    pub area_pdf    : Float,
    pub pos_type    : DirectionType,
    pub we0         : SampledSpectrum,
    pub idf         : &'a dyn Ddf,
    pub pixels      : &'a dyn Idf
}

pub trait Camera: Sync {
    fn sample_lens_position<'a>(
        &self, query: &LensPosQuery, u_lens: &[Float; 2],
        arena: &'a ScratchArena) -> Result<LensPosition<'a>, BptError>;
}
