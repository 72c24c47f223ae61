use crate::core::common::Float;
use crate::core::ddf::{Ddf, DirectionType};
use crate::core::error::BptError;
use crate::core::interaction::SurfacePoint;
use crate::core::memory::ScratchArena;
use crate::core::spectrum::{SampledSpectrum, WavelengthSamples};

#[derive(Debug, Copy, Clone)]
pub struct LightPosQuery {
    pub time: Float,
    pub wls : WavelengthSamples
}

#[derive(Debug, Copy, Clone)]
pub struct LightPosSample {
    pub u_light : Float,
    pub u_pos   : [Float; 2]
}

/// Origin of a light subpath. `area_pdf` includes the probability of having
/// selected this emitter.
pub struct LightPosition<'a> {
    pub pt          : SurfacePoint,
    pub area_pdf    : Float,
    pub pos_type    : DirectionType,
    pub le0         : SampledSpectrum,
    pub edf         : &'a dyn Ddf
}

pub trait LightSource {
    /// Picks an emitter and a point on it. `Ok(None)` means the scene has
    /// nothing to sample.
    fn sample_light_position<'a>(
        &self, query: &LightPosQuery, smp: &LightPosSample,
        arena: &'a ScratchArena) -> Result<Option<LightPosition<'a>>, BptError>;
}
