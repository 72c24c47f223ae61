use crate::core::common::Float;
use crate::core::ddf::DdfSample;
use crate::core::light::LightPosSample;

/// Source of every random number consumed while building one pair of
/// subpaths. Each call draws fresh dimensions.
pub trait LightPathSampler {
    fn time_sample(&mut self, time_start: Float, time_end: Float) -> Float;
    /// Offset inside a pixel in [0, 1)^2.
    fn pixel_position(&mut self) -> [Float; 2];
    fn wavelength_offset(&mut self) -> Float;
    fn wavelength_selection(&mut self) -> Float;
    fn light_position_sample(&mut self) -> LightPosSample;
    fn edf_sample(&mut self) -> DdfSample;
    fn lens_position_sample(&mut self) -> [Float; 2];
    fn bsdf_sample(&mut self) -> DdfSample;
    fn path_termination_sample(&mut self) -> Float;
}
