use crate::core::common::Float;
use crate::core::ddf::DdfSample;
use crate::core::light::LightPosSample;
use crate::core::rng::RNG;
use crate::core::sampler::LightPathSampler;

/// Uncorrelated samples drawn from a private PCG32 stream.
#[derive(Debug, Clone)]
pub struct IndependentLightPathSampler {
    rng: RNG
}

impl IndependentLightPathSampler {
    pub fn new(seed: u64) -> Self {
        Self { rng: RNG::new(seed) }
    }

    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    fn get_2d(&mut self) -> [Float; 2] {
        let u0 = self.rng.uniform_float();
        let u1 = self.rng.uniform_float();

        [u0, u1]
    }
}

impl LightPathSampler for IndependentLightPathSampler {
    fn time_sample(&mut self, time_start: Float, time_end: Float) -> Float {
        let u = self.get_1d();

        time_start + u * (time_end - time_start)
    }

    fn pixel_position(&mut self) -> [Float; 2] { self.get_2d() }

    fn wavelength_offset(&mut self) -> Float { self.get_1d() }

    fn wavelength_selection(&mut self) -> Float { self.get_1d() }

    fn light_position_sample(&mut self) -> LightPosSample {
        let u_light = self.get_1d();
        let u_pos = self.get_2d();

        LightPosSample { u_light, u_pos }
    }

    fn edf_sample(&mut self) -> DdfSample {
        let u_component = self.get_1d();

        DdfSample::new(u_component, self.get_2d())
    }

    fn lens_position_sample(&mut self) -> [Float; 2] { self.get_2d() }

    fn bsdf_sample(&mut self) -> DdfSample {
        let u_component = self.get_1d();

        DdfSample::new(u_component, self.get_2d())
    }

    fn path_termination_sample(&mut self) -> Float { self.get_1d() }
}
