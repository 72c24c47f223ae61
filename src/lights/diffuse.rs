use crate::core::common::{Float, INV_PI};
use crate::core::ddf::*;
use crate::core::error::BptError;
use crate::core::geometry::vector::Vector3f;
use crate::core::memory::ScratchArena;
use crate::core::sampling::{cosine_sample_hemisphere, cosine_hemisphere_pdf};
use crate::core::spectrum::{RgbSpectrum, SampledSpectrum, WavelengthSamples};

/// One-sided Lambertian emitter. `emittance` is the radiant exitance, so the
/// emitted radiance is `emittance / PI`.
#[derive(Debug, Clone)]
pub struct DiffuseAreaEmitter {
    pub emittance: RgbSpectrum
}

impl DiffuseAreaEmitter {
    pub fn new(emittance: RgbSpectrum) -> Self {
        Self { emittance }
    }

    pub fn emittance(&self, wls: &WavelengthSamples) -> SampledSpectrum {
        self.emittance.sample(wls)
    }

    pub fn create_edf<'a>(&self, arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
        let edf = arena.alloc(DiffuseEdf)?;

        Ok(edf)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct DiffuseEdf;

impl Ddf for DiffuseEdf {
    fn sample(&self, _query: &DdfQuery, smp: &DdfSample) -> DdfSampleResult {
        let dir = cosine_sample_hemisphere(&smp.u_dir);

        DdfSampleResult {
            dir_local: dir,
            value: SampledSpectrum::new(INV_PI),
            dir_pdf: cosine_hemisphere_pdf(dir.z),
            sampled_type: DIFFUSE_EMISSION,
            reverse: ReverseInfo::default()
        }
    }

    fn evaluate(&self, _query: &DdfQuery, dir: &Vector3f) -> (SampledSpectrum, SampledSpectrum) {
        if dir.z <= 0.0 {
            return (SampledSpectrum::zero(), SampledSpectrum::zero());
        }

        (SampledSpectrum::new(INV_PI), SampledSpectrum::zero())
    }

    fn evaluate_pdf(&self, _query: &DdfQuery, dir: &Vector3f) -> (Float, Float) {
        if dir.z <= 0.0 { return (0.0, 0.0); }

        (cosine_hemisphere_pdf(dir.z), 0.0)
    }
}
