use crate::core::common::{Float, PI, INV_PI};
use crate::core::ddf::*;
use crate::core::error::BptError;
use crate::core::geometry::vector::Vector3f;
use crate::core::memory::ScratchArena;
use crate::core::spectrum::{RgbSpectrum, SampledSpectrum, WavelengthSamples};

/// Constant radiance arriving from every direction not blocked by geometry.
/// Eye subpaths hit it at infinity; it is never chosen as a light origin.
#[derive(Debug, Clone)]
pub struct EnvironmentEmitter {
    pub radiance: RgbSpectrum
}

impl EnvironmentEmitter {
    pub fn new(radiance: RgbSpectrum) -> Self {
        Self { radiance }
    }

    pub fn emittance(&self, wls: &WavelengthSamples) -> SampledSpectrum {
        self.radiance.sample(wls)
    }

    pub fn create_edf<'a>(&self, arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
        let edf = arena.alloc(EnvironmentEdf)?;

        Ok(edf)
    }
}

/// Unit emission over the inward hemisphere of a point at infinity.
#[derive(Debug, Default, Copy, Clone)]
pub struct EnvironmentEdf;

impl Ddf for EnvironmentEdf {
    fn sample(&self, _query: &DdfQuery, smp: &DdfSample) -> DdfSampleResult {
        let z = smp.u_dir[0];
        let r = (1.0 - z * z).max(0.0).sqrt();
        let phi = 2.0 * PI * smp.u_dir[1];

        DdfSampleResult {
            dir_local: Vector3f::new(r * phi.cos(), r * phi.sin(), z),
            value: SampledSpectrum::new(1.0),
            dir_pdf: 0.5 * INV_PI,
            sampled_type: DIFFUSE_EMISSION,
            reverse: ReverseInfo::default()
        }
    }

    fn evaluate(&self, _query: &DdfQuery, dir: &Vector3f) -> (SampledSpectrum, SampledSpectrum) {
        if dir.z <= 0.0 {
            return (SampledSpectrum::zero(), SampledSpectrum::zero());
        }

        (SampledSpectrum::new(1.0), SampledSpectrum::zero())
    }

    fn evaluate_pdf(&self, _query: &DdfQuery, dir: &Vector3f) -> (Float, Float) {
        if dir.z <= 0.0 { return (0.0, 0.0); }

        (0.5 * INV_PI, 0.0)
    }
}
