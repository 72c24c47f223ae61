use crate::core::spectrum::{RgbSpectrum, WavelengthSamples};
use crate::core::material::Material;
use crate::core::memory::ScratchArena;
use crate::core::reflection::LambertianBrdf;
use crate::core::ddf::Ddf;
use crate::core::error::BptError;

#[derive(Debug, Clone)]
pub struct MatteMaterial {
    kd: RgbSpectrum
}

impl MatteMaterial {
    pub fn new(kd: RgbSpectrum) -> Self {
        Self { kd }
    }
}

impl Material for MatteMaterial {
    fn create_bsdf<'a>(
        &self, wls: &WavelengthSamples,
        arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
        let r = self.kd.sample(wls);
        let bsdf = arena.alloc(LambertianBrdf::new(r))?;

        Ok(bsdf)
    }
}
