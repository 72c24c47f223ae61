use crate::core::spectrum::{RgbSpectrum, WavelengthSamples};
use crate::core::material::Material;
use crate::core::memory::ScratchArena;
use crate::core::reflection::SpecularReflection;
use crate::core::ddf::Ddf;
use crate::core::error::BptError;

#[derive(Debug, Clone)]
pub struct MirrorMaterial {
    kr: RgbSpectrum
}

impl MirrorMaterial {
    pub fn new(kr: RgbSpectrum) -> Self {
        Self { kr }
    }
}

impl Material for MirrorMaterial {
    fn create_bsdf<'a>(
        &self, wls: &WavelengthSamples,
        arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
        let bsdf = arena.alloc(SpecularReflection::new(self.kr.sample(wls)))?;

        Ok(bsdf)
    }
}
