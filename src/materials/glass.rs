use crate::core::common::Float;
use crate::core::spectrum::{RgbSpectrum, WavelengthSamples, N_WAVELENGTHS};
use crate::core::material::Material;
use crate::core::memory::ScratchArena;
use crate::core::reflection::SpecularScattering;
use crate::core::ddf::Ddf;
use crate::core::error::BptError;

/// Dielectric with a Cauchy index of refraction `a + b / lambda^2`
/// (lambda in micrometers). A nonzero `b` makes it dispersive.
#[derive(Debug, Clone)]
pub struct GlassMaterial {
    kr      : RgbSpectrum,
    kt      : RgbSpectrum,
    cauchy_a: Float,
    cauchy_b: Float
}

impl GlassMaterial {
    pub fn new(kr: RgbSpectrum, kt: RgbSpectrum, cauchy_a: Float, cauchy_b: Float) -> Self {
        Self { kr, kt, cauchy_a, cauchy_b }
    }

    pub fn eta(&self, lambda: Float) -> Float {
        let um = lambda / 1000.0;

        self.cauchy_a + self.cauchy_b / (um * um)
    }
}

impl Material for GlassMaterial {
    fn create_bsdf<'a>(
        &self, wls: &WavelengthSamples,
        arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
        let mut eta = [0.0; N_WAVELENGTHS];
        for (e, l) in eta.iter_mut().zip(wls.lambdas.iter()) {
            *e = self.eta(*l);
        }

        let bsdf = arena.alloc(SpecularScattering::new(
            self.kr.sample(wls), self.kt.sample(wls), eta, self.cauchy_b != 0.0))?;

        Ok(bsdf)
    }
}
