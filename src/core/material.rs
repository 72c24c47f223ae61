use enum_dispatch::enum_dispatch;
use crate::core::ddf::Ddf;
use crate::core::error::BptError;
use crate::core::memory::ScratchArena;
use crate::core::spectrum::WavelengthSamples;
use crate::materials::matte::MatteMaterial;
use crate::materials::mirror::MirrorMaterial;
use crate::materials::glass::GlassMaterial;

#[enum_dispatch]
pub trait Material {
    /// Allocates the scattering function for the given wavelengths in the
    /// pixel arena.
    fn create_bsdf<'a>(
        &self, wls: &WavelengthSamples,
        arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError>;
}

#[enum_dispatch(Material)]
#[derive(Debug, Clone)]
pub enum Materials {
    MatteMaterial,
    MirrorMaterial,
    GlassMaterial
}
