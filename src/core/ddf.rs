use crate::core::common::Float;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::normal::Normal3f;
use crate::core::spectrum::SampledSpectrum;

#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectionFlag {
    Reflection   = 1 << 0,
    Transmission = 1 << 1,
    Emission     = 1 << 2,
    Acquisition  = 1 << 3,
    LowFreq      = 1 << 4,
    HighFreq     = 1 << 5,
    Delta0D      = 1 << 6,
    Delta1D      = 1 << 7,
    Dispersive   = 1 << 8
}

/// Classification of a sampled position or direction.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DirectionType {
    bits: u16
}

impl DirectionType {
    pub const fn new(bits: u16) -> Self {
        Self { bits }
    }

    pub fn from_flags(flags: &[DirectionFlag]) -> Self {
        Self { bits: flags.iter().fold(0, |b, f| b | *f as u16) }
    }

    pub fn contains(&self, flag: DirectionFlag) -> bool {
        self.bits & flag as u16 != 0
    }

    pub fn with(self, flag: DirectionFlag) -> Self {
        Self { bits: self.bits | flag as u16 }
    }

    pub fn is_delta(&self) -> bool {
        self.contains(DirectionFlag::Delta0D) || self.contains(DirectionFlag::Delta1D)
    }

    pub fn is_dispersive(&self) -> bool {
        self.contains(DirectionFlag::Dispersive)
    }

    pub fn bits(&self) -> u16 { self.bits }
}

pub const DIFFUSE_REFLECTION: DirectionType =
    DirectionType::new(DirectionFlag::Reflection as u16 | DirectionFlag::LowFreq as u16);
pub const DELTA_REFLECTION: DirectionType =
    DirectionType::new(DirectionFlag::Reflection as u16 | DirectionFlag::Delta0D as u16);
pub const DELTA_TRANSMISSION: DirectionType =
    DirectionType::new(DirectionFlag::Transmission as u16 | DirectionFlag::Delta0D as u16);
pub const AREA_POSITION: DirectionType = DirectionType::new(DirectionFlag::LowFreq as u16);
pub const DELTA_POSITION: DirectionType = DirectionType::new(DirectionFlag::Delta0D as u16);
pub const DIFFUSE_EMISSION: DirectionType =
    DirectionType::new(DirectionFlag::Emission as u16 | DirectionFlag::LowFreq as u16);
pub const ACQUISITION: DirectionType =
    DirectionType::new(DirectionFlag::Acquisition as u16 | DirectionFlag::LowFreq as u16);

/// Query context for a DDF. `dir_local` points toward the previous vertex in
/// the walk and is zero at a subpath origin.
#[derive(Debug, Default, Copy, Clone)]
pub struct DdfQuery {
    pub dir_local       : Vector3f,
    pub gnormal_local   : Normal3f,
    pub wl_hint         : usize,
    pub adjoint         : bool
}

impl DdfQuery {
    pub fn new(dir_local: Vector3f, gnormal_local: Normal3f, wl_hint: usize, adjoint: bool) -> Self {
        Self { dir_local, gnormal_local, wl_hint, adjoint }
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct DdfSample {
    pub u_component : Float,
    pub u_dir       : [Float; 2]
}

impl DdfSample {
    pub fn new(u_component: Float, u_dir: [Float; 2]) -> Self {
        Self { u_component, u_dir }
    }
}

/// Value and density of scattering back along the incoming direction.
#[derive(Debug, Default, Copy, Clone)]
pub struct ReverseInfo {
    pub value   : SampledSpectrum,
    pub dir_pdf : Float
}

#[derive(Debug, Default, Copy, Clone)]
pub struct DdfSampleResult {
    pub dir_local       : Vector3f,
    pub value           : SampledSpectrum,
    pub dir_pdf         : Float,
    pub sampled_type    : DirectionType,
    pub reverse         : ReverseInfo
}

impl DdfSampleResult {
    pub fn invalid() -> Self {
        Default::default()
    }
}

/// Directional distribution function: a BSDF, an emission distribution or a
/// camera importance distribution. Values exclude the cosine term.
pub trait Ddf {
    fn sample(&self, query: &DdfQuery, smp: &DdfSample) -> DdfSampleResult;
    /// Value toward `dir` and the value of the reversed configuration.
    fn evaluate(&self, query: &DdfQuery, dir: &Vector3f) -> (SampledSpectrum, SampledSpectrum);
    /// Density of sampling `dir` and of sampling `query.dir_local` from `dir`.
    fn evaluate_pdf(&self, query: &DdfQuery, dir: &Vector3f) -> (Float, Float);
}
