use std::borrow::Borrow;
use std::fmt::{Display, Formatter, Result};
use crate::core::camera::Idf;
use crate::core::common::Float;
use crate::core::ddf::{Ddf, DdfQuery, DirectionType};
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::interaction::SurfacePoint;
use crate::core::spectrum::SampledSpectrum;
use super::mis::VertexDensity;

/// One vertex of a light or eye subpath. Vertex 0 is the origin on the light
/// or lens; its incoming direction is zero and its local geometric normal is
/// +z.
#[derive(Copy, Clone)]
pub struct BptVertex<'a> {
    pub pt              : SurfacePoint,
    pub dir_in_local    : Vector3f,
    pub gnormal_local   : Normal3f,
    pub ddf             : &'a dyn Ddf,
    /// Set on the eye origin only.
    pub lens            : Option<&'a dyn Idf>,
    /// Throughput from the subpath origin up to this vertex, excluding the
    /// scattering at the vertex itself.
    pub alpha           : SampledSpectrum,
    pub density         : VertexDensity,
    /// Type of the sample that produced this vertex.
    pub sampled_type    : DirectionType,
    pub wl_flags        : u16
}

impl<'a> BptVertex<'a> {
    pub fn origin(
        pt: SurfacePoint, ddf: &'a dyn Ddf, alpha: SampledSpectrum,
        area_pdf: Float, pos_type: DirectionType) -> Self {
        Self {
            pt,
            dir_in_local: Vector3f::default(),
            gnormal_local: Normal3f::new(0.0, 0.0, 1.0),
            ddf,
            lens: None,
            alpha,
            density: VertexDensity::new(area_pdf, 1.0, pos_type.is_delta()),
            sampled_type: pos_type,
            wl_flags: 0
        }
    }

    pub fn surface(
        pt: SurfacePoint, dir_in_local: Vector3f, gnormal_local: Normal3f,
        ddf: &'a dyn Ddf, alpha: SampledSpectrum, area_pdf: Float, rr_prob: Float,
        sampled_type: DirectionType, wl_flags: u16) -> Self {
        Self {
            pt,
            dir_in_local,
            gnormal_local,
            ddf,
            lens: None,
            alpha,
            density: VertexDensity::new(area_pdf, rr_prob, sampled_type.is_delta()),
            sampled_type,
            wl_flags
        }
    }

    pub fn with_lens(mut self, lens: &'a dyn Idf) -> Self {
        self.lens = Some(lens);
        self
    }

    pub fn query(&self, wl_hint: usize, adjoint: bool) -> DdfQuery {
        DdfQuery::new(self.dir_in_local, self.gnormal_local, wl_hint, adjoint)
    }
}

impl<'a> Borrow<VertexDensity> for BptVertex<'a> {
    fn borrow(&self) -> &VertexDensity {
        &self.density
    }
}

impl<'a> Display for BptVertex<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f, "[ p: {:?} infinity: {} alpha: {:?} pdf: {} rr: {} rev pdf: {} rev rr: {} delta: {} ]",
            self.pt.p, self.pt.at_infinity, self.alpha.c, self.density.area_pdf, self.density.rr_prob,
            self.density.rev_area_pdf, self.density.rev_rr_prob, self.density.delta)
    }
}
