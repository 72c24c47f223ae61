use bumpalo::collections::Vec as BumpVec;
use log::{debug, warn};
use crate::{stat_counter, stat_int_distribution};
use crate::core::common::Float;
use crate::core::ddf::{DdfQuery, DirectionType};
use crate::core::error::BptError;
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::ray::Ray;
use crate::core::geometry::vector::Vector3f;
use crate::core::interaction::{SurfacePoint, squared_distance};
use crate::core::memory::ScratchArena;
use crate::core::sampler::LightPathSampler;
use crate::core::scene::RenderScene;
use crate::core::spectrum::{SampledSpectrum, WavelengthSamples, LAMBDA_IS_SELECTED, N_WAVELENGTHS};
use super::PixelContext;
use super::mis::{ExtensionDensities, VertexDensity, mis_weight};
use super::vertex::BptVertex;

stat_counter!("BPT/Object handle mismatches", nobject_mismatches);
stat_counter!("BPT/Rejected implicit MIS weights", nrejected_implicit_weights);
stat_int_distribution!("BPT/Light subpath length", light_path_length);
stat_int_distribution!("BPT/Eye subpath length", eye_path_length);

pub fn init_stats() {
    nobject_mismatches::init();
    nrejected_implicit_weights::init();
    light_path_length::init();
    eye_path_length::init();
}

/// State of a subpath right after its origin vertex was registered.
#[derive(Debug, Copy, Clone)]
pub struct SubpathStart {
    pub wls         : WavelengthSamples,
    /// Throughput carried by the first traced ray.
    pub alpha       : SampledSpectrum,
    pub ray         : Ray,
    pub dir_pdf     : Float,
    pub sampled_type: DirectionType,
    /// Cosine between the first ray and the origin's normal.
    pub cos_last    : Float,
    /// True for light subpaths.
    pub adjoint     : bool
}

/// Survival test on a path weight. Returns the compensated weight and the
/// survival probability, or `None` when the walk terminates.
pub fn russian_roulette(weight: &SampledSpectrum, u: Float) -> Option<(SampledSpectrum, Float)> {
    if weight.has_nans() || weight.has_infs() { return None; }

    let prob = weight.importance().min(1.0);
    if prob <= 0.0 || u >= prob { return None; }

    Some((*weight / prob, prob))
}

/// Extends a subpath whose origin is already in `vertices` by tracing rays
/// through the scene until the walk is absorbed, leaves the scene or fills
/// the vertex list. Eye subpaths that hit emitters deposit their implicit
/// contribution on the way.
pub fn generate_subpath<'a, S, P>(
    ctx: &PixelContext<'_, S>, start: &SubpathStart,
    vertices: &mut BumpVec<'a, BptVertex<'a>>, sampler: &mut P,
    arena: &'a ScratchArena) -> Result<(), BptError>
    where S: RenderScene + ?Sized, P: LightPathSampler {
    if start.dir_pdf == 0.0 || vertices.is_empty() { return Ok(()); }

    let mut wls = start.wls;
    let mut ray = start.ray;
    let mut alpha = start.alpha;
    let mut dir_pdf = start.dir_pdf;
    let mut sampled_type = start.sampled_type;
    let mut cos_last = start.cos_last;
    let mut rr_prob = 1.0;

    while vertices.len() < ctx.max_vertices {
        let si = match ctx.scene.intersect(&ray) {
            Some(si) => si,
            None => break
        };
        let pt = si.pt;
        let dist2 = squared_distance(&vertices[vertices.len() - 1].pt, &pt);
        let dir_out = pt.to_local(&(-ray.d));
        let gnormal = pt.local_gnormal();

        let bsdf = match ctx.scene.create_bsdf(&pt, &wls, arena) {
            Ok(bsdf) => bsdf,
            Err(BptError::ObjectMismatch { object, count }) => {
                warn!("Terminating walk at object {} of {}", object, count);
                nobject_mismatches::inc();
                break;
            }
            Err(e) => return Err(e)
        };

        let area_pdf = dir_pdf * dir_out.abs_dot_norm(&gnormal) / dist2;
        if !(area_pdf > 0.0 && area_pdf.is_finite()) {
            debug!("Terminating walk at degenerate hit, area pdf {}", area_pdf);
            break;
        }

        vertices.push(BptVertex::surface(
            pt, dir_out, gnormal, bsdf, alpha, area_pdf, rr_prob, sampled_type, wls.flags));

        if !start.adjoint && ctx.scene.is_emitting(&pt) {
            add_implicit_contribution(
                ctx, vertices, &pt, &dir_out, &wls, &alpha, cos_last, dist2, arena)?;
        }

        if pt.at_infinity {
            vertices.pop();
            break;
        }

        let query = DdfQuery::new(dir_out, gnormal, ctx.wl_hint, start.adjoint);
        let fs = bsdf.sample(&query, &sampler.bsdf_sample());
        if fs.value.is_black() || fs.dir_pdf == 0.0 { break; }
        if fs.sampled_type.is_dispersive() { wls.flags |= LAMBDA_IS_SELECTED; }

        let cos_in = fs.dir_local.abs_dot_norm(&gnormal);
        let weight = fs.value * (cos_in / fs.dir_pdf);
        let (weight, prob) = match russian_roulette(&weight, sampler.path_termination_sample()) {
            Some(rr) => rr,
            None => break
        };

        rr_prob = prob;
        alpha *= weight;
        ray = Ray::spawn(&pt.p, &pt.from_local(&fs.dir_local), ray.time);

        let n = vertices.len();
        set_reverse_density(
            &mut vertices[n - 2].density, &fs.reverse.value, fs.reverse.dir_pdf,
            &dir_out, &gnormal, cos_last, dist2);

        cos_last = cos_in;
        dir_pdf = fs.dir_pdf;
        sampled_type = fs.sampled_type;
    }

    if start.adjoint {
        light_path_length::report_value(vertices.len() as u64);
    } else {
        eye_path_length::report_value(vertices.len() as u64);
    }

    Ok(())
}

/// Density of the opposite subpath generating the vertex before the current
/// one, from the reverse part of the scattering sample.
fn set_reverse_density(
    density: &mut VertexDensity, rev_value: &SampledSpectrum, rev_dir_pdf: Float,
    dir_out: &Vector3f, gnormal: &Normal3f, cos_last: Float, dist2: Float) {
    density.rev_area_pdf = rev_dir_pdf * cos_last / dist2;
    density.rev_rr_prob = if rev_dir_pdf > 0.0 {
        let rev_weight = *rev_value * (dir_out.abs_dot_norm(gnormal) / rev_dir_pdf);

        rev_weight.importance().min(1.0)
    } else {
        0.0
    };
}

#[allow(clippy::too_many_arguments)]
fn add_implicit_contribution<'a, S: RenderScene + ?Sized>(
    ctx: &PixelContext<'_, S>, vertices: &[BptVertex<'a>], pt: &SurfacePoint,
    dir_out: &Vector3f, wls: &WavelengthSamples, alpha: &SampledSpectrum,
    cos_last: Float, dist2: Float, arena: &'a ScratchArena) -> Result<(), BptError> {
    let edf = ctx.scene.create_edf(pt, wls, arena)?;
    let le0 = ctx.scene.emittance(pt, wls);
    let query = DdfQuery::default();
    let (le1, _) = edf.evaluate(&query, dir_out);
    let (edf_pdf, _) = edf.evaluate_pdf(&query, dir_out);

    let light_ext = ExtensionDensities::new(
        ctx.scene.evaluate_area_pdf(pt), 1.0, edf_pdf * cos_last / dist2, 1.0);
    let no_light: [VertexDensity; 0] = [];
    let w = mis_weight(&light_ext, &ExtensionDensities::none(), &no_light, 0, vertices, vertices.len());

    if !w.is_finite() || w < 0.0 || w > 1.0 {
        debug!("Rejected implicit MIS weight {} at t = {}", w, vertices.len());
        nrejected_implicit_weights::inc();
        return Ok(());
    }

    let mut contribution = *alpha * le0 * le1 * w;
    if wls.lambda_selected() { contribution *= N_WAVELENGTHS as Float; }
    ctx.sensor.add(ctx.px, ctx.py, wls, &contribution);

    Ok(())
}
