use log::debug;
use crate::{stat_counter, stat_percent};
use crate::core::common::Float;
use crate::core::geometry::vector::Vector3f;
use crate::core::scene::RenderScene;
use crate::core::spectrum::{SampledSpectrum, WavelengthSamples, LAMBDA_IS_SELECTED, N_WAVELENGTHS};
use super::PixelContext;
use super::mis::{ExtensionDensities, mis_weight};
use super::vertex::BptVertex;

stat_percent!("BPT/Zero-radiance connections", nzero_connections);
stat_counter!("BPT/Rejected connection MIS weights", nrejected_weights);

pub fn init_stats() {
    nzero_connections::init();
    nrejected_weights::init();
}

/// Result of joining light vertex `s - 1` to eye vertex `t - 1`.
#[derive(Debug, Copy, Clone)]
pub struct Connection {
    pub contribution    : SampledSpectrum,
    pub mis_weight      : Float,
    /// Connection direction in the local frame of the eye vertex. For `t == 1`
    /// this is the direction fed back through the lens.
    pub eye_dir_local   : Vector3f,
    pub wl_flags        : u16
}

fn rr_prob(value: SampledSpectrum, cos: Float, dir_pdf: Float) -> Float {
    if dir_pdf > 0.0 {
        (value * (cos / dir_pdf)).importance().min(1.0)
    } else {
        0.0
    }
}

/// Evaluates the `(s, t)` strategy: the connection term, visibility and the
/// MIS weight. Returns `None` when the strategy contributes nothing or its
/// weight is unusable.
pub fn connect<S: RenderScene + ?Sized>(
    scene: &S, light: &[BptVertex], s: usize, eye: &[BptVertex], t: usize,
    wl_hint: usize, time: Float) -> Option<Connection> {
    let l_vtx = &light[s - 1];
    let e_vtx = &eye[t - 1];

    let (conn, dist2) = l_vtx.pt.direction_from(&e_vtx.pt.p);
    let cos_light = l_vtx.pt.calc_cos_term(&conn);
    let cos_eye = e_vtx.pt.calc_cos_term(&conn);
    let g = cos_eye * cos_light / dist2;

    let l_dir = l_vtx.pt.to_local(&(-conn));
    let l_query = l_vtx.query(wl_hint, true);
    let (l_ddf, l_rev_ddf) = l_vtx.ddf.evaluate(&l_query, &l_dir);
    let (l_ext1_dir_pdf, e_ext2_dir_pdf) = l_vtx.ddf.evaluate_pdf(&l_query, &l_dir);

    let e_dir = e_vtx.pt.to_local(&conn);
    let e_query = e_vtx.query(wl_hint, false);
    let (e_ddf, e_rev_ddf) = e_vtx.ddf.evaluate(&e_query, &e_dir);
    let (e_ext1_dir_pdf, l_ext2_dir_pdf) = e_vtx.ddf.evaluate_pdf(&e_query, &e_dir);

    let wl_flags = l_vtx.wl_flags | e_vtx.wl_flags;
    let wl_prob = if wl_flags & LAMBDA_IS_SELECTED != 0 { 1.0 / N_WAVELENGTHS as Float } else { 1.0 };
    let term = l_ddf * (g / wl_prob) * e_ddf;

    nzero_connections::inc_den();
    if term.is_black() {
        nzero_connections::inc_num();
        return None;
    }
    if !scene.test_visibility(&e_vtx.pt, &l_vtx.pt, time) { return None; }

    let mut light_ext = ExtensionDensities::none();
    light_ext.first_area_pdf = l_ext1_dir_pdf * cos_eye / dist2;
    light_ext.first_rr_prob = if s > 1 { rr_prob(l_ddf, cos_light, l_ext1_dir_pdf) } else { 1.0 };
    if t > 1 {
        let e_next = &eye[t - 2];
        let (dir, d2) = e_vtx.pt.direction_from(&e_next.pt.p);
        light_ext.second_area_pdf = l_ext2_dir_pdf * e_next.pt.calc_cos_term(&dir) / d2;
        light_ext.second_rr_prob = rr_prob(
            e_rev_ddf, e_vtx.dir_in_local.abs_dot_norm(&e_vtx.gnormal_local), l_ext2_dir_pdf);
    }

    let mut eye_ext = ExtensionDensities::none();
    eye_ext.first_area_pdf = e_ext1_dir_pdf * cos_light / dist2;
    eye_ext.first_rr_prob = if t > 1 { rr_prob(e_ddf, cos_eye, e_ext1_dir_pdf) } else { 1.0 };
    if s > 1 {
        let l_next = &light[s - 2];
        let (dir, d2) = l_next.pt.direction_from(&l_vtx.pt.p);
        eye_ext.second_area_pdf = e_ext2_dir_pdf * l_next.pt.calc_cos_term(&dir) / d2;
        eye_ext.second_rr_prob = rr_prob(
            l_rev_ddf, l_vtx.dir_in_local.abs_dot_norm(&l_vtx.gnormal_local), e_ext2_dir_pdf);
    }

    let w = mis_weight(&light_ext, &eye_ext, light, s, eye, t);
    if !w.is_finite() || w < 0.0 || w > 1.0 {
        debug!("Rejected MIS weight {} for s = {}, t = {}", w, s, t);
        nrejected_weights::inc();
        return None;
    }

    Some(Connection {
        contribution: l_vtx.alpha * term * e_vtx.alpha * w,
        mis_weight: w,
        eye_dir_local: e_dir,
        wl_flags
    })
}

/// Runs every strategy with at least one vertex on each side and deposits
/// the weighted results. Strategies ending on the lens are splatted into the
/// worker's own buffer at the pixel the connection projects to.
pub fn connect_all<S: RenderScene + ?Sized>(
    ctx: &PixelContext<'_, S>, light: &[BptVertex], eye: &[BptVertex], wls: &WavelengthSamples) {
    for t in 1..=eye.len() {
        for s in 1..=light.len() {
            let c = match connect(ctx.scene, light, s, eye, t, ctx.wl_hint, ctx.time) {
                Some(c) => c,
                None => continue
            };

            let mut cwls = *wls;
            cwls.flags |= c.wl_flags;

            if t > 1 {
                ctx.sensor.add(ctx.px, ctx.py, &cwls, &c.contribution);
            } else if let Some(p) = eye[0].lens.and_then(|lens| lens.calculate_pixel(&c.eye_dir_local)) {
                ctx.sensor.add_separated(ctx.thread_id, p.x, p.y, &cwls, &c.contribution);
            }
        }
    }
}
