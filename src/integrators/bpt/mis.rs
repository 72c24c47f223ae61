//! Power-heuristic weights for bidirectional strategies.
//!
//! Every vertex stores the density with which its own subpath generated it
//! (`area_pdf`, `rr_prob`) and the density with which the opposite subpath
//! would have generated it (`rev_area_pdf`, `rev_rr_prob`). Shortening one
//! subpath by a vertex and extending the other by the same vertex changes the
//! path density by a single ratio, so all alternatives are visited by a
//! running product.

use std::borrow::Borrow;
use crate::core::common::{Float, CompensatedSum};

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct VertexDensity {
    pub area_pdf    : Float,
    pub rr_prob     : Float,
    pub rev_area_pdf: Float,
    pub rev_rr_prob : Float,
    /// The step that produced this vertex (or its position) was a delta
    /// distribution, so no connection can replace it.
    pub delta       : bool
}

impl VertexDensity {
    pub fn new(area_pdf: Float, rr_prob: Float, delta: bool) -> Self {
        Self { area_pdf, rr_prob, rev_area_pdf: 0.0, rev_rr_prob: 0.0, delta }
    }

    fn forward(&self) -> Float {
        self.area_pdf * self.rr_prob
    }

    fn reverse(&self) -> Float {
        self.rev_area_pdf * self.rev_rr_prob
    }
}

/// Densities of extending the opposite subpath by one and by two vertices
/// through a particular connection. They depend on the connection and are
/// never stored on the vertices.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ExtensionDensities {
    pub first_area_pdf  : Float,
    pub first_rr_prob   : Float,
    pub second_area_pdf : Float,
    pub second_rr_prob  : Float
}

impl ExtensionDensities {
    pub fn new(first_area_pdf: Float, first_rr_prob: Float, second_area_pdf: Float, second_rr_prob: Float) -> Self {
        Self { first_area_pdf, first_rr_prob, second_area_pdf, second_rr_prob }
    }

    pub fn none() -> Self {
        Default::default()
    }
}

/// Adds the squared density ratios of every strategy obtained by moving
/// vertices off the end of `sub` (which holds `n` vertices) onto the other
/// subpath, stopping once `min` vertices remain.
pub fn extend_and_shorten<V: Borrow<VertexDensity>>(
    ext: &ExtensionDensities, sub: &[V], n: usize, min: usize,
    rec_weight: &mut CompensatedSum) {
    if n <= min { return; }

    let end = sub[n - 1].borrow();
    let mut ratio = ext.first_area_pdf * ext.first_rr_prob / end.forward();
    if !end.delta { rec_weight.add(ratio * ratio); }
    let mut prev_delta = end.delta;

    if n - 1 <= min { return; }

    let v = sub[n - 2].borrow();
    ratio *= ext.second_area_pdf * ext.second_rr_prob / v.forward();
    if !v.delta && !prev_delta { rec_weight.add(ratio * ratio); }
    prev_delta = v.delta;

    for i in (min + 1..n - 1).rev() {
        let v = sub[i - 1].borrow();
        ratio *= v.reverse() / v.forward();
        if !v.delta && !prev_delta { rec_weight.add(ratio * ratio); }
        prev_delta = v.delta;
    }
}

/// Weight of the strategy with `s` light and `t` eye vertices. `light_ext`
/// extends the light subpath into the eye subpath and `eye_ext` the reverse.
/// The eye subpath always keeps its lens vertex; the light subpath may shrink
/// to nothing, which is the implicit strategy.
pub fn mis_weight<L, E>(
    light_ext: &ExtensionDensities, eye_ext: &ExtensionDensities,
    light: &[L], s: usize, eye: &[E], t: usize) -> Float
    where L: Borrow<VertexDensity>, E: Borrow<VertexDensity> {
    let mut rec_weight = CompensatedSum::new(1.0);

    extend_and_shorten(light_ext, eye, t, 1, &mut rec_weight);
    extend_and_shorten(eye_ext, light, s, 0, &mut rec_weight);

    1.0 / rec_weight.result()
}
