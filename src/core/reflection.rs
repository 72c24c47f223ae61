use crate::core::common::{Float, INV_PI};
use crate::core::geometry::vector::Vector3f;
use crate::core::spectrum::{SampledSpectrum, N_WAVELENGTHS};
use crate::core::ddf::*;
use crate::core::sampling::{cosine_sample_hemisphere, cosine_hemisphere_pdf};

pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Unpolarized Fresnel reflectance of a dielectric interface.
pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let cos_i = cos_i.abs().min(1.0);
    let sin_i = (1.0 - cos_i * cos_i).max(0.0).sqrt();
    let sin_t = eta_i / eta_t * sin_i;

    // Total internal reflection
    if sin_t >= 1.0 { return 1.0; }

    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);

    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

/// Refracts `wo` (on the side `wo.z` points to) through the local z plane.
pub fn refract(wo: &Vector3f, eta_i: Float, eta_t: Float) -> Option<Vector3f> {
    let eta = eta_i / eta_t;
    let cos_i = wo.z.abs();
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i).max(0.0);

    if sin2_t >= 1.0 { return None; }

    let cos_t = (1.0 - sin2_t).sqrt();
    let n = if wo.z > 0.0 { Vector3f::new(0.0, 0.0, 1.0) } else { Vector3f::new(0.0, 0.0, -1.0) };

    Some(-*wo * eta + n * (eta * cos_i - cos_t))
}

#[derive(Debug, Copy, Clone)]
pub struct LambertianBrdf {
    pub r: SampledSpectrum
}

impl LambertianBrdf {
    pub fn new(r: SampledSpectrum) -> Self {
        Self { r }
    }
}

impl Ddf for LambertianBrdf {
    fn sample(&self, query: &DdfQuery, smp: &DdfSample) -> DdfSampleResult {
        let wo = query.dir_local;
        if wo.z == 0.0 { return DdfSampleResult::invalid(); }

        let mut wi = cosine_sample_hemisphere(&smp.u_dir);
        if wo.z < 0.0 { wi.z = -wi.z; }
        let value = self.r * INV_PI;

        DdfSampleResult {
            dir_local: wi,
            value,
            dir_pdf: cosine_hemisphere_pdf(wi.z.abs()),
            sampled_type: DIFFUSE_REFLECTION,
            reverse: ReverseInfo { value, dir_pdf: cosine_hemisphere_pdf(wo.z.abs()) }
        }
    }

    fn evaluate(&self, query: &DdfQuery, dir: &Vector3f) -> (SampledSpectrum, SampledSpectrum) {
        if !same_hemisphere(&query.dir_local, dir) {
            return (SampledSpectrum::zero(), SampledSpectrum::zero());
        }
        let value = self.r * INV_PI;

        (value, value)
    }

    fn evaluate_pdf(&self, query: &DdfQuery, dir: &Vector3f) -> (Float, Float) {
        if !same_hemisphere(&query.dir_local, dir) { return (0.0, 0.0); }

        (cosine_hemisphere_pdf(dir.z.abs()), cosine_hemisphere_pdf(query.dir_local.z.abs()))
    }
}

/// Perfect mirror.
#[derive(Debug, Copy, Clone)]
pub struct SpecularReflection {
    pub r: SampledSpectrum
}

impl SpecularReflection {
    pub fn new(r: SampledSpectrum) -> Self {
        Self { r }
    }
}

impl Ddf for SpecularReflection {
    fn sample(&self, query: &DdfQuery, _smp: &DdfSample) -> DdfSampleResult {
        let wo = query.dir_local;
        if wo.z == 0.0 { return DdfSampleResult::invalid(); }
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);

        DdfSampleResult {
            dir_local: wi,
            value: self.r / wi.z.abs(),
            dir_pdf: 1.0,
            sampled_type: DELTA_REFLECTION,
            reverse: ReverseInfo { value: self.r / wo.z.abs(), dir_pdf: 1.0 }
        }
    }

    fn evaluate(&self, _query: &DdfQuery, _dir: &Vector3f) -> (SampledSpectrum, SampledSpectrum) {
        (SampledSpectrum::zero(), SampledSpectrum::zero())
    }

    fn evaluate_pdf(&self, _query: &DdfQuery, _dir: &Vector3f) -> (Float, Float) {
        (0.0, 0.0)
    }
}

/// Smooth dielectric choosing between reflection and refraction by Fresnel
/// weight. With a wavelength-dependent index the refracted direction is only
/// valid for the hero wavelength, so such samples are tagged dispersive and
/// carry only that component.
#[derive(Debug, Copy, Clone)]
pub struct SpecularScattering {
    pub r           : SampledSpectrum,
    pub t           : SampledSpectrum,
    pub eta         : [Float; N_WAVELENGTHS],
    pub dispersive  : bool
}

impl SpecularScattering {
    pub fn new(r: SampledSpectrum, t: SampledSpectrum, eta: [Float; N_WAVELENGTHS], dispersive: bool) -> Self {
        Self { r, t, eta, dispersive }
    }
}

impl Ddf for SpecularScattering {
    fn sample(&self, query: &DdfQuery, smp: &DdfSample) -> DdfSampleResult {
        let wo = query.dir_local;
        if wo.z == 0.0 { return DdfSampleResult::invalid(); }

        let eta = self.eta[query.wl_hint];
        let entering = wo.z > 0.0;
        let (eta_i, eta_t) = if entering { (1.0, eta) } else { (eta, 1.0) };
        let f = fresnel_dielectric(wo.z, eta_i, eta_t);

        let mut res = if smp.u_component < f {
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);

            DdfSampleResult {
                dir_local: wi,
                value: self.r * (f / wi.z.abs()),
                dir_pdf: f,
                sampled_type: DELTA_REFLECTION,
                reverse: ReverseInfo { value: self.r * (f / wo.z.abs()), dir_pdf: f }
            }
        } else {
            let wi = match refract(&wo, eta_i, eta_t) {
                Some(wi) => wi,
                None     => return DdfSampleResult::invalid()
            };
            let mut value = self.t * ((1.0 - f) / wi.z.abs());
            let mut rev_value = self.t * ((1.0 - f) / wo.z.abs());

            // Radiance is compressed crossing into the denser medium
            if !query.adjoint {
                value *= (eta_i * eta_i) / (eta_t * eta_t);
                rev_value *= (eta_t * eta_t) / (eta_i * eta_i);
            }

            DdfSampleResult {
                dir_local: wi,
                value,
                dir_pdf: 1.0 - f,
                sampled_type: DELTA_TRANSMISSION,
                reverse: ReverseInfo { value: rev_value, dir_pdf: 1.0 - f }
            }
        };

        if self.dispersive {
            res.value = res.value.select(query.wl_hint);
            res.reverse.value = res.reverse.value.select(query.wl_hint);
            res.sampled_type = res.sampled_type.with(DirectionFlag::Dispersive);
        }

        res
    }

    fn evaluate(&self, _query: &DdfQuery, _dir: &Vector3f) -> (SampledSpectrum, SampledSpectrum) {
        (SampledSpectrum::zero(), SampledSpectrum::zero())
    }

    fn evaluate_pdf(&self, _query: &DdfQuery, _dir: &Vector3f) -> (Float, Float) {
        (0.0, 0.0)
    }
}

/// Scatter function of points that only absorb, such as the environment.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullDdf;

impl Ddf for NullDdf {
    fn sample(&self, _query: &DdfQuery, _smp: &DdfSample) -> DdfSampleResult {
        DdfSampleResult::invalid()
    }

    fn evaluate(&self, _query: &DdfQuery, _dir: &Vector3f) -> (SampledSpectrum, SampledSpectrum) {
        (SampledSpectrum::zero(), SampledSpectrum::zero())
    }

    fn evaluate_pdf(&self, _query: &DdfQuery, _dir: &Vector3f) -> (Float, Float) {
        (0.0, 0.0)
    }
}
